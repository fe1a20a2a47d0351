// Crosshair stroke gradient of a chart
use crate::charts::gradient_cache::{ChartArea, GradientCache};
use crate::charts::gradients::{x_ticks_gradient, GradientDefinition, GradientError, GradientSurface};

/// The gradient the browser strokes the crosshair lines with. It darkens
/// towards the top of the chart, independent of the value axis.
#[derive(Debug)]
pub struct Crosshair<G> {
    definition: GradientDefinition,
    gradient: GradientCache<G>,
}

impl<G> Default for Crosshair<G> {
    fn default() -> Self {
        Self {
            definition: x_ticks_gradient(),
            gradient: GradientCache::new(),
        }
    }
}

impl<G: Clone> Crosshair<G> {
    pub fn stroke_gradient<S>(&mut self, surface: &mut S, chart_area: &ChartArea) -> Result<G, GradientError>
    where
        S: GradientSurface<Gradient = G>,
    {
        self.gradient
            .update_gradient(surface, chart_area, [0.0, 1.0], &self.definition, &[])
            .cloned()
    }
}
