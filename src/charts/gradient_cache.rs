// Per-chart gradient memoization keyed by the chart's pixel size
use serde::{Deserialize, Serialize};

use crate::charts::axis::AxisLimit;
use crate::charts::gradients::{build_gradient, AlphaStop, GradientDefinition, GradientError, GradientSurface};

/// The drawing area of a chart in pixels, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ChartArea {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Holds the gradient last built for a chart. Building only happens again
/// once the chart's width or height changes.
#[derive(Debug)]
pub struct GradientCache<G> {
    chart_width: Option<f64>,
    chart_height: Option<f64>,
    gradient: Option<G>,
}

impl<G> Default for GradientCache<G> {
    fn default() -> Self {
        Self {
            chart_width: None,
            chart_height: None,
            gradient: None,
        }
    }
}

impl<G> GradientCache<G> {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_current(&self, chart_area: &ChartArea) -> bool {
        self.chart_width == Some(chart_area.width()) && self.chart_height == Some(chart_area.height())
    }

    pub fn invalidate(&mut self) {
        *self = Self::default();
    }

    pub fn update_gradient<S>(
        &mut self,
        surface: &mut S,
        chart_area: &ChartArea,
        axis_limits: AxisLimit,
        definition: &GradientDefinition,
        alpha_stops: &[AlphaStop],
    ) -> Result<&G, GradientError>
    where
        S: GradientSurface<Gradient = G>,
    {
        if !self.is_current(chart_area) {
            self.gradient = None;
        }

        let gradient = match self.gradient.take() {
            Some(gradient) => gradient,
            None => {
                let color_stops = definition.resolve(axis_limits);
                let gradient = build_gradient(surface, chart_area, &color_stops, alpha_stops)?;
                self.chart_width = Some(chart_area.width());
                self.chart_height = Some(chart_area.height());
                gradient
            }
        };

        Ok(self.gradient.insert(gradient))
    }
}
