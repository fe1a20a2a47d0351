// Rotating line colours for charts without a value-based gradient
use crate::charts::gradients::{GradientDefinition, PALETTE_BROWN, PALETTE_PRIMARY, PALETTE_SAND};

/// Hands out colours in order, wrapping around. Each dashboard owns its own
/// palette so two dashboards never shift each other's colours.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<&'static str>,
    next: usize,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(vec![PALETTE_PRIMARY, PALETTE_BROWN, PALETTE_SAND])
    }
}

impl Palette {
    pub fn new(colors: Vec<&'static str>) -> Self {
        Self { colors, next: 0 }
    }

    pub fn next_color(&mut self) -> &'static str {
        if self.colors.is_empty() {
            return PALETTE_PRIMARY;
        }
        let color = self.colors[self.next % self.colors.len()];
        self.next = (self.next + 1) % self.colors.len();
        color
    }

    pub fn next_gradient(&mut self) -> GradientDefinition {
        GradientDefinition::solid(self.next_color())
    }
}
