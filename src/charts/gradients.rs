// Gradient definitions, alpha interpolation and gradient construction
use serde::{Deserialize, Serialize};

use crate::charts::axis::AxisLimit;
use crate::charts::color::Color;
use crate::charts::gradient_cache::ChartArea;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GradientError {
    #[error("Alpha stops array is empty")]
    EmptyAlphaStops,
    #[error("color stop offset {0} is outside [0, 1]")]
    OffsetOutOfRange(f64),
    #[error("invalid color {0:?}")]
    InvalidColor(String),
}

/// One colour stop, `position` in `[0, 1]` along the gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: String,
}

impl ColorStop {
    pub fn new(position: f64, color: impl Into<String>) -> Self {
        Self {
            position,
            color: color.into(),
        }
    }
}

/// A colour stop pinned to a value on the chart's value axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscreteColorStop {
    pub at_value: f64,
    pub color: String,
}

impl DiscreteColorStop {
    pub fn new(at_value: f64, color: impl Into<String>) -> Self {
        Self {
            at_value,
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaStop {
    pub position: f64,
    pub alpha: f64,
}

impl AlphaStop {
    pub const fn new(position: f64, alpha: f64) -> Self {
        Self { position, alpha }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "stops", rename_all = "camelCase")]
pub enum GradientDefinition {
    Positional(Vec<ColorStop>),
    Discrete(Vec<DiscreteColorStop>),
}

impl GradientDefinition {
    /// A single colour spread over the whole gradient.
    pub fn solid(color: &str) -> Self {
        Self::Positional(vec![ColorStop::new(0.0, color), ColorStop::new(1.0, color)])
    }

    /// Positional stops for a chart whose value axis spans `axis_limits`.
    pub fn resolve(&self, axis_limits: AxisLimit) -> Vec<ColorStop> {
        match self {
            Self::Positional(stops) => stops.clone(),
            Self::Discrete(stops) => convert_discrete_to_color_stops(stops, axis_limits),
        }
    }
}

/// Maps value-pinned stops onto gradient positions. Positions are not
/// clamped; stops outside the axis limits land outside `[0, 1]`.
pub fn convert_discrete_to_color_stops(
    discrete_color_stops: &[DiscreteColorStop],
    axis_limits: AxisLimit,
) -> Vec<ColorStop> {
    let [low, high] = axis_limits;
    discrete_color_stops
        .iter()
        .map(|stop| ColorStop {
            position: (stop.at_value - low) / (high - low),
            color: stop.color.clone(),
        })
        .collect()
}

/// Linear interpolation of the opacity at `position` between the bracketing
/// alpha stops. Positions outside the stops take the nearest stop's alpha.
pub fn interpolate_alpha(alpha_stops: &[AlphaStop], position: f64) -> Result<f64, GradientError> {
    match alpha_stops {
        [] => return Err(GradientError::EmptyAlphaStops),
        [only] => return Ok(only.alpha),
        _ => {}
    }

    let mut stops = alpha_stops.to_vec();
    stops.sort_by(|a, b| a.position.total_cmp(&b.position));
    let position = position.clamp(0.0, 1.0);

    if position <= stops[0].position {
        return Ok(stops[0].alpha);
    }

    for pair in stops.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if position < next.position {
            let slope = (next.alpha - prev.alpha) / (next.position - prev.position);
            return Ok(slope * (position - prev.position) + prev.alpha);
        }
    }

    Ok(stops[stops.len() - 1].alpha)
}

/// The gradient half of the canvas API.
pub trait CanvasGradient {
    /// Fails when `offset` is outside `[0, 1]`.
    fn add_color_stop(&mut self, offset: f64, color: &str) -> Result<(), GradientError>;
}

/// A drawing surface able to create linear gradients.
pub trait GradientSurface {
    type Gradient: CanvasGradient;

    fn create_linear_gradient(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> Self::Gradient;
}

/// A linear gradient in chart pixel coordinates, ready to be applied by the
/// browser's canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub stops: Vec<ColorStop>,
}

impl CanvasGradient for LinearGradient {
    fn add_color_stop(&mut self, offset: f64, color: &str) -> Result<(), GradientError> {
        if !(0.0..=1.0).contains(&offset) {
            return Err(GradientError::OffsetOutOfRange(offset));
        }
        self.stops.push(ColorStop::new(offset, color));
        Ok(())
    }
}

/// Surface producing serializable [`LinearGradient`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct GradientRecorder;

impl GradientSurface for GradientRecorder {
    type Gradient = LinearGradient;

    fn create_linear_gradient(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> LinearGradient {
        LinearGradient {
            x0,
            y0,
            x1,
            y1,
            stops: Vec::new(),
        }
    }
}

/// Builds a bottom-to-top gradient over `chart_area`. With alpha stops given,
/// each colour's opacity is replaced by the interpolated alpha at its position.
pub fn build_gradient<S: GradientSurface>(
    surface: &mut S,
    chart_area: &ChartArea,
    color_stops: &[ColorStop],
    alpha_stops: &[AlphaStop],
) -> Result<S::Gradient, GradientError> {
    let mut gradient = surface.create_linear_gradient(0.0, chart_area.bottom, 0.0, chart_area.top);

    for stop in color_stops {
        let mut color: Color = stop.color.parse()?;
        if !alpha_stops.is_empty() {
            color = color.with_alpha(interpolate_alpha(alpha_stops, stop.position)?);
        }
        gradient.add_color_stop(stop.position.clamp(0.0, 1.0), &color.to_string())?;
    }

    Ok(gradient)
}

pub fn outdoor_temperature_gradient_celsius() -> GradientDefinition {
    GradientDefinition::Discrete(vec![
        DiscreteColorStop::new(-16.0, "#366dea"),
        DiscreteColorStop::new(-6.0, "#56a2f5"),
        DiscreteColorStop::new(5.0, "#7dcce1"),
        DiscreteColorStop::new(11.0, "#8ad1c0"),
        DiscreteColorStop::new(16.0, "#bccf71"),
        DiscreteColorStop::new(21.0, "#f0ce47"),
        DiscreteColorStop::new(38.0, "#c73e2f"),
        DiscreteColorStop::new(43.0, "#ab3124"),
    ])
}

/// The Celsius temperature gradient with its stops moved to °F.
pub fn outdoor_temperature_gradient_fahrenheit() -> GradientDefinition {
    match outdoor_temperature_gradient_celsius() {
        GradientDefinition::Discrete(stops) => GradientDefinition::Discrete(
            stops
                .into_iter()
                .map(|stop| DiscreteColorStop {
                    at_value: stop.at_value * 9.0 / 5.0 + 32.0,
                    ..stop
                })
                .collect(),
        ),
        positional => positional,
    }
}

pub fn pastel_humidity_gradient() -> GradientDefinition {
    GradientDefinition::Discrete(vec![
        DiscreteColorStop::new(0.0, "#f29595"),
        DiscreteColorStop::new(30.0, "#d5e8d4"),
        DiscreteColorStop::new(70.0, "#d5e8d4"),
        DiscreteColorStop::new(100.0, "#8ab6d6"),
    ])
}

pub fn x_ticks_gradient() -> GradientDefinition {
    GradientDefinition::Positional(vec![
        ColorStop::new(0.0, "#64748b"),
        ColorStop::new(0.6, "#64748b"),
        ColorStop::new(0.9, "#1f2128"),
    ])
}

pub const PALETTE_PRIMARY: &str = "#98b274";
pub const PALETTE_BROWN: &str = "#f4fec1";
pub const PALETTE_SAND: &str = "#f4d35e";

/// Fades the area under a line out towards the bottom of the chart.
pub const LINE_BACKGROUND_FADE: [AlphaStop; 2] = [AlphaStop::new(0.1, 0.0), AlphaStop::new(1.0, 0.5)];
