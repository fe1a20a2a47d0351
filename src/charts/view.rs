// One chart instance: its series, style and cached gradients
use serde::{Deserialize, Serialize};

use crate::charts::axis::{get_suitable_limit, ticks, AxisLimit, Tick};
use crate::charts::crosshair::Crosshair;
use crate::charts::gradient_cache::{ChartArea, GradientCache};
use crate::charts::gradients::{GradientError, GradientRecorder, LinearGradient};
use crate::charts::style::ChartStyle;
use crate::charts::value_render::render_number;
use crate::domain::device::{DeviceSignal, TimeseriesId};
use crate::domain::timeseries::{Sample, Timeseries, TimeseriesValueType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisModel {
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<Tick>,
}

/// Everything the browser needs to draw one signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartModel {
    pub timeseries_id: TimeseriesId,
    pub driver_identifier: String,
    pub title: String,
    pub unit_symbol: Option<String>,
    pub value_type: TimeseriesValueType,
    pub stepped: bool,
    pub samples: Vec<Sample>,
    pub y_axis: AxisModel,
    pub line_gradient: LinearGradient,
    pub fill_gradient: LinearGradient,
    pub crosshair_gradient: LinearGradient,
    pub latest_value: String,
    pub indicator: Option<String>,
}

/// Chart metadata known before any samples are loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSkeleton {
    pub timeseries_id: TimeseriesId,
    pub driver_identifier: String,
    pub title: String,
    pub unit_symbol: Option<String>,
    pub value_type: TimeseriesValueType,
}

impl ChartSkeleton {
    pub fn new(signal: &DeviceSignal, style: &ChartStyle) -> Self {
        Self {
            timeseries_id: signal.timeseries_id,
            driver_identifier: signal.driver_identifier.clone(),
            title: signal.display_name.clone(),
            unit_symbol: style.unit_symbol(),
            value_type: style.value_type,
        }
    }
}

#[derive(Debug)]
pub struct ChartView {
    skeleton: ChartSkeleton,
    style: ChartStyle,
    timeseries: Timeseries,
    axis_limits: AxisLimit,
    surface: GradientRecorder,
    line: GradientCache<LinearGradient>,
    fill: GradientCache<LinearGradient>,
    crosshair: Crosshair<LinearGradient>,
}

impl ChartView {
    pub fn new(skeleton: ChartSkeleton, style: ChartStyle, timeseries: Timeseries) -> Self {
        let axis_limits = suitable_limits(&style, &timeseries);
        Self {
            skeleton,
            style,
            timeseries,
            axis_limits,
            surface: GradientRecorder,
            line: GradientCache::new(),
            fill: GradientCache::new(),
            crosshair: Crosshair::default(),
        }
    }

    pub fn axis_limits(&self) -> AxisLimit {
        self.axis_limits
    }

    /// Swaps in fresh samples. Gradients follow the axis, so they are dropped
    /// when the limits move.
    pub fn set_timeseries(&mut self, timeseries: Timeseries) {
        let axis_limits = suitable_limits(&self.style, &timeseries);
        if axis_limits != self.axis_limits {
            self.line.invalidate();
            self.fill.invalidate();
            self.axis_limits = axis_limits;
        }
        self.timeseries = timeseries;
    }

    /// Whether this view draws the chart described by `skeleton` and `style`.
    pub fn is_for(&self, skeleton: &ChartSkeleton, style: &ChartStyle) -> bool {
        &self.skeleton == skeleton && &self.style == style
    }

    pub fn render(&mut self, chart_area: &ChartArea) -> Result<ChartModel, GradientError> {
        let line_gradient = self
            .line
            .update_gradient(&mut self.surface, chart_area, self.axis_limits, &self.style.line, &[])?
            .clone();
        let fill_gradient = self
            .fill
            .update_gradient(
                &mut self.surface,
                chart_area,
                self.axis_limits,
                &self.style.line,
                &self.style.fill,
            )?
            .clone();
        let crosshair_gradient = self.crosshair.stroke_gradient(&mut self.surface, chart_area)?;

        let [min, max] = self.axis_limits;
        let latest = self.timeseries.latest_value();

        Ok(ChartModel {
            timeseries_id: self.skeleton.timeseries_id,
            driver_identifier: self.skeleton.driver_identifier.clone(),
            title: self.timeseries.display_name.clone(),
            unit_symbol: self.timeseries.unit_symbol.clone(),
            value_type: self.timeseries.value_type,
            stepped: self.timeseries.value_type.is_stepped(),
            samples: self.timeseries.samples.clone(),
            y_axis: AxisModel {
                min,
                max,
                ticks: ticks(
                    self.axis_limits,
                    self.style.axis.tick_step,
                    self.timeseries.unit_symbol.as_deref(),
                ),
            },
            line_gradient,
            fill_gradient,
            crosshair_gradient,
            latest_value: render_number(latest),
            indicator: latest
                .and_then(|value| self.style.indicator(value))
                .map(str::to_string),
        })
    }
}

fn suitable_limits(style: &ChartStyle, timeseries: &Timeseries) -> AxisLimit {
    get_suitable_limit(
        style.axis.static_limits,
        &timeseries.values(),
        style.axis.limit_step,
    )
}
