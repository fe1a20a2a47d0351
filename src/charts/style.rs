// Per-signal chart styling: value type, axis layout and colours
use crate::charts::axis::AxisLimit;
use crate::charts::gradients::{
    outdoor_temperature_gradient_celsius, outdoor_temperature_gradient_fahrenheit,
    pastel_humidity_gradient, AlphaStop, GradientDefinition, LINE_BACKGROUND_FADE,
};
use crate::charts::palette::Palette;
use crate::charts::value_render::{humidity_indicator, temperature_indicator};
use crate::domain::device::{DeviceSignal, DriverDirection};
use crate::domain::timeseries::TimeseriesValueType;
use crate::domain::units::UnitOfMeasurement;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisStyle {
    pub static_limits: AxisLimit,
    pub tick_step: f64,
    /// Granularity used when data pushes the axis beyond its static limits.
    pub limit_step: f64,
}

impl AxisStyle {
    const fn new(static_limits: AxisLimit, tick_step: f64, limit_step: f64) -> Self {
        Self {
            static_limits,
            tick_step,
            limit_step,
        }
    }

    pub fn for_unit(unit: UnitOfMeasurement) -> Self {
        match unit {
            UnitOfMeasurement::Celsius => Self::new([0.0, 40.0], 10.0, 5.0),
            UnitOfMeasurement::Fahrenheit => Self::new([30.0, 100.0], 10.0, 5.0),
            UnitOfMeasurement::HumidityPercentage | UnitOfMeasurement::Percentage => {
                Self::new([0.0, 100.0], 25.0, 5.0)
            }
            UnitOfMeasurement::Lux => Self::new([0.0, 1000.0], 250.0, 100.0),
            UnitOfMeasurement::UnitLess => Self::new([0.0, 1.0], 1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub unit: UnitOfMeasurement,
    pub value_type: TimeseriesValueType,
    pub axis: AxisStyle,
    pub line: GradientDefinition,
    pub fill: Vec<AlphaStop>,
}

impl ChartStyle {
    /// Temperature and humidity get their value-based gradients, everything
    /// else the next palette colour.
    pub fn for_signal(signal: &DeviceSignal, direction: DriverDirection, palette: &mut Palette) -> Self {
        let unit = signal.unit_of_measurement;
        let line = match unit {
            UnitOfMeasurement::Celsius => outdoor_temperature_gradient_celsius(),
            UnitOfMeasurement::Fahrenheit => outdoor_temperature_gradient_fahrenheit(),
            UnitOfMeasurement::HumidityPercentage => pastel_humidity_gradient(),
            _ => palette.next_gradient(),
        };

        Self {
            unit,
            value_type: value_type(unit, direction),
            axis: AxisStyle::for_unit(unit),
            line,
            fill: LINE_BACKGROUND_FADE.to_vec(),
        }
    }

    pub fn unit_symbol(&self) -> Option<String> {
        self.unit.display_symbol().map(str::to_string)
    }

    /// Comfort emoji for the latest value, where the quantity has one.
    pub fn indicator(&self, value: f64) -> Option<&'static str> {
        match self.unit {
            UnitOfMeasurement::Celsius => Some(temperature_indicator(value)),
            UnitOfMeasurement::Fahrenheit => Some(temperature_indicator((value - 32.0) * 5.0 / 9.0)),
            UnitOfMeasurement::HumidityPercentage => Some(humidity_indicator(value)),
            _ => None,
        }
    }
}

/// Unit-less actuators switch on and off; unit-less sensors report states.
fn value_type(unit: UnitOfMeasurement, direction: DriverDirection) -> TimeseriesValueType {
    match (unit, direction) {
        (UnitOfMeasurement::UnitLess, DriverDirection::Input) => TimeseriesValueType::Discrete,
        (UnitOfMeasurement::UnitLess, _) => TimeseriesValueType::Boolean,
        _ => TimeseriesValueType::Analog,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::gradients::{PALETTE_BROWN, PALETTE_PRIMARY};
    use uuid::Uuid;

    fn signal(unit: UnitOfMeasurement) -> DeviceSignal {
        DeviceSignal {
            timeseries_id: 1,
            device_id: Uuid::nil(),
            driver_identifier: "driver".to_string(),
            display_name: "Signal".to_string(),
            unit_of_measurement: unit,
            is_visible_on_dashboard: true,
        }
    }

    #[test]
    fn test_quantities_with_gradients_do_not_consume_palette() {
        let mut palette = Palette::default();

        let temperature = ChartStyle::for_signal(
            &signal(UnitOfMeasurement::Celsius),
            DriverDirection::Input,
            &mut palette,
        );
        assert_eq!(temperature.line, outdoor_temperature_gradient_celsius());
        assert_eq!(temperature.value_type, TimeseriesValueType::Analog);
        assert_eq!(temperature.axis.static_limits, [0.0, 40.0]);

        let lux = ChartStyle::for_signal(&signal(UnitOfMeasurement::Lux), DriverDirection::Input, &mut palette);
        assert_eq!(lux.line, GradientDefinition::solid(PALETTE_PRIMARY));

        let relay = ChartStyle::for_signal(
            &signal(UnitOfMeasurement::UnitLess),
            DriverDirection::Output,
            &mut palette,
        );
        assert_eq!(relay.line, GradientDefinition::solid(PALETTE_BROWN));
        assert_eq!(relay.value_type, TimeseriesValueType::Boolean);
        assert_eq!(relay.unit_symbol(), None);
    }

    #[test]
    fn test_indicator() {
        let mut palette = Palette::default();
        let fahrenheit = ChartStyle::for_signal(
            &signal(UnitOfMeasurement::Fahrenheit),
            DriverDirection::Input,
            &mut palette,
        );
        assert_eq!(fahrenheit.indicator(72.0), Some("😊"));
        let percent = ChartStyle::for_signal(
            &signal(UnitOfMeasurement::Percentage),
            DriverDirection::Input,
            &mut palette,
        );
        assert_eq!(percent.indicator(50.0), None);
    }
}
