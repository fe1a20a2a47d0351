// Units of measurement and the physical quantities they belong to
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code {code}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum PhysicalQuantity {
    Identity = 0,
    Temperature = 1,
    Humidity = 2,
    Illuminance = 3,
    Ratio = 4,
}

impl TryFrom<u16> for PhysicalQuantity {
    type Error = UnknownCode;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Identity),
            1 => Ok(Self::Temperature),
            2 => Ok(Self::Humidity),
            3 => Ok(Self::Illuminance),
            4 => Ok(Self::Ratio),
            _ => Err(UnknownCode {
                kind: "physical quantity",
                code,
            }),
        }
    }
}

impl From<PhysicalQuantity> for u16 {
    fn from(quantity: PhysicalQuantity) -> Self {
        quantity as u16
    }
}

/// Unit codes as delivered by the API. The hundreds group the unit by
/// physical quantity, but the grouping is not a plain division (see
/// [`UnitOfMeasurement::physical_quantity`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum UnitOfMeasurement {
    UnitLess = 0,
    Percentage = 100,
    Celsius = 200,
    Fahrenheit = 201,
    HumidityPercentage = 300,
    Lux = 400,
}

impl UnitOfMeasurement {
    pub const ALL: [UnitOfMeasurement; 6] = [
        Self::UnitLess,
        Self::Percentage,
        Self::Celsius,
        Self::Fahrenheit,
        Self::HumidityPercentage,
        Self::Lux,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Self::UnitLess => "",
            Self::Percentage => "%",
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
            Self::HumidityPercentage => "%",
            Self::Lux => "lx",
        }
    }

    /// Symbol for display next to values, `None` for unit-less signals.
    pub fn display_symbol(self) -> Option<&'static str> {
        match self.symbol() {
            "" => None,
            symbol => Some(symbol),
        }
    }

    pub fn physical_quantity(self) -> PhysicalQuantity {
        match self {
            Self::UnitLess => PhysicalQuantity::Identity,
            Self::Percentage => PhysicalQuantity::Ratio,
            Self::Celsius | Self::Fahrenheit => PhysicalQuantity::Temperature,
            Self::HumidityPercentage => PhysicalQuantity::Humidity,
            Self::Lux => PhysicalQuantity::Illuminance,
        }
    }
}

impl TryFrom<u16> for UnitOfMeasurement {
    type Error = UnknownCode;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|unit| *unit as u16 == code)
            .ok_or(UnknownCode {
                kind: "unit of measurement",
                code,
            })
    }
}

impl From<UnitOfMeasurement> for u16 {
    fn from(unit: UnitOfMeasurement) -> Self {
        unit as u16
    }
}
