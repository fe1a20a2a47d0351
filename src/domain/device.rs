// Device, driver and signal domain models
use crate::domain::units::UnitOfMeasurement;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type DeviceId = Uuid;

/// Identifier of a signal's time series on the API.
pub type TimeseriesId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_id: DeviceId,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    pub last_seen_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_online: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverDirection {
    Input,
    Output,
    Bidirectional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDriver {
    pub device_id: DeviceId,
    pub driver_identifier: String,
    pub display_name: String,
    pub direction: DriverDirection,
    pub driver_module: String,
    pub is_visible_on_dashboard: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSignal {
    pub timeseries_id: TimeseriesId,
    pub device_id: DeviceId,
    pub driver_identifier: String,
    pub display_name: String,
    pub unit_of_measurement: UnitOfMeasurement,
    pub is_visible_on_dashboard: bool,
}
