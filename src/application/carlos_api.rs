// API trait for device metadata and telemetry access
use crate::domain::device::{Device, DeviceDriver, DeviceId, DeviceSignal};
use crate::domain::timeseries::{TimeseriesData, TimeseriesQuery};
use async_trait::async_trait;

/// Failures talking to the device API. Cloneable so that one failed request
/// can be handed to every caller waiting on it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("request to {path} failed: {message}")]
    Transport { path: String, message: String },
    #[error("{path} not found")]
    NotFound { path: String },
    #[error("not authorized to access {path}")]
    Unauthorized { path: String },
    #[error("{path} answered with status {status}: {body}")]
    Status { path: String, status: u16, body: String },
    #[error("failed to decode response of {path}: {message}")]
    Decode { path: String, message: String },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[async_trait]
pub trait CarlosApi: Send + Sync {
    async fn list_devices(&self) -> Result<Vec<Device>, ApiError>;

    async fn get_device(&self, device_id: DeviceId) -> Result<Device, ApiError>;

    async fn get_device_drivers(&self, device_id: DeviceId) -> Result<Vec<DeviceDriver>, ApiError>;

    async fn get_device_driver_signals(
        &self,
        device_id: DeviceId,
        driver_identifier: &str,
    ) -> Result<Vec<DeviceSignal>, ApiError>;

    /// Samples of every requested series within the query's range, one
    /// entry per series in ascending timestamp order.
    async fn get_timeseries(&self, query: &TimeseriesQuery) -> Result<Vec<TimeseriesData>, ApiError>;
}
