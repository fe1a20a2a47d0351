// Device store - memoized device metadata for the session
use crate::application::carlos_api::{ApiError, CarlosApi};
use crate::application::request_cache::RequestCache;
use crate::domain::device::{Device, DeviceDriver, DeviceId, DeviceSignal};
use std::sync::Arc;

/// Holds the last fetched device list, device details, drivers per device and
/// signals per (device, driver). Every lookup goes through a [`RequestCache`],
/// so concurrent requests for the same resource share one API call.
pub struct DeviceStore {
    api: Arc<dyn CarlosApi>,
    devices_list: RequestCache<(), Vec<Device>, ApiError>,
    devices: RequestCache<DeviceId, Device, ApiError>,
    drivers: RequestCache<DeviceId, Vec<DeviceDriver>, ApiError>,
    signals: RequestCache<(DeviceId, String), Vec<DeviceSignal>, ApiError>,
}

impl DeviceStore {
    pub fn new(api: Arc<dyn CarlosApi>) -> Self {
        Self {
            api,
            devices_list: RequestCache::new(),
            devices: RequestCache::new(),
            drivers: RequestCache::new(),
            signals: RequestCache::new(),
        }
    }

    pub async fn fetch_devices_list(&self, force: bool) -> Result<Vec<Device>, ApiError> {
        let api = self.api.clone();
        self.devices_list
            .get_or_fetch((), force, move || async move { api.list_devices().await })
            .await
    }

    /// A device's details. Devices already known from the list are served
    /// from it without a request.
    pub async fn fetch_device(&self, device_id: DeviceId, force: bool) -> Result<Device, ApiError> {
        if !force {
            let listed = self
                .devices_list
                .cached(&())
                .and_then(|devices| devices.into_iter().find(|d| d.device_id == device_id));
            if let Some(device) = listed {
                return Ok(device);
            }
        }

        let api = self.api.clone();
        self.devices
            .get_or_fetch(device_id, force, move || async move { api.get_device(device_id).await })
            .await
    }

    pub async fn fetch_device_drivers(
        &self,
        device_id: DeviceId,
        force: bool,
    ) -> Result<Vec<DeviceDriver>, ApiError> {
        let api = self.api.clone();
        self.drivers
            .get_or_fetch(device_id, force, move || async move {
                api.get_device_drivers(device_id).await
            })
            .await
    }

    pub async fn fetch_device_driver_signals(
        &self,
        device_id: DeviceId,
        driver_identifier: &str,
        force: bool,
    ) -> Result<Vec<DeviceSignal>, ApiError> {
        let api = self.api.clone();
        let driver_identifier = driver_identifier.to_string();
        let key = (device_id, driver_identifier.clone());
        self.signals
            .get_or_fetch(key, force, move || async move {
                api.get_device_driver_signals(device_id, &driver_identifier)
                    .await
            })
            .await
    }
}
