// Paths of the device API
use crate::domain::device::DeviceId;

pub const DEVICES_LIST: &str = "/devices";
pub const TIMESERIES: &str = "/timeseries";

pub fn device(device_id: DeviceId) -> String {
    format!("{DEVICES_LIST}/{device_id}")
}

pub fn device_drivers(device_id: DeviceId) -> String {
    format!("{}/drivers", device(device_id))
}

pub fn device_driver_signals(device_id: DeviceId, driver_identifier: &str) -> String {
    format!(
        "{}/{}/signals",
        device_drivers(device_id),
        urlencoding::encode(driver_identifier)
    )
}
