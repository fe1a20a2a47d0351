// In-memory API used by the application layer tests
use crate::application::carlos_api::{ApiError, CarlosApi};
use crate::domain::device::{Device, DeviceDriver, DeviceId, DeviceSignal, DriverDirection, TimeseriesId};
use crate::domain::timeseries::{TimeseriesData, TimeseriesQuery};
use crate::domain::units::UnitOfMeasurement;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

pub const GREENHOUSE: Uuid = Uuid::from_u128(0x6f1c2a7e_3d4b_4c5a_9e8f_0a1b2c3d4e5f);

#[derive(Default)]
pub struct FakeCarlosApi {
    pub devices: Vec<Device>,
    pub drivers: HashMap<DeviceId, Vec<DeviceDriver>>,
    pub signals: HashMap<(DeviceId, String), Vec<DeviceSignal>>,
    pub timeseries: HashMap<TimeseriesId, TimeseriesData>,
    pub failing_timeseries: HashSet<TimeseriesId>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl FakeCarlosApi {
    pub fn calls(&self, endpoint: &'static str) -> usize {
        self.calls.lock().get(endpoint).copied().unwrap_or(0)
    }

    fn record(&self, endpoint: &'static str) {
        *self.calls.lock().entry(endpoint).or_default() += 1;
    }

    /// One device with a visible climate sensor, a visible relay and a
    /// hidden debug driver.
    pub fn greenhouse() -> Self {
        let mut api = Self::default();
        api.devices.push(Device {
            device_id: GREENHOUSE,
            display_name: "Greenhouse".to_string(),
            description: Some("Tomatoes".to_string()),
            registered_at: Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
            last_seen_at: None,
            is_online: false,
        });

        let driver = |identifier: &str, direction, visible| DeviceDriver {
            device_id: GREENHOUSE,
            driver_identifier: identifier.to_string(),
            display_name: identifier.to_uppercase(),
            direction,
            driver_module: identifier.to_string(),
            is_visible_on_dashboard: visible,
        };
        api.drivers.insert(
            GREENHOUSE,
            vec![
                driver("sht30", DriverDirection::Input, true),
                driver("relay", DriverDirection::Output, true),
                driver("debug", DriverDirection::Input, false),
            ],
        );

        let signal = |id, driver: &str, name: &str, unit, visible| DeviceSignal {
            timeseries_id: id,
            device_id: GREENHOUSE,
            driver_identifier: driver.to_string(),
            display_name: name.to_string(),
            unit_of_measurement: unit,
            is_visible_on_dashboard: visible,
        };
        api.signals.insert(
            (GREENHOUSE, "sht30".to_string()),
            vec![
                signal(1, "sht30", "Temperature", UnitOfMeasurement::Celsius, true),
                signal(2, "sht30", "Humidity", UnitOfMeasurement::HumidityPercentage, true),
            ],
        );
        api.signals.insert(
            (GREENHOUSE, "relay".to_string()),
            vec![
                signal(3, "relay", "Pump", UnitOfMeasurement::UnitLess, true),
                signal(4, "relay", "Pump current", UnitOfMeasurement::Percentage, false),
            ],
        );
        api.signals.insert(
            (GREENHOUSE, "debug".to_string()),
            vec![signal(5, "debug", "Loop time", UnitOfMeasurement::UnitLess, true)],
        );

        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let series = |id, values: Vec<Option<f64>>| TimeseriesData {
            timeseries_id: id,
            timestamps: (0..values.len() as i64)
                .map(|i| start + chrono::Duration::minutes(5 * i))
                .collect(),
            values,
        };
        for data in [
            series(1, vec![Some(18.5), Some(21.0), Some(44.0)]),
            series(2, vec![Some(55.0), None, Some(61.0)]),
            series(3, vec![Some(0.0), Some(1.0), Some(0.0)]),
        ] {
            api.timeseries.insert(data.timeseries_id, data);
        }
        api
    }
}

#[async_trait]
impl CarlosApi for FakeCarlosApi {
    async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
        self.record("list_devices");
        Ok(self.devices.clone())
    }

    async fn get_device(&self, device_id: DeviceId) -> Result<Device, ApiError> {
        self.record("get_device");
        self.devices
            .iter()
            .find(|d| d.device_id == device_id)
            .cloned()
            .ok_or(ApiError::NotFound {
                path: format!("/devices/{device_id}"),
            })
    }

    async fn get_device_drivers(&self, device_id: DeviceId) -> Result<Vec<DeviceDriver>, ApiError> {
        self.record("get_device_drivers");
        self.drivers.get(&device_id).cloned().ok_or(ApiError::NotFound {
            path: format!("/devices/{device_id}/drivers"),
        })
    }

    async fn get_device_driver_signals(
        &self,
        device_id: DeviceId,
        driver_identifier: &str,
    ) -> Result<Vec<DeviceSignal>, ApiError> {
        self.record("get_device_driver_signals");
        self.signals
            .get(&(device_id, driver_identifier.to_string()))
            .cloned()
            .ok_or(ApiError::NotFound {
                path: format!("/devices/{device_id}/drivers/{driver_identifier}/signals"),
            })
    }

    async fn get_timeseries(&self, query: &TimeseriesQuery) -> Result<Vec<TimeseriesData>, ApiError> {
        self.record("get_timeseries");
        if query
            .timeseries_ids
            .iter()
            .any(|id| self.failing_timeseries.contains(id))
        {
            return Err(ApiError::Status {
                path: "/timeseries".to_string(),
                status: 500,
                body: "database unavailable".to_string(),
            });
        }
        Ok(query
            .timeseries_ids
            .iter()
            .filter_map(|id| self.timeseries.get(id).cloned())
            .collect())
    }
}
