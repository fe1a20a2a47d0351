// HTTP client for the device API
use crate::application::carlos_api::{ApiError, CarlosApi};
use crate::domain::device::{Device, DeviceDriver, DeviceId, DeviceSignal};
use crate::domain::timeseries::{TimeseriesData, TimeseriesQuery};
use crate::infrastructure::config::normalize_url;
use crate::infrastructure::paths;
use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct HttpCarlosApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpCarlosApi {
    /// Client for the API at `base_url`. An empty `token` sends no
    /// `Authorization` header.
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: normalize_url(base_url),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%path, "requesting device API");

        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| ApiError::Transport {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%path, status = status.as_u16(), "device API request failed");
            return Err(match status {
                StatusCode::NOT_FOUND => ApiError::NotFound {
                    path: path.to_string(),
                },
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized {
                    path: path.to_string(),
                },
                _ => ApiError::Status {
                    path: path.to_string(),
                    status: status.as_u16(),
                    body,
                },
            });
        }

        response.json::<T>().await.map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

fn timeseries_params(query: &TimeseriesQuery) -> Vec<(&'static str, String)> {
    let mut params: Vec<(&'static str, String)> = query
        .timeseries_ids
        .iter()
        .map(|id| ("timeseriesId", id.to_string()))
        .collect();
    params.push((
        "startAtUtc",
        query.range.start_at_utc.to_rfc3339_opts(SecondsFormat::Secs, true),
    ));
    params.push((
        "endAtUtc",
        query.range.end_at_utc.to_rfc3339_opts(SecondsFormat::Secs, true),
    ));
    params.push(("reduceSamples", query.reduce_samples.to_string()));
    params
}

#[async_trait]
impl CarlosApi for HttpCarlosApi {
    async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
        self.get_json(paths::DEVICES_LIST, &[]).await
    }

    async fn get_device(&self, device_id: DeviceId) -> Result<Device, ApiError> {
        self.get_json(&paths::device(device_id), &[]).await
    }

    async fn get_device_drivers(&self, device_id: DeviceId) -> Result<Vec<DeviceDriver>, ApiError> {
        self.get_json(&paths::device_drivers(device_id), &[]).await
    }

    async fn get_device_driver_signals(
        &self,
        device_id: DeviceId,
        driver_identifier: &str,
    ) -> Result<Vec<DeviceSignal>, ApiError> {
        self.get_json(&paths::device_driver_signals(device_id, driver_identifier), &[])
            .await
    }

    async fn get_timeseries(&self, query: &TimeseriesQuery) -> Result<Vec<TimeseriesData>, ApiError> {
        if query.timeseries_ids.is_empty() {
            return Err(ApiError::InvalidRequest(
                "at least one timeseries id is required".to_string(),
            ));
        }
        query
            .range
            .validate()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        self.get_json(paths::TIMESERIES, &timeseries_params(query)).await
    }
}
