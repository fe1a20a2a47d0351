// HTTP request handlers
use crate::charts::gradient_cache::ChartArea;
use crate::domain::dashboard::DeviceDashboard;
use crate::domain::device::{Device, DeviceDriver, DeviceId, DeviceSignal};
use crate::domain::timeseries::TimeRange;
use crate::infrastructure::chunked_json::{accepts_brotli, framed_response};
use crate::infrastructure::config::ChartSettings;
use crate::presentation::app_state::AppState;
use crate::presentation::error::HttpError;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct ForceQuery {
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub hours: Option<i64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    #[serde(default)]
    pub force: bool,
}

impl DashboardQuery {
    /// Time range ending at `now` and the chart area, falling back to the
    /// configured defaults.
    pub fn resolve(&self, defaults: &ChartSettings, now: DateTime<Utc>) -> Result<(TimeRange, ChartArea), HttpError> {
        let hours = self.hours.unwrap_or(defaults.default_hours);
        let width = self.width.unwrap_or(defaults.default_width);
        let height = self.height.unwrap_or(defaults.default_height);

        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(HttpError::bad_request(format!(
                "chart size {width}x{height} must be positive"
            )));
        }

        let range = TimeRange::last_hours(now, hours).map_err(|e| HttpError::bad_request(e.to_string()))?;
        Ok((range, ChartArea::from_size(width, height)))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfigResponse {
    pub domain: String,
    pub client_id: String,
    pub audience: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Identity provider settings the browser needs to sign in
pub async fn auth_config(State(state): State<Arc<AppState>>) -> Json<AuthConfigResponse> {
    Json(AuthConfigResponse {
        domain: state.auth.domain.clone(),
        client_id: state.auth.client_id.clone(),
        audience: state.auth.audience.clone(),
    })
}

pub async fn list_devices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ForceQuery>,
) -> Result<Json<Vec<Device>>, HttpError> {
    Ok(Json(state.store.fetch_devices_list(query.force).await?))
}

pub async fn get_device(
    State(state): State<Arc<AppState>>,
    Path(device_id): Path<DeviceId>,
    Query(query): Query<ForceQuery>,
) -> Result<Json<Device>, HttpError> {
    Ok(Json(state.store.fetch_device(device_id, query.force).await?))
}

pub async fn get_device_drivers(
    State(state): State<Arc<AppState>>,
    Path(device_id): Path<DeviceId>,
    Query(query): Query<ForceQuery>,
) -> Result<Json<Vec<DeviceDriver>>, HttpError> {
    Ok(Json(state.store.fetch_device_drivers(device_id, query.force).await?))
}

pub async fn get_device_driver_signals(
    State(state): State<Arc<AppState>>,
    Path((device_id, driver_identifier)): Path<(DeviceId, String)>,
    Query(query): Query<ForceQuery>,
) -> Result<Json<Vec<DeviceSignal>>, HttpError> {
    let signals = state
        .store
        .fetch_device_driver_signals(device_id, &driver_identifier, query.force)
        .await?;
    Ok(Json(signals))
}

/// Whole dashboard in one response
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(device_id): Path<DeviceId>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DeviceDashboard>, HttpError> {
    let (range, area) = query.resolve(&state.charts, Utc::now())?;
    let dashboard = state
        .dashboard_service
        .get_dashboard(device_id, range, area, query.force)
        .await?;
    Ok(Json(dashboard))
}

/// Stream dashboard for a device (progressive loading)
pub async fn stream_dashboard(
    State(state): State<Arc<AppState>>,
    Path(device_id): Path<DeviceId>,
    Query(query): Query<DashboardQuery>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    let (range, area) = query.resolve(&state.charts, Utc::now())?;
    let compress = accepts_brotli(&headers);

    let rx = state
        .streaming_service
        .stream_dashboard(device_id, range, area, query.force)
        .await?;
    Ok(framed_response(rx, compress))
}
