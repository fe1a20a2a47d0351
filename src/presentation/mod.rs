// Presentation layer - HTTP routes
pub mod app_state;
pub mod error;
pub mod handlers;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    auth_config, get_dashboard, get_device, get_device_driver_signals, get_device_drivers,
    health_check, list_devices, stream_dashboard,
};
use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    let json_routes = Router::new()
        .route("/auth/config", get(auth_config))
        .route("/devices", get(list_devices))
        .route("/devices/:device_id", get(get_device))
        .route("/devices/:device_id/drivers", get(get_device_drivers))
        .route(
            "/devices/:device_id/drivers/:driver_identifier/signals",
            get(get_device_driver_signals),
        )
        .route("/devices/:device_id/dashboard", get(get_dashboard))
        .layer(CompressionLayer::new());

    // Stream frames are compressed one by one, so the stream route stays
    // outside the compression layer.
    Router::new()
        .route("/healthz", get(health_check))
        .route("/devices/:device_id/dashboard/stream", get(stream_dashboard))
        .merge(json_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
