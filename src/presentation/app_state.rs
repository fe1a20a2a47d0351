// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::device_store::DeviceStore;
use crate::application::streaming_service::StreamingDashboardService;
use crate::infrastructure::config::{AuthSettings, ChartSettings};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DeviceStore>,
    pub dashboard_service: DashboardService,
    pub streaming_service: StreamingDashboardService,
    pub charts: ChartSettings,
    pub auth: AuthSettings,
}
