// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use carlos_dashboard::application::carlos_api::CarlosApi;
use carlos_dashboard::application::dashboard_service::DashboardService;
use carlos_dashboard::application::device_store::DeviceStore;
use carlos_dashboard::application::streaming_service::StreamingDashboardService;
use carlos_dashboard::infrastructure::config::load_config;
use carlos_dashboard::infrastructure::http_api::HttpCarlosApi;
use carlos_dashboard::presentation::{app_state::AppState, router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config().context("failed to load configuration")?;

    match &config.error_reporting.dsn {
        Some(_) => tracing::info!(
            environment = %config.error_reporting.environment,
            "error reporting configured"
        ),
        None => tracing::info!("error reporting disabled"),
    }

    // Create API client (infrastructure layer)
    let api: Arc<dyn CarlosApi> = Arc::new(HttpCarlosApi::new(&config.api.base_url, config.api.token.clone()));

    // Create services (application layer)
    let store = Arc::new(DeviceStore::new(api.clone()));
    let dashboard_service = DashboardService::new(store.clone(), api.clone());
    let streaming_service = StreamingDashboardService::new(store.clone(), api, dashboard_service.clone());

    let state = Arc::new(AppState {
        store,
        dashboard_service,
        streaming_service,
        charts: config.charts.clone(),
        auth: config.auth.clone(),
    });

    let addr: SocketAddr = config
        .server
        .listen_addr
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server.listen_addr))?;
    tracing::info!(%addr, api = %config.api.base_url, "starting carlos dashboard service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
