// Streaming dashboard service - Progressive loading, one chart at a time
use crate::application::carlos_api::CarlosApi;
use crate::application::dashboard_service::{DashboardError, DashboardService, PlannedChart};
use crate::application::device_store::DeviceStore;
use crate::charts::gradient_cache::ChartArea;
use crate::domain::dashboard::{CompletionEvent, DashboardSkeleton, StreamMessage};
use crate::domain::device::DeviceId;
use crate::domain::timeseries::{TimeRange, TimeseriesQuery};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 100;

#[derive(Clone)]
pub struct StreamingDashboardService {
    store: Arc<DeviceStore>,
    api: Arc<dyn CarlosApi>,
    dashboards: DashboardService,
}

impl StreamingDashboardService {
    /// Streams through `dashboards`, sharing its chart views with the
    /// whole-dashboard endpoint.
    pub fn new(store: Arc<DeviceStore>, api: Arc<dyn CarlosApi>, dashboards: DashboardService) -> Self {
        Self {
            store,
            api,
            dashboards,
        }
    }

    /// Resolves the device and its charts up front, so lookup failures are
    /// reported to the caller, then streams a skeleton, one message per
    /// chart as its samples arrive, and a completion event.
    pub async fn stream_dashboard(
        &self,
        device_id: DeviceId,
        range: TimeRange,
        chart_area: ChartArea,
        force: bool,
    ) -> Result<mpsc::Receiver<StreamMessage>, DashboardError> {
        range.validate()?;
        let start_time = Instant::now();

        let device = self.store.fetch_device(device_id, force).await?;
        let planned = self.dashboards.plan_charts(device_id, force).await?;

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let skeleton = DashboardSkeleton {
            device,
            range,
            charts: planned.iter().map(PlannedChart::skeleton).collect(),
        };
        let _ = tx.send(StreamMessage::Skeleton(skeleton)).await;

        let total_charts = planned.len();
        let mut tasks = Vec::with_capacity(total_charts);
        for chart in planned {
            let tx = tx.clone();
            let api = self.api.clone();
            let dashboards = self.dashboards.clone();

            tasks.push(tokio::spawn(async move {
                let timeseries_id = chart.signal.timeseries_id;
                let query = TimeseriesQuery::new(vec![timeseries_id], range);
                let model = match api.get_timeseries(&query).await {
                    Ok(series) => {
                        let data = series
                            .into_iter()
                            .find(|d| d.timeseries_id == timeseries_id)
                            .unwrap_or_else(|| chart.empty_data());
                        dashboards.render_chart(device_id, &chart, data, &chart_area)
                    }
                    Err(e) => Err(e.into()),
                };

                let (message, failed) = match model {
                    Ok(model) => (StreamMessage::ChartUpdate(model), false),
                    Err(e) => {
                        tracing::warn!(timeseries_id, error = %e, "chart failed to load");
                        let message = StreamMessage::ChartFailed {
                            timeseries_id,
                            error: e.to_string(),
                        };
                        (message, true)
                    }
                };
                let _ = tx.send(message).await;
                failed
            }));
        }

        tokio::spawn(async move {
            let failed_charts = futures::future::join_all(tasks)
                .await
                .into_iter()
                .filter(|outcome| !matches!(outcome, Ok(false)))
                .count();

            let complete = CompletionEvent {
                total_charts,
                failed_charts,
                duration_ms: start_time.elapsed().as_millis() as u64,
            };
            tracing::debug!(%device_id, total_charts, failed_charts, "dashboard stream complete");
            let _ = tx.send(StreamMessage::Complete(complete)).await;
        });

        Ok(rx)
    }
}
