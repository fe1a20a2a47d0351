// Dashboard service - Use case for building a device dashboard
use crate::application::carlos_api::{ApiError, CarlosApi};
use crate::application::device_store::DeviceStore;
use crate::charts::gradient_cache::ChartArea;
use crate::charts::gradients::GradientError;
use crate::charts::palette::Palette;
use crate::charts::style::ChartStyle;
use crate::charts::view::{ChartModel, ChartSkeleton, ChartView};
use crate::domain::dashboard::DeviceDashboard;
use crate::domain::device::{DeviceDriver, DeviceId, DeviceSignal, TimeseriesId};
use crate::domain::timeseries::{Timeseries, TimeseriesData, TimeseriesError, TimeRange, TimeseriesQuery};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

type ChartViews = Mutex<HashMap<(DeviceId, TimeseriesId), ChartView>>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Timeseries(#[from] TimeseriesError),
    #[error("failed to build chart gradient: {0}")]
    Gradient(#[from] GradientError),
}

/// A signal selected for the dashboard, with the style its chart is drawn in.
#[derive(Debug, Clone)]
pub struct PlannedChart {
    pub signal: DeviceSignal,
    pub style: ChartStyle,
}

impl PlannedChart {
    pub fn skeleton(&self) -> ChartSkeleton {
        ChartSkeleton::new(&self.signal, &self.style)
    }

    pub fn timeseries(&self, data: TimeseriesData) -> Result<Timeseries, TimeseriesError> {
        Timeseries::from_data(
            self.signal.display_name.clone(),
            self.style.unit_symbol(),
            self.style.value_type,
            data,
        )
    }

    /// Chart for a signal the API returned no samples for.
    pub fn empty_data(&self) -> TimeseriesData {
        TimeseriesData {
            timeseries_id: self.signal.timeseries_id,
            timestamps: Vec::new(),
            values: Vec::new(),
        }
    }
}

/// Builds dashboards. Chart views outlive a request, so a chart redrawn at
/// the same size reuses its gradients.
#[derive(Clone)]
pub struct DashboardService {
    store: Arc<DeviceStore>,
    api: Arc<dyn CarlosApi>,
    views: Arc<ChartViews>,
}

impl DashboardService {
    pub fn new(store: Arc<DeviceStore>, api: Arc<dyn CarlosApi>) -> Self {
        Self {
            store,
            api,
            views: Arc::default(),
        }
    }

    /// Renders `chart` with fresh samples through the device's view of that
    /// signal, replacing the view when the signal's chart metadata changed.
    pub fn render_chart(
        &self,
        device_id: DeviceId,
        chart: &PlannedChart,
        data: TimeseriesData,
        chart_area: &ChartArea,
    ) -> Result<ChartModel, DashboardError> {
        let timeseries = chart.timeseries(data)?;
        let skeleton = chart.skeleton();

        let mut views = self.views.lock();
        let view = match views.entry((device_id, chart.signal.timeseries_id)) {
            Entry::Occupied(entry) if entry.get().is_for(&skeleton, &chart.style) => {
                let view = entry.into_mut();
                view.set_timeseries(timeseries);
                view
            }
            Entry::Occupied(mut entry) => {
                entry.insert(ChartView::new(skeleton, chart.style.clone(), timeseries));
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(ChartView::new(skeleton, chart.style.clone(), timeseries)),
        };
        Ok(view.render(chart_area)?)
    }

    #[cfg(test)]
    pub(crate) fn cached_views(&self) -> usize {
        self.views.lock().len()
    }

    /// Visible signals of the device's visible drivers, in driver order, each
    /// with its chart style. Colours are handed out by a palette owned by
    /// this one plan.
    pub async fn plan_charts(&self, device_id: DeviceId, force: bool) -> Result<Vec<PlannedChart>, DashboardError> {
        let drivers: Vec<DeviceDriver> = self
            .store
            .fetch_device_drivers(device_id, force)
            .await?
            .into_iter()
            .filter(|d| d.is_visible_on_dashboard)
            .collect();

        let signal_lists = futures::future::try_join_all(drivers.iter().map(|driver| {
            self.store
                .fetch_device_driver_signals(device_id, &driver.driver_identifier, force)
        }))
        .await?;

        let mut palette = Palette::default();
        let planned = drivers
            .iter()
            .zip(signal_lists)
            .flat_map(|(driver, signals)| {
                signals
                    .into_iter()
                    .filter(|s| s.is_visible_on_dashboard)
                    .map(move |signal| (driver.direction, signal))
            })
            .map(|(direction, signal)| {
                let style = ChartStyle::for_signal(&signal, direction, &mut palette);
                PlannedChart { signal, style }
            })
            .collect();

        Ok(planned)
    }

    pub async fn get_dashboard(
        &self,
        device_id: DeviceId,
        range: TimeRange,
        chart_area: ChartArea,
        force: bool,
    ) -> Result<DeviceDashboard, DashboardError> {
        range.validate()?;

        let device = self.store.fetch_device(device_id, force).await?;
        let planned = self.plan_charts(device_id, force).await?;

        let mut data_by_id: HashMap<_, _> = if planned.is_empty() {
            HashMap::new()
        } else {
            let ids = planned.iter().map(|p| p.signal.timeseries_id).collect();
            self.api
                .get_timeseries(&TimeseriesQuery::new(ids, range))
                .await?
                .into_iter()
                .map(|data| (data.timeseries_id, data))
                .collect()
        };

        let mut charts = Vec::with_capacity(planned.len());
        for chart in &planned {
            let data = match data_by_id.remove(&chart.signal.timeseries_id) {
                Some(data) => data,
                None => {
                    tracing::warn!(
                        timeseries_id = chart.signal.timeseries_id,
                        "no samples returned for signal"
                    );
                    chart.empty_data()
                }
            };
            charts.push(self.render_chart(device_id, chart, data, &chart_area)?);
        }

        tracing::debug!(%device_id, charts = charts.len(), "built dashboard");
        Ok(DeviceDashboard {
            device,
            range,
            charts,
        })
    }
}
