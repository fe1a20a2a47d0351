// Dashboard domain model
use serde::{Deserialize, Serialize};

use crate::charts::view::{ChartModel, ChartSkeleton};
use crate::domain::device::{Device, TimeseriesId};
use crate::domain::timeseries::TimeRange;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDashboard {
    pub device: Device,
    pub range: TimeRange,
    pub charts: Vec<ChartModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSkeleton {
    pub device: Device,
    pub range: TimeRange,
    pub charts: Vec<ChartSkeleton>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvent {
    pub total_charts: usize,
    pub failed_charts: usize,
    pub duration_ms: u64,
}

/// Messages of a progressively loaded dashboard, in order: one skeleton,
/// one update or failure per chart, one completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StreamMessage {
    Skeleton(DashboardSkeleton),
    ChartUpdate(ChartModel),
    #[serde(rename_all = "camelCase")]
    ChartFailed {
        timeseries_id: TimeseriesId,
        error: String,
    },
    Complete(CompletionEvent),
}
