// Time series domain models
use crate::domain::device::TimeseriesId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Longest range the API accepts for a single time series query.
pub const MAX_QUERY_RANGE_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeseriesError {
    #[error("timeseries has {timestamps} timestamps but {values} values")]
    LengthMismatch { timestamps: usize, values: usize },
    #[error("timestamp at index {index} is earlier than its predecessor")]
    Unordered { index: usize },
    #[error("invalid time range: {0}")]
    InvalidRange(String),
}

/// Samples of one time series as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeseriesData {
    pub timeseries_id: TimeseriesId,
    pub timestamps: Vec<DateTime<Utc>>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start_at_utc: DateTime<Utc>,
    pub end_at_utc: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start_at_utc: DateTime<Utc>, end_at_utc: DateTime<Utc>) -> Self {
        Self {
            start_at_utc,
            end_at_utc,
        }
    }

    /// The range ending at `now` and reaching `hours` back. Fails when the
    /// start is not representable.
    pub fn last_hours(now: DateTime<Utc>, hours: i64) -> Result<Self, TimeseriesError> {
        let start = Duration::try_hours(hours)
            .and_then(|span| now.checked_sub_signed(span))
            .ok_or_else(|| TimeseriesError::InvalidRange(format!("{hours} hours is out of range")))?;
        Ok(Self::new(start, now))
    }

    pub fn validate(&self) -> Result<(), TimeseriesError> {
        if self.end_at_utc <= self.start_at_utc {
            return Err(TimeseriesError::InvalidRange(format!(
                "end {} is not after start {}",
                self.end_at_utc, self.start_at_utc
            )));
        }
        if self.end_at_utc - self.start_at_utc > Duration::days(MAX_QUERY_RANGE_DAYS) {
            return Err(TimeseriesError::InvalidRange(format!(
                "range exceeds {MAX_QUERY_RANGE_DAYS} days"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeseriesQuery {
    pub timeseries_ids: Vec<TimeseriesId>,
    pub range: TimeRange,
    pub reduce_samples: bool,
}

impl TimeseriesQuery {
    pub fn new(timeseries_ids: Vec<TimeseriesId>, range: TimeRange) -> Self {
        Self {
            timeseries_ids,
            range,
            reduce_samples: true,
        }
    }
}

/// How the values of a series are to be read and drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeseriesValueType {
    /// Continuous values.
    Analog,
    /// Discrete values, drawn as a step chart.
    Discrete,
    /// Discrete values that are either `0` or `1`.
    Boolean,
}

impl TimeseriesValueType {
    pub fn is_stepped(self) -> bool {
        !matches!(self, Self::Analog)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "x")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "y")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeseries {
    pub display_name: String,
    pub unit_symbol: Option<String>,
    pub value_type: TimeseriesValueType,
    pub samples: Vec<Sample>,
}

impl Timeseries {
    pub fn from_data(
        display_name: String,
        unit_symbol: Option<String>,
        value_type: TimeseriesValueType,
        data: TimeseriesData,
    ) -> Result<Self, TimeseriesError> {
        if data.timestamps.len() != data.values.len() {
            return Err(TimeseriesError::LengthMismatch {
                timestamps: data.timestamps.len(),
                values: data.values.len(),
            });
        }
        if let Some(index) = data
            .timestamps
            .windows(2)
            .position(|pair| pair[1] < pair[0])
        {
            return Err(TimeseriesError::Unordered { index: index + 1 });
        }

        let samples = data
            .timestamps
            .into_iter()
            .zip(data.values)
            .map(|(timestamp, value)| Sample { timestamp, value })
            .collect();

        Ok(Self {
            display_name,
            unit_symbol,
            value_type,
            samples,
        })
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.samples.iter().map(|s| s.value).collect()
    }

    /// The most recent non-null value.
    pub fn latest_value(&self) -> Option<f64> {
        self.samples.iter().rev().find_map(|s| s.value)
    }
}
