// Domain layer - API entities and dashboard models
pub mod dashboard;
pub mod device;
pub mod timeseries;
pub mod units;
