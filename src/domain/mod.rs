// Domain layer - Snapshot, time series and settings models
pub mod settings;
pub mod snapshot;
pub mod time_series;
