pub mod config;
pub mod display;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod types;

pub use error::{AppError, Result};
pub use metrics::MetricsCalculator;
pub use types::{Format, MatchRecord, MetricsResult, PlayerDataset};
