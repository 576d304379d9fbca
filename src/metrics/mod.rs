pub mod calculator;
pub mod series;

pub use calculator::{round1, MetricsCalculator};
pub use series::{career_progression, recent_innings, runs_distribution};
