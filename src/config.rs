use std::path::PathBuf;

use crate::error::{AppError, Result};

pub const DATA_PATH: &str = "data/cricket_data.csv";

/// Default number of trailing innings shown as "recent form".
pub const RECENT_INNINGS: usize = 10;

/// An innings of this many runs or more is a century.
pub const CENTURY_RUNS: u32 = 100;

/// Lower bound of a half-century. Upper bound is exclusive at `CENTURY_RUNS`.
pub const HALF_CENTURY_RUNS: u32 = 50;

/// Constant factor of the consistency index: `(mean / std_dev) * CONSISTENCY_SCALE`.
pub const CONSISTENCY_SCALE: f64 = 2.0;

/// Consistency index reported when every innings has the same score.
pub const PERFECT_CONSISTENCY: f64 = 100.0;

/// Histogram edges for the runs distribution. All bins are half-open except
/// the last one, which also includes its upper edge.
pub const RUN_BUCKET_EDGES: &[u32] = &[0, 20, 40, 60, 80, 100, 150, 200];

/// Cell values (case-insensitive, after trimming) treated as missing.
pub const NULL_MARKERS: &[&str] = &["", "na", "n/a", "nan", "null", "none"];

/// Dismissal value meaning the innings did not end in a dismissal.
pub const NOT_OUT: &str = "not out";

#[derive(Debug, Clone)]
pub struct Config {
    /// CSV source of match records (DATA_PATH)
    pub data_path: PathBuf,
    pub log_level: String,
    /// Innings in the recent-form window (RECENT_INNINGS)
    pub recent_innings: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let recent_innings = std::env::var("RECENT_INNINGS")
            .unwrap_or_else(|_| RECENT_INNINGS.to_string())
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                AppError::Config("RECENT_INNINGS must be a positive integer".to_string())
            })?;

        Ok(Self {
            data_path: std::env::var("DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DATA_PATH)),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            recent_innings,
        })
    }

    /// Replace the data path when one was given on the command line.
    pub fn with_data_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(p) = path {
            self.data_path = p;
        }
        self
    }
}
