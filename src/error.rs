use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Data source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Data source unreadable: {}: {reason}", path.display())]
    SourceUnreadable { path: PathBuf, reason: String },

    /// Lookup failure for one player. `available` carries the distinct
    /// normalized names of the dataset so callers can offer alternatives.
    #[error("Player '{name}' not found. Available players: {}", available.join(", "))]
    PlayerNotFound { name: String, available: Vec<String> },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Worker task error: {0}")]
    Task(String),

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        AppError::SourceUnreadable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_not_found_lists_alternatives() {
        let err = AppError::PlayerNotFound {
            name: "Unknown Player".to_string(),
            available: vec!["virat kohli".to_string(), "joe root".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Player 'Unknown Player' not found. Available players: virat kohli, joe root"
        );
    }

    #[test]
    fn source_errors_name_the_path() {
        let err = AppError::SourceNotFound {
            path: PathBuf::from("missing.csv"),
        };
        assert_eq!(err.to_string(), "Data source not found: missing.csv");

        let err = AppError::unreadable("bad.csv", "ragged row at line 3");
        assert_eq!(
            err.to_string(),
            "Data source unreadable: bad.csv: ragged row at line 3"
        );
    }
}
