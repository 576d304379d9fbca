//! Ingestion → cleaning → filtering → metrics, as one call for hosts.

pub mod cleaner;
pub mod filter;

use std::path::Path;

use tracing::info;

pub use cleaner::{clean, CleanStats};
pub use filter::{by_format, by_format_typed, by_player, player_match_counts, player_names};

use crate::error::Result;
use crate::ingest::load_records;
use crate::metrics::MetricsCalculator;
use crate::types::{MetricsResult, PlayerDataset};

/// Load and clean a source.
pub fn load_clean(source: &Path) -> Result<(PlayerDataset, CleanStats)> {
    let raw = load_records(source)?;
    Ok(clean(&raw))
}

/// Metrics for one player, optionally restricted to one format.
pub fn run(source: &Path, player: &str, format: Option<&str>) -> Result<MetricsResult> {
    let (dataset, stats) = load_clean(source)?;
    info!(
        "[PIPELINE] {} of {} rows usable",
        stats.output_rows, stats.input_rows
    );
    player_metrics(&dataset, player, format)
}

/// Filter an already-clean dataset and compute metrics.
pub fn player_metrics(
    dataset: &PlayerDataset,
    player: &str,
    format: Option<&str>,
) -> Result<MetricsResult> {
    let rows = by_player(dataset, player)?;
    let rows = match format {
        Some(f) => by_format(&rows, f),
        None => rows,
    };
    Ok(MetricsCalculator::new(&rows).calculate_all())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::io::Write;

    const SOURCE: &str = "\
player_name,runs,balls_faced,fours,sixes,centuries,half_centuries,format,dismissal
Virat Kohli,72,58,8,1,0,1,ODI,caught
Virat Kohli,112,95,10,3,1,0,ODI,not out
Virat Kohli,45,39,5,0,0,0,ODI,bowled
Virat Kohli,45,39,5,0,0,0,ODI,bowled
Virat Kohli,20,30,2,0,0,0,Test,lbw
JOE ROOT ,88,140,9,0,0,1,Test,caught
,50,40,4,1,0,1,ODI,caught
";

    fn source_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SOURCE.as_bytes()).unwrap();
        file
    }

    #[test]
    fn end_to_end_for_one_format() {
        let file = source_file();
        let m = run(file.path(), "Virat Kohli", Some("odi")).unwrap();
        assert_eq!(m.player_name, "virat kohli");
        assert_eq!(m.total_runs, 229);
        assert_eq!(m.matches_played, 3);
        assert!((m.batting_average - 114.5).abs() < 1e-9);
        assert!((m.strike_rate - 119.3).abs() < 1e-9);
        assert_eq!(m.highest_score, 112);
        assert_eq!(m.centuries, 1);
    }

    #[test]
    fn end_to_end_all_formats() {
        let file = source_file();
        let m = run(file.path(), "virat kohli", None).unwrap();
        assert_eq!(m.matches_played, 4);
        assert_eq!(m.total_runs, 249);
    }

    #[test]
    fn normalized_names_match() {
        let file = source_file();
        let m = run(file.path(), "Joe Root", None).unwrap();
        assert_eq!(m.matches_played, 1);
    }

    #[test]
    fn innings_differing_only_in_an_untracked_column_are_kept() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"player_name,runs,balls_faced,format,dismissal,match_date\n\
              Virat Kohli,45,39,ODI,bowled,2023-01-10\n\
              Virat Kohli,45,39,ODI,bowled,2023-02-14\n\
              Virat Kohli,45,39,ODI,bowled,2023-02-14\n",
        )
        .unwrap();

        let (dataset, stats) = load_clean(file.path()).unwrap();
        assert_eq!(stats.duplicates, 1);
        assert_eq!(dataset.len(), 2);

        let m = player_metrics(&dataset, "virat kohli", None).unwrap();
        assert_eq!(m.matches_played, 2);
        assert_eq!(m.total_runs, 90);
    }

    #[test]
    fn missing_source_halts() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&dir.path().join("none.csv"), "Virat Kohli", None).unwrap_err();
        assert!(matches!(err, AppError::SourceNotFound { .. }));
    }

    #[test]
    fn unknown_player_reports_alternatives() {
        let file = source_file();
        let err = run(file.path(), "Steve Smith", None).unwrap_err();
        match err {
            AppError::PlayerNotFound { available, .. } => {
                assert_eq!(available, vec!["virat kohli", "joe root"]);
            }
            other => panic!("expected PlayerNotFound, got {other:?}"),
        }
    }
}
