use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::metrics::series::{InningsPoint, ProgressionPoint, RunsDistribution};
use crate::metrics::{career_progression, recent_innings, runs_distribution, MetricsCalculator};
use crate::pipeline::{by_format, by_player};
use crate::types::{FormatBreakdown, MetricsResult, PlayerDataset};

/// Everything the hosts show for one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerReport {
    pub metrics: MetricsResult,
    /// Per-format blocks; empty when the source has no format column.
    pub formats: Vec<FormatBreakdown>,
    pub recent: Vec<InningsPoint>,
    pub progression: Vec<ProgressionPoint>,
    pub distribution: RunsDistribution,
}

pub fn build_report(
    dataset: &PlayerDataset,
    name: &str,
    format: Option<&str>,
    recent_n: usize,
) -> Result<PlayerReport> {
    let rows = by_player(dataset, name)?;
    let rows = match format {
        Some(f) => by_format(&rows, f),
        None => rows,
    };
    let calc = MetricsCalculator::new(&rows);

    Ok(PlayerReport {
        metrics: calc.calculate_all(),
        formats: calc.format_breakdowns(),
        recent: recent_innings(&rows, recent_n),
        progression: career_progression(&rows),
        distribution: runs_distribution(&rows),
    })
}

/// Reports for several players, one blocking task each.
///
/// Results come back in the order of `names`. A failed lookup is returned in
/// its slot and does not affect the other players.
pub async fn build_reports(
    dataset: Arc<PlayerDataset>,
    names: Vec<String>,
    format: Option<String>,
    recent_n: usize,
) -> Vec<(String, Result<PlayerReport>)> {
    info!("[REPORT] Building {} player reports", names.len());

    let handles = names.iter().map(|name| {
        let dataset = Arc::clone(&dataset);
        let name = name.clone();
        let format = format.clone();
        tokio::task::spawn_blocking(move || {
            build_report(&dataset, &name, format.as_deref(), recent_n)
        })
    });

    let joined = join_all(handles).await;

    names
        .into_iter()
        .zip(joined)
        .map(|(name, res)| {
            let report = match res {
                Ok(report) => report,
                Err(e) => Err(AppError::Task(e.to_string())),
            };
            if let Err(e) = &report {
                warn!("[REPORT] {name}: {e}");
            }
            (name, report)
        })
        .collect()
}
