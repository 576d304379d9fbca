use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::types::{normalize_name, Format, PlayerDataset};

/// Rows for one player, in their original order.
///
/// `name` is normalized the same way the cleaner normalizes `player_name`,
/// then compared for exact equality. Fails with `PlayerNotFound` carrying
/// the distinct names present in `dataset`.
pub fn by_player(dataset: &PlayerDataset, name: &str) -> Result<PlayerDataset> {
    let wanted = normalize_name(name);
    let records: Vec<_> = dataset
        .iter()
        .filter(|r| r.player_name == wanted)
        .cloned()
        .collect();

    if records.is_empty() {
        return Err(AppError::PlayerNotFound {
            name: name.to_string(),
            available: player_names(dataset),
        });
    }

    info!("[FILTER] Found {} matches for {name}", records.len());
    Ok(dataset.with_records(records))
}

/// Rows whose format matches `format`, compared case-insensitively.
///
/// A dataset whose source had no format column is returned unchanged. A
/// string that names no known format matches nothing.
pub fn by_format(dataset: &PlayerDataset, format: &str) -> PlayerDataset {
    if !dataset.schema.format.is_present() {
        warn!("[FILTER] 'format' column not found in data, ignoring format filter");
        return dataset.clone();
    }

    match Format::parse(format) {
        Some(f) => matching_format(dataset, f),
        None => {
            warn!("[FILTER] unknown format '{format}'");
            dataset.with_records(Vec::new())
        }
    }
}

/// Typed counterpart of `by_format`, with the same absent-column behaviour.
pub fn by_format_typed(dataset: &PlayerDataset, format: Format) -> PlayerDataset {
    if !dataset.schema.format.is_present() {
        return dataset.clone();
    }
    matching_format(dataset, format)
}

fn matching_format(dataset: &PlayerDataset, format: Format) -> PlayerDataset {
    let records = dataset
        .iter()
        .filter(|r| r.format == Some(format))
        .cloned()
        .collect();
    dataset.with_records(records)
}

/// Distinct player names in first-appearance order.
pub fn player_names(dataset: &PlayerDataset) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for rec in dataset.iter() {
        if !names.iter().any(|n| *n == rec.player_name) {
            names.push(rec.player_name.clone());
        }
    }
    names
}

/// Distinct player names with their innings counts, first-appearance order.
pub fn player_match_counts(dataset: &PlayerDataset) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for rec in dataset.iter() {
        match counts.iter_mut().find(|(n, _)| *n == rec.player_name) {
            Some((_, c)) => *c += 1,
            None => counts.push((rec.player_name.clone(), 1)),
        }
    }
    counts
}
