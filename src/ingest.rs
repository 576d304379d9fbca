use std::fs::File;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::config::NULL_MARKERS;
use crate::error::{AppError, Result};
use crate::types::{Presence, RawDataset, RawRecord, Schema};

/// Read a CSV source into raw, unvalidated rows.
///
/// Fails with `SourceNotFound` if `path` does not exist or is not a file,
/// and with `SourceUnreadable` if it cannot be inspected or read, or if the
/// contents are not a well-formed CSV table with the `player_name`, `runs`
/// and `balls_faced` columns. Nothing is returned
/// on failure; a partially read table is discarded.
pub fn load_records(path: &Path) -> Result<RawDataset> {
    let not_found = || AppError::SourceNotFound {
        path: path.to_path_buf(),
    };
    let metadata = path.metadata().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => not_found(),
        _ => AppError::unreadable(path, e.to_string()),
    })?;
    if !metadata.is_file() {
        return Err(not_found());
    }

    info!("[INGEST] Loading data from {}", path.display());

    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => not_found(),
        _ => AppError::unreadable(path, e.to_string()),
    })?;

    let dataset = parse_records(file, path)?;
    info!("[INGEST] Loaded {} rows", dataset.len());
    Ok(dataset)
}

/// Parse CSV from any reader. `origin` is only used in error messages.
pub fn parse_records<R: io::Read>(reader: R, origin: &Path) -> Result<RawDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::unreadable(origin, e.to_string()))?
        .clone();
    let columns = ColumnMap::from_headers(&headers).map_err(|missing| {
        AppError::unreadable(origin, format!("missing required column '{missing}'"))
    })?;
    debug!("[INGEST] schema: {:?}", columns.schema());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::unreadable(origin, e.to_string()))?;
        rows.push(columns.read(&record));
    }

    Ok(RawDataset {
        schema: columns.schema(),
        rows,
    })
}

/// Header name → column index. Matching is case-insensitive and the first
/// occurrence of a repeated header wins. Every column not claimed by a known
/// field lands in `extra`.
struct ColumnMap {
    player_name: usize,
    runs: usize,
    balls_faced: usize,
    fours: Option<usize>,
    sixes: Option<usize>,
    centuries: Option<usize>,
    half_centuries: Option<usize>,
    format: Option<usize>,
    dismissal: Option<usize>,
    extra: Vec<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> std::result::Result<Self, &'static str> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &'static str| find(name).ok_or(name);

        let mut map = Self {
            player_name: require("player_name")?,
            runs: require("runs")?,
            balls_faced: require("balls_faced")?,
            fours: find("fours"),
            sixes: find("sixes"),
            centuries: find("centuries"),
            half_centuries: find("half_centuries"),
            format: find("format"),
            dismissal: find("dismissal"),
            extra: Vec::new(),
        };
        let claimed = map.claimed();
        map.extra = (0..headers.len()).filter(|i| !claimed.contains(i)).collect();
        Ok(map)
    }

    fn claimed(&self) -> Vec<usize> {
        [
            Some(self.player_name),
            Some(self.runs),
            Some(self.balls_faced),
            self.fours,
            self.sixes,
            self.centuries,
            self.half_centuries,
            self.format,
            self.dismissal,
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn schema(&self) -> Schema {
        Schema {
            fours: Presence::from_bool(self.fours.is_some()),
            sixes: Presence::from_bool(self.sixes.is_some()),
            centuries: Presence::from_bool(self.centuries.is_some()),
            half_centuries: Presence::from_bool(self.half_centuries.is_some()),
            format: Presence::from_bool(self.format.is_some()),
            dismissal: Presence::from_bool(self.dismissal.is_some()),
        }
    }

    fn read(&self, record: &csv::StringRecord) -> RawRecord {
        let at = |idx: Option<usize>| idx.and_then(|i| record.get(i)).and_then(cell_value);

        RawRecord {
            player_name: at(Some(self.player_name)),
            runs: at(Some(self.runs)),
            balls_faced: at(Some(self.balls_faced)),
            fours: at(self.fours),
            sixes: at(self.sixes),
            centuries: at(self.centuries),
            half_centuries: at(self.half_centuries),
            format: at(self.format),
            dismissal: at(self.dismissal),
            extra: self.extra.iter().map(|&i| at(Some(i))).collect(),
        }
    }
}

/// `None` for a missing cell, otherwise the value verbatim.
fn cell_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if NULL_MARKERS
        .iter()
        .any(|m| trimmed.eq_ignore_ascii_case(m))
    {
        None
    } else {
        Some(raw.to_string())
    }
}
