use std::collections::HashSet;

use tracing::{debug, info};

use crate::types::{
    normalize_name, Dismissal, Format, MatchRecord, PlayerDataset, RawDataset, RawRecord,
};

/// Rows removed (or cells repaired) by each cleaning rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub input_rows: usize,
    pub duplicates: usize,
    pub missing_player_name: usize,
    pub missing_runs: usize,
    pub missing_balls_faced: usize,
    pub unparsable_runs: usize,
    pub unparsable_balls_faced: usize,
    /// Counting cells (fours, sixes, centuries, half_centuries) set to 0.
    pub defaulted_counts: usize,
    pub invalid_balls_faced: usize,
    pub negative_runs: usize,
    /// Format cells that were not ODI/Test/T20I; the record keeps no format.
    pub unknown_formats: usize,
    pub output_rows: usize,
}

impl CleanStats {
    pub fn rows_removed(&self) -> usize {
        self.input_rows - self.output_rows
    }
}

/// A row that survived the missing-value checks, with numeric fields coerced.
struct Coerced {
    player_name: String,
    runs: Option<i64>,
    balls_faced: Option<i64>,
    fours: u32,
    sixes: u32,
    centuries: u32,
    half_centuries: u32,
    format: Option<Format>,
    dismissal: Option<Dismissal>,
}

/// Validate raw rows. Rules run in a fixed order; duplicate removal comes
/// first so the missing-value counts are not inflated by copies.
///
/// Never fails: a source where every row is invalid produces an empty dataset.
pub fn clean(raw: &RawDataset) -> (PlayerDataset, CleanStats) {
    info!("[CLEAN] Cleaning {} rows", raw.len());
    let mut stats = CleanStats {
        input_rows: raw.len(),
        ..CleanStats::default()
    };

    // 1. Exact duplicates over every source column, first occurrence kept.
    let mut seen: HashSet<&RawRecord> = HashSet::with_capacity(raw.len());
    let mut rows: Vec<&RawRecord> = raw.rows.iter().filter(|r| seen.insert(*r)).collect();
    stats.duplicates = raw.len() - rows.len();
    if stats.duplicates > 0 {
        info!("[CLEAN] Removed {} duplicate rows", stats.duplicates);
    }

    // 2. Missing critical fields, one column at a time.
    stats.missing_player_name = drop_missing(&mut rows, "player_name", |r| &r.player_name);
    stats.missing_runs = drop_missing(&mut rows, "runs", |r| &r.runs);
    stats.missing_balls_faced = drop_missing(&mut rows, "balls_faced", |r| &r.balls_faced);

    // 3 + 4. Coerce numerics; counting fields default to zero.
    let mut coerced: Vec<Coerced> = rows
        .into_iter()
        .map(|r| coerce(r, &mut stats))
        .collect();
    if stats.defaulted_counts > 0 {
        debug!("[CLEAN] Defaulted {} counting cells to 0", stats.defaulted_counts);
    }
    if stats.unknown_formats > 0 {
        debug!("[CLEAN] {} rows with an unrecognised format", stats.unknown_formats);
    }

    // 5. runs / balls_faced that failed coercion are load-bearing: drop.
    let before = coerced.len();
    coerced.retain(|c| c.runs.is_some());
    stats.unparsable_runs = before - coerced.len();

    let before = coerced.len();
    coerced.retain(|c| c.balls_faced.is_some());
    stats.unparsable_balls_faced = before - coerced.len();

    if stats.unparsable_runs + stats.unparsable_balls_faced > 0 {
        info!(
            "[CLEAN] Removed {} rows with non-numeric runs and {} with non-numeric balls_faced",
            stats.unparsable_runs, stats.unparsable_balls_faced,
        );
    }

    // 6. balls_faced must be positive.
    let before = coerced.len();
    coerced.retain(|c| c.balls_faced.is_some_and(|b| b > 0));
    stats.invalid_balls_faced = before - coerced.len();
    if stats.invalid_balls_faced > 0 {
        info!(
            "[CLEAN] Removing {} rows with invalid balls_faced",
            stats.invalid_balls_faced
        );
    }

    // 7. runs must be non-negative.
    let before = coerced.len();
    coerced.retain(|c| c.runs.is_some_and(|r| r >= 0));
    stats.negative_runs = before - coerced.len();
    if stats.negative_runs > 0 {
        info!("[CLEAN] Removing {} rows with negative runs", stats.negative_runs);
    }

    // 8. Normalize names and settle the final types.
    let records: Vec<MatchRecord> = coerced.into_iter().filter_map(finalize).collect();

    stats.output_rows = records.len();
    info!("[CLEAN] Cleaning complete. Final rows: {}", stats.output_rows);

    (PlayerDataset::new(raw.schema, records), stats)
}

fn drop_missing(
    rows: &mut Vec<&RawRecord>,
    column: &str,
    field: impl Fn(&RawRecord) -> &Option<String>,
) -> usize {
    let before = rows.len();
    rows.retain(|r| field(r).is_some());
    let missing = before - rows.len();
    if missing > 0 {
        info!("[CLEAN] Found {missing} missing values in {column}");
    }
    missing
}

fn coerce(raw: &RawRecord, stats: &mut CleanStats) -> Coerced {
    let mut count = |value: &Option<String>| -> u32 {
        match value.as_deref().and_then(parse_count) {
            Some(v) => v,
            None => {
                stats.defaulted_counts += 1;
                0
            }
        }
    };
    let fours = count(&raw.fours);
    let sixes = count(&raw.sixes);
    let centuries = count(&raw.centuries);
    let half_centuries = count(&raw.half_centuries);

    let format = raw.format.as_deref().and_then(|f| {
        let parsed = Format::parse(f);
        if parsed.is_none() {
            stats.unknown_formats += 1;
        }
        parsed
    });

    Coerced {
        player_name: raw.player_name.clone().unwrap_or_default(),
        runs: raw.runs.as_deref().and_then(parse_score),
        balls_faced: raw.balls_faced.as_deref().and_then(parse_score),
        fours,
        sixes,
        centuries,
        half_centuries,
        format,
        dismissal: raw.dismissal.as_deref().map(Dismissal::parse),
    }
}

fn finalize(c: Coerced) -> Option<MatchRecord> {
    Some(MatchRecord {
        player_name: normalize_name(&c.player_name),
        runs: u32::try_from(c.runs?).ok()?,
        balls_faced: u32::try_from(c.balls_faced?).ok()?,
        fours: c.fours,
        sixes: c.sixes,
        centuries: c.centuries,
        half_centuries: c.half_centuries,
        format: c.format,
        dismissal: c.dismissal,
    })
}

/// Integer literal, or a decimal literal with no fractional part ("45.0").
pub fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// runs / balls_faced: sign is kept so rules 6 and 7 can see it; values too
/// large for a record are treated as unparsable.
fn parse_score(s: &str) -> Option<i64> {
    parse_integer(s).filter(|v| *v <= i64::from(u32::MAX))
}

fn parse_count(s: &str) -> Option<u32> {
    parse_integer(s).and_then(|v| u32::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Presence, Schema};

    fn raw(name: Option<&str>, runs: Option<&str>, balls: Option<&str>) -> RawRecord {
        RawRecord {
            player_name: name.map(str::to_string),
            runs: runs.map(str::to_string),
            balls_faced: balls.map(str::to_string),
            ..RawRecord::default()
        }
    }

    fn dataset(rows: Vec<RawRecord>) -> RawDataset {
        RawDataset {
            schema: Schema::default(),
            rows,
        }
    }

    #[test]
    fn duplicates_and_missing_name_are_removed() {
        let rows = vec![
            raw(Some("Virat Kohli"), Some("72"), Some("58")),
            raw(Some("Virat Kohli"), Some("72"), Some("58")),
            raw(Some("Virat Kohli"), Some("112"), Some("95")),
            raw(None, Some("45"), Some("39")),
            raw(Some("Joe Root"), Some("30"), Some("41")),
        ];
        let distinct = 4;
        let (cleaned, stats) = clean(&dataset(rows));

        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.missing_player_name, 1);
        assert_eq!(cleaned.len(), distinct - 1);
        assert_eq!(stats.rows_removed(), 2);
    }

    #[test]
    fn dedup_compares_every_source_column() {
        let dated = |date: &str| RawRecord {
            extra: vec![Some(date.to_string())],
            ..raw(Some("Virat Kohli"), Some("45"), Some("39"))
        };
        let rows = vec![dated("2023-01-10"), dated("2023-02-14"), dated("2023-02-14")];
        let (cleaned, stats) = clean(&dataset(rows));

        assert_eq!(stats.duplicates, 1);
        assert_eq!(cleaned.len(), 2);
    }

    #[test]
    fn duplicate_rows_with_missing_field_count_once() {
        let rows = vec![
            raw(Some("a"), None, Some("10")),
            raw(Some("a"), None, Some("10")),
        ];
        let (cleaned, stats) = clean(&dataset(rows));
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.missing_runs, 1);
        assert!(cleaned.is_empty());
    }

    #[test]
    fn unparsable_runs_and_balls_are_dropped_not_defaulted() {
        let rows = vec![
            raw(Some("a"), Some("abc"), Some("10")),
            raw(Some("a"), Some("10"), Some("ten")),
            raw(Some("a"), Some("45.0"), Some("30")),
            raw(Some("a"), Some("45.5"), Some("30")),
        ];
        let (cleaned, stats) = clean(&dataset(rows));
        assert_eq!(stats.unparsable_runs, 2);
        assert_eq!(stats.unparsable_balls_faced, 1);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.records[0].runs, 45);
    }

    #[test]
    fn counting_fields_default_to_zero() {
        let mut row = raw(Some("a"), Some("10"), Some("12"));
        row.fours = Some("x".to_string());
        row.sixes = Some("2".to_string());
        row.centuries = Some("-1".to_string());
        let mut ds = dataset(vec![row]);
        ds.schema.fours = Presence::Present;
        ds.schema.sixes = Presence::Present;
        ds.schema.centuries = Presence::Present;

        let (cleaned, stats) = clean(&ds);
        let rec = &cleaned.records[0];
        assert_eq!(rec.fours, 0);
        assert_eq!(rec.sixes, 2);
        assert_eq!(rec.centuries, 0);
        assert_eq!(rec.half_centuries, 0);
        // fours, centuries and the absent half_centuries cell
        assert_eq!(stats.defaulted_counts, 3);
    }

    #[test]
    fn integrity_rules_drop_invalid_rows() {
        let rows = vec![
            raw(Some("a"), Some("10"), Some("0")),
            raw(Some("a"), Some("10"), Some("-3")),
            raw(Some("a"), Some("-1"), Some("5")),
            raw(Some("a"), Some("0"), Some("1")),
        ];
        let (cleaned, stats) = clean(&dataset(rows));
        assert_eq!(stats.invalid_balls_faced, 2);
        assert_eq!(stats.negative_runs, 1);
        assert_eq!(cleaned.len(), 1);
        for rec in cleaned.iter() {
            assert!(rec.balls_faced > 0);
        }
    }

    #[test]
    fn names_are_normalized_after_dedup() {
        let rows = vec![
            raw(Some("  Virat Kohli "), Some("72"), Some("58")),
            raw(Some("virat kohli"), Some("72"), Some("58")),
        ];
        let (cleaned, stats) = clean(&dataset(rows));
        // not byte-identical, so both survive rule 1
        assert_eq!(stats.duplicates, 0);
        assert_eq!(cleaned.len(), 2);
        assert!(cleaned.iter().all(|r| r.player_name == "virat kohli"));
    }

    #[test]
    fn format_and_dismissal_are_typed() {
        let mut row = raw(Some("a"), Some("10"), Some("12"));
        row.format = Some("ODI".to_string());
        row.dismissal = Some("not out ".to_string());
        let mut other = raw(Some("a"), Some("11"), Some("12"));
        other.format = Some("T10".to_string());
        other.dismissal = Some("caught".to_string());

        let (cleaned, stats) = clean(&dataset(vec![row, other]));
        assert_eq!(cleaned.records[0].format, Some(Format::Odi));
        assert_eq!(cleaned.records[0].dismissal, Some(Dismissal::NotOut));
        assert_eq!(cleaned.records[1].format, None);
        assert_eq!(
            cleaned.records[1].dismissal,
            Some(Dismissal::Out("caught".to_string()))
        );
        assert_eq!(stats.unknown_formats, 1);
    }

    #[test]
    fn cleaning_clean_data_is_idempotent() {
        let mut a = raw(Some(" Virat Kohli"), Some("72.0"), Some("58"));
        a.fours = Some("8".to_string());
        a.format = Some("odi".to_string());
        a.dismissal = Some("caught".to_string());
        let mut b = raw(Some("JOE ROOT"), Some("112"), Some("95"));
        b.fours = None;
        b.format = Some("Test".to_string());
        b.dismissal = Some("not out".to_string());
        let c = raw(Some("x"), Some("5"), Some("0"));

        let mut ds = dataset(vec![a, b, c]);
        ds.schema.fours = Presence::Present;
        ds.schema.format = Presence::Present;
        ds.schema.dismissal = Presence::Present;

        let (once, _) = clean(&ds);
        let (twice, stats) = clean(&RawDataset::from(&once));

        assert_eq!(once, twice);
        assert_eq!(stats.rows_removed(), 0);
    }

    #[test]
    fn empty_input_is_valid() {
        let (cleaned, stats) = clean(&RawDataset::default());
        assert!(cleaned.is_empty());
        assert_eq!(stats, CleanStats::default());
    }

    #[test]
    fn parse_integer_accepts_whole_decimals_only() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer(" 42 "), Some(42));
        assert_eq!(parse_integer("42.0"), Some(42));
        assert_eq!(parse_integer("-7"), Some(-7));
        assert_eq!(parse_integer("42.5"), None);
        assert_eq!(parse_integer("inf"), None);
        assert_eq!(parse_integer("forty"), None);
    }
}
