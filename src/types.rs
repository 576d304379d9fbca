use serde::{Deserialize, Serialize};

use crate::config::NOT_OUT;

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Odi,
    Test,
    T20i,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Odi, Format::Test, Format::T20i];

    /// Case-insensitive parse. Returns None for anything that is not one of
    /// the three international formats.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "odi" => Some(Format::Odi),
            "test" => Some(Format::Test),
            "t20i" => Some(Format::T20i),
            _ => None,
        }
    }

    /// Lower-case form used in source files and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Odi => "odi",
            Format::Test => "test",
            Format::T20i => "t20i",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Format::Odi => "ODI",
            Format::Test => "Test",
            Format::T20i => "T20I",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Dismissal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dismissal {
    /// The innings did not end in a dismissal.
    NotOut,
    /// Mode of dismissal as given by the source, e.g. "caught".
    Out(String),
}

impl Dismissal {
    /// Exactly "not out" after trimming; any other value is a dismissal mode.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s == NOT_OUT {
            Dismissal::NotOut
        } else {
            Dismissal::Out(s.to_string())
        }
    }

    pub fn is_out(&self) -> bool {
        matches!(self, Dismissal::Out(_))
    }
}

impl std::fmt::Display for Dismissal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dismissal::NotOut => write!(f, "{NOT_OUT}"),
            Dismissal::Out(how) => write!(f, "{how}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    Present,
    #[default]
    Absent,
}

impl Presence {
    pub fn from_bool(present: bool) -> Self {
        if present {
            Presence::Present
        } else {
            Presence::Absent
        }
    }

    pub fn is_present(&self) -> bool {
        *self == Presence::Present
    }
}

/// `player_name`, `runs` and `balls_faced` are guaranteed by ingestion;
/// everything else is declared here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Schema {
    pub fours: Presence,
    pub sixes: Presence,
    pub centuries: Presence,
    pub half_centuries: Presence,
    pub format: Presence,
    pub dismissal: Presence,
}

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

/// One source row. `None` is a missing cell; values are kept verbatim so
/// exact duplicates can be detected before any coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawRecord {
    pub player_name: Option<String>,
    pub runs: Option<String>,
    pub balls_faced: Option<String>,
    pub fours: Option<String>,
    pub sixes: Option<String>,
    pub centuries: Option<String>,
    pub half_centuries: Option<String>,
    pub format: Option<String>,
    pub dismissal: Option<String>,
    /// Cells of every other column (match date, venue, ...), in header
    /// order. Not used by the metrics but part of the row's identity.
    pub extra: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDataset {
    pub schema: Schema,
    pub rows: Vec<RawRecord>,
}

impl RawDataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<&PlayerDataset> for RawDataset {
    /// Render validated records back into raw rows. Columns the schema marks
    /// absent stay missing.
    fn from(ds: &PlayerDataset) -> Self {
        let schema = ds.schema;
        let opt = |presence: Presence, value: String| presence.is_present().then_some(value);

        let rows = ds
            .records
            .iter()
            .map(|r| RawRecord {
                player_name: Some(r.player_name.clone()),
                runs: Some(r.runs.to_string()),
                balls_faced: Some(r.balls_faced.to_string()),
                fours: opt(schema.fours, r.fours.to_string()),
                sixes: opt(schema.sixes, r.sixes.to_string()),
                centuries: opt(schema.centuries, r.centuries.to_string()),
                half_centuries: opt(schema.half_centuries, r.half_centuries.to_string()),
                format: r.format.map(|f| f.as_str().to_string()),
                dismissal: r.dismissal.as_ref().map(|d| d.to_string()),
                extra: Vec::new(),
            })
            .collect();

        Self { schema, rows }
    }
}

// ---------------------------------------------------------------------------
// Validated records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    /// Normalized: lower-case, surrounding whitespace stripped.
    pub player_name: String,
    pub runs: u32,
    /// Always > 0 after cleaning.
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub centuries: u32,
    pub half_centuries: u32,
    pub format: Option<Format>,
    pub dismissal: Option<Dismissal>,
}

/// Ordered match records; order is the chronological order of the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerDataset {
    pub schema: Schema,
    pub records: Vec<MatchRecord>,
}

impl PlayerDataset {
    pub fn new(schema: Schema, records: Vec<MatchRecord>) -> Self {
        Self { schema, records }
    }

    /// Same schema, different rows. Filters use this so downstream consumers
    /// keep seeing which columns the source had.
    pub fn with_records(&self, records: Vec<MatchRecord>) -> Self {
        Self {
            schema: self.schema,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchRecord> {
        self.records.iter()
    }
}

/// Lower-case and trim a player name. Two spellings that normalize to the
/// same string are the same player.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    pub player_name: String,
    pub total_runs: u64,
    pub matches_played: usize,
    pub batting_average: f64,
    pub strike_rate: f64,
    pub consistency_index: f64,
    pub centuries: u64,
    pub half_centuries: u64,
    pub highest_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatBreakdown {
    pub format: Format,
    pub matches: usize,
    pub runs: u64,
    pub average: f64,
    pub strike_rate: f64,
    pub centuries: u64,
}

impl FormatBreakdown {
    /// Result for a format the player never played.
    pub fn zero(format: Format) -> Self {
        Self {
            format,
            matches: 0,
            runs: 0,
            average: 0.0,
            strike_rate: 0.0,
            centuries: 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.matches == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parse_is_case_insensitive() {
        assert_eq!(Format::parse("ODI"), Some(Format::Odi));
        assert_eq!(Format::parse(" test "), Some(Format::Test));
        assert_eq!(Format::parse("T20i"), Some(Format::T20i));
        assert_eq!(Format::parse("t10"), None);
        assert_eq!(Format::T20i.to_string(), "T20I");
    }

    #[test]
    fn dismissal_not_out_detection() {
        assert_eq!(Dismissal::parse("not out"), Dismissal::NotOut);
        assert_eq!(Dismissal::parse(" not out "), Dismissal::NotOut);
        assert_eq!(
            Dismissal::parse("NOT OUT"),
            Dismissal::Out("NOT OUT".to_string())
        );
        assert_eq!(Dismissal::parse("caught"), Dismissal::Out("caught".to_string()));
        assert!(!Dismissal::NotOut.is_out());
        assert!(Dismissal::parse("run out").is_out());
    }

    #[test]
    fn normalize_strips_and_lowercases() {
        assert_eq!(normalize_name("  Virat Kohli "), "virat kohli");
        assert_eq!(normalize_name("virat kohli"), "virat kohli");
    }

    #[test]
    fn raw_rendering_keeps_absent_columns_missing() {
        let schema = Schema {
            fours: Presence::Present,
            ..Schema::default()
        };
        let ds = PlayerDataset::new(
            schema,
            vec![MatchRecord {
                player_name: "joe root".to_string(),
                runs: 10,
                balls_faced: 12,
                fours: 1,
                sixes: 0,
                centuries: 0,
                half_centuries: 0,
                format: None,
                dismissal: None,
            }],
        );
        let raw = RawDataset::from(&ds);
        assert_eq!(raw.rows[0].fours.as_deref(), Some("1"));
        assert!(raw.rows[0].sixes.is_none());
        assert!(raw.rows[0].format.is_none());
        assert_eq!(raw.schema, schema);
    }
}
