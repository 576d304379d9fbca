use std::path::PathBuf;

use cricket_analytics::config::Config;
use cricket_analytics::pipeline::{load_clean, player_match_counts};
use cricket_analytics::report::{build_report, PlayerReport};
use cricket_analytics::types::{Format, PlayerDataset};
use ratatui::style::Color;

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Colours for every widget. Built once and handed to each render call.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub title: Color,
    pub header: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub highlight_bg: Color,
    pub good: Color,
    pub fair: Color,
    pub poor: Color,
    pub bar: Color,
    pub century: Color,
}

impl Theme {
    pub const fn dark() -> Self {
        Self {
            title: Color::Cyan,
            header: Color::Yellow,
            text: Color::White,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            highlight_bg: Color::DarkGray,
            good: Color::Green,
            fair: Color::Yellow,
            poor: Color::Red,
            bar: Color::LightRed,
            century: Color::Cyan,
        }
    }

    /// Colour for a batting average band.
    pub fn average_color(&self, average: f64) -> Color {
        if average >= 50.0 {
            self.good
        } else if average >= 30.0 {
            self.fair
        } else {
            self.poor
        }
    }
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatFilter {
    All,
    Only(Format),
}

impl FormatFilter {
    pub fn next(self) -> Self {
        match self {
            FormatFilter::All => FormatFilter::Only(Format::Odi),
            FormatFilter::Only(Format::Odi) => FormatFilter::Only(Format::Test),
            FormatFilter::Only(Format::Test) => FormatFilter::Only(Format::T20i),
            FormatFilter::Only(Format::T20i) => FormatFilter::All,
        }
    }

    pub fn as_arg(self) -> Option<&'static str> {
        match self {
            FormatFilter::All => None,
            FormatFilter::Only(f) => Some(f.as_str()),
        }
    }

    pub fn label(self) -> String {
        match self {
            FormatFilter::All => "all formats".to_string(),
            FormatFilter::Only(f) => f.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loaded { rows: usize, removed: usize },
    Error(String),
}

pub struct AppState {
    pub data_path: PathBuf,
    pub recent_n: usize,
    pub status: LoadStatus,
    pub dataset: PlayerDataset,
    /// (name, innings) in source order.
    pub players: Vec<(String, usize)>,
    pub selected: Option<usize>,
    pub format_filter: FormatFilter,
    pub report: Option<PlayerReport>,
}

impl AppState {
    pub fn new(cfg: &Config) -> Self {
        let mut app = Self {
            data_path: cfg.data_path.clone(),
            recent_n: cfg.recent_innings,
            status: LoadStatus::Loaded { rows: 0, removed: 0 },
            dataset: PlayerDataset::default(),
            players: Vec::new(),
            selected: None,
            format_filter: FormatFilter::All,
            report: None,
        };
        app.reload();
        app
    }

    /// Re-read the source. The selection is kept by name when the player is
    /// still present.
    pub fn reload(&mut self) {
        let previous = self.selected_name().map(str::to_string);

        match load_clean(&self.data_path) {
            Ok((dataset, stats)) => {
                self.status = LoadStatus::Loaded {
                    rows: stats.output_rows,
                    removed: stats.rows_removed(),
                };
                self.players = player_match_counts(&dataset);
                self.dataset = dataset;
            }
            Err(e) => {
                self.status = LoadStatus::Error(e.to_string());
                self.players.clear();
                self.dataset = PlayerDataset::default();
            }
        }

        let idx = previous
            .and_then(|name| self.players.iter().position(|(n, _)| *n == name))
            .or(if self.players.is_empty() { None } else { Some(0) });
        self.select(idx);
    }

    pub fn select(&mut self, idx: Option<usize>) {
        self.selected = idx.filter(|i| *i < self.players.len());
        self.refresh_report();
    }

    pub fn select_next(&mut self) {
        let max = self.players.len().saturating_sub(1);
        let next = self.selected.map_or(0, |i| (i + 1).min(max));
        self.select(Some(next));
    }

    pub fn select_prev(&mut self) {
        let prev = self.selected.map_or(0, |i| i.saturating_sub(1));
        self.select(Some(prev));
    }

    pub fn cycle_format(&mut self) {
        self.format_filter = self.format_filter.next();
        self.refresh_report();
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.players.get(i))
            .map(|(n, _)| n.as_str())
    }

    fn refresh_report(&mut self) {
        self.report = self.selected_name().and_then(|name| {
            build_report(&self.dataset, name, self.format_filter.as_arg(), self.recent_n).ok()
        });
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

pub fn format_rate(v: f64) -> String {
    format!("{v:.1}")
}
