use crate::config::{CENTURY_RUNS, CONSISTENCY_SCALE, HALF_CENTURY_RUNS, PERFECT_CONSISTENCY};
use crate::pipeline::filter::by_format_typed;
use crate::types::{Format, FormatBreakdown, MetricsResult, PlayerDataset};

/// Name reported for a calculator built over no rows.
pub const UNKNOWN_PLAYER: &str = "unknown";

/// Batting statistics over a dataset already filtered to one player.
/// Every method recomputes from the rows.
pub struct MetricsCalculator<'a> {
    data: &'a PlayerDataset,
}

impl<'a> MetricsCalculator<'a> {
    pub fn new(data: &'a PlayerDataset) -> Self {
        Self { data }
    }

    pub fn player_name(&self) -> &str {
        self.data
            .records
            .first()
            .map(|r| r.player_name.as_str())
            .unwrap_or(UNKNOWN_PLAYER)
    }

    pub fn total_runs(&self) -> u64 {
        self.data.iter().map(|r| u64::from(r.runs)).sum()
    }

    pub fn matches_played(&self) -> usize {
        self.data.len()
    }

    pub fn total_balls_faced(&self) -> u64 {
        self.data.iter().map(|r| u64::from(r.balls_faced)).sum()
    }

    /// Innings that ended in a dismissal. Without a dismissal column every
    /// innings counts; with one, missing cells and "not out" do not.
    pub fn dismissals(&self) -> usize {
        if !self.data.schema.dismissal.is_present() {
            return self.matches_played();
        }
        self.data
            .iter()
            .filter(|r| r.dismissal.as_ref().is_some_and(|d| d.is_out()))
            .count()
    }

    /// total_runs / dismissals, or 0.0 when the player was never dismissed.
    pub fn batting_average(&self) -> f64 {
        let dismissals = self.dismissals();
        if dismissals == 0 {
            return 0.0;
        }
        round1(self.total_runs() as f64 / dismissals as f64)
    }

    /// Runs per 100 balls.
    pub fn strike_rate(&self) -> f64 {
        let balls = self.total_balls_faced();
        if balls == 0 {
            return 0.0;
        }
        round1(self.total_runs() as f64 / balls as f64 * 100.0)
    }

    /// `(mean / population std dev) * 2` over runs per innings.
    ///
    /// Fewer than two innings give 0.0; identical scores give 100.0.
    pub fn consistency_index(&self) -> f64 {
        let n = self.matches_played();
        if n < 2 {
            return 0.0;
        }
        let runs: Vec<f64> = self.data.iter().map(|r| f64::from(r.runs)).collect();
        let mean = runs.iter().sum::<f64>() / n as f64;
        let variance = runs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        let std_dev = variance.sqrt();

        if std_dev == 0.0 {
            return PERFECT_CONSISTENCY;
        }
        round1(mean / std_dev * CONSISTENCY_SCALE)
    }

    pub fn centuries(&self) -> u64 {
        if self.data.schema.centuries.is_present() {
            self.data.iter().map(|r| u64::from(r.centuries)).sum()
        } else {
            self.data.iter().filter(|r| r.runs >= CENTURY_RUNS).count() as u64
        }
    }

    pub fn half_centuries(&self) -> u64 {
        if self.data.schema.half_centuries.is_present() {
            self.data.iter().map(|r| u64::from(r.half_centuries)).sum()
        } else {
            self.data
                .iter()
                .filter(|r| (HALF_CENTURY_RUNS..CENTURY_RUNS).contains(&r.runs))
                .count() as u64
        }
    }

    /// Best innings; 0 when there are no innings.
    pub fn highest_score(&self) -> u32 {
        self.data.iter().map(|r| r.runs).max().unwrap_or(0)
    }

    pub fn calculate_all(&self) -> MetricsResult {
        MetricsResult {
            player_name: self.player_name().to_string(),
            total_runs: self.total_runs(),
            matches_played: self.matches_played(),
            batting_average: self.batting_average(),
            strike_rate: self.strike_rate(),
            consistency_index: self.consistency_index(),
            centuries: self.centuries(),
            half_centuries: self.half_centuries(),
            highest_score: self.highest_score(),
        }
    }

    /// Metrics restricted to one format. A format with no innings yields the
    /// zero block rather than an error.
    pub fn format_breakdown(&self, format: Format) -> FormatBreakdown {
        let subset = by_format_typed(self.data, format);
        if subset.is_empty() {
            return FormatBreakdown::zero(format);
        }
        let calc = MetricsCalculator::new(&subset);
        FormatBreakdown {
            format,
            matches: calc.matches_played(),
            runs: calc.total_runs(),
            average: calc.batting_average(),
            strike_rate: calc.strike_rate(),
            centuries: calc.centuries(),
        }
    }

    /// One breakdown per format, or none when the source had no format column.
    pub fn format_breakdowns(&self) -> Vec<FormatBreakdown> {
        if !self.data.schema.format.is_present() {
            return Vec::new();
        }
        Format::ALL
            .iter()
            .map(|f| self.format_breakdown(*f))
            .collect()
    }
}

/// One decimal place, halves rounded away from zero.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
