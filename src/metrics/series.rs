//! Per-innings tables for chart consumers: recent form, the running career
//! average and the distribution of scores. Rendering is left to the host.

use serde::{Deserialize, Serialize};

use crate::config::{CENTURY_RUNS, RUN_BUCKET_EDGES};
use crate::types::PlayerDataset;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InningsPoint {
    /// 1-based position within the returned window.
    pub match_number: usize,
    pub runs: u32,
    pub is_century: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionPoint {
    pub match_number: usize,
    pub cumulative_runs: u64,
    /// cumulative_runs / match_number (innings, not dismissals).
    pub cumulative_average: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunBucket {
    pub lower: u32,
    pub upper: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunsDistribution {
    pub buckets: Vec<RunBucket>,
    /// Innings scored above the last edge.
    pub above_range: usize,
    pub mean_runs: f64,
}

/// The last `n` innings in source order.
pub fn recent_innings(dataset: &PlayerDataset, n: usize) -> Vec<InningsPoint> {
    let skip = dataset.len().saturating_sub(n);
    dataset
        .iter()
        .skip(skip)
        .enumerate()
        .map(|(i, r)| InningsPoint {
            match_number: i + 1,
            runs: r.runs,
            is_century: r.runs >= CENTURY_RUNS,
        })
        .collect()
}

pub fn career_progression(dataset: &PlayerDataset) -> Vec<ProgressionPoint> {
    let mut cumulative = 0u64;
    dataset
        .iter()
        .enumerate()
        .map(|(i, r)| {
            cumulative += u64::from(r.runs);
            let match_number = i + 1;
            ProgressionPoint {
                match_number,
                cumulative_runs: cumulative,
                cumulative_average: cumulative as f64 / match_number as f64,
            }
        })
        .collect()
}

/// Histogram of runs over `RUN_BUCKET_EDGES`. Bins are `[lower, upper)`,
/// except the last, which is `[lower, upper]`.
pub fn runs_distribution(dataset: &PlayerDataset) -> RunsDistribution {
    let last = RUN_BUCKET_EDGES.len() - 2;
    let mut buckets: Vec<RunBucket> = RUN_BUCKET_EDGES
        .windows(2)
        .map(|w| RunBucket {
            lower: w[0],
            upper: w[1],
            count: 0,
        })
        .collect();
    let mut above_range = 0;

    for rec in dataset.iter() {
        let slot = buckets.iter().enumerate().position(|(i, b)| {
            rec.runs >= b.lower && (rec.runs < b.upper || (i == last && rec.runs == b.upper))
        });
        match slot {
            Some(i) => buckets[i].count += 1,
            None => above_range += 1,
        }
    }

    let mean_runs = if dataset.is_empty() {
        0.0
    } else {
        dataset.iter().map(|r| f64::from(r.runs)).sum::<f64>() / dataset.len() as f64
    };

    RunsDistribution {
        buckets,
        above_range,
        mean_runs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchRecord, Schema};

    fn dataset(runs: &[u32]) -> PlayerDataset {
        let records = runs
            .iter()
            .map(|&r| MatchRecord {
                player_name: "virat kohli".to_string(),
                runs: r,
                balls_faced: 50,
                fours: 0,
                sixes: 0,
                centuries: 0,
                half_centuries: 0,
                format: None,
                dismissal: None,
            })
            .collect();
        PlayerDataset::new(Schema::default(), records)
    }

    #[test]
    fn recent_innings_takes_the_tail() {
        let ds = dataset(&[1, 2, 3, 104, 5]);
        let recent = recent_innings(&ds, 3);
        let runs: Vec<u32> = recent.iter().map(|p| p.runs).collect();
        assert_eq!(runs, vec![3, 104, 5]);
        assert_eq!(recent[0].match_number, 1);
        assert!(recent[1].is_century);
        assert!(!recent[2].is_century);

        assert_eq!(recent_innings(&ds, 10).len(), 5);
        assert!(recent_innings(&ds, 0).is_empty());
    }

    #[test]
    fn progression_tracks_running_average() {
        let ds = dataset(&[10, 30, 50]);
        let points = career_progression(&ds);
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].cumulative_runs, 40);
        assert!((points[1].cumulative_average - 20.0).abs() < 1e-9);
        assert!((points[2].cumulative_average - 30.0).abs() < 1e-9);
    }

    #[test]
    fn distribution_bins_by_edges() {
        let ds = dataset(&[0, 19, 20, 99, 100, 149, 150, 200, 201]);
        let dist = runs_distribution(&ds);
        let counts: Vec<usize> = dist.buckets.iter().map(|b| b.count).collect();
        // [0,20) [20,40) [40,60) [60,80) [80,100) [100,150) [150,200]
        assert_eq!(counts, vec![2, 1, 0, 0, 1, 2, 2]);
        assert_eq!(dist.above_range, 1);
        assert!((dist.mean_runs - 938.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn empty_distribution() {
        let dist = runs_distribution(&dataset(&[]));
        assert!(dist.buckets.iter().all(|b| b.count == 0));
        assert_eq!(dist.buckets.len(), RUN_BUCKET_EDGES.len() - 1);
        assert_eq!(dist.mean_runs, 0.0);
    }
}
