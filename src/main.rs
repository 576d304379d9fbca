use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cricket_analytics::config::Config;
use cricket_analytics::display::{title_case, truncate};
use cricket_analytics::error::Result;
use cricket_analytics::pipeline::{load_clean, player_match_counts};
use cricket_analytics::report::{build_report, build_reports, PlayerReport};
use cricket_analytics::types::{FormatBreakdown, MetricsResult};

#[derive(Parser)]
#[command(name = "analytics")]
#[command(about = "Batting statistics from per-match cricket records", long_about = None)]
struct Cli {
    /// CSV source of match records (overrides DATA_PATH)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List players in the source with their innings counts
    Players,

    /// Statistics for one player
    Stats {
        player: String,

        /// Restrict to one format (odi, test, t20i)
        #[arg(long)]
        format: Option<String>,

        /// Print the full report as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Side-by-side statistics for several players
    Compare {
        #[arg(required = true, num_args = 1..)]
        players: Vec<String>,

        #[arg(long)]
        format: Option<String>,

        #[arg(long, default_value = "false")]
        json: bool,
    },
}

#[derive(Serialize)]
struct CompareEntry<'a> {
    player: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a PlayerReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let cfg = match Config::from_env() {
        Ok(c) => c.with_data_path(cli.data.clone()),
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command, cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Command, cfg: Config) -> Result<()> {
    let (dataset, stats) = load_clean(&cfg.data_path)?;
    info!(
        "Dataset ready: {} usable rows ({} removed by cleaning)",
        stats.output_rows,
        stats.rows_removed(),
    );

    match command {
        Command::Players => {
            for (name, matches) in player_match_counts(&dataset) {
                println!("{name:<28} {matches:>4} innings");
            }
        }

        Command::Stats {
            player,
            format,
            json,
        } => {
            let report = build_report(&dataset, &player, format.as_deref(), cfg.recent_innings)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, format.as_deref());
            }
        }

        Command::Compare {
            players,
            format,
            json,
        } => {
            let results =
                build_reports(Arc::new(dataset), players, format, cfg.recent_innings).await;
            if json {
                let entries: Vec<CompareEntry> = results
                    .iter()
                    .map(|(player, res)| CompareEntry {
                        player,
                        report: res.as_ref().ok(),
                        error: res.as_ref().err().map(|e| e.to_string()),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                println!("{}", metrics_header());
                for (player, res) in &results {
                    match res {
                        Ok(report) => println!("{}", metrics_row(&report.metrics)),
                        Err(e) => println!("{:<22} {e}", truncate(player, 22)),
                    }
                }
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

fn print_report(report: &PlayerReport, format: Option<&str>) {
    let m = &report.metrics;
    let scope = format.map_or("all formats".to_string(), |f| f.to_uppercase());

    println!("{} ({scope})", title_case(&m.player_name));
    println!("  Matches            {}", m.matches_played);
    println!("  Total runs         {}", m.total_runs);
    println!("  Batting average    {:.1}", m.batting_average);
    println!("  Strike rate        {:.1}", m.strike_rate);
    println!("  Consistency index  {:.1}", m.consistency_index);
    println!("  Centuries          {}", m.centuries);
    println!("  Half-centuries     {}", m.half_centuries);
    println!("  Highest score      {}", m.highest_score);

    if format.is_none() && !report.formats.is_empty() {
        println!();
        println!("  {:<6} {:>7} {:>7} {:>8} {:>8} {:>5}", "Format", "Matches", "Runs", "Average", "SR", "100s");
        for b in &report.formats {
            println!("  {}", breakdown_row(b));
        }
    }

    if !report.recent.is_empty() {
        let scores: Vec<String> = report
            .recent
            .iter()
            .map(|p| {
                if p.is_century {
                    format!("{}!", p.runs)
                } else {
                    p.runs.to_string()
                }
            })
            .collect();
        println!();
        println!("  Last {} innings: {}", report.recent.len(), scores.join("  "));
    }
}

fn breakdown_row(b: &FormatBreakdown) -> String {
    format!(
        "{:<6} {:>7} {:>7} {:>8.1} {:>8.1} {:>5}",
        b.format.to_string(),
        b.matches,
        b.runs,
        b.average,
        b.strike_rate,
        b.centuries
    )
}

fn metrics_header() -> String {
    format!(
        "{:<22} {:>4} {:>6} {:>7} {:>6} {:>6} {:>4} {:>4} {:>4}",
        "Player", "M", "Runs", "Avg", "SR", "Cons", "100", "50", "HS"
    )
}

fn metrics_row(m: &MetricsResult) -> String {
    format!(
        "{:<22} {:>4} {:>6} {:>7.1} {:>6.1} {:>6.1} {:>4} {:>4} {:>4}",
        truncate(&title_case(&m.player_name), 22),
        m.matches_played,
        m.total_runs,
        m.batting_average,
        m.strike_rate,
        m.consistency_index,
        m.centuries,
        m.half_centuries,
        m.highest_score,
    )
}
