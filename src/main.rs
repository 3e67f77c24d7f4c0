use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use nba_stats::config::{Settings, parse_seasons};
use nba_stats::fetcher::HttpFetcher;
use nba_stats::pipeline;
use nba_stats::sink::{DocumentSink, NullSink, SqliteSink};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut settings = Settings::from_env();
    let seasons = parse_seasons_arg();
    if !seasons.is_empty() {
        settings.seasons = seasons;
    }
    if let Some(out) = parse_path_arg("--out") {
        settings.output_path = out;
    }

    let sink: Box<dyn DocumentSink> = match settings.sink_db.as_deref() {
        Some(path) => Box::new(SqliteSink::open(path).context("open document sink")?),
        None => Box::new(NullSink),
    };

    let fetcher = HttpFetcher::from_settings(&settings);
    let summary = pipeline::run(&settings, fetcher, sink).context("pipeline failed")?;

    println!("Seasons: {}", summary.seasons.join(", "));
    println!("Season rows resolved: {}", summary.season_rows);
    println!("Remote fetches: {}", summary.fetches);
    println!("Player slots: {}", summary.player_slots);
    println!(
        "Rows written: {} -> {}",
        summary.rows_written,
        summary.output_path.display()
    );
    Ok(())
}

fn parse_seasons_arg() -> Vec<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut out = Vec::new();
    for (idx, arg) in args.iter().enumerate() {
        let raw = if let Some(raw) = arg.strip_prefix("--season=") {
            raw
        } else if arg == "--season"
            && let Some(next) = args.get(idx + 1)
        {
            next.as_str()
        } else {
            continue;
        };
        for season in parse_seasons(raw) {
            if !out.contains(&season) {
                out.push(season);
            }
        }
    }
    out
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
