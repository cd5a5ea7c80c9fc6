//! Command line entry point for kart-rating
//!
//! Replays a JSON race log through the Glicko-2 engine and prints the
//! resulting leaderboard.

use anyhow::{Context, Result};
use clap::Parser;
use kart_rating::config::AppConfig;
use kart_rating::rating::{
    Glicko2RatingCalculator, InMemoryRatingStorage, RaceRecorder, RatingStorage,
};
use kart_rating::{Leaderboard, RaceOutcome};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Kart Rating - Glicko-2 leaderboard for kart races
#[derive(Parser)]
#[command(
    name = "kart-rating",
    version,
    about = "Replay kart races through a Glicko-2 rating engine",
    long_about = "Kart Rating turns every race into round-robin head-to-head results, applies \
                 one Glicko-2 rating period per race in chronological order, and ranks racers \
                 by conservative score (rating minus two rating deviations)."
)]
struct Args {
    /// Race log to replay
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to a JSON array of races"
    )]
    races: Option<PathBuf>,

    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Print the leaderboard as JSON
    #[arg(long, help = "Print the leaderboard as JSON instead of a table")]
    json: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without replaying races")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load configuration from file or environment and apply CLI overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(config_path) => AppConfig::from_file(config_path)?,
        None => AppConfig::from_env()?,
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    kart_rating::config::validate_config(&config)?;
    Ok(config)
}

fn load_races(path: &Path) -> Result<Vec<RaceOutcome>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read race log {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse race log {}", path.display()))
}

fn print_table(leaderboard: &Leaderboard) {
    println!(
        "{:>4}  {:<20} {:>9} {:>7} {:>12} {:>6}",
        "#", "Racer", "Rating", "RD", "Conservative", "Races"
    );
    for standing in &leaderboard.standings {
        println!(
            "{:>4}  {:<20} {:>9.1} {:>7.1} {:>12.1} {:>6}{}",
            standing.position,
            standing.competitor_id,
            standing.rating,
            standing.rating_deviation,
            standing.conservative_score,
            standing.races_played,
            if standing.provisional { "  (provisional)" } else { "" }
        );
    }
}

fn run(args: &Args, config: &AppConfig) -> Result<()> {
    let races_path = args
        .races
        .as_ref()
        .context("No race log given, pass --races <FILE>")?;
    let races = load_races(races_path)?;
    info!("Loaded {} races from {}", races.len(), races_path.display());

    let calculator = Glicko2RatingCalculator::new(config.rating.clone())?;
    let storage = Arc::new(InMemoryRatingStorage::new());
    let recorder = RaceRecorder::new(storage.clone(), Arc::new(calculator));
    recorder.replay(&races)?;

    let entries = storage.get_all_ratings()?;
    let leaderboard =
        Leaderboard::from_entries(entries.values(), config.rating.provisional_race_threshold);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&leaderboard)?);
    } else {
        print_table(&leaderboard);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        info!(
            "Configuration valid: tau={}, seed={}/{}/{}, missing results {:?}",
            config.rating.tau,
            config.rating.initial_rating,
            config.rating.initial_deviation,
            config.rating.initial_volatility,
            config.rating.missing_result_policy
        );
        return Ok(());
    }

    if let Err(e) = run(&args, &config) {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
