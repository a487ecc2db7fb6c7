//! Standings CLI — compute, watch, and demo commands.
//!
//! Commands:
//! - `compute` — rank a saved performance-history payload
//! - `watch` — poll the live endpoint and reprint the leaderboard each refresh
//! - `demo` — rank a deterministic synthetic competition

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use standings_runner::{
    build_report, export_csv, export_json, render_table, save_report, synthetic_competition,
    DashboardConfig, HttpSource, JsonFileSource, MetricsReport, RankingMetric, Refresher,
    SeriesSource,
};

#[derive(Parser)]
#[command(
    name = "standings",
    about = "Standings CLI — performance metrics for trading competitions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute and rank metrics from a saved JSON payload.
    Compute {
        /// Payload file: an object mapping entity id to `[{timestamp, value}]`.
        #[arg(long)]
        input: PathBuf,

        /// Metric to rank by (total_return, max_drawdown, sharpe, sortino, calmar, value).
        #[arg(long)]
        rank_by: Option<RankingMetric>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Also write standings.json and standings.csv into this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Poll the performance-history endpoint and print standings each refresh.
    Watch {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Endpoint URL. Overrides `source.endpoint` from the config.
        #[arg(long)]
        endpoint: Option<String>,

        /// Seconds between refreshes. Overrides `refresh.interval_secs`.
        #[arg(long)]
        interval: Option<u64>,

        /// Refresh once and exit. A fetch failure becomes the exit status.
        #[arg(long, default_value_t = false)]
        once: bool,

        /// Metric to rank by.
        #[arg(long)]
        rank_by: Option<RankingMetric>,
    },
    /// Rank a synthetic competition.
    Demo {
        /// Number of teams.
        #[arg(long, default_value_t = 8)]
        teams: usize,

        /// Points per team (one per minute).
        #[arg(long, default_value_t = 1440)]
        points: usize,

        /// Master seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Metric to rank by.
        #[arg(long, default_value_t = RankingMetric::TotalReturn)]
        rank_by: RankingMetric,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compute {
            input,
            rank_by,
            format,
            config,
            output_dir,
        } => run_compute(&input, rank_by, format, config.as_deref(), output_dir.as_deref()),
        Commands::Watch {
            config,
            endpoint,
            interval,
            once,
            rank_by,
        } => run_watch(config.as_deref(), endpoint, interval, once, rank_by),
        Commands::Demo {
            teams,
            points,
            seed,
            rank_by,
        } => run_demo(teams, points, seed, rank_by),
    }
}

/// Logs go to stderr so table/JSON/CSV output on stdout stays pipeable.
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    match path {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(DashboardConfig::default()),
    }
}

fn run_compute(
    input: &Path,
    rank_by: Option<RankingMetric>,
    format: OutputFormat,
    config_path: Option<&Path>,
    output_dir: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let metric = rank_by.unwrap_or(config.ranking.metric);

    let source = JsonFileSource::new(input);
    let series = source
        .fetch(&config.window())
        .with_context(|| format!("failed to read payload {}", input.display()))?;
    let report = build_report(&series, &config.engine, metric);

    print_report(&report, format)?;

    if let Some(dir) = output_dir {
        let dir = save_report(&report, dir)?;
        eprintln!("Standings saved to: {}", dir.display());
    }
    Ok(())
}

fn run_watch(
    config_path: Option<&Path>,
    endpoint: Option<String>,
    interval: Option<u64>,
    once: bool,
    rank_by: Option<RankingMetric>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if endpoint.is_some() {
        config.source.endpoint = endpoint;
    }
    if let Some(secs) = interval {
        config.refresh.interval_secs = secs;
    }
    if let Some(metric) = rank_by {
        config.ranking.metric = metric;
    }
    config.validate()?;

    let Some(url) = config.source.endpoint.clone() else {
        bail!("no endpoint configured; pass --endpoint or set source.endpoint");
    };
    let source = HttpSource::new(url, config.timeout())?;
    let mut refresher = Refresher::from_config(&config, Box::new(source));
    let pause = config.refresh_interval();
    tracing::info!(
        endpoint = %config.source.endpoint.as_deref().unwrap_or_default(),
        metric = %refresher.metric(),
        interval_secs = pause.as_secs(),
        "watching standings"
    );

    loop {
        match refresher.refresh() {
            Ok(report) => {
                println!("Standings at {}", report.computed_at.format("%Y-%m-%d %H:%M:%S UTC"));
                print!("{}", render_table(&report.entries, report.metric));
                println!();
            }
            Err(e) if once => return Err(e.into()),
            Err(e) => {
                tracing::warn!(error = %e, retry_in_secs = pause.as_secs(), "refresh failed");
            }
        }
        if once {
            return Ok(());
        }
        std::thread::sleep(pause);
    }
}

fn run_demo(teams: usize, points: usize, seed: u64, rank_by: RankingMetric) -> Result<()> {
    if teams == 0 {
        bail!("--teams must be at least 1");
    }
    let config = DashboardConfig::default();
    let series = synthetic_competition(teams, points, seed);
    let report = build_report(&series, &config.engine, rank_by);
    tracing::debug!(teams, points, seed, "synthetic competition generated");
    print_report(&report, OutputFormat::Table)
}

fn print_report(report: &MetricsReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print!("{}", render_table(&report.entries, report.metric)),
        OutputFormat::Json => println!("{}", export_json(report)?),
        OutputFormat::Csv => print!("{}", export_csv(&report.entries)?),
    }
    Ok(())
}
