//! Hindsight CLI - Command line interface for portfolio backtesting.
//!
//! Reads already-fetched holdings and price histories as JSON and prints the
//! analysis as JSON. Logs go to stderr, filtered by `RUST_LOG`.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use hindsight_core::{
    analyze, AnalysisConfig, AnalysisReport, AnalysisRequest, AnalysisWindow, ApiResponse,
    Benchmark,
};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hindsight")]
#[command(about = "Hindsight CLI - simulate how a portfolio would have performed")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $HINDSIGHT_CONFIG or ~/.hindsight/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a request file
    Analyze {
        /// JSON file with portfolio, window, prices and optional benchmark
        #[arg(short, long)]
        input: PathBuf,
        /// Benchmark label (topix, nikkei225)
        #[arg(short, long)]
        benchmark: Option<Benchmark>,
        /// Value rebased trajectories start at
        #[arg(long)]
        reference: Option<f64>,
        /// Reject windows ending after this date (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Print the default simulation window for a given day
    Window {
        /// Current date (YYYY-MM-DD)
        #[arg(short, long)]
        today: NaiveDate,
        /// Lookback in years
        #[arg(short, long)]
        years: Option<u32>,
    },
    /// Show the effective configuration
    Config,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            println!("{}", respond::<()>(Err(e)));
            return ExitCode::FAILURE;
        }
    };

    let (output, ok) = match cli.command {
        Commands::Analyze {
            input,
            benchmark,
            reference,
            today,
        } => {
            let mut config = config;
            if let Some(benchmark) = benchmark {
                config.benchmark = benchmark;
            }
            if let Some(reference) = reference {
                config.reference_value = reference;
            }
            render(handle_analyze(&input, &config, today))
        }
        Commands::Window { today, years } => render(handle_window(&config, today, years)),
        Commands::Config => render(Ok(json!({
            "path": cli
                .config
                .unwrap_or_else(AnalysisConfig::default_path),
            "config": config,
        }))),
    };

    println!("{}", output);
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AnalysisConfig> {
    let config = match path {
        Some(path) => AnalysisConfig::load_from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AnalysisConfig::load().context("loading default config")?,
    };
    Ok(config)
}

fn handle_analyze(
    input: &Path,
    config: &AnalysisConfig,
    today: Option<NaiveDate>,
) -> anyhow::Result<AnalysisReport> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("reading request from {}", input.display()))?;
    let mut request: AnalysisRequest = serde_json::from_str(&content)
        .with_context(|| format!("parsing request from {}", input.display()))?;

    if let Some(today) = today {
        request.window = request.window.ending_by(today)?;
    }

    let report = analyze(&request, config)?;
    Ok(report)
}

fn handle_window(
    config: &AnalysisConfig,
    today: NaiveDate,
    years: Option<u32>,
) -> anyhow::Result<serde_json::Value> {
    let years = years.unwrap_or(config.default_lookback_years);
    let window = AnalysisWindow::trailing(today, years)?;

    Ok(json!({
        "window": window,
        "days": window.days(),
        "years_elapsed": window.years_elapsed(),
        "benchmark": {
            "name": config.benchmark.name(),
            "ticker": config.benchmark.ticker(),
        },
    }))
}

fn render<T: Serialize>(result: anyhow::Result<T>) -> (String, bool) {
    let ok = result.is_ok();
    (respond(result), ok)
}

fn respond<T: Serialize>(result: anyhow::Result<T>) -> String {
    let rendered = match result {
        Ok(data) => serde_json::to_string_pretty(&ApiResponse::ok(data)),
        Err(e) => serde_json::to_string_pretty(&ApiResponse::<()>::err(format!("{:#}", e))),
    };

    rendered.unwrap_or_else(|e| json!({ "ok": false, "error": e.to_string() }).to_string())
}
