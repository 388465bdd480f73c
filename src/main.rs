//! Sales Warehouse Reports
//!
//! Batch reporting over the gold-layer star schema:
//! - CSV bulk load of `dim_customers`, `dim_products`, `fact_sales`
//! - `report_customers` / `report_products` views with KPIs and segments
//! - Exploratory and advanced analytics as JSON
//! - Watch mode that re-runs the cycle on an interval

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tokio::signal;
use tracing::{error, info, warn};

use loader::{write_json, ExportConfig, LoadConfig, LoadOutcome, OutputFormat, Warehouse};
use reports::{
    refresh_once, AnalyticsReport, QualityReport, RefreshConfig, RefreshScheduler, ReportSettings,
    ReportViews, StarSchema, TimeGrain,
};
use telemetry::init_tracing_from_env;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Settings {
    #[serde(default)]
    load: LoadConfig,

    #[serde(default)]
    export: ExportConfig,

    #[serde(default)]
    reports: ReportSettings,
}

#[derive(Debug, Parser)]
#[command(name = "warehouse-reports", version, about = "Reports over the sales star-schema warehouse")]
struct Cli {
    /// Configuration file (TOML); defaults to config/default.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference date for age and recency (YYYY-MM-DD); defaults to today
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    /// Report file format: csv or json
    #[arg(long, global = true)]
    format: Option<OutputFormat>,

    /// Directory holding the gold.*.csv extracts
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory the reports are written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the tables and write report_customers and report_products
    Reports,
    /// Load the tables and write analytics.json
    Analytics {
        /// Time bucket for the time-series analyses: month or year
        #[arg(long)]
        grain: Option<TimeGrain>,
        /// Rows kept by the rankings
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// Load the tables and report data quality problems
    Validate,
    /// Refresh the reports on an interval until interrupted
    Watch {
        /// Seconds between refreshes
        #[arg(long)]
        interval_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    let cli = Cli::parse();
    let settings = load_config(&cli)?;
    settings
        .reports
        .check()
        .context("Invalid report settings")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %settings.load.data_dir.display(),
        output_dir = %settings.export.output_dir.display(),
        "Starting warehouse reports"
    );

    match cli.command {
        Command::Reports => run_reports(&settings),
        Command::Analytics { .. } => run_analytics(&settings),
        Command::Validate => run_validate(&settings),
        Command::Watch { .. } => run_watch(settings).await,
    }
}

/// Load configuration from defaults, file, environment, then CLI flags.
fn load_config(cli: &Cli) -> Result<Settings> {
    let file = match &cli.config {
        Some(path) => config::File::from(path.as_path()).required(true),
        None => config::File::with_name("config/default").required(false),
    };

    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Settings::default())?)
        .add_source(file.format(config::FileFormat::Toml))
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("WAREHOUSE")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut settings: Settings = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    if let Some(as_of) = cli.as_of {
        settings.reports.as_of = Some(as_of);
    }
    if let Some(format) = cli.format {
        settings.export.format = format;
    }
    if let Some(dir) = &cli.data_dir {
        settings.load.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.output_dir {
        settings.export.output_dir = dir.clone();
    }
    match cli.command {
        Command::Analytics { grain, top_n } => {
            if let Some(grain) = grain {
                settings.reports.grain = grain;
            }
            if let Some(top_n) = top_n {
                settings.reports.top_n = top_n;
            }
        }
        Command::Watch { interval_secs: Some(secs) } => {
            settings.reports.refresh_interval_secs = secs;
        }
        _ => {}
    }

    Ok(settings)
}

fn run_reports(settings: &Settings) -> Result<()> {
    let warehouse = Warehouse::new();
    let views = ReportViews::new();
    let as_of = settings.reports.as_of_or_today();

    let summary = refresh_once(&warehouse, &views, &settings.load, &settings.export, as_of)
        .context("Failed to export reports")?;

    if summary.is_failed() {
        bail!("{}", describe_failures(&summary.load));
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_analytics(settings: &Settings) -> Result<()> {
    let warehouse = Warehouse::new();
    let outcome = warehouse.load_from_csv(&settings.load);
    if outcome.is_total_failure() {
        bail!("{}", describe_failures(&outcome));
    }

    let snapshot = warehouse.snapshot();
    let star = StarSchema::from_snapshot(&snapshot);
    let as_of = settings.reports.as_of_or_today();
    let report = AnalyticsReport::build(&star, as_of, &settings.reports.analytics_options());

    let path = settings.export.output_dir.join("analytics.json");
    write_json(&path, &report).context("Failed to write analytics")?;

    info!(path = %path.display(), "Analytics written");
    println!("{}", path.display());
    Ok(())
}

fn run_validate(settings: &Settings) -> Result<()> {
    let warehouse = Warehouse::new();
    let outcome = warehouse.load_from_csv(&settings.load);

    let snapshot = warehouse.snapshot();
    let quality = QualityReport::check(&StarSchema::from_snapshot(&snapshot));

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "load": &outcome,
            "quality": &quality,
        }))?
    );

    if !quality.is_clean() {
        warn!(issues = quality.issue_count(), "Data quality issues found");
    }
    if !outcome.is_complete() {
        bail!("{}", describe_failures(&outcome));
    }
    Ok(())
}

async fn run_watch(settings: Settings) -> Result<()> {
    let config = RefreshConfig {
        load: settings.load.clone(),
        export: settings.export.clone(),
        interval: settings.reports.refresh_interval(),
        as_of: settings.reports.as_of,
    };
    let scheduler = Arc::new(RefreshScheduler::new(
        config,
        Arc::new(Warehouse::new()),
        Arc::new(ReportViews::new()),
    ));

    let handle = scheduler.clone().start();

    shutdown_signal().await;
    info!("Shutting down...");

    scheduler.shutdown();
    if let Err(e) = handle.await {
        error!("Refresh scheduler task failed: {}", e);
    }

    info!("Shutdown complete");
    Ok(())
}

fn describe_failures(outcome: &LoadOutcome) -> String {
    let details: Vec<String> = outcome
        .failed
        .iter()
        .map(|f| format!("{} ({}): {}", f.table, f.path.display(), f.error))
        .collect();
    format!(
        "{} of {} tables failed to load: {}",
        outcome.failed.len(),
        outcome.failed.len() + outcome.loaded.len(),
        details.join("; ")
    )
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
