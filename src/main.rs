//! CLI entry point for the ADT pipeline.
//!
//! Loads an ADT table export from a file or URL, applies a date window, and
//! produces the busiest-streets ranking, the yearly traffic series and the
//! heat-map points, either as a JSON report or as CSV files.

use adt_pipeline::{
    PipelineConfig,
    fetch::load_source,
    filter::filter,
    ingest::read_observations,
    observation::Observation,
    output::{PREVIEW_ROWS, export_views, preview, print_json, print_pretty, write_json},
    run,
};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "adt_pipeline")]
#[command(about = "Aggregate average daily traffic counts into ranking, trend and heat-map views", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args)]
struct WindowArgs {
    /// Path or URL of the ADT CSV export (falls back to ADT_SOURCE)
    #[arg(value_name = "FILE_OR_URL")]
    source: Option<String>,

    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<String>,

    /// First count date included (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last count date included (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline and log the JSON report
    Report {
        #[command(flatten)]
        window: WindowArgs,

        /// Number of streets in the ranking
        #[arg(short = 'n', long)]
        top_n: Option<usize>,

        /// Also write the report to this JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the three views as CSV files
    Export {
        #[command(flatten)]
        window: WindowArgs,

        /// Number of streets in the ranking
        #[arg(short = 'n', long)]
        top_n: Option<usize>,

        /// Directory to write the CSV files to
        #[arg(short = 'd', long, default_value = "views")]
        output_dir: PathBuf,
    },
    /// Log the first rows that fall inside the date window
    Preview {
        #[command(flatten)]
        window: WindowArgs,

        /// Number of rows to show
        #[arg(short, long, default_value_t = PREVIEW_ROWS)]
        rows: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            window,
            top_n,
            output,
        } => {
            let config = resolve_config(&window, top_n)?;
            let observations = load_observations(&window).await?;
            let report = run(&observations, &config)?;

            print_pretty(&report);
            print_json(&report)?;

            if let Some(path) = output {
                write_json(&path, &report)?;
                info!(path = %path.display(), "Report saved");
            }
        }
        Commands::Export {
            window,
            top_n,
            output_dir,
        } => {
            let config = resolve_config(&window, top_n)?;
            let observations = load_observations(&window).await?;
            let report = run(&observations, &config)?;

            if report.is_empty() {
                warn!("No data available for the selected date range, writing empty views");
            }
            let paths = export_views(&output_dir, &report)?;
            for path in &paths {
                info!(path = %path.display(), "View written");
            }
        }
        Commands::Preview { window, rows } => {
            let config = resolve_config(&window, None)?;
            let observations = load_observations(&window).await?;
            let filtered = filter(&observations, &config.range());

            info!(
                filtered = filtered.len(),
                total = observations.len(),
                "Filtered traffic data"
            );
            for obs in preview(&filtered, rows) {
                log_observation(obs);
            }
        }
    }

    Ok(())
}

/// Colored stderr output plus a JSON rolling log file.
///
/// The returned guard flushes the file writer on drop and must outlive `main`'s work.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/adt_pipeline.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("adt_pipeline.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

/// Config file (if any) overridden by command-line flags.
fn resolve_config(window: &WindowArgs, top_n: Option<usize>) -> Result<PipelineConfig> {
    let mut config = match &window.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("failed to load config '{path}'"))?,
        None => PipelineConfig::default(),
    };

    if let Some(start) = window.start {
        config.start_date = Some(start);
    }
    if let Some(end) = window.end {
        config.end_date = Some(end);
    }
    if let Some(n) = top_n {
        config.top_n = n;
    }
    config.validate()?;

    info!(
        start = ?config.start_date,
        end = ?config.end_date,
        top_n = config.top_n,
        "Configuration resolved"
    );
    Ok(config)
}

async fn load_observations(window: &WindowArgs) -> Result<Vec<Observation>> {
    let source = match &window.source {
        Some(source) => source.clone(),
        None => match std::env::var("ADT_SOURCE") {
            Ok(source) => source,
            Err(_) => bail!("no source given: pass FILE_OR_URL or set ADT_SOURCE"),
        },
    };

    let bytes = load_source(&source).await?;
    let observations = read_observations(bytes.as_slice())
        .with_context(|| format!("failed to ingest '{source}'"))?;
    Ok(observations)
}

fn log_observation(obs: &Observation) {
    info!(
        street = %obs.street,
        latitude = ?obs.latitude,
        longitude = ?obs.longitude,
        adt = ?obs.adt,
        count_date = %obs.count_date,
        city = %obs.city,
        "Row"
    );
}
