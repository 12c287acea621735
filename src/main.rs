//! Attack-Path CLI - batch entry point
//!
//! Loads the clustered asset table, runs the engine for the selected
//! cluster modes and hands the result to the text, JSON and CSV sinks.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use attackpath::constants::{APP_NAME, APP_VERSION};
use attackpath::logic::report::{export_report, summary};
use attackpath::{
    load_catalog, AttackPathEngine, CliOverrides, EngineReport, ModeSelection, RunConfig,
    SeverityGate,
};

#[derive(Parser)]
#[command(name = "attackpath")]
#[command(version)]
#[command(about = "Shortest lateral-movement routes toward a target asset", long_about = None)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build attack graphs and compute routes toward the target
    Run {
        /// Clustered asset table (CSV)
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Target asset id (falls back to ATTACKPATH_TARGET)
        #[arg(short, long)]
        target: Option<u32>,

        /// Minimum mean severity for stepping-stone assets
        #[arg(long)]
        threshold: Option<f64>,

        /// Cluster mode: aware, agnostic, both
        #[arg(long)]
        mode: Option<ModeSelection>,

        /// Size of the route ranking and app table
        #[arg(long)]
        top_k: Option<usize>,

        /// Severity gate: target-exempt, symmetric
        #[arg(long)]
        severity_gate: Option<SeverityGate>,

        /// Abort the run after this many seconds
        #[arg(long)]
        deadline_secs: Option<u64>,

        /// Directory for report.json and CSV exports
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Stdout format (text, json)
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Load the asset table and report accepted and skipped rows
    Inspect {
        /// Clustered asset table (CSV)
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "attackpath=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    tracing::info!("{} v{} starting", APP_NAME, APP_VERSION);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let result = rt.block_on(execute(cli));

    // A timed-out engine task may still be running; do not wait for it
    rt.shutdown_background();
    result
}

async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            input,
            target,
            threshold,
            mode,
            top_k,
            severity_gate,
            deadline_secs,
            out_dir,
            format,
        } => {
            let config = RunConfig::resolve(&CliOverrides {
                target,
                severity_threshold: threshold,
                cluster_mode: mode,
                top_k,
                severity_gate,
                deadline_secs,
            })?;

            let report = run(&input, config).await?;
            for m in &report.modes {
                tracing::info!(
                    mode = %m.mode,
                    edges = m.stats.edges,
                    routes = m.routes.len(),
                    top_app = m.top_apps.first().map(|a| a.app.as_str()).unwrap_or("-"),
                    "Mode complete"
                );
            }

            if let Some(dir) = out_dir {
                export_report(&report, &dir)
                    .with_context(|| format!("Failed to write exports to {}", dir.display()))?;
            }

            match format {
                OutputFormat::Text => print!("{}", summary::render(&report)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }

        Commands::Inspect { input } => {
            let (catalog, load) = load_catalog(&input)
                .with_context(|| format!("Failed to load catalog {}", input.display()))?;

            print!("{}", summary::render_load(&load));
            println!("Catalog fingerprint: {}", catalog.fingerprint());
            for (cluster, size) in catalog.cluster_sizes() {
                println!("  cluster {}: {} assets", cluster, size);
            }
        }
    }

    Ok(())
}

/// Load, then run the engine off the async runtime, bounded by the deadline
async fn run(input: &Path, config: RunConfig) -> Result<EngineReport> {
    let (catalog, load) = load_catalog(input)
        .with_context(|| format!("Failed to load catalog {}", input.display()))?;

    let report = AttackPathEngine::new(catalog, config)
        .with_load_report(load)
        .run_with_deadline()
        .await?;
    Ok(report)
}
