//! `portsync` - rename switch ports in bulk from a CSV file.
//!
//! Reads rows of `(port number, desired name, device serial)` and
//! applies each one as an independent Dashboard update. Individual
//! failures are reported per row; the batch always runs to the end.

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use portsync_batch::{read_rows, BatchApplier, BatchOptions, BatchReport, Verbosity};
use portsync_core::config::{DashboardConfig, DEFAULT_BASE_URL};
use portsync_dashboard::DashboardClient;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "portsync",
    version,
    about = "Rename switch ports from a CSV file via the Dashboard API",
    long_about = "Reads a CSV file with header `PortNumber,PortName,Switch SerialNumber` \
                  and renames each listed port on its device. Rows are applied one at a \
                  time in file order; a failed row is reported and the rest of the file \
                  is still processed."
)]
struct Cli {
    /// Dashboard API key
    #[arg(short = 'k', long = "api-key", value_name = "KEY")]
    api_key: String,

    /// Organization id the run is scoped to
    #[arg(short = 'o', long = "org-id", value_name = "ORG")]
    org_id: String,

    /// Path to the CSV input file
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    file: PathBuf,

    /// Dashboard API base URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Overall run deadline in seconds; rows not started in time are skipped
    #[arg(long, value_name = "SECS")]
    deadline_secs: Option<u64>,

    /// Suppress per-row output
    #[arg(short = 'q', long, conflicts_with = "trace")]
    quiet: bool,

    /// Also log the payload of every update
    #[arg(long)]
    trace: bool,
}

impl Cli {
    fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.trace {
            Verbosity::Trace
        } else {
            Verbosity::Verbose
        }
    }
}

fn init_tracing(verbosity: Verbosity) {
    let default_level = match verbosity {
        Verbosity::Quiet => "warn",
        Verbosity::Verbose => "info",
        Verbosity::Trace => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(cli: &Cli) -> anyhow::Result<BatchReport> {
    let config = DashboardConfig::new(cli.api_key.clone(), cli.org_id.clone())
        .and_then(|c| c.with_base_url(cli.base_url.clone()))
        .map(|c| c.with_timeout(cli.timeout_secs))
        .context("invalid configuration")?;

    // Parse before touching the network so an unreadable file aborts
    // with zero remote calls.
    let rows = read_rows(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;
    info!(rows = rows.len(), file = %cli.file.display(), "Source file parsed");

    let client = DashboardClient::from_config(&config).context("building Dashboard client")?;
    let options = BatchOptions {
        verbosity: cli.verbosity(),
        run_deadline: cli.deadline_secs.map(Duration::from_secs),
    };

    Ok(BatchApplier::new(client, options).run(rows).await)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbosity());

    let started_wall = Local::now();
    let started = Instant::now();
    info!(
        start = %started_wall.format("%Y-%m-%d %H:%M:%S"),
        org_id = %cli.org_id,
        file = %cli.file.display(),
        base_url = %cli.base_url,
        api_key = "********",
        "Starting portsync"
    );

    let code = match run(&cli).await {
        Ok(report) => {
            println!("{report}");
            if report.all_applied() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("portsync: {err:#}");
            ExitCode::FAILURE
        }
    };

    info!(
        end = %Local::now().format("%Y-%m-%d %H:%M:%S"),
        elapsed = ?started.elapsed(),
        "Run finished"
    );
    code
}
