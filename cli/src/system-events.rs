//! # System Event Reporter
//!
//! Polls the paginated alert listing of an SP leader, keeps the
//! `system_event` alerts, resolves each one's annotation and prints the
//! result as a fixed-width table on stdout. Logs go to stderr and to a
//! daily-rotated JSON file so the table output stays machine-cuttable.

use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, prelude::*};

use lib_common::alerts::walker::{PageWalker, WalkError, WalkStats};
use lib_common::configs::RunConfig;
use lib_common::render::TableRenderer;
use lib_common::retrieve::transport::SpTransport;

// load .env files before anything else
use static_init::dynamic;

#[dynamic]
static DOTENV_INIT: () = {
    // Set up environment variables
    dotenvy::dotenv().ok();
};

#[derive(Parser, Debug)]
#[command(
    name = "system-events",
    about = "Render system event alerts from an SP leader as a table"
)]
struct Args {
    /// Hostname (or host:port) of the SP leader to query
    #[arg(long, env = "SP_LEADER")]
    leader: String,

    /// API token generated on the leader
    #[arg(long, env = "SP_API_TOKEN")]
    token: String,

    /// PEM bundle holding the certificates to trust
    #[arg(long, env = "SP_TRUST_STORE", default_value = "./cacerts.pem")]
    trust_store: PathBuf,

    /// Optional server-side alert filter expression
    #[arg(long, env = "SP_FILTER")]
    filter: Option<String>,
}

fn setup_logging() -> io::Result<non_blocking::WorkerGuard> {
    // Get log level from environment variable or use default
    let log_level: String = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    // Get log directory from environment variable or use default
    let log_dir: String = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

    // Create log directory if it doesn't exist
    std::fs::create_dir_all(&log_dir)?;

    // Configure file appender for rotating log files daily
    let file_appender = rolling::daily(&log_dir, "system-events");
    let (non_blocking_appender, guard) = non_blocking(file_appender);

    // Console output goes to stderr so the table on stdout stays clean
    let console_layer = fmt::layer()
        .with_target(true)
        .with_ansi(true)
        .with_writer(io::stderr);

    // Create JSON-formatted file layer
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking_appender)
        .json();

    // Create environment filter from log level
    let env_filter: EnvFilter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Combine all layers
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized with level: {}", log_level);
    Ok(guard)
}

/// Header, walk, footer. The footer prints even when the walk fails so
/// the table is always closed.
fn run(transport: &SpTransport, first_page: &str) -> Result<WalkStats, WalkError> {
    let stdout = io::stdout();
    let mut renderer = TableRenderer::new(stdout.lock());

    renderer.header()?;
    let result = PageWalker::new(transport, first_page).run(&mut renderer);
    renderer.footer()?;

    result
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Set up logging; keep the appender guard alive for the whole run
    let _log_guard = match setup_logging() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    let config = RunConfig {
        leader: args.leader,
        api_token: args.token,
        trust_store: args.trust_store,
        filter: args.filter,
    };

    if let Err(e) = config.validate() {
        error!("invalid configuration: {}", e);
        return ExitCode::from(1);
    }
    let first_page = match config.first_page_url() {
        Ok(url) => url,
        Err(e) => {
            error!("invalid configuration: {}", e);
            return ExitCode::from(1);
        }
    };

    // The transport is built once; trust store problems abort here,
    // before any network I/O.
    let transport = match SpTransport::new(&config.trust_store, config.api_token.clone()) {
        Ok(transport) => transport,
        Err(e) => {
            error!("cannot build trusted transport: {}", e);
            return ExitCode::from(1);
        }
    };

    info!("fetching system events from {}", config.leader);
    match run(&transport, &first_page) {
        Ok(stats) => {
            info!(
                "run complete: {} pages, {} rows, {} skipped",
                stats.pages, stats.rendered, stats.skipped
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("walk aborted: {}", e);
            ExitCode::from(2)
        }
    }
}
