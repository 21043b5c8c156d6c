//! `bookstore` server entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment.
//! - Initialize logging, open the database, then serve HTTP.
//!
//! # Invariants
//! - A database that cannot be opened aborts startup; no traffic is served.

use bookstore_api::{serve, AppState, ServerConfig};
use bookstore_core::db::{open_db, open_db_in_memory};
use bookstore_core::{core_version, default_log_level, init_logging};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

/// Bookstore CRUD REST API
#[derive(Parser, Debug)]
#[command(name = "bookstore")]
#[command(version, about, long_about = None)]
struct Args {
    /// SQLite database file
    #[arg(long, env = "BOOKSTORE_DB", default_value = "bookstore.db")]
    db: PathBuf,

    /// Use a throwaway in-memory database; takes precedence over `--db`
    #[arg(long)]
    memory: bool,

    /// Host to bind to
    #[arg(long, env = "BOOKSTORE_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind to
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// trace|debug|info|warn|error (defaults to debug in debug builds, info otherwise)
    #[arg(long, env = "BOOKSTORE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logs go to stderr when unset
    #[arg(long, env = "BOOKSTORE_LOG_DIR")]
    log_dir: Option<String>,
}

impl Args {
    fn server_config(&self) -> ServerConfig {
        ServerConfig::new(self.host.clone(), self.port)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("bookstore: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let level = args.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, args.log_dir.as_deref())?;
    info!("event=cli_start module=cli status=ok version={}", core_version());

    let state = open_state(&args).map_err(|message| {
        error!("event=cli_start module=cli status=error error={message}");
        message
    })?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|err| format!("failed to create tokio runtime: {err}"))?;
    let config = args.server_config();
    runtime
        .block_on(serve(&config, state))
        .map_err(|err| format!("HTTP server on {} failed: {err}", config.socket_addr()))
}

fn open_state(args: &Args) -> Result<AppState, String> {
    let conn = if args.memory {
        open_db_in_memory()
    } else {
        open_db(&args.db)
    }
    .map_err(|err| format!("failed to open database: {err}"))?;

    AppState::try_new(conn).map_err(|err| format!("database is not usable: {err}"))
}
