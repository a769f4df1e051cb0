//! `relmap` server executable.

use clap::Parser;
use log::info;
use relmap_core::db::{open_db, open_db_in_memory};
use relmap_core::init_logging;
use relmap_http::{serve, AppState, ServerConfig};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Serves the relmap entity API over HTTP.
#[derive(Debug, Parser)]
#[command(name = "relmap", version)]
struct Cli {
    /// Path to a TOML configuration file; defaults apply when omitted.
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("relmap: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::load(cli.config.as_deref())?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = match config.db_path.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let addr = config.socket_addr()?;
    info!(
        "event=server_start module=cli status=ok addr={addr} persistent={}",
        u8::from(config.db_path.is_some())
    );

    serve(addr, Arc::new(AppState::new(conn))).await?;
    Ok(())
}
