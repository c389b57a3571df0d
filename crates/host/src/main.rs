// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! `qntxd`: the QNTX host process.
//!
//! Boots the persistence adapter, async queue, worker pool, plugin
//! registry/supervisor, and Pulse ticker, then runs until `SIGTERM`/`SIGINT`.

use std::path::Path;
use std::time::Duration;

use qntx_core::SystemClock;
use qntx_host::app::App;
use qntx_host::config::Config;
use qntx_pulse::Ticker;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("qntxd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("qntxd {}", env!("CARGO_PKG_VERSION"));
                println!("QNTX host process — plugin orchestration substrate");
                println!();
                println!("USAGE:");
                println!("    qntxd");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: qntxd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;
    rotate_log_if_needed(&config.log_path());
    let _log_guard = setup_logging(&config)?;

    info!("starting qntx host");

    let app = App::boot(&config).await?;

    let ticker = Ticker::new(app.store.clone(), app.queue.clone(), SystemClock, app.metrics(), config.pulse_execution_retention_days)
        .with_tick_interval(config.pulse_tick_interval);
    let ticker_cancel = ticker.cancellation_token();
    let ticker_handle = tokio::spawn(async move { ticker.run().await });

    spawn_checkpoint(app.store.clone());

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!("qntx host ready");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    ticker_cancel.cancel();
    let _ = ticker_handle.await;
    app.shutdown().await;

    info!("qntx host stopped");
    Ok(())
}

const CHECKPOINT_INTERVAL: Duration = Duration::from_secs(60);

/// Periodically snapshots the store and compacts the WAL behind it.
fn spawn_checkpoint(store: std::sync::Arc<qntx_storage::Engine>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CHECKPOINT_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(error) = store.checkpoint() {
                error!(%error, "periodic checkpoint failed");
            }
        }
    });
}

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;
const MAX_ROTATED_LOGS: u32 = 3;

/// Rotates `qntxd.log` into `.1`/`.2`/`.3` once it exceeds [`MAX_LOG_SIZE`].
/// Best-effort: rotation failures are silently ignored so the host still
/// starts.
fn rotate_log_if_needed(log_path: &Path) {
    let size = match std::fs::metadata(log_path) {
        Ok(metadata) => metadata.len(),
        Err(_) => return,
    };
    if size < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

fn setup_logging(config: &Config) -> Result<tracing_appender::non_blocking::WorkerGuard, qntx_host::ConfigError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| qntx_host::ConfigError::Read {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let file_appender =
        tracing_appender::rolling::never(log_path.parent().unwrap_or_else(|| Path::new(".")), "qntxd.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();

    Ok(guard)
}
