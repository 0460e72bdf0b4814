//! Progression host binary.
//!
//! Composition root for the progression runtime: loads configuration from
//! the environment, sets up logging, starts the runtime, mirrors its events
//! into the log, and shuts down cleanly on Ctrl-C.

use std::path::PathBuf;

use anyhow::{Context, Result};
use runtime::{Event, Runtime, RuntimeConfig, Topic};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let data_dir = resolve_data_dir()?;
    setup_logging(&data_dir)?;

    let mut config = RuntimeConfig::new(&data_dir);
    if let Ok(raw) = std::env::var("PROGRESSION_SYNC_ENDPOINTS") {
        config.sync_endpoints = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
    }

    tracing::info!("Starting progression host");
    tracing::info!("Data directory: {}", data_dir.display());
    tracing::info!("Sync endpoints: {}", config.sync_endpoints.len());

    let runtime = Runtime::start(config).await?;
    let handle = runtime.handle();

    let stats = handle.stats().await?;
    tracing::info!(
        level = stats.level,
        total_xp = stats.total_xp,
        prestige = stats.prestige,
        "progress loaded"
    );

    // Mirror runtime events into the log until shutdown.
    let mut quest_rx = handle.subscribe(Topic::Quest);
    let mut progression_rx = handle.subscribe(Topic::Progression);
    let mut clock_rx = handle.subscribe(Topic::Clock);
    let event_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                event = quest_rx.recv() => match event {
                    Ok(event) => log_event(&event),
                    Err(_) => break,
                },
                event = progression_rx.recv() => match event {
                    Ok(event) => log_event(&event),
                    Err(_) => break,
                },
                event = clock_rx.recv() => match event {
                    Ok(event) => log_event(&event),
                    Err(_) => break,
                },
            }
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    tracing::info!("Shutdown signal received");

    event_task.abort();
    drop(handle);
    runtime.shutdown().await?;
    tracing::info!("Host shutdown complete");
    Ok(())
}

fn log_event(event: &Event) {
    match event {
        Event::Quest(quest) => tracing::info!(target: "host::events", ?quest, "quest event"),
        Event::Progression(progression) => {
            tracing::info!(target: "host::events", ?progression, "progression event");
        }
        Event::Clock(clock) => tracing::debug!(target: "host::events", ?clock, "clock event"),
    }
}

/// Data directory: env override first, then the platform default.
fn resolve_data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("PROGRESSION_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let dirs = directories::ProjectDirs::from("", "", "progression")
        .context("could not determine a data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Setup logging to both stderr and a file under the data directory.
fn setup_logging(data_dir: &std::path::Path) -> Result<()> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "host.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    // Leak the guard to keep the file writer alive for the process lifetime.
    std::mem::forget(guard);

    tracing::info!("Logging initialized: {}", log_dir.display());
    Ok(())
}
