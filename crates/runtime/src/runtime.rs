//! Runtime assembly: wires the engine, clock, workers, and persistence
//! together and owns their lifecycles.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use engine_core::{EngineConfig, EngineSnapshot, ProgressionEngine};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::api::{EngineHandle, RuntimeError};
use crate::clock::TrustedClock;
use crate::events::EventBus;
use crate::repository::{FileSnapshotRepository, SnapshotRepository};
use crate::workers::{
    EngineWorker, HttpDateProbe, PersistenceWorker, RolloverWorker, TimeSyncWorker,
};

/// Runtime tuning knobs. Defaults match a desktop client session.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub data_dir: PathBuf,
    pub engine: EngineConfig,
    /// How often the rollover monitor re-checks the trusted day.
    pub rollover_interval: Duration,
    /// How often the clock re-anchors against the internet.
    pub sync_interval: Duration,
    /// Per-endpoint timeout for one time probe.
    pub sync_timeout: Duration,
    /// HTTPS endpoints whose `Date` headers anchor the clock, tried in
    /// order. Empty disables syncing entirely.
    pub sync_endpoints: Vec<String>,
    /// How often dirty state is flushed to disk.
    pub flush_interval: Duration,
    pub command_capacity: usize,
    pub event_capacity: usize,
}

impl RuntimeConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            engine: EngineConfig::default(),
            rollover_interval: Duration::from_secs(15),
            sync_interval: Duration::from_secs(300),
            sync_timeout: Duration::from_secs(10),
            sync_endpoints: vec![
                "https://www.google.com".to_owned(),
                "https://www.cloudflare.com".to_owned(),
                "https://www.apple.com".to_owned(),
            ],
            flush_interval: Duration::from_secs(30),
            command_capacity: 64,
            event_capacity: 256,
        }
    }
}

/// The assembled runtime. Dropping it without calling [`shutdown`] aborts
/// workers without a final flush; prefer a graceful shutdown.
///
/// [`shutdown`]: Runtime::shutdown
pub struct Runtime {
    handle: EngineHandle,
    repository: Arc<dyn SnapshotRepository>,
    shutdown_tx: watch::Sender<bool>,
    engine_task: JoinHandle<EngineSnapshot>,
    worker_tasks: Vec<JoinHandle<()>>,
}

impl Runtime {
    /// Loads persisted state and starts all workers.
    ///
    /// A missing snapshot starts fresh; a corrupt one is logged and replaced
    /// on the next flush rather than blocking startup.
    pub async fn start(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        let repository: Arc<dyn SnapshotRepository> =
            Arc::new(FileSnapshotRepository::new(&config.data_dir));

        let snapshot = match repository.load().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                tracing::info!(target: "runtime", "no saved progress, starting fresh");
                EngineSnapshot::default()
            }
            Err(err) => {
                tracing::warn!(target: "runtime", error = %err, "saved progress unreadable, starting fresh");
                EngineSnapshot::default()
            }
        };

        let catalog = engine_content::catalog();
        tracing::info!(
            target: "runtime",
            catalog_version = catalog.version,
            daily_pool = catalog.daily_pool.len(),
            weekly_pool = catalog.weekly_pool.len(),
            "runtime starting"
        );

        let engine = ProgressionEngine::new(config.engine.clone(), catalog, snapshot);
        let clock = TrustedClock::new();
        let event_bus = EventBus::with_capacity(config.event_capacity);
        let (command_tx, command_rx) = mpsc::channel(config.command_capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let engine_task = tokio::spawn(
            EngineWorker::new(engine, clock.clone(), event_bus.clone(), command_rx).run(),
        );

        let mut worker_tasks = Vec::new();

        worker_tasks.push(tokio::spawn(
            RolloverWorker::new(
                command_tx.clone(),
                config.rollover_interval,
                shutdown_rx.clone(),
            )
            .run(),
        ));

        worker_tasks.push(tokio::spawn(
            PersistenceWorker::new(
                Arc::clone(&repository),
                command_tx.clone(),
                event_bus.clone(),
                config.flush_interval,
                shutdown_rx.clone(),
            )
            .run(),
        ));

        if !config.sync_endpoints.is_empty() {
            match HttpDateProbe::new(config.sync_timeout) {
                Ok(probe) => {
                    worker_tasks.push(tokio::spawn(
                        TimeSyncWorker::new(
                            probe,
                            clock.clone(),
                            event_bus.clone(),
                            config.sync_endpoints.clone(),
                            config.sync_interval,
                            shutdown_rx,
                        )
                        .run(),
                    ));
                }
                Err(err) => {
                    tracing::warn!(target: "runtime", error = %err, "http client init failed, time sync disabled");
                }
            }
        }

        Ok(Self {
            handle: EngineHandle::new(command_tx, event_bus),
            repository,
            shutdown_tx,
            engine_task,
            worker_tasks,
        })
    }

    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    /// Stops all workers and flushes the final snapshot.
    pub async fn shutdown(self) -> Result<(), RuntimeError> {
        tracing::info!(target: "runtime", "shutting down");
        let _ = self.shutdown_tx.send(true);

        for task in self.worker_tasks {
            let _ = task.await;
        }

        // Dropping the handle closes the command channel; the engine worker
        // drains what is queued and hands back the final state.
        drop(self.handle);
        let snapshot = self.engine_task.await?;
        self.repository.save(&snapshot).await?;
        tracing::info!(target: "runtime", "final snapshot saved");
        Ok(())
    }
}
