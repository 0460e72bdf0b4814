//! Periodic snapshot persistence.
//!
//! Listens for progression and quest events and flushes the engine snapshot
//! on a fixed interval whenever something changed. A final flush happens on
//! shutdown; the runtime also writes once more after the engine worker
//! drains, so at most one interval of progress is at risk.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};

use super::engine::Command;
use crate::events::{EventBus, Topic};
use crate::repository::SnapshotRepository;

pub struct PersistenceWorker {
    repository: Arc<dyn SnapshotRepository>,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    flush_interval: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl PersistenceWorker {
    pub fn new(
        repository: Arc<dyn SnapshotRepository>,
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        flush_interval: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            repository,
            command_tx,
            event_bus,
            flush_interval,
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        tracing::debug!(target: "runtime::persistence", interval = ?self.flush_interval, "persistence worker started");

        let mut quest_rx = self.event_bus.subscribe(Topic::Quest);
        let mut progression_rx = self.event_bus.subscribe(Topic::Progression);

        let mut ticker = tokio::time::interval(self.flush_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut dirty = false;

        loop {
            tokio::select! {
                event = quest_rx.recv() => {
                    match event {
                        Ok(_) => dirty = true,
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(target: "runtime::persistence", skipped, "lagged on quest events");
                            dirty = true;
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
                event = progression_rx.recv() => {
                    match event {
                        Ok(_) => dirty = true,
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(target: "runtime::persistence", skipped, "lagged on progression events");
                            dirty = true;
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
                _ = ticker.tick() => {
                    if dirty {
                        self.flush().await;
                        dirty = false;
                    }
                }
                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        if dirty {
            self.flush().await;
        }
        tracing::debug!(target: "runtime::persistence", "persistence worker stopped");
    }

    async fn flush(&self) {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .command_tx
            .send(Command::Snapshot { reply: reply_tx })
            .await
            .is_err()
        {
            return;
        }
        let snapshot = match reply_rx.await {
            Ok(snapshot) => snapshot,
            Err(_) => return,
        };
        if let Err(err) = self.repository.save(&snapshot).await {
            tracing::error!(target: "runtime::persistence", error = %err, "snapshot flush failed");
        } else {
            tracing::trace!(target: "runtime::persistence", "snapshot flushed");
        }
    }
}
