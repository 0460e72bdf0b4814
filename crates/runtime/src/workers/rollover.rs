//! Rollover monitor.
//!
//! Periodically nudges the engine worker to re-check the trusted day and
//! week. The engine's rollover is idempotent, so the tick interval only
//! bounds how late a boundary crossing can be noticed.

use std::time::Duration;

use tokio::sync::{mpsc, watch};

use super::engine::Command;

pub struct RolloverWorker {
    command_tx: mpsc::Sender<Command>,
    interval: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl RolloverWorker {
    pub fn new(
        command_tx: mpsc::Sender<Command>,
        interval: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            command_tx,
            interval,
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        tracing::debug!(target: "runtime::rollover", interval = ?self.interval, "rollover monitor started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.command_tx.send(Command::RolloverTick).await.is_err() {
                        // Engine worker is gone; nothing left to do.
                        break;
                    }
                }
                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!(target: "runtime::rollover", "rollover monitor stopped");
    }
}
