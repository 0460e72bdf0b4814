//! Client-facing handle into the runtime.

use engine_core::{ClaimGrant, PrestigeError, QuestState, RecordOutcome, Scope, WatchEvent};
use tokio::sync::{broadcast, mpsc, oneshot};

use super::errors::RuntimeError;
use crate::events::{Event, EventBus, Topic};
use crate::workers::engine::{Command, ProgressionStats};

/// Cheap-to-clone handle for interacting with the progression runtime.
///
/// Every method is a request/reply round trip to the engine worker, so
/// results reflect a consistent engine state at the time the command was
/// processed.
#[derive(Clone)]
pub struct EngineHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl EngineHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Credits one telemetry event from the playback layer.
    pub async fn record_watch(&self, event: WatchEvent) -> Result<RecordOutcome, RuntimeError> {
        self.request(|reply| Command::RecordWatch { event, reply })
            .await
    }

    /// Current daily quest slate with live progress.
    pub async fn active_daily_quests(&self) -> Result<Vec<QuestState>, RuntimeError> {
        self.request(|reply| Command::ActiveQuests {
            scope: Scope::Daily,
            reply,
        })
        .await
    }

    /// Current weekly quest slate with live progress.
    pub async fn active_weekly_quests(&self) -> Result<Vec<QuestState>, RuntimeError> {
        self.request(|reply| Command::ActiveQuests {
            scope: Scope::Weekly,
            reply,
        })
        .await
    }

    /// Claims a completed quest. `Ok(None)` means the claim was rejected
    /// (stale, incomplete, or already claimed) with no state change.
    pub async fn claim_quest(
        &self,
        claim_key: impl Into<String>,
    ) -> Result<Option<ClaimGrant>, RuntimeError> {
        let claim_key = claim_key.into();
        self.request(|reply| Command::Claim { claim_key, reply })
            .await
    }

    /// Starts a prestige cycle.
    pub async fn prestige(&self) -> Result<Result<u32, PrestigeError>, RuntimeError> {
        self.request(|reply| Command::Prestige { reply }).await
    }

    /// Progression summary for the stats panel.
    pub async fn stats(&self) -> Result<ProgressionStats, RuntimeError> {
        self.request(|reply| Command::Stats { reply }).await
    }

    /// Consecutive days with at least one watch, ending today or yesterday.
    pub async fn watch_streak(&self) -> Result<u32, RuntimeError> {
        Ok(self.stats().await?.watch_streak_days)
    }

    /// Marks a watched video as favorite.
    pub async fn set_favorite(
        &self,
        video_id: impl Into<String>,
        favorite: bool,
    ) -> Result<bool, RuntimeError> {
        let video_id = video_id.into();
        self.request(|reply| Command::SetFavorite {
            video_id,
            favorite,
            reply,
        })
        .await
    }

    /// Subscribes to runtime events on one topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, RuntimeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        Ok(reply_rx.await?)
    }
}
