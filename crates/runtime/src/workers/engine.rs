//! Engine worker: single owner of the [`ProgressionEngine`].
//!
//! All mutation funnels through one mpsc channel, so the engine needs no
//! locking and every command observes a consistent state. Replies go back
//! over oneshot channels; a dropped receiver just means the caller stopped
//! waiting.

use engine_core::{
    ClaimGrant, EngineSnapshot, PrestigeError, ProgressionEngine, QuestState, RecordOutcome,
    Scope, WatchEvent,
};
use tokio::sync::{mpsc, oneshot};

use crate::clock::TrustedClock;
use crate::events::{Event, EventBus, ProgressionEvent, QuestEvent};

/// Read-only progression summary for UI surfaces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgressionStats {
    pub level: u32,
    pub total_xp: u64,
    pub xp_to_next_level: u64,
    pub prestige: u32,
    pub watch_streak_days: u32,
    pub unlocked_achievements: usize,
}

/// Commands accepted by the engine worker.
pub enum Command {
    RecordWatch {
        event: WatchEvent,
        reply: oneshot::Sender<RecordOutcome>,
    },
    ActiveQuests {
        scope: Scope,
        reply: oneshot::Sender<Vec<QuestState>>,
    },
    Claim {
        claim_key: String,
        reply: oneshot::Sender<Option<ClaimGrant>>,
    },
    Prestige {
        reply: oneshot::Sender<Result<u32, PrestigeError>>,
    },
    Stats {
        reply: oneshot::Sender<ProgressionStats>,
    },
    SetFavorite {
        video_id: String,
        favorite: bool,
        reply: oneshot::Sender<bool>,
    },
    /// Periodic nudge from the rollover worker. No reply; boundary
    /// crossings surface as events.
    RolloverTick,
    Snapshot {
        reply: oneshot::Sender<EngineSnapshot>,
    },
}

pub struct EngineWorker {
    engine: ProgressionEngine,
    clock: TrustedClock,
    event_bus: EventBus,
    command_rx: mpsc::Receiver<Command>,
}

impl EngineWorker {
    pub fn new(
        engine: ProgressionEngine,
        clock: TrustedClock,
        event_bus: EventBus,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        Self {
            engine,
            clock,
            event_bus,
            command_rx,
        }
    }

    /// Drains commands until every handle is dropped, then returns the
    /// final snapshot for the shutdown flush.
    pub async fn run(mut self) -> EngineSnapshot {
        tracing::info!(target: "runtime::engine", "engine worker started");

        while let Some(command) = self.command_rx.recv().await {
            self.handle(command);
        }

        tracing::info!(target: "runtime::engine", "engine worker stopping");
        self.engine.snapshot()
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::RecordWatch { event, reply } => {
                let today = self.clock.today();
                let eligible_seconds = event.eligible_seconds.max(0) as u64;
                let outcome = self.engine.record_watch(&event, today);
                // Every credit mutates state, so every credit must reach
                // the persistence flusher.
                self.event_bus
                    .publish(Event::Progression(ProgressionEvent::TelemetryCredited {
                        eligible_seconds,
                    }));
                self.publish_unlocks(&outcome.unlocked);
                let _ = reply.send(outcome);
            }
            Command::ActiveQuests { scope, reply } => {
                let today = self.clock.today();
                let _ = reply.send(self.engine.active_quests(scope, today));
            }
            Command::Claim { claim_key, reply } => {
                let today = self.clock.today();
                let grant = self.engine.try_claim(&claim_key, today);
                if let Some(grant) = &grant {
                    self.publish_claim(grant);
                }
                let _ = reply.send(grant);
            }
            Command::Prestige { reply } => {
                let result = self.engine.prestige();
                if let Ok(count) = result {
                    tracing::info!(target: "runtime::engine", prestige = count, "prestige started");
                    self.event_bus
                        .publish(Event::Progression(ProgressionEvent::Prestiged { count }));
                }
                let _ = reply.send(result);
            }
            Command::Stats { reply } => {
                let _ = reply.send(ProgressionStats {
                    level: self.engine.level(),
                    total_xp: self.engine.total_xp(),
                    xp_to_next_level: self.engine.xp_to_next_level(),
                    prestige: self.engine.prestige_count(),
                    watch_streak_days: self.engine.watch_streak_days(),
                    unlocked_achievements: self.engine.unlocked_achievements(),
                });
            }
            Command::SetFavorite {
                video_id,
                favorite,
                reply,
            } => {
                let _ = reply.send(self.engine.set_favorite(&video_id, favorite));
            }
            Command::RolloverTick => {
                let today = self.clock.today();
                let outcome = self.engine.rollover(today);
                if outcome.changed {
                    let week_key = today.week_key().to_string();
                    tracing::info!(
                        target: "runtime::engine",
                        day = %today,
                        week = %week_key,
                        pruned_claims = outcome.pruned_claims,
                        pruned_metric_days = outcome.pruned_metric_days,
                        "period rollover"
                    );
                    self.event_bus
                        .publish(Event::Quest(QuestEvent::RotationRefreshed {
                            day: today.to_string(),
                            week_key,
                            pruned_claims: outcome.pruned_claims,
                        }));
                }
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.engine.snapshot());
            }
        }
    }

    fn publish_claim(&self, grant: &ClaimGrant) {
        tracing::info!(
            target: "runtime::engine",
            claim_key = %grant.claim_key,
            xp = grant.xp_awarded,
            "quest claimed"
        );
        self.event_bus.publish(Event::Quest(QuestEvent::Claimed {
            claim_key: grant.claim_key.clone(),
            xp_awarded: grant.xp_awarded,
        }));
        self.event_bus
            .publish(Event::Progression(ProgressionEvent::XpAwarded {
                amount: grant.xp_awarded,
                total_xp: self.engine.total_xp(),
            }));
        if grant.leveled_up() {
            self.event_bus
                .publish(Event::Progression(ProgressionEvent::LeveledUp {
                    level: grant.level_after,
                }));
        }
        self.publish_unlocks(&grant.unlocked);
    }

    fn publish_unlocks(&self, unlocked: &[&'static str]) {
        for id in unlocked {
            tracing::info!(target: "runtime::engine", achievement = id, "achievement unlocked");
            self.event_bus
                .publish(Event::Progression(ProgressionEvent::AchievementUnlocked {
                    id: (*id).to_owned(),
                }));
        }
    }
}
