//! Typed events published by the runtime workers.

use serde::{Deserialize, Serialize};

/// Quest lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum QuestEvent {
    /// A quest instance was claimed and rewarded.
    Claimed { claim_key: String, xp_awarded: u64 },

    /// A day or week boundary was crossed; rotations were refreshed and
    /// stale claims pruned.
    RotationRefreshed {
        day: String,
        week_key: String,
        pruned_claims: usize,
    },
}

/// Progression events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProgressionEvent {
    /// A watch credit was recorded. Fires for every credit so listeners
    /// (the persistence flusher in particular) see plain telemetry, not
    /// just claims and unlocks.
    TelemetryCredited { eligible_seconds: u64 },
    XpAwarded { amount: u64, total_xp: u64 },
    LeveledUp { level: u32 },
    Prestiged { count: u32 },
    AchievementUnlocked { id: String },
}

/// Trusted clock events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClockEvent {
    /// A sync round succeeded against `endpoint`.
    Synced {
        endpoint: String,
        /// Signed difference between trusted and device time, in seconds.
        skew_seconds: i64,
    },

    /// Every endpoint failed this round; the previous anchor stays in place.
    SyncFailed { endpoints_tried: usize },
}
