//! Persisted engine state.
//!
//! The snapshot is the unit of persistence: everything the engine must
//! round-trip lives here. `Default` is a valid empty state, so the engine is
//! always constructible even when loading fails.

use crate::achievements::{AchievementBook, LifetimeCounters};
use crate::calendar::DayStamp;
use crate::history::WatchHistory;
use crate::metrics::MetricsBook;
use crate::progression::ProgressionState;
use crate::quest::claim::ClaimLedger;
use crate::quest::rotation::Rotation;

/// Cached rotations per scope. Purely a recomputation shortcut; invalid
/// entries are recomputed from the catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RotationCache {
    pub daily: Option<Rotation>,
    pub weekly: Option<Rotation>,
}

/// Last period boundaries the rollover monitor has seen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RolloverMarkers {
    pub last_day: Option<DayStamp>,
    pub last_week_key: Option<String>,
}

/// Complete persisted state of the progression engine.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineSnapshot {
    pub metrics: MetricsBook,
    pub history: WatchHistory,
    pub claims: ClaimLedger,
    pub progression: ProgressionState,
    pub counters: LifetimeCounters,
    pub achievements: AchievementBook,
    pub rotations: RotationCache,
    pub markers: RolloverMarkers,
}
