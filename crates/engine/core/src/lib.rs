//! Deterministic progression and quest rules shared across the runtime and
//! offline tools.
//!
//! `engine-core` defines the canonical rules: metric aggregation, quest
//! rotation, claim accounting, and the XP/prestige curve. All state mutation
//! flows through [`engine::ProgressionEngine`]; everything else is pure
//! derivation from its snapshot. There is no I/O and no clock in this crate —
//! the runtime supplies trusted days and timestamps.

pub mod achievements;
pub mod calendar;
pub mod config;
pub mod engine;
pub mod history;
pub mod metrics;
pub mod progression;
pub mod quest;
pub mod snapshot;

pub use achievements::{AchievementBook, AchievementDef, AchievementMetric, LifetimeCounters};
pub use calendar::{DayStamp, REFERENCE_TZ_OFFSET_SECS, Scope, WeekKey};
pub use config::EngineConfig;
pub use engine::{
    Catalog, ClaimGrant, ProgressionEngine, RecordOutcome, RolloverOutcome, WatchEvent,
};
pub use history::{VideoHistory, WatchHistory};
pub use metrics::{DailyMetrics, MetricsBook};
pub use progression::{
    PrestigeError, ProgressionState, XpAward, level_from_xp, total_xp_for_level,
    xp_cap_for_max_level, xp_to_reach_next_level,
};
pub use quest::{
    ClaimKey, ClaimKeyError, ClaimLedger, QuestMetric, QuestState, QuestTemplate, Rotation, Unit,
};
pub use snapshot::{EngineSnapshot, RolloverMarkers, RotationCache};
