/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Multiplier applied to template reward XP when a quest is claimed.
    /// The granted amount is rounded to the nearest integer.
    pub reward_multiplier: f64,

    /// Days of per-day metrics kept behind the current day. Must cover a
    /// full ISO week plus the partial current one so weekly reads stay
    /// exact; anything older is unreachable by any quest metric.
    pub metrics_retention_days: u32,
}

impl EngineConfig {
    // ===== progression curve bounds =====
    pub const MAX_LEVEL: u32 = 100;
    pub const MAX_PRESTIGE: u32 = 100;

    // ===== rotation sizes =====
    pub const DAILY_QUEST_SLOTS: usize = 5;
    pub const WEEKLY_QUEST_SLOTS: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_REWARD_MULTIPLIER: f64 = 1.40;
    pub const DEFAULT_METRICS_RETENTION_DAYS: u32 = 21;

    pub fn new() -> Self {
        Self {
            reward_multiplier: Self::DEFAULT_REWARD_MULTIPLIER,
            metrics_retention_days: Self::DEFAULT_METRICS_RETENTION_DAYS,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
