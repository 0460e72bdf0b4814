//! Cumulative XP, levels, and prestige.
//!
//! Level is never stored: it is always recomputed from the XP accumulated in
//! the current prestige cycle. `total_xp` is a lifetime counter that keeps
//! growing across prestiges and is used for milestone achievements.

use crate::config::EngineConfig;

/// XP required to advance from `level` to `level + 1`.
///
/// Curve: `80 + round(1.2n + 0.015n²)` with `n = level - 1`. Monotonically
/// increasing, so the prefix sums below are strictly ordered.
pub fn xp_to_reach_next_level(level: u32) -> u64 {
    let n = f64::from(level.saturating_sub(1));
    80 + (1.2 * n + 0.015 * n * n).round() as u64
}

/// Total XP within a prestige cycle required to *reach* `level`.
///
/// Level 1 requires 0 XP.
pub fn total_xp_for_level(level: u32) -> u64 {
    (1..level.min(EngineConfig::MAX_LEVEL)).map(xp_to_reach_next_level).sum()
}

/// XP required to complete a whole prestige cycle (reach the max level).
pub fn xp_cap_for_max_level() -> u64 {
    total_xp_for_level(EngineConfig::MAX_LEVEL)
}

/// Level derived from cycle XP, capped at [`EngineConfig::MAX_LEVEL`].
pub fn level_from_xp(xp: u64) -> u32 {
    let mut level = 1;
    let mut required = 0u64;
    while level < EngineConfig::MAX_LEVEL {
        required += xp_to_reach_next_level(level);
        if required > xp {
            break;
        }
        level += 1;
    }
    level
}

/// Result of a successful XP grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XpAward {
    pub amount: u64,
    pub level_before: u32,
    pub level_after: u32,
}

impl XpAward {
    pub const fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

/// Error returned when a prestige attempt is not permitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PrestigeError {
    #[error("prestige requires max level, current level is {level}")]
    NotAtMaxLevel { level: u32 },

    #[error("prestige count is already at the cap")]
    CapReached,
}

/// Persistent progression counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressionState {
    /// Lifetime XP, monotonically non-decreasing.
    pub total_xp: u64,

    /// Completed prestige cycles, `0..=MAX_PRESTIGE`.
    pub prestige: u32,

    /// XP inside the current prestige cycle, clamped to the max-level cap.
    pub prestige_xp: u64,
}

impl ProgressionState {
    pub fn level(&self) -> u32 {
        level_from_xp(self.prestige_xp)
    }

    /// XP still missing to the next level; zero at the max level.
    pub fn xp_to_next_level(&self) -> u64 {
        let level = self.level();
        if level >= EngineConfig::MAX_LEVEL {
            return 0;
        }
        total_xp_for_level(level + 1).saturating_sub(self.prestige_xp)
    }

    /// Grants XP. Amounts `<= 0` are a no-op and return `None`.
    ///
    /// Lifetime XP grows unconditionally; cycle XP is clamped to the
    /// max-level cap, so excess XP never raises the level past the cap.
    pub fn add_xp(&mut self, amount: i64) -> Option<XpAward> {
        if amount <= 0 {
            return None;
        }
        let amount = amount as u64;
        let level_before = self.level();
        self.total_xp = self.total_xp.saturating_add(amount);
        self.prestige_xp = self
            .prestige_xp
            .saturating_add(amount)
            .min(xp_cap_for_max_level());
        Some(XpAward {
            amount,
            level_before,
            level_after: self.level(),
        })
    }

    /// Starts a new prestige cycle.
    ///
    /// Only permitted at the max level while below the prestige cap. Resets
    /// cycle XP, never lifetime XP.
    pub fn prestige(&mut self) -> Result<u32, PrestigeError> {
        let level = self.level();
        if level < EngineConfig::MAX_LEVEL {
            return Err(PrestigeError::NotAtMaxLevel { level });
        }
        if self.prestige >= EngineConfig::MAX_PRESTIGE {
            return Err(PrestigeError::CapReached);
        }
        self.prestige += 1;
        self.prestige_xp = 0;
        Ok(self.prestige)
    }
}
