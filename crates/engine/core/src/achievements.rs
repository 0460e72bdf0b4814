//! Declarative milestone achievements.
//!
//! Lifetime counters live in one extensible metric map instead of a field
//! plus boolean per milestone. Definitions are plain `(metric, threshold)`
//! pairs evaluated against a counters snapshot; unlocks are permanent.

use std::collections::{BTreeMap, BTreeSet};

/// Lifetime counter selectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AchievementMetric {
    LifetimeXp,
    LifetimeWatchSeconds,
    LifetimeEffectSessions,
    LifetimeStreamsOpened,
    QuestsClaimed,
    WatchStreakDays,
    PrestigeCount,
}

/// One compiled-in achievement definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AchievementDef {
    /// Stable identifier, unique across the definition table.
    pub id: &'static str,
    pub metric: AchievementMetric,
    pub threshold: u64,
}

/// Monotone lifetime counters keyed by metric.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LifetimeCounters {
    counters: BTreeMap<AchievementMetric, u64>,
}

impl LifetimeCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: AchievementMetric) -> u64 {
        self.counters.get(&metric).copied().unwrap_or(0)
    }

    /// Adds to a counter, saturating.
    pub fn add(&mut self, metric: AchievementMetric, amount: u64) {
        let entry = self.counters.entry(metric).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Raises a watermark counter to `value` if it is higher.
    pub fn raise_to(&mut self, metric: AchievementMetric, value: u64) {
        let entry = self.counters.entry(metric).or_insert(0);
        *entry = (*entry).max(value);
    }
}

/// Permanent set of unlocked achievement ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AchievementBook {
    unlocked: BTreeSet<String>,
}

impl AchievementBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    /// Evaluates the definition table against the counters and records new
    /// unlocks. Returns the ids unlocked by this call, in table order.
    pub fn evaluate(
        &mut self,
        definitions: &[AchievementDef],
        counters: &LifetimeCounters,
    ) -> Vec<&'static str> {
        let mut newly = Vec::new();
        for def in definitions {
            if counters.get(def.metric) >= def.threshold && self.unlocked.insert(def.id.to_owned())
            {
                newly.push(def.id);
            }
        }
        newly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFS: [AchievementDef; 3] = [
        AchievementDef {
            id: "first_hour",
            metric: AchievementMetric::LifetimeWatchSeconds,
            threshold: 3600,
        },
        AchievementDef {
            id: "ten_quests",
            metric: AchievementMetric::QuestsClaimed,
            threshold: 10,
        },
        AchievementDef {
            id: "week_streak",
            metric: AchievementMetric::WatchStreakDays,
            threshold: 7,
        },
    ];

    #[test]
    fn thresholds_unlock_once_and_stay_unlocked() {
        let mut book = AchievementBook::new();
        let mut counters = LifetimeCounters::new();

        counters.add(AchievementMetric::LifetimeWatchSeconds, 3599);
        assert!(book.evaluate(&DEFS, &counters).is_empty());

        counters.add(AchievementMetric::LifetimeWatchSeconds, 1);
        assert_eq!(book.evaluate(&DEFS, &counters), vec!["first_hour"]);

        // Re-evaluation reports nothing new.
        assert!(book.evaluate(&DEFS, &counters).is_empty());
        assert!(book.is_unlocked("first_hour"));
    }

    #[test]
    fn watermark_counters_never_regress() {
        let mut counters = LifetimeCounters::new();
        counters.raise_to(AchievementMetric::WatchStreakDays, 7);
        counters.raise_to(AchievementMetric::WatchStreakDays, 3);
        assert_eq!(counters.get(AchievementMetric::WatchStreakDays), 7);
    }

    #[test]
    fn multiple_unlocks_report_in_table_order() {
        let mut book = AchievementBook::new();
        let mut counters = LifetimeCounters::new();
        counters.add(AchievementMetric::LifetimeWatchSeconds, 4000);
        counters.add(AchievementMetric::QuestsClaimed, 12);

        assert_eq!(
            book.evaluate(&DEFS, &counters),
            vec!["first_hour", "ten_quests"]
        );
    }
}
