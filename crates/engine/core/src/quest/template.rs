//! Static quest template definitions.

use strum::{Display, EnumIter};

use crate::calendar::Scope;

/// Display unit of a quest target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    Seconds,
    Count,
}

/// Metric selector: which aggregator query feeds a quest's progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuestMetric {
    DailyWatchSeconds,
    DailyBestSessionSeconds,
    DailyEffectSessions,
    DailyStreamsOpened,
    WeeklyWatchSeconds,
    WeeklyBestSessionSeconds,
    WeeklyEffectSessions,
    WeeklyStreamsOpened,
    WeeklyActiveDays,
}

impl QuestMetric {
    /// Scope this metric aggregates over.
    pub const fn scope(&self) -> Scope {
        match self {
            Self::DailyWatchSeconds
            | Self::DailyBestSessionSeconds
            | Self::DailyEffectSessions
            | Self::DailyStreamsOpened => Scope::Daily,
            Self::WeeklyWatchSeconds
            | Self::WeeklyBestSessionSeconds
            | Self::WeeklyEffectSessions
            | Self::WeeklyStreamsOpened
            | Self::WeeklyActiveDays => Scope::Weekly,
        }
    }
}

/// Immutable, compiled-in quest definition.
///
/// Pool ordering matters: the original pool index is the tie-break input to
/// the rotation selector, so pools may only ever be appended to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuestTemplate {
    /// Stable identifier, unique within both pools.
    pub id: &'static str,
    pub metric: QuestMetric,
    pub target: u64,
    pub reward_xp: u64,
    pub unit: Unit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn metric_scopes_partition_the_nine_variants() {
        let daily = QuestMetric::iter()
            .filter(|m| m.scope() == Scope::Daily)
            .count();
        let weekly = QuestMetric::iter()
            .filter(|m| m.scope() == Scope::Weekly)
            .count();
        assert_eq!(daily, 4);
        assert_eq!(weekly, 5);
    }
}
