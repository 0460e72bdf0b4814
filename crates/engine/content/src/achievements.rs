//! Milestone achievement definitions.
//!
//! Pure data: `(metric, threshold)` pairs evaluated against the engine's
//! lifetime counters. Append new milestones at the end; ids are permanent
//! once shipped because unlocks are persisted by id.

use engine_core::achievements::{AchievementDef, AchievementMetric};

macro_rules! milestone {
    ($id:literal, $metric:ident, $threshold:expr) => {
        AchievementDef {
            id: $id,
            metric: AchievementMetric::$metric,
            threshold: $threshold,
        }
    };
}

pub const ACHIEVEMENTS: [AchievementDef; 18] = [
    milestone!("watch_first_hour", LifetimeWatchSeconds, 3_600),
    milestone!("watch_ten_hours", LifetimeWatchSeconds, 36_000),
    milestone!("watch_hundred_hours", LifetimeWatchSeconds, 360_000),
    milestone!("watch_thousand_hours", LifetimeWatchSeconds, 3_600_000),
    milestone!("streams_ten", LifetimeStreamsOpened, 10),
    milestone!("streams_hundred", LifetimeStreamsOpened, 100),
    milestone!("streams_thousand", LifetimeStreamsOpened, 1_000),
    milestone!("effects_first", LifetimeEffectSessions, 1),
    milestone!("effects_fifty", LifetimeEffectSessions, 50),
    milestone!("effects_five_hundred", LifetimeEffectSessions, 500),
    milestone!("quests_first", QuestsClaimed, 1),
    milestone!("quests_twenty_five", QuestsClaimed, 25),
    milestone!("quests_two_hundred", QuestsClaimed, 200),
    milestone!("streak_week", WatchStreakDays, 7),
    milestone!("streak_month", WatchStreakDays, 30),
    milestone!("xp_ten_thousand", LifetimeXp, 10_000),
    milestone!("xp_hundred_thousand", LifetimeXp, 100_000),
    milestone!("prestige_first", PrestigeCount, 1),
];
