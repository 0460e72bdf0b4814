//! The quest catalog: 15 daily and 16 weekly templates.
//!
//! Ordering is load-bearing. The pool index is the tie-break input to the
//! rotation selector, so existing entries must never be reordered or
//! removed — append only. Removing an entry is survivable (cached rotations
//! self-heal) but re-rolls active quests for everyone mid-period.

use engine_core::quest::template::{QuestMetric, QuestTemplate, Unit};

macro_rules! quest {
    ($id:literal, $metric:ident, $target:expr, $xp:expr, $unit:ident) => {
        QuestTemplate {
            id: $id,
            metric: QuestMetric::$metric,
            target: $target,
            reward_xp: $xp,
            unit: Unit::$unit,
        }
    };
}

/// Daily pool. Five of these are active each day.
pub const DAILY_QUESTS: [QuestTemplate; 15] = [
    quest!("daily_watch_15m", DailyWatchSeconds, 900, 120, Seconds),
    quest!("daily_watch_30m", DailyWatchSeconds, 1800, 200, Seconds),
    quest!("daily_watch_60m", DailyWatchSeconds, 3600, 320, Seconds),
    quest!("daily_watch_120m", DailyWatchSeconds, 7200, 520, Seconds),
    quest!("daily_session_10m", DailyBestSessionSeconds, 600, 150, Seconds),
    quest!("daily_session_20m", DailyBestSessionSeconds, 1200, 240, Seconds),
    quest!("daily_session_45m", DailyBestSessionSeconds, 2700, 400, Seconds),
    quest!("daily_streams_2", DailyStreamsOpened, 2, 130, Count),
    quest!("daily_streams_4", DailyStreamsOpened, 4, 220, Count),
    quest!("daily_streams_6", DailyStreamsOpened, 6, 330, Count),
    quest!("daily_effects_1", DailyEffectSessions, 1, 110, Count),
    quest!("daily_effects_3", DailyEffectSessions, 3, 210, Count),
    quest!("daily_effects_5", DailyEffectSessions, 5, 340, Count),
    quest!("daily_watch_5m", DailyWatchSeconds, 300, 60, Seconds),
    quest!("daily_session_30m", DailyBestSessionSeconds, 1800, 300, Seconds),
];

/// Weekly pool. Four of these are active each ISO week.
pub const WEEKLY_QUESTS: [QuestTemplate; 16] = [
    quest!("weekly_watch_2h", WeeklyWatchSeconds, 7200, 400, Seconds),
    quest!("weekly_watch_5h", WeeklyWatchSeconds, 18000, 700, Seconds),
    quest!("weekly_watch_10h", WeeklyWatchSeconds, 36000, 1100, Seconds),
    quest!("weekly_watch_20h", WeeklyWatchSeconds, 72000, 1700, Seconds),
    quest!("weekly_session_30m", WeeklyBestSessionSeconds, 1800, 450, Seconds),
    quest!("weekly_session_60m", WeeklyBestSessionSeconds, 3600, 700, Seconds),
    quest!("weekly_session_90m", WeeklyBestSessionSeconds, 5400, 950, Seconds),
    quest!("weekly_streams_8", WeeklyStreamsOpened, 8, 500, Count),
    quest!("weekly_streams_15", WeeklyStreamsOpened, 15, 750, Count),
    quest!("weekly_streams_25", WeeklyStreamsOpened, 25, 1050, Count),
    quest!("weekly_effects_5", WeeklyEffectSessions, 5, 480, Count),
    quest!("weekly_effects_10", WeeklyEffectSessions, 10, 720, Count),
    quest!("weekly_effects_20", WeeklyEffectSessions, 20, 1000, Count),
    quest!("weekly_days_3", WeeklyActiveDays, 3, 550, Count),
    quest!("weekly_days_5", WeeklyActiveDays, 5, 850, Count),
    quest!("weekly_days_7", WeeklyActiveDays, 7, 1200, Count),
];
