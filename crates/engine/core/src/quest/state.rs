//! Read-only quest state resolution.

use crate::calendar::DayStamp;
use crate::history::WatchHistory;
use crate::metrics::MetricsBook;
use crate::quest::claim::{ClaimKey, ClaimLedger};
use crate::quest::rotation::Rotation;
use crate::quest::template::{QuestMetric, QuestTemplate, Unit};

/// One active quest as presented to the host layer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestState {
    pub template_id: String,
    pub claim_key: String,
    pub progress: u64,
    pub target: u64,
    pub reward_xp: u64,
    pub unit: Unit,
    pub completed: bool,
    pub claimed: bool,
}

/// Evaluates a metric selector against the aggregators for `day`.
pub fn metric_value(
    metric: QuestMetric,
    day: DayStamp,
    metrics: &MetricsBook,
    history: &WatchHistory,
) -> u64 {
    match metric {
        QuestMetric::DailyWatchSeconds => metrics.watched_seconds_for_day(day),
        QuestMetric::DailyBestSessionSeconds => metrics.best_session_seconds_for_day(day),
        QuestMetric::DailyEffectSessions => metrics.effect_sessions_for_day(day),
        QuestMetric::DailyStreamsOpened => history.distinct_streams_for_day(day),
        QuestMetric::WeeklyWatchSeconds => metrics.watched_seconds_for_week(day),
        QuestMetric::WeeklyBestSessionSeconds => metrics.best_session_seconds_for_week(day),
        QuestMetric::WeeklyEffectSessions => metrics.effect_sessions_for_week(day),
        QuestMetric::WeeklyStreamsOpened => history.distinct_streams_for_week(day),
        QuestMetric::WeeklyActiveDays => history.active_days_for_week(day),
    }
}

/// Builds the active quest list for a rotation. Pure; never mutates the
/// ledger. Selected ids missing from the pool (stale rotation after a
/// catalog change) are dropped silently.
pub fn resolve(
    rotation: &Rotation,
    pool: &[QuestTemplate],
    day: DayStamp,
    metrics: &MetricsBook,
    history: &WatchHistory,
    ledger: &ClaimLedger,
) -> Vec<QuestState> {
    rotation
        .selected
        .iter()
        .filter_map(|id| pool.iter().find(|t| t.id == id.as_str()))
        .map(|template| {
            let claim_key =
                ClaimKey::new(rotation.scope, rotation.period_key.clone(), template.id).to_string();
            let progress = metric_value(template.metric, day, metrics, history);
            QuestState {
                template_id: template.id.to_owned(),
                claim_key: claim_key.clone(),
                progress,
                target: template.target,
                reward_xp: template.reward_xp,
                unit: template.unit,
                completed: progress >= template.target,
                claimed: ledger.contains(&claim_key),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Scope;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> DayStamp {
        DayStamp::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn pool() -> Vec<QuestTemplate> {
        vec![
            QuestTemplate {
                id: "watch_30m",
                metric: QuestMetric::DailyWatchSeconds,
                target: 1800,
                reward_xp: 200,
                unit: Unit::Seconds,
            },
            QuestTemplate {
                id: "streams_2",
                metric: QuestMetric::DailyStreamsOpened,
                target: 2,
                reward_xp: 130,
                unit: Unit::Count,
            },
        ]
    }

    #[test]
    fn progress_completion_and_claimed_flags() {
        let d = day(2026, 8, 23);
        let mut metrics = MetricsBook::new();
        metrics.record_session(d, 2000, false);
        let mut history = WatchHistory::new();
        history.record_watch(
            "vid-a",
            chrono::DateTime::from_timestamp(1_787_000_000, 0).unwrap(),
            d,
            0,
        );
        let mut ledger = ClaimLedger::new();
        ledger.insert(&ClaimKey::new(Scope::Daily, "2026-08-23", "watch_30m"));

        let rotation = Rotation {
            scope: Scope::Daily,
            period_key: "2026-08-23".to_owned(),
            selected: vec!["watch_30m".to_owned(), "streams_2".to_owned()],
        };

        let states = resolve(&rotation, &pool(), d, &metrics, &history, &ledger);
        assert_eq!(states.len(), 2);

        let watch = &states[0];
        assert_eq!(watch.claim_key, "daily:2026-08-23:watch_30m");
        assert_eq!(watch.progress, 2000);
        assert!(watch.completed);
        assert!(watch.claimed);

        let streams = &states[1];
        assert_eq!(streams.progress, 1);
        assert!(!streams.completed);
        assert!(!streams.claimed);
    }

    #[test]
    fn unknown_template_ids_are_dropped_not_fatal() {
        let d = day(2026, 8, 23);
        let rotation = Rotation {
            scope: Scope::Daily,
            period_key: "2026-08-23".to_owned(),
            selected: vec!["removed_in_update".to_owned(), "watch_30m".to_owned()],
        };

        let states = resolve(
            &rotation,
            &pool(),
            d,
            &MetricsBook::new(),
            &WatchHistory::new(),
            &ClaimLedger::new(),
        );

        assert_eq!(states.len(), 1);
        assert_eq!(states[0].template_id, "watch_30m");
    }
}
