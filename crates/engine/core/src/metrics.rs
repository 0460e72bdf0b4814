//! Per-day watch counters and their week-scoped aggregations.
//!
//! The playback collaborator credits a session in small partial increments
//! every few seconds, so [`MetricsBook::record_session`] must be additive and
//! safe to call repeatedly for the same logical session. Negative inputs from
//! a buggy upstream are clamped to zero before use, never propagated.

use std::collections::BTreeMap;

use crate::calendar::{DayStamp, WeekKey};

/// Counters accumulated for one calendar day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DailyMetrics {
    /// Total eligible seconds credited this day.
    pub watched_seconds: u64,

    /// Longest single credit passed in one `record_session` call.
    pub best_session_seconds: u64,

    /// Number of credited sessions during which at least one effect was on.
    pub effect_sessions: u64,
}

/// Day-keyed metric store with week-scoped read operations.
///
/// Days are created on first write. Old days are dropped by
/// [`MetricsBook::prune_before`] during rollover; growth is otherwise
/// unbounded by design.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsBook {
    days: BTreeMap<DayStamp, DailyMetrics>,
}

impl MetricsBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `eligible_seconds` of watching to `day`.
    ///
    /// Adds to the day total, raises the best-session watermark, and counts
    /// one effect session when `effects_active` is set.
    pub fn record_session(&mut self, day: DayStamp, eligible_seconds: i64, effects_active: bool) {
        let seconds = eligible_seconds.max(0) as u64;
        let entry = self.days.entry(day).or_default();
        entry.watched_seconds = entry.watched_seconds.saturating_add(seconds);
        entry.best_session_seconds = entry.best_session_seconds.max(seconds);
        if effects_active {
            entry.effect_sessions = entry.effect_sessions.saturating_add(1);
        }
    }

    pub fn watched_seconds_for_day(&self, day: DayStamp) -> u64 {
        self.day(day).watched_seconds
    }

    pub fn best_session_seconds_for_day(&self, day: DayStamp) -> u64 {
        self.day(day).best_session_seconds
    }

    pub fn effect_sessions_for_day(&self, day: DayStamp) -> u64 {
        self.day(day).effect_sessions
    }

    /// Sum of watched seconds across the ISO week containing `anchor`.
    pub fn watched_seconds_for_week(&self, anchor: DayStamp) -> u64 {
        self.fold_week(anchor.week_key(), 0, |acc, m| {
            acc.saturating_add(m.watched_seconds)
        })
    }

    /// Best single session across the ISO week containing `anchor`.
    pub fn best_session_seconds_for_week(&self, anchor: DayStamp) -> u64 {
        self.fold_week(anchor.week_key(), 0, |acc, m| {
            acc.max(m.best_session_seconds)
        })
    }

    /// Total effect sessions across the ISO week containing `anchor`.
    pub fn effect_sessions_for_week(&self, anchor: DayStamp) -> u64 {
        self.fold_week(anchor.week_key(), 0, |acc, m| {
            acc.saturating_add(m.effect_sessions)
        })
    }

    /// Drops every day strictly older than `cutoff`. Returns the number of
    /// days removed.
    pub fn prune_before(&mut self, cutoff: DayStamp) -> usize {
        let keep = self.days.split_off(&cutoff);
        let removed = self.days.len();
        self.days = keep;
        removed
    }

    /// Number of days currently tracked.
    pub fn tracked_days(&self) -> usize {
        self.days.len()
    }

    fn day(&self, day: DayStamp) -> DailyMetrics {
        self.days.get(&day).copied().unwrap_or_default()
    }

    fn fold_week(&self, week: WeekKey, init: u64, f: impl Fn(u64, &DailyMetrics) -> u64) -> u64 {
        week.days()
            .filter_map(|d| self.days.get(&d))
            .fold(init, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> DayStamp {
        DayStamp::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn partial_credits_accumulate_and_best_session_is_a_max() {
        let mut book = MetricsBook::new();
        let d = day(2026, 8, 23);

        book.record_session(d, 1800, false);
        book.record_session(d, 900, false);

        assert_eq!(book.watched_seconds_for_day(d), 2700);
        assert_eq!(book.best_session_seconds_for_day(d), 1800);
    }

    #[test]
    fn negative_seconds_are_clamped_to_zero() {
        let mut book = MetricsBook::new();
        let d = day(2026, 8, 23);

        book.record_session(d, -500, true);

        assert_eq!(book.watched_seconds_for_day(d), 0);
        assert_eq!(book.best_session_seconds_for_day(d), 0);
        // The session itself still counts as an effect session.
        assert_eq!(book.effect_sessions_for_day(d), 1);
    }

    #[test]
    fn week_reads_cover_only_the_iso_week() {
        let mut book = MetricsBook::new();
        // 2026-08-17 (Mon) .. 2026-08-23 (Sun) form ISO week 2026-W34.
        book.record_session(day(2026, 8, 17), 600, true);
        book.record_session(day(2026, 8, 23), 900, false);
        // Monday of the next week must not leak in.
        book.record_session(day(2026, 8, 24), 5000, true);

        let anchor = day(2026, 8, 20);
        assert_eq!(book.watched_seconds_for_week(anchor), 1500);
        assert_eq!(book.best_session_seconds_for_week(anchor), 900);
        assert_eq!(book.effect_sessions_for_week(anchor), 1);
    }

    #[test]
    fn week_reads_respect_iso_week_year_at_the_year_boundary() {
        let mut book = MetricsBook::new();
        // Both days belong to ISO week 2026-W01 despite different years.
        book.record_session(day(2025, 12, 29), 100, false);
        book.record_session(day(2026, 1, 1), 200, false);

        assert_eq!(book.watched_seconds_for_week(day(2026, 1, 1)), 300);
        assert_eq!(book.watched_seconds_for_week(day(2025, 12, 29)), 300);
    }

    #[test]
    fn prune_drops_only_days_before_the_cutoff() {
        let mut book = MetricsBook::new();
        book.record_session(day(2026, 8, 1), 10, false);
        book.record_session(day(2026, 8, 10), 20, false);
        book.record_session(day(2026, 8, 23), 30, false);

        let removed = book.prune_before(day(2026, 8, 10));

        assert_eq!(removed, 1);
        assert_eq!(book.watched_seconds_for_day(day(2026, 8, 1)), 0);
        assert_eq!(book.watched_seconds_for_day(day(2026, 8, 10)), 20);
        assert_eq!(book.watched_seconds_for_day(day(2026, 8, 23)), 30);
    }

    #[test]
    fn reads_on_untracked_days_are_zero() {
        let book = MetricsBook::new();
        assert_eq!(book.watched_seconds_for_day(day(2026, 1, 1)), 0);
        assert_eq!(book.watched_seconds_for_week(day(2026, 1, 1)), 0);
    }
}
