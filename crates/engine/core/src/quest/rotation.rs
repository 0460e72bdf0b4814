//! Deterministic quest rotation.
//!
//! Selection is a pure function of `(pool, count, seed)`: every machine and
//! every run computes the same subset for the same period. There is no stored
//! randomness to lose or tamper with; a cached [`Rotation`] is only a
//! recomputation shortcut and self-heals whenever the catalog changes.
//!
//! The mixing constants below are the interoperability contract. They are
//! fixture-tested; changing any of them silently re-rolls every user's
//! active quests.

use crate::calendar::{DayStamp, Scope, WeekKey};
use crate::quest::template::QuestTemplate;

/// 32-bit avalanche mix over `(seed, n)` where `n` is `pool_index + 1`.
///
/// Golden-ratio index stepping followed by a xor-shift-multiply finalizer.
/// Not cryptographic; determinism and bit dispersion are the only
/// requirements.
pub fn mix32(seed: u32, n: u32) -> u32 {
    let mut x = seed.wrapping_add(n.wrapping_mul(0x9E37_79B9));
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EB_CA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2_AE35);
    x ^= x >> 16;
    x
}

/// FNV-1a 32-bit string hash, used to derive weekly rotation seeds.
pub fn fnv1a32(s: &str) -> u32 {
    let mut hash: u32 = 0x811C_9DC5;
    for byte in s.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Seed for the daily rotation: the trusted day's ordinal number.
pub fn daily_seed(day: DayStamp) -> u32 {
    day.ordinal() as u32
}

/// Seed for the weekly rotation: FNV-1a over the ISO week key.
pub fn weekly_seed(week: WeekKey) -> u32 {
    fnv1a32(&week.to_string())
}

/// Picks `count` template ids from `pool`, ordered by mixed key.
///
/// Ties (identical mixed keys) break on the original pool index, so the
/// result is fully deterministic even under hash collisions.
pub fn select(pool: &[QuestTemplate], count: usize, seed: u32) -> Vec<&'static str> {
    let mut keyed: Vec<(u32, usize)> = pool
        .iter()
        .enumerate()
        .map(|(index, _)| (mix32(seed, index as u32 + 1), index))
        .collect();
    keyed.sort_unstable();
    keyed
        .into_iter()
        .take(count)
        .map(|(_, index)| pool[index].id)
        .collect()
}

/// Cached rotation for one period.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rotation {
    pub scope: Scope,
    pub period_key: String,
    pub selected: Vec<String>,
}

impl Rotation {
    /// Computes the rotation for the period containing `day`.
    pub fn compute(scope: Scope, day: DayStamp, pool: &[QuestTemplate], count: usize) -> Self {
        let seed = match scope {
            Scope::Daily => daily_seed(day),
            Scope::Weekly => weekly_seed(day.week_key()),
        };
        Self {
            scope,
            period_key: day.period_key(scope),
            selected: select(pool, count, seed)
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Whether this cached rotation is still usable for `day` against the
    /// current catalog. Stale periods, count changes, and ids that no
    /// longer exist in the pool all invalidate it.
    pub fn is_valid_for(&self, day: DayStamp, pool: &[QuestTemplate], count: usize) -> bool {
        self.period_key == day.period_key(self.scope)
            && self.selected.len() == count.min(pool.len())
            && self
                .selected
                .iter()
                .all(|id| pool.iter().any(|t| t.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::template::{QuestMetric, Unit};
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> DayStamp {
        DayStamp::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn pool(n: usize) -> Vec<QuestTemplate> {
        const IDS: [&str; 16] = [
            "q00", "q01", "q02", "q03", "q04", "q05", "q06", "q07", "q08", "q09", "q10", "q11",
            "q12", "q13", "q14", "q15",
        ];
        IDS[..n]
            .iter()
            .map(|id| QuestTemplate {
                id,
                metric: QuestMetric::DailyWatchSeconds,
                target: 60,
                reward_xp: 100,
                unit: Unit::Seconds,
            })
            .collect()
    }

    #[test]
    fn mix_values_are_frozen() {
        // Interoperability fixtures: any port must reproduce these exactly.
        assert_eq!(mix32(19999, 1), 1_004_430_586);
        assert_eq!(mix32(19999, 5), 196_450_705);
        assert_eq!(mix32(19999, 15), 584_189_999);
    }

    #[test]
    fn fnv_week_hash_is_frozen() {
        assert_eq!(fnv1a32("2026-W34"), 2_265_871_848);
        assert_eq!(fnv1a32("2025-W01"), 588_730_997);
    }

    #[test]
    fn selection_fixture_seed_19999() {
        // Pool of 15, count 5: ascending mixed-key order picks indices
        // 4, 14, 0, 9, 11.
        let selected = select(&pool(15), 5, 19999);
        assert_eq!(selected, vec!["q04", "q14", "q00", "q09", "q11"]);
    }

    #[test]
    fn selection_is_deterministic() {
        let p = pool(15);
        let first = select(&p, 5, 77);
        for _ in 0..100 {
            assert_eq!(select(&p, 5, 77), first);
        }
    }

    #[test]
    fn distinct_seeds_rotate_the_selection() {
        let p = pool(15);
        let a = select(&p, 5, 20688);
        let b = select(&p, 5, 20689);
        assert_ne!(a, b);
    }

    #[test]
    fn count_larger_than_pool_returns_whole_pool() {
        let p = pool(3);
        let selected = select(&p, 5, 1);
        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn compute_uses_the_day_ordinal_for_daily_scope() {
        let p = pool(15);
        let rotation = Rotation::compute(Scope::Daily, day(2026, 8, 23), &p, 5);
        assert_eq!(rotation.period_key, "2026-08-23");
        // Ordinal of 2026-08-23 is 20688.
        let expected: Vec<String> = select(&p, 5, 20688)
            .into_iter()
            .map(str::to_owned)
            .collect();
        assert_eq!(rotation.selected, expected);
    }

    #[test]
    fn compute_is_stable_across_a_week_for_weekly_scope() {
        let p = pool(16);
        let monday = Rotation::compute(Scope::Weekly, day(2026, 8, 17), &p, 4);
        let sunday = Rotation::compute(Scope::Weekly, day(2026, 8, 23), &p, 4);
        assert_eq!(monday, sunday);
        assert_eq!(monday.period_key, "2026-W34");
    }

    #[test]
    fn cache_invalidation_rules() {
        let p = pool(15);
        let today = day(2026, 8, 23);
        let rotation = Rotation::compute(Scope::Daily, today, &p, 5);

        assert!(rotation.is_valid_for(today, &p, 5));
        // Next day: stale period.
        assert!(!rotation.is_valid_for(day(2026, 8, 24), &p, 5));
        // Count change.
        assert!(!rotation.is_valid_for(today, &p, 4));
        // Template removed from the catalog.
        let shrunk = pool(4);
        assert!(!rotation.is_valid_for(today, &shrunk, 5));
    }
}
