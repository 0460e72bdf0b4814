//! Claim keys and the idempotent claim ledger.
//!
//! A claim key identifies one quest *instance*: `{scope}:{period}:{template}`.
//! Once a key is in the ledger it stays there for the rest of its period and
//! is never rewarded again. Stale-period keys are pruned on rollover to bound
//! growth; pruning must never touch a current-period key.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeSet;

use crate::calendar::Scope;

/// Parsed form of a claim key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimKey {
    pub scope: Scope,
    pub period_key: String,
    pub template_id: String,
}

impl ClaimKey {
    pub fn new(scope: Scope, period_key: impl Into<String>, template_id: impl Into<String>) -> Self {
        Self {
            scope,
            period_key: period_key.into(),
            template_id: template_id.into(),
        }
    }
}

impl fmt::Display for ClaimKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.scope, self.period_key, self.template_id)
    }
}

/// Error returned when a claim key string cannot be parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClaimKeyError {
    #[error("claim key must have three colon-separated parts")]
    Malformed,

    #[error("claim key scope must be \"daily\" or \"weekly\"")]
    UnknownScope,
}

impl FromStr for ClaimKey {
    type Err = ClaimKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(scope), Some(period), Some(template)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(ClaimKeyError::Malformed);
        };
        if period.is_empty() || template.is_empty() {
            return Err(ClaimKeyError::Malformed);
        }
        let scope = scope.parse().map_err(|_| ClaimKeyError::UnknownScope)?;
        Ok(Self::new(scope, period, template))
    }
}

/// Set of claim keys ever rewarded, minus pruned stale periods.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClaimLedger {
    keys: BTreeSet<String>,
}

impl ClaimLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Inserts a key. Returns false if it was already present.
    pub fn insert(&mut self, key: &ClaimKey) -> bool {
        self.keys.insert(key.to_string())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Removes every key whose period is no longer current for its scope.
    ///
    /// Keys that fail to parse are removed as well: they can never be
    /// claimed again and only occupy space. Returns the number removed.
    pub fn prune_stale(&mut self, current_daily: &str, current_weekly: &str) -> usize {
        let before = self.keys.len();
        self.keys.retain(|raw| match raw.parse::<ClaimKey>() {
            Ok(key) => match key.scope {
                Scope::Daily => key.period_key == current_daily,
                Scope::Weekly => key.period_key == current_weekly,
            },
            Err(_) => false,
        });
        before - self.keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips_through_its_string_form() {
        let key = ClaimKey::new(Scope::Daily, "2026-08-23", "daily_watch_30m");
        let rendered = key.to_string();
        assert_eq!(rendered, "daily:2026-08-23:daily_watch_30m");
        assert_eq!(rendered.parse::<ClaimKey>().unwrap(), key);
    }

    #[test]
    fn weekly_keys_carry_the_iso_week_period() {
        let key = ClaimKey::new(Scope::Weekly, "2026-W34", "weekly_days_3");
        assert_eq!(key.to_string(), "weekly:2026-W34:weekly_days_3");
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert_eq!(
            "daily:2026-08-23".parse::<ClaimKey>(),
            Err(ClaimKeyError::Malformed)
        );
        assert_eq!(
            "daily::x".parse::<ClaimKey>(),
            Err(ClaimKeyError::Malformed)
        );
        assert_eq!(
            "monthly:2026-08:x".parse::<ClaimKey>(),
            Err(ClaimKeyError::UnknownScope)
        );
    }

    #[test]
    fn insert_is_idempotent() {
        let mut ledger = ClaimLedger::new();
        let key = ClaimKey::new(Scope::Daily, "2026-08-23", "q");

        assert!(ledger.insert(&key));
        assert!(!ledger.insert(&key));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains("daily:2026-08-23:q"));
    }

    #[test]
    fn prune_removes_only_stale_periods() {
        let mut ledger = ClaimLedger::new();
        ledger.insert(&ClaimKey::new(Scope::Daily, "2026-08-22", "a"));
        ledger.insert(&ClaimKey::new(Scope::Daily, "2026-08-23", "b"));
        ledger.insert(&ClaimKey::new(Scope::Weekly, "2026-W33", "c"));
        ledger.insert(&ClaimKey::new(Scope::Weekly, "2026-W34", "d"));

        let removed = ledger.prune_stale("2026-08-23", "2026-W34");

        assert_eq!(removed, 2);
        assert!(ledger.contains("daily:2026-08-23:b"));
        assert!(ledger.contains("weekly:2026-W34:d"));
        assert!(!ledger.contains("daily:2026-08-22:a"));
        assert!(!ledger.contains("weekly:2026-W33:c"));
    }

    #[test]
    fn repeated_pruning_never_touches_current_keys() {
        let mut ledger = ClaimLedger::new();
        ledger.insert(&ClaimKey::new(Scope::Daily, "2026-08-23", "b"));

        for _ in 0..3 {
            assert_eq!(ledger.prune_stale("2026-08-23", "2026-W34"), 0);
        }
        assert_eq!(ledger.len(), 1);
    }
}
