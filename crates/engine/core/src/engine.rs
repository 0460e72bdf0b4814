//! The progression engine: single owner of all mutable progression state.
//!
//! Every mutation — telemetry credits, claims, rollover — flows through
//! [`ProgressionEngine`]. Callers (the runtime worker) serialize access, so
//! no internal locking exists. All operations are synchronous and
//! deterministic given the same inputs.

use chrono::{DateTime, Utc};

use crate::achievements::{AchievementDef, AchievementMetric};
use crate::calendar::{DayStamp, Scope};
use crate::config::EngineConfig;
use crate::quest::claim::ClaimKey;
use crate::quest::rotation::Rotation;
use crate::quest::state::{self, QuestState};
use crate::quest::template::QuestTemplate;
use crate::snapshot::EngineSnapshot;

/// Static reference data compiled into the application.
#[derive(Clone, Copy, Debug)]
pub struct Catalog {
    pub daily_pool: &'static [QuestTemplate],
    pub weekly_pool: &'static [QuestTemplate],
    pub achievements: &'static [AchievementDef],
    pub version: u32,
}

impl Catalog {
    pub const fn pool(&self, scope: Scope) -> &'static [QuestTemplate] {
        match scope {
            Scope::Daily => self.daily_pool,
            Scope::Weekly => self.weekly_pool,
        }
    }

    const fn slots(scope: Scope) -> usize {
        match scope {
            Scope::Daily => EngineConfig::DAILY_QUEST_SLOTS,
            Scope::Weekly => EngineConfig::WEEKLY_QUEST_SLOTS,
        }
    }
}

/// One telemetry credit from the playback collaborator.
///
/// The collaborator has already applied its anti-cheat filtering;
/// `eligible_seconds` is whatever it decided counts. Negative values from a
/// buggy upstream are clamped at the aggregator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchEvent {
    pub video_id: String,
    pub timestamp_utc: DateTime<Utc>,
    pub eligible_seconds: i64,
    pub playback_position_seconds: u64,
    pub active_effects_count: u32,
}

/// Result of recording a watch event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    /// First event for this video on this day.
    pub new_stream: bool,
    /// Achievements unlocked by this credit.
    pub unlocked: Vec<&'static str>,
}

/// Result of a successful claim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimGrant {
    pub claim_key: String,
    pub xp_awarded: u64,
    pub level_before: u32,
    pub level_after: u32,
    pub unlocked: Vec<&'static str>,
}

impl ClaimGrant {
    pub const fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

/// Result of a rollover tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RolloverOutcome {
    /// False when no boundary was crossed (the tick was a no-op).
    pub changed: bool,
    pub pruned_claims: usize,
    pub pruned_metric_days: usize,
}

pub struct ProgressionEngine {
    config: EngineConfig,
    catalog: Catalog,
    state: EngineSnapshot,
}

impl ProgressionEngine {
    /// Builds an engine from a previously persisted snapshot (or
    /// `EngineSnapshot::default()` for a fresh start — loading failures
    /// must never prevent construction).
    pub fn new(config: EngineConfig, catalog: Catalog, snapshot: EngineSnapshot) -> Self {
        Self {
            config,
            catalog,
            state: snapshot,
        }
    }

    /// Credits one telemetry event against `day` (the trusted current day).
    ///
    /// Safe to call repeatedly for the same logical session: the playback
    /// collaborator streams partial credits every few seconds.
    pub fn record_watch(&mut self, event: &WatchEvent, day: DayStamp) -> RecordOutcome {
        let effects_active = event.active_effects_count > 0;
        self.state
            .metrics
            .record_session(day, event.eligible_seconds, effects_active);

        let new_stream = self.state.history.record_watch(
            &event.video_id,
            event.timestamp_utc,
            day,
            event.playback_position_seconds,
        );

        let counters = &mut self.state.counters;
        counters.add(
            AchievementMetric::LifetimeWatchSeconds,
            event.eligible_seconds.max(0) as u64,
        );
        if effects_active {
            counters.add(AchievementMetric::LifetimeEffectSessions, 1);
        }
        if new_stream {
            counters.add(AchievementMetric::LifetimeStreamsOpened, 1);
        }
        let streak = self.state.history.watch_streak_days();
        self.state
            .counters
            .raise_to(AchievementMetric::WatchStreakDays, u64::from(streak));

        let unlocked = self
            .state
            .achievements
            .evaluate(self.catalog.achievements, &self.state.counters);

        RecordOutcome {
            new_stream,
            unlocked,
        }
    }

    /// Active quests for `scope` on `day`, recomputing the rotation first if
    /// the cached one is stale or references a changed catalog.
    pub fn active_quests(&mut self, scope: Scope, day: DayStamp) -> Vec<QuestState> {
        self.ensure_rotation(scope, day);
        let rotation = match self.rotation(scope) {
            Some(rotation) => rotation,
            // ensure_rotation always fills the slot; resolve nothing if not.
            None => return Vec::new(),
        };
        state::resolve(
            rotation,
            self.catalog.pool(scope),
            day,
            &self.state.metrics,
            &self.state.history,
            &self.state.claims,
        )
    }

    /// Attempts to claim a quest instance.
    ///
    /// Returns `None` — with no state change — when the key is malformed,
    /// not part of the current period's rotation, incomplete, or already
    /// claimed. UI re-render races make all of these common, expected calls.
    ///
    /// On success the ledger insert happens *before* the XP award. If the
    /// process dies between the two persisted steps the quest is lost, never
    /// granted twice.
    pub fn try_claim(&mut self, raw_key: &str, today: DayStamp) -> Option<ClaimGrant> {
        let key: ClaimKey = raw_key.parse().ok()?;
        if key.period_key != today.period_key(key.scope) {
            return None;
        }
        if self.state.claims.contains(raw_key) {
            return None;
        }

        self.ensure_rotation(key.scope, today);
        let selected = self
            .rotation(key.scope)?
            .selected
            .iter()
            .any(|id| *id == key.template_id);
        if !selected {
            return None;
        }

        let template = self
            .catalog
            .pool(key.scope)
            .iter()
            .find(|t| t.id == key.template_id)?;
        let progress = state::metric_value(
            template.metric,
            today,
            &self.state.metrics,
            &self.state.history,
        );
        if progress < template.target {
            return None;
        }

        // Ledger first, award second.
        self.state.claims.insert(&key);

        let xp = (template.reward_xp as f64 * self.config.reward_multiplier).round() as u64;
        let award = self.state.progression.add_xp(xp as i64);
        let (level_before, level_after) = award
            .map(|a| (a.level_before, a.level_after))
            .unwrap_or_else(|| {
                let level = self.state.progression.level();
                (level, level)
            });

        self.state.counters.add(AchievementMetric::LifetimeXp, xp);
        self.state.counters.add(AchievementMetric::QuestsClaimed, 1);
        let unlocked = self
            .state
            .achievements
            .evaluate(self.catalog.achievements, &self.state.counters);

        Some(ClaimGrant {
            claim_key: raw_key.to_owned(),
            xp_awarded: xp,
            level_before,
            level_after,
            unlocked,
        })
    }

    /// Rollover tick. Detects day/week boundary crossings, prunes stale
    /// claims and old metric days, and refreshes both rotations.
    ///
    /// Idempotent: a second tick inside the same period changes nothing.
    pub fn rollover(&mut self, today: DayStamp) -> RolloverOutcome {
        let week_key = today.week_key().to_string();
        let markers = &self.state.markers;
        if markers.last_day == Some(today) && markers.last_week_key.as_deref() == Some(&week_key) {
            return RolloverOutcome::default();
        }

        let pruned_claims = self
            .state
            .claims
            .prune_stale(&today.period_key(Scope::Daily), &week_key);

        self.ensure_rotation(Scope::Daily, today);
        self.ensure_rotation(Scope::Weekly, today);

        let pruned_metric_days = match today
            .date()
            .checked_sub_days(chrono::Days::new(u64::from(self.config.metrics_retention_days)))
        {
            Some(cutoff) => self.state.metrics.prune_before(DayStamp::new(cutoff)),
            None => 0,
        };

        self.state.markers.last_day = Some(today);
        self.state.markers.last_week_key = Some(week_key);

        RolloverOutcome {
            changed: true,
            pruned_claims,
            pruned_metric_days,
        }
    }

    /// Starts a new prestige cycle. See
    /// [`crate::progression::ProgressionState::prestige`].
    pub fn prestige(&mut self) -> Result<u32, crate::progression::PrestigeError> {
        let count = self.state.progression.prestige()?;
        self.state
            .counters
            .raise_to(AchievementMetric::PrestigeCount, u64::from(count));
        self.state
            .achievements
            .evaluate(self.catalog.achievements, &self.state.counters);
        Ok(count)
    }

    pub fn level(&self) -> u32 {
        self.state.progression.level()
    }

    pub fn xp_to_next_level(&self) -> u64 {
        self.state.progression.xp_to_next_level()
    }

    pub fn prestige_count(&self) -> u32 {
        self.state.progression.prestige
    }

    pub fn total_xp(&self) -> u64 {
        self.state.progression.total_xp
    }

    pub fn watch_streak_days(&self) -> u32 {
        self.state.history.watch_streak_days()
    }

    /// Marks a video as favorite. Returns false for unknown videos.
    pub fn set_favorite(&mut self, video_id: &str, favorite: bool) -> bool {
        self.state.history.set_favorite(video_id, favorite)
    }

    pub fn unlocked_achievements(&self) -> usize {
        self.state.achievements.unlocked_count()
    }

    /// Clones the current state for persistence.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.state.clone()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn rotation(&self, scope: Scope) -> Option<&Rotation> {
        match scope {
            Scope::Daily => self.state.rotations.daily.as_ref(),
            Scope::Weekly => self.state.rotations.weekly.as_ref(),
        }
    }

    fn ensure_rotation(&mut self, scope: Scope, day: DayStamp) {
        let pool = self.catalog.pool(scope);
        let count = Catalog::slots(scope);
        let slot = match scope {
            Scope::Daily => &mut self.state.rotations.daily,
            Scope::Weekly => &mut self.state.rotations.weekly,
        };
        let valid = slot
            .as_ref()
            .is_some_and(|r| r.is_valid_for(day, pool, count));
        if !valid {
            *slot = Some(Rotation::compute(scope, day, pool, count));
        }
    }
}
