//! Trusted wall-clock time.
//!
//! Progression day stamps must come from a clock the user cannot trivially
//! rewind. The runtime anchors an internet-derived UTC instant to a
//! monotonic [`Instant`] and extrapolates from there; the device clock is
//! only a fallback before the first successful sync.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use chrono::{DateTime, FixedOffset, Utc};
use engine_core::{DayStamp, REFERENCE_TZ_OFFSET_SECS};

/// One successful sync: an internet UTC reading paired with the monotonic
/// instant it was taken at.
#[derive(Clone, Copy, Debug)]
pub struct TimeAnchor {
    pub internet_utc: DateTime<Utc>,
    pub synced_at: Instant,
}

/// Shared trusted clock handle.
///
/// Cheap to clone; all clones observe the same anchor. Reads never block on
/// a sync in progress because the anchor swap is a single short write.
#[derive(Clone)]
pub struct TrustedClock {
    anchor: Arc<RwLock<Option<TimeAnchor>>>,
}

impl TrustedClock {
    /// Creates an unsynced clock. Until the first anchor arrives, [`now`]
    /// falls back to the device clock.
    ///
    /// [`now`]: TrustedClock::now
    pub fn new() -> Self {
        Self {
            anchor: Arc::new(RwLock::new(None)),
        }
    }

    /// Installs a fresh anchor from a successful sync round.
    pub fn apply_anchor(&self, anchor: TimeAnchor) {
        let mut slot = match self.anchor.write() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = Some(anchor);
    }

    /// Current trusted UTC time.
    ///
    /// Extrapolates from the last anchor using the monotonic clock, so a
    /// device-clock change between syncs has no effect. Unsynced clocks
    /// return the device time. On platforms where `Instant` does not
    /// advance during system suspend, the reading lags by the sleep
    /// duration until the next sync re-anchors it.
    pub fn now(&self) -> DateTime<Utc> {
        let anchor = match self.anchor.read() {
            Ok(slot) => *slot,
            Err(poisoned) => *poisoned.into_inner(),
        };
        match anchor {
            Some(anchor) => {
                let elapsed = anchor.synced_at.elapsed();
                anchor.internet_utc
                    + chrono::Duration::from_std(elapsed).unwrap_or_else(|_| chrono::Duration::zero())
            }
            None => Utc::now(),
        }
    }

    /// Current time in the fixed reference timezone.
    ///
    /// All period boundaries are evaluated in this zone regardless of where
    /// the device is, so travel never replays or skips a rollover.
    pub fn local_now(&self) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(REFERENCE_TZ_OFFSET_SECS)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        self.now().with_timezone(&offset)
    }

    /// Today's day stamp in the reference timezone.
    pub fn today(&self) -> DayStamp {
        DayStamp::new(self.local_now().date_naive())
    }

    pub fn is_synced(&self) -> bool {
        match self.anchor.read() {
            Ok(slot) => slot.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        }
    }
}

impl Default for TrustedClock {
    fn default() -> Self {
        Self::new()
    }
}
