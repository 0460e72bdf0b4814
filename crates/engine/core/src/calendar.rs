//! Calendar primitives shared by the quest and rollover logic.
//!
//! All day and week boundaries are pinned to one fixed reference timezone so
//! rotation is identical for every user, regardless of the device timezone.
//! Weeks are keyed by ISO week-year plus ISO week number: keying by calendar
//! year would split the week that straddles a year transition.

use core::fmt;
use core::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};

/// Fixed reference timezone offset (UTC+9) for all day/week boundaries.
pub const REFERENCE_TZ_OFFSET_SECS: i32 = 9 * 3600;

/// Days from `0001-01-01` (CE) to the Unix epoch `1970-01-01`.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Scope of a quest period: one calendar day or one ISO week.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scope {
    Daily,
    Weekly,
}

impl Scope {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(UnknownScope),
        }
    }
}

/// Error returned when parsing an unrecognized scope label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown quest scope")]
pub struct UnknownScope;

/// One calendar day in the reference timezone.
///
/// Wraps [`NaiveDate`] and adds the derivations the engine needs: the ordinal
/// day number used as the daily rotation seed and the ISO week key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DayStamp(NaiveDate);

impl DayStamp {
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// Days since the Unix epoch. Seed input for the daily rotation.
    pub fn ordinal(&self) -> i64 {
        i64::from(self.0.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE
    }

    /// ISO week key of the week containing this day.
    pub fn week_key(&self) -> WeekKey {
        let iso = self.0.iso_week();
        WeekKey {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// The day before, if representable.
    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// Period key string for a scope anchored at this day.
    pub fn period_key(&self, scope: Scope) -> String {
        match scope {
            Scope::Daily => self.to_string(),
            Scope::Weekly => self.week_key().to_string(),
        }
    }
}

impl fmt::Display for DayStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ISO "YYYY-MM-DD", the daily period key format.
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// ISO week identifier: week-year plus week-of-year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeekKey {
    year: i32,
    week: u32,
}

impl WeekKey {
    pub const fn year(&self) -> i32 {
        self.year
    }

    pub const fn week(&self) -> u32 {
        self.week
    }

    /// Monday of this ISO week, if the week exists in the calendar.
    pub fn first_day(&self) -> Option<DayStamp> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon).map(DayStamp)
    }

    /// All seven days of this ISO week, Monday first.
    pub fn days(&self) -> impl Iterator<Item = DayStamp> + '_ {
        let monday = self.first_day().map(|d| d.date());
        (0..7).filter_map(move |offset| {
            monday
                .and_then(|m| m.checked_add_days(chrono::Days::new(offset)))
                .map(DayStamp)
        })
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ISO "IYYY-Www", the weekly period key format.
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}
