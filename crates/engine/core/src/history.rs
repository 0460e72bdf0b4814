//! Long-lived per-video watch history.
//!
//! Distinct-stream counts are derived from history rather than from
//! [`crate::metrics::MetricsBook`]: a session counter cannot distinguish two
//! sessions of the same video from sessions of two different videos.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::calendar::{DayStamp, WeekKey};

/// One record per video id.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VideoHistory {
    pub last_watched_at: DateTime<Utc>,

    /// Resume point in seconds into the video.
    pub resume_seconds: u64,

    pub favorite: bool,

    /// Calendar days (reference timezone) with at least one watch event.
    pub watched_days: BTreeSet<DayStamp>,
}

/// All per-video records, keyed by video id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatchHistory {
    videos: BTreeMap<String, VideoHistory>,
}

impl WatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a watch event for `video_id` on `day`.
    ///
    /// Creates the record on first sight; otherwise refreshes the timestamp,
    /// resume point, and watched-day set. Returns true when this is the
    /// first event for this video on this day (a newly opened stream).
    pub fn record_watch(
        &mut self,
        video_id: &str,
        at: DateTime<Utc>,
        day: DayStamp,
        resume_seconds: u64,
    ) -> bool {
        match self.videos.get_mut(video_id) {
            Some(video) => {
                video.last_watched_at = at;
                video.resume_seconds = resume_seconds;
                video.watched_days.insert(day)
            }
            None => {
                self.videos.insert(
                    video_id.to_owned(),
                    VideoHistory {
                        last_watched_at: at,
                        resume_seconds,
                        favorite: false,
                        watched_days: BTreeSet::from([day]),
                    },
                );
                true
            }
        }
    }

    pub fn get(&self, video_id: &str) -> Option<&VideoHistory> {
        self.videos.get(video_id)
    }

    /// Marks or unmarks a favorite. Returns false for an unknown video.
    pub fn set_favorite(&mut self, video_id: &str, favorite: bool) -> bool {
        match self.videos.get_mut(video_id) {
            Some(video) => {
                video.favorite = favorite;
                true
            }
            None => false,
        }
    }

    /// Number of distinct videos watched on `day`.
    pub fn distinct_streams_for_day(&self, day: DayStamp) -> u64 {
        self.videos
            .values()
            .filter(|v| v.watched_days.contains(&day))
            .count() as u64
    }

    /// Number of distinct videos watched during the ISO week of `anchor`.
    pub fn distinct_streams_for_week(&self, anchor: DayStamp) -> u64 {
        let week = anchor.week_key();
        self.videos
            .values()
            .filter(|v| v.watched_days.iter().any(|d| d.week_key() == week))
            .count() as u64
    }

    /// Number of days in the ISO week of `anchor` with at least one watch.
    pub fn active_days_for_week(&self, anchor: DayStamp) -> u64 {
        let week: WeekKey = anchor.week_key();
        let mut days: BTreeSet<DayStamp> = BTreeSet::new();
        for video in self.videos.values() {
            days.extend(video.watched_days.iter().filter(|d| d.week_key() == week));
        }
        days.len() as u64
    }

    /// Consecutive watched days counted backward from the most recent
    /// watched day. Zero when nothing was ever watched.
    pub fn watch_streak_days(&self) -> u32 {
        let all_days: BTreeSet<DayStamp> = self
            .videos
            .values()
            .flat_map(|v| v.watched_days.iter().copied())
            .collect();

        let Some(latest) = all_days.iter().next_back().copied() else {
            return 0;
        };

        let mut streak = 0u32;
        let mut cursor = Some(latest);
        while let Some(day) = cursor {
            if !all_days.contains(&day) {
                break;
            }
            streak += 1;
            cursor = day.pred();
        }
        streak
    }
}
