//! Activity calendar input
//!
//! The data source hands us weeks of daily contribution counts, oldest week
//! first. This module turns that into a rectangular week×day [`Grid`] and
//! computes the aggregate statistics the landmark gates look at.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DioramaError, Result};
use crate::tilemap::Tilemap;

/// Days in a calendar week; the day axis of every grid.
pub const DAYS_PER_WEEK: usize = 7;

/// Weeks shown in a full calendar year.
pub const WEEKS_PER_YEAR: usize = 52;

/// One day of activity as reported by the data source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub count: u32,
    /// Quartile bucket (0-4) assigned by the data source. Informational only.
    #[serde(default)]
    pub level: u8,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CalendarWeek {
    pub days: Vec<ActivityDay>,
}

/// On-disk calendar format.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Calendar {
    pub weeks: Vec<CalendarWeek>,
}

impl Calendar {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Week×day grid of raw counts.
///
/// Always exactly [`DAYS_PER_WEEK`] rows; days missing from short weeks are
/// stored as zero and are not part of [`Grid::days`].
#[derive(Clone, Debug)]
pub struct Grid {
    counts: Tilemap<u32>,
    days: Vec<ActivityDay>,
    oldest: Option<NaiveDate>,
}

impl Grid {
    /// Build a grid, clamping long weeks to 7 days and padding short ones.
    pub fn from_weeks(weeks: &[CalendarWeek]) -> Self {
        let mut counts = Tilemap::new_with(weeks.len(), DAYS_PER_WEEK, 0u32);
        let mut days = Vec::with_capacity(weeks.len() * DAYS_PER_WEEK);

        for (week, w) in weeks.iter().enumerate() {
            if w.days.len() != DAYS_PER_WEEK {
                tracing::warn!(week, days = w.days.len(), "week does not have 7 days; clamping/padding");
            }
            for (day, d) in w.days.iter().take(DAYS_PER_WEEK).enumerate() {
                counts.set(week, day, d.count);
                days.push(*d);
            }
        }

        let oldest = weeks.iter().find_map(|w| w.days.first()).map(|d| d.date);

        Self { counts, days, oldest }
    }

    /// Build a grid, rejecting anything that is not a non-empty run of full weeks.
    pub fn strict(weeks: &[CalendarWeek]) -> Result<Self> {
        if weeks.is_empty() {
            return Err(DioramaError::invalid("calendar has no weeks"));
        }
        if let Some((i, w)) = weeks.iter().enumerate().find(|(_, w)| w.days.len() != DAYS_PER_WEEK) {
            return Err(DioramaError::invalid(format!(
                "week {} has {} days, expected {}",
                i,
                w.days.len(),
                DAYS_PER_WEEK
            )));
        }
        Ok(Self::from_weeks(weeks))
    }

    /// Grid from a plain matrix of counts, `counts[week][day]`, with dates
    /// running daily from `start`. Handy for tests and synthetic input.
    pub fn from_counts(start: NaiveDate, counts: &[[u32; DAYS_PER_WEEK]]) -> Self {
        let weeks: Vec<CalendarWeek> = counts
            .iter()
            .enumerate()
            .map(|(w, row)| CalendarWeek {
                days: row
                    .iter()
                    .enumerate()
                    .map(|(d, &count)| ActivityDay {
                        date: start + chrono::Duration::days((w * DAYS_PER_WEEK + d) as i64),
                        count,
                        level: 0,
                    })
                    .collect(),
            })
            .collect();
        Self::from_weeks(&weeks)
    }

    /// 52 full weeks starting at `start`, every day carrying `count`.
    pub fn uniform(start: NaiveDate, count: u32) -> Self {
        Self::from_counts(start, &vec![[count; DAYS_PER_WEEK]; WEEKS_PER_YEAR])
    }

    pub fn week_count(&self) -> usize {
        self.counts.width
    }

    pub fn day_count(&self) -> usize {
        self.counts.height
    }

    pub fn count(&self, week: usize, day: usize) -> u32 {
        *self.counts.get(week, day)
    }

    pub fn counts(&self) -> &Tilemap<u32> {
        &self.counts
    }

    /// Recorded days in chronological order.
    pub fn days(&self) -> &[ActivityDay] {
        &self.days
    }

    /// Date of the first day of the oldest week, if any day was recorded.
    pub fn oldest_date(&self) -> Option<NaiveDate> {
        self.oldest
    }

    pub fn stats(&self) -> ActivityStats {
        ActivityStats::from_days(&self.days)
    }
}

/// Aggregate numbers over the whole calendar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityStats {
    pub total: u64,
    pub longest_streak: u32,
    pub current_streak: u32,
    pub active_days: u32,
    pub max_count: u32,
}

impl ActivityStats {
    pub fn from_days(days: &[ActivityDay]) -> Self {
        let mut stats = ActivityStats::default();
        let mut run = 0u32;

        for d in days {
            stats.total += d.count as u64;
            stats.max_count = stats.max_count.max(d.count);
            if d.count > 0 {
                stats.active_days += 1;
                run += 1;
                stats.longest_streak = stats.longest_streak.max(run);
            } else {
                run = 0;
            }
        }

        // Today may simply not have happened yet; a zero on the last day
        // does not break the current streak.
        let tail = match days.split_last() {
            Some((last, rest)) if last.count == 0 => rest,
            _ => days,
        };
        stats.current_streak = tail.iter().rev().take_while(|d| d.count > 0).count() as u32;

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
    }

    fn week(n: usize, count: u32) -> CalendarWeek {
        CalendarWeek {
            days: (0..n)
                .map(|i| ActivityDay {
                    date: start() + chrono::Duration::days(i as i64),
                    count,
                    level: 0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_from_weeks_pads_and_clamps() {
        let grid = Grid::from_weeks(&[week(3, 2), week(9, 5)]);
        assert_eq!(grid.week_count(), 2);
        assert_eq!(grid.day_count(), 7);
        assert_eq!(grid.count(0, 2), 2);
        assert_eq!(grid.count(0, 3), 0);
        assert_eq!(grid.count(1, 6), 5);
        assert_eq!(grid.days().len(), 3 + 7);
    }

    #[test]
    fn test_strict_rejects_bad_shape() {
        assert!(matches!(Grid::strict(&[]), Err(DioramaError::InvalidInput { .. })));
        assert!(matches!(
            Grid::strict(&[week(7, 1), week(6, 1)]),
            Err(DioramaError::InvalidInput { .. })
        ));
        assert!(Grid::strict(&[week(7, 1)]).is_ok());
    }

    #[test]
    fn test_empty_grid_degrades_gracefully() {
        let grid = Grid::from_weeks(&[]);
        assert_eq!(grid.week_count(), 0);
        assert_eq!(grid.oldest_date(), None);
        assert_eq!(grid.stats(), ActivityStats::default());
    }

    #[test]
    fn test_streaks() {
        let mut counts = vec![[0u32; 7]; 2];
        counts[0] = [1, 1, 1, 0, 1, 1, 0];
        counts[1] = [1, 1, 1, 1, 1, 2, 0];
        let stats = Grid::from_counts(start(), &counts).stats();
        assert_eq!(stats.total, 12);
        assert_eq!(stats.active_days, 11);
        assert_eq!(stats.longest_streak, 6);
        assert_eq!(stats.current_streak, 6);
        assert_eq!(stats.max_count, 2);
    }

    #[test]
    fn test_current_streak_broken_by_two_zero_days() {
        let counts = vec![[1, 1, 1, 1, 1, 0, 0]];
        let stats = Grid::from_counts(start(), &counts).stats();
        assert_eq!(stats.longest_streak, 5);
        assert_eq!(stats.current_streak, 0);
    }

    #[test]
    fn test_uniform_grid() {
        let grid = Grid::uniform(start(), 20);
        let stats = grid.stats();
        assert_eq!(grid.week_count(), 52);
        assert_eq!(stats.total, 20 * 364);
        assert_eq!(stats.longest_streak, 364);
        assert_eq!(stats.current_streak, 364);
        assert_eq!(grid.oldest_date(), Some(start()));
    }

    #[test]
    fn test_calendar_json_roundtrip_shape() {
        let json = r#"{"weeks":[{"days":[{"date":"2024-01-07","count":4,"level":2}]}]}"#;
        let cal: Calendar = serde_json::from_str(json).unwrap();
        assert_eq!(cal.weeks[0].days[0].count, 4);
        assert_eq!(cal.weeks[0].days[0].date, start());
    }
}
