//! Day-by-day achievement history, the input to streaks and suggestions.
//!
//! Built once from already-fetched daily records; every query on it is pure.

use crate::entities::{AchievementLevel, daily_record};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// The two windows the suggestion rules look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionWindows {
    /// Levels of the most recent records (up to 14), oldest first. Gaps are skipped.
    pub last14: Vec<AchievementLevel>,
    /// The most recent calendar days (up to 7), oldest first. `None` marks a missing record.
    pub last7: Vec<Option<AchievementLevel>>,
}

/// Achievement level per recorded day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementHistory {
    by_date: BTreeMap<NaiveDate, AchievementLevel>,
}

impl AchievementHistory {
    /// Builds a history from daily records in any order.
    #[must_use]
    pub fn from_records(records: &[daily_record::Model]) -> Self {
        records
            .iter()
            .map(|record| (record.record_date, record.achievement_level))
            .collect()
    }

    /// The recorded level for a day, if any.
    #[must_use]
    pub fn level_on(&self, date: NaiveDate) -> Option<AchievementLevel> {
        self.by_date.get(&date).copied()
    }

    /// Whether a record exists for the day.
    #[must_use]
    pub fn has_record(&self, date: NaiveDate) -> bool {
        self.by_date.contains_key(&date)
    }

    /// Number of recorded days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    /// Whether no day has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// Builds the suggestion windows as of `today`, ignoring anything before `since`.
    ///
    /// The 14-record window only contains recorded days. The 7-day window is
    /// calendar-based and ends today when today is recorded, yesterday otherwise,
    /// so an unfinished day never counts as a miss. Every day from `since` on
    /// counts, recorded or not; days before `since` are dropped, which leaves the
    /// window short right after a goal change.
    #[must_use]
    pub fn suggestion_windows(&self, today: NaiveDate, since: NaiveDate) -> SuggestionWindows {
        if since > today {
            return SuggestionWindows::default();
        }

        let mut last14: Vec<AchievementLevel> = self
            .by_date
            .range(since..=today)
            .rev()
            .take(14)
            .map(|(_, level)| *level)
            .collect();
        last14.reverse();

        let end = if self.has_record(today) {
            Some(today)
        } else {
            today.pred_opt()
        };
        let mut last7 = Vec::with_capacity(7);
        let mut cursor = end;
        while let Some(day) = cursor {
            if day < since || last7.len() == 7 {
                break;
            }
            last7.push(self.level_on(day));
            cursor = day.pred_opt();
        }
        last7.reverse();

        SuggestionWindows { last14, last7 }
    }
}

impl FromIterator<(NaiveDate, AchievementLevel)> for AchievementHistory {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, AchievementLevel)>>(iter: I) -> Self {
        Self {
            by_date: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn day(n: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap_or_default()
            .checked_add_days(Days::new(n))
            .unwrap_or_default()
    }

    #[test]
    fn test_level_lookup() {
        let history: AchievementHistory = [(day(0), AchievementLevel::Gold)].into_iter().collect();
        assert_eq!(history.level_on(day(0)), Some(AchievementLevel::Gold));
        assert_eq!(history.level_on(day(1)), None);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_last14_skips_gaps() {
        // 16 records with a gap on day 5
        let history: AchievementHistory = (0..17)
            .filter(|&n| n != 5)
            .map(|n| (day(n), AchievementLevel::Silver))
            .collect();
        let windows = history.suggestion_windows(day(16), day(0));
        assert_eq!(windows.last14.len(), 14);
        assert!(windows.last14.iter().all(|l| *l == AchievementLevel::Silver));
    }

    #[test]
    fn test_last7_marks_missing_days() {
        let history: AchievementHistory = [0, 1, 2, 4, 6, 9]
            .into_iter()
            .map(|n| (day(n), AchievementLevel::Bronze))
            .collect();
        // Today (day 9) is recorded, so the window is days 3..=9
        let windows = history.suggestion_windows(day(9), day(0));
        assert_eq!(
            windows.last7,
            vec![
                None,
                Some(AchievementLevel::Bronze),
                None,
                Some(AchievementLevel::Bronze),
                None,
                None,
                Some(AchievementLevel::Bronze),
            ]
        );
    }

    #[test]
    fn test_unrecorded_today_is_excluded() {
        let history: AchievementHistory = (0..8)
            .map(|n| (day(n), AchievementLevel::Gold))
            .collect();
        // Day 8 has no record yet; window ends on day 7
        let windows = history.suggestion_windows(day(8), day(0));
        assert_eq!(windows.last7.len(), 7);
        assert!(windows.last7.iter().all(Option::is_some));
    }

    #[test]
    fn test_windows_clipped_to_since() {
        let history: AchievementHistory = (10..14)
            .map(|n| (day(n), AchievementLevel::None))
            .collect();
        let windows = history.suggestion_windows(day(13), day(12));
        assert_eq!(windows.last7.len(), 2);
        assert_eq!(windows.last14.len(), 2);

        let windows = history.suggestion_windows(day(13), day(14));
        assert_eq!(windows, SuggestionWindows::default());
    }

    #[test]
    fn test_days_before_first_record_are_missing() {
        // Slot opened on day 0, first record on day 4
        let history: AchievementHistory = (4..7)
            .map(|n| (day(n), AchievementLevel::None))
            .collect();
        let windows = history.suggestion_windows(day(6), day(0));
        assert_eq!(
            windows.last7,
            vec![
                None,
                None,
                None,
                None,
                Some(AchievementLevel::None),
                Some(AchievementLevel::None),
                Some(AchievementLevel::None),
            ]
        );
        assert_eq!(windows.last14.len(), 3);
    }
}
