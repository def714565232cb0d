use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::habits::entities::DailyProgress;

pub const DEFAULT_STREAK_WINDOW: u32 = 7;

/// Counts consecutive checked in days walking backward from `as_of`, `as_of` included.
/// Stops at the first day that is `false` or missing, and never counts more than `window_days`.
pub fn streak(history: &BTreeMap<NaiveDate, bool>, as_of: NaiveDate, window_days: u32) -> u32 {
    let mut count = 0;
    let mut current = as_of;
    while count < window_days && history.get(&current).copied().unwrap_or(false) {
        count += 1;
        let Some(previous) = current.pred_opt() else {
            break;
        };
        current = previous;
    }
    count
}

/// Counts consecutive days, walking backward from `as_of`, on which every habit was completed.
///
/// Days without any habits (`total == 0`) are gaps: they are skipped without ending the streak.
/// Days with no recorded progress end it. Only the last `window_days` days are inspected.
pub fn perfect_day_streak(progress: &DailyProgress, as_of: NaiveDate, window_days: u32) -> u32 {
    let mut count = 0;
    let mut current = as_of;
    for _ in 0..window_days {
        match progress.get(current) {
            Some(day) if day.total == 0 => {}
            Some(day) if day.completed == day.total => count += 1,
            Some(_) | None => break,
        }
        let Some(previous) = current.pred_opt() else {
            break;
        };
        current = previous;
    }
    count
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use crate::habits::entities::{DailyProgress, DayProgress};

    use super::{perfect_day_streak, streak, DEFAULT_STREAK_WINDOW};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_streak_breaks_at_false() {
        let history = BTreeMap::from([(day(5), true), (day(4), true), (day(3), false)]);
        assert_eq!(streak(&history, day(5), DEFAULT_STREAK_WINDOW), 2);
    }

    #[test]
    fn test_streak_zero_when_today_missing() {
        let history = BTreeMap::from([(day(4), true), (day(3), true)]);
        assert_eq!(streak(&history, day(5), DEFAULT_STREAK_WINDOW), 0);
    }

    #[test]
    fn test_streak_breaks_at_missing_day() {
        let history = BTreeMap::from([(day(5), true), (day(3), true), (day(2), true)]);
        assert_eq!(streak(&history, day(5), DEFAULT_STREAK_WINDOW), 1);
    }

    #[test]
    fn test_streak_bounded_by_window() {
        let history = (1..=20).map(|d| (day(d), true)).collect::<BTreeMap<_, _>>();
        assert_eq!(streak(&history, day(20), DEFAULT_STREAK_WINDOW), 7);
        assert_eq!(streak(&history, day(20), 30), 20);
        assert_eq!(streak(&history, day(20), 0), 0);
    }

    #[test]
    fn test_perfect_day_streak_skips_empty_days() {
        let mut progress = DailyProgress::default();
        progress.record(day(5), DayProgress { completed: 2, total: 2 });
        progress.record(day(4), DayProgress { completed: 0, total: 0 });
        progress.record(day(3), DayProgress { completed: 1, total: 1 });
        progress.record(day(2), DayProgress { completed: 0, total: 1 });

        assert_eq!(perfect_day_streak(&progress, day(5), DEFAULT_STREAK_WINDOW), 2);
    }

    #[test]
    fn test_perfect_day_streak_missing_day_ends() {
        let mut progress = DailyProgress::default();
        progress.record(day(5), DayProgress { completed: 1, total: 1 });
        progress.record(day(3), DayProgress { completed: 1, total: 1 });

        assert_eq!(perfect_day_streak(&progress, day(5), DEFAULT_STREAK_WINDOW), 1);
        assert_eq!(perfect_day_streak(&progress, day(6), DEFAULT_STREAK_WINDOW), 0);
    }
}
