use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    habits::entities::{DailyProgress, DayProgress},
    utils::{
        percentage::{ratio_percentage, Percentage},
        time::trailing_days,
    },
};

pub const DEFAULT_SERIES_DAYS: u32 = 7;

/// One bar of the weekly chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub completed: u32,
    pub total: u32,
}

impl SeriesPoint {
    pub fn percentage(&self) -> Percentage {
        completion_percentage(DayProgress {
            completed: self.completed,
            total: self.total,
        })
    }
}

/// Trailing `days` days ending at `end`, oldest first. Days with no recorded progress are filled
/// with `{completed: 0, total: habit_count}`.
pub fn weekly_series(
    progress: &DailyProgress,
    end: NaiveDate,
    days: u32,
    habit_count: u32,
) -> Vec<SeriesPoint> {
    trailing_days(end, days)
        .map(|date| {
            let day = progress.get(date).unwrap_or(DayProgress {
                completed: 0,
                total: habit_count,
            });
            SeriesPoint {
                date,
                completed: day.completed,
                total: day.total,
            }
        })
        .collect()
}

/// Completion of a day. A day without habits is reported as 0%.
pub fn completion_percentage(progress: DayProgress) -> Percentage {
    ratio_percentage(progress.completed, progress.total)
}

/// Average number of habits completed per day over the series.
pub fn average_completed(series: &[SeriesPoint]) -> f64 {
    if series.is_empty() {
        return 0.;
    }
    let sum: u32 = series.iter().map(|p| p.completed).sum();
    sum as f64 / series.len() as f64
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::{
        habits::entities::{DailyProgress, DayProgress},
        utils::percentage::Percentage,
    };

    use super::{average_completed, completion_percentage, weekly_series, DEFAULT_SERIES_DAYS};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_series_fills_missing_days() {
        let mut progress = DailyProgress::default();
        progress.record(day(5), DayProgress { completed: 2, total: 3 });
        progress.record(day(1), DayProgress { completed: 1, total: 2 });

        let series = weekly_series(&progress, day(7), DEFAULT_SERIES_DAYS, 3);

        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, day(1));
        assert_eq!(series[6].date, day(7));
        assert_eq!((series[0].completed, series[0].total), (1, 2));
        assert_eq!((series[4].completed, series[4].total), (2, 3));
        assert_eq!((series[5].completed, series[5].total), (0, 3));
    }

    #[test]
    fn test_empty_day_reports_zero_percent() {
        assert_eq!(completion_percentage(DayProgress::default()), Percentage::ZERO);
        let series = weekly_series(&DailyProgress::default(), day(7), 1, 0);
        assert_eq!(series[0].percentage(), Percentage::ZERO);
    }

    #[test]
    fn test_huge_window_is_cut_at_first_date() {
        let end = NaiveDate::MIN.succ_opt().unwrap();

        let series = weekly_series(&DailyProgress::default(), end, 200_000_000, 1);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, NaiveDate::MIN);
        assert_eq!((series[1].completed, series[1].total), (0, 1));
    }

    #[test]
    fn test_average_completed() {
        let mut progress = DailyProgress::default();
        progress.record(day(6), DayProgress { completed: 3, total: 3 });
        progress.record(day(7), DayProgress { completed: 4, total: 4 });

        let series = weekly_series(&progress, day(7), DEFAULT_SERIES_DAYS, 4);

        assert_eq!(average_completed(&series), 1.);
        assert_eq!(average_completed(&[]), 0.);
    }
}
