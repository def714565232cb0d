//! Pure derivations over habits and their progress: check-in toggling, streaks and the weekly
//! completion series. Nothing in here touches storage.

pub mod checkin;
pub mod series;
pub mod streak;

pub use checkin::{recompute_day, toggle_check_in};
pub use series::{
    average_completed, completion_percentage, weekly_series, SeriesPoint, DEFAULT_SERIES_DAYS,
};
pub use streak::{perfect_day_streak, streak, DEFAULT_STREAK_WINDOW};
