use chrono::NaiveDate;
use tracing::{debug, instrument};

use crate::habits::entities::{DayProgress, Habit};

/// Recomputes the progress of `date` over the whole collection. Every mutation of a habit ends with
/// a call to this function, which keeps [crate::habits::entities::DailyProgress] from drifting away
/// from the histories.
pub fn recompute_day(habits: &[Habit], date: NaiveDate) -> DayProgress {
    let completed = habits.iter().filter(|h| h.is_checked_in(date)).count();
    DayProgress {
        completed: completed as u32,
        total: habits.len() as u32,
    }
}

/// Flips the check-in of the habit `habit_id` on `date`.
///
/// A missing day counts as not checked in, so the first toggle always checks the habit in.
/// Unchecking removes the day from the history instead of storing `false`.
/// Returns the recomputed progress for `date`, or `None` when no habit has `habit_id`.
#[instrument(skip(habits))]
pub fn toggle_check_in(
    habits: &mut [Habit],
    habit_id: &str,
    date: NaiveDate,
) -> Option<DayProgress> {
    let habit = habits.iter_mut().find(|h| h.id == habit_id)?;
    if habit.is_checked_in(date) {
        habit.history.remove(&date);
    } else {
        habit.history.insert(date, true);
    }
    debug!("{} checked in: {}", habit.name, habit.is_checked_in(date));
    Some(recompute_day(habits, date))
}
