use chrono::{NaiveDate, NaiveTime};
use tracing::{info, instrument, warn};

use crate::{
    aggregate,
    store::{keys, KeyValueStore},
    utils::clock::Clock,
};

use super::{
    entities::{DailyProgress, DayProgress, Habit},
    HabitError,
};

/// Reads and writes habits and their progress through a [KeyValueStore].
///
/// Every mutation loads both collections, changes them in memory and writes them back only when
/// the change succeeded. A failure therefore leaves the previously persisted state untouched.
pub struct HabitRepository<S: KeyValueStore> {
    store: S,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> HabitRepository<S> {
    pub fn new(store: S, clock: Box<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Persisted habits in insertion order. Absent or malformed data reads as no habits.
    pub async fn load_habits(&self) -> Vec<Habit> {
        self.store.get(keys::HABITS).await.unwrap_or_default()
    }

    pub async fn load_progress(&self) -> DailyProgress {
        self.store.get(keys::DAILY_PROGRESS).await.unwrap_or_default()
    }

    /// Loads both collections at once.
    pub async fn load_all(&self) -> (Vec<Habit>, DailyProgress) {
        futures::join!(self.load_habits(), self.load_progress())
    }

    /// Writes habits, then progress. There is no rollback: if the second write fails the two
    /// collections can disagree until the next mutation recomputes the day.
    pub async fn save_all(&self, habits: &[Habit], progress: &DailyProgress) {
        self.store.set(keys::HABITS, &habits).await;
        self.store.set(keys::DAILY_PROGRESS, progress).await;
    }

    /// Creates a habit with an empty history and appends it to the collection.
    #[instrument(skip(self))]
    pub async fn add_habit(
        &self,
        name: &str,
        reminder_time: Option<NaiveTime>,
    ) -> Result<Habit, HabitError> {
        let name = validate_name(name)?;
        let (mut habits, mut progress) = self.load_all().await;

        let habit = Habit::new(self.next_id(&habits), name, reminder_time);
        habits.push(habit.clone());

        self.record_today(&habits, &mut progress);
        self.save_all(&habits, &progress).await;
        info!("Added habit {} ({})", habit.name, habit.id);
        Ok(habit)
    }

    /// Removes the habit and recomputes today's progress from the remaining ones.
    /// Returns whether anything was removed.
    #[instrument(skip(self))]
    pub async fn delete_habit(&self, id: &str) -> bool {
        let (mut habits, mut progress) = self.load_all().await;
        let before = habits.len();
        habits.retain(|h| h.id != id);
        if habits.len() == before {
            warn!("No habit with id {id} to delete");
            return false;
        }

        self.record_today(&habits, &mut progress);
        self.save_all(&habits, &progress).await;
        info!("Deleted habit {id}");
        true
    }

    /// Renames a habit. An unknown id is a no-op and returns `Ok(false)`.
    #[instrument(skip(self))]
    pub async fn rename_habit(&self, id: &str, new_name: &str) -> Result<bool, HabitError> {
        let new_name = validate_name(new_name)?;
        let mut habits = self.load_habits().await;
        let Some(habit) = habits.iter_mut().find(|h| h.id == id) else {
            return Ok(false);
        };
        habit.name = new_name;
        self.store.set(keys::HABITS, &habits).await;
        Ok(true)
    }

    /// Flips the check-in of habit `id` on `date` and persists the result.
    /// Returns the new progress of `date`, or `None` when the habit doesn't exist.
    #[instrument(skip(self))]
    pub async fn toggle_check_in(&self, id: &str, date: NaiveDate) -> Option<DayProgress> {
        let (mut habits, mut progress) = self.load_all().await;
        let day = aggregate::toggle_check_in(&mut habits, id, date)?;
        progress.record(date, day);
        self.save_all(&habits, &progress).await;
        Some(day)
    }

    /// Removes every habit. History of previous days is kept, today is recorded as empty.
    #[instrument(skip(self))]
    pub async fn clear_all(&self) {
        let mut progress = self.load_progress().await;
        self.record_today(&[], &mut progress);
        self.save_all(&[], &progress).await;
        info!("Cleared all habits");
    }

    /// Looks a habit up by id first, then by exact name.
    pub async fn find(&self, selector: &str) -> Option<Habit> {
        let habits = self.load_habits().await;
        let position = habits
            .iter()
            .position(|h| h.id == selector)
            .or_else(|| habits.iter().position(|h| h.name == selector.trim()))?;
        habits.into_iter().nth(position)
    }

    fn record_today(&self, habits: &[Habit], progress: &mut DailyProgress) {
        let today = self.today();
        progress.record(today, aggregate::recompute_day(habits, today));
    }

    /// Ids are creation timestamps in milliseconds, bumped until they don't collide.
    fn next_id(&self, habits: &[Habit]) -> String {
        let mut candidate = self.clock.now().timestamp_millis();
        while habits.iter().any(|h| h.id == candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }
}

fn validate_name(name: &str) -> Result<String, HabitError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(HabitError::EmptyName);
    }
    Ok(name.to_string())
}
