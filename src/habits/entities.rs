use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A user defined habit as it is stored under the `habits` key.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    /// Local time of day the daily reminder should fire at.
    #[serde(default)]
    pub reminder_time: Option<NaiveTime>,
    /// Check-ins keyed by local calendar day. A missing day means the habit wasn't checked in.
    #[serde(default)]
    pub history: BTreeMap<NaiveDate, bool>,
}

impl Habit {
    pub fn new(id: String, name: String, reminder_time: Option<NaiveTime>) -> Self {
        Self {
            id,
            name,
            reminder_time,
            history: BTreeMap::new(),
        }
    }

    pub fn is_checked_in(&self, date: NaiveDate) -> bool {
        self.history.get(&date).copied().unwrap_or(false)
    }
}

/// Aggregate completion counts for one day. `completed` never exceeds `total`.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct DayProgress {
    pub completed: u32,
    pub total: u32,
}

/// Cache of [DayProgress] per local calendar day, stored under the `dailyProgress` key.
/// It's derived from [Habit::history] and only ever written as a side effect of a habit mutation.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Default)]
#[serde(transparent)]
pub struct DailyProgress(BTreeMap<NaiveDate, DayProgress>);

impl DailyProgress {
    pub fn get(&self, date: NaiveDate) -> Option<DayProgress> {
        self.0.get(&date).copied()
    }

    pub fn record(&mut self, date: NaiveDate, progress: DayProgress) {
        self.0.insert(date, progress);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;

    use super::{DailyProgress, DayProgress, Habit};

    #[test]
    fn test_habit_layout() -> anyhow::Result<()> {
        let mut habit = Habit::new(
            "1".into(),
            "Workout".into(),
            NaiveTime::from_hms_opt(7, 30, 0),
        );
        habit
            .history
            .insert(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), true);

        assert_eq!(
            serde_json::to_value(&habit)?,
            json!({
                "id": "1",
                "name": "Workout",
                "reminderTime": "07:30:00",
                "history": { "2024-01-05": true }
            })
        );
        Ok(())
    }

    #[test]
    fn test_habit_without_history() -> anyhow::Result<()> {
        let habit: Habit = serde_json::from_value(json!({ "id": "2", "name": "Meditate" }))?;
        assert!(habit.history.is_empty());
        assert_eq!(habit.reminder_time, None);
        assert!(!habit.is_checked_in(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()));
        Ok(())
    }

    #[test]
    fn test_daily_progress_layout() -> anyhow::Result<()> {
        let mut progress = DailyProgress::default();
        progress.record(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            DayProgress {
                completed: 1,
                total: 3,
            },
        );
        assert_eq!(
            serde_json::to_value(&progress)?,
            json!({ "2024-01-05": { "completed": 1, "total": 3 } })
        );
        Ok(())
    }
}
