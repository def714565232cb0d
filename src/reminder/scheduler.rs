use tracing::{info, instrument, warn};

use crate::{
    store::{keys, KeyValueStore},
    utils::clock::Clock,
};

use super::{
    compute_next_trigger, PermissionStatus, ReminderError, ReminderHandle, ReminderState,
    ScheduledReminder,
};

/// Registers daily reminders with the notification facility, which is the schedule table read by
/// the reminder daemon.
pub struct ReminderScheduler<S: KeyValueStore> {
    store: S,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> ReminderScheduler<S> {
    pub fn new(store: S, clock: Box<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Reminders are permitted unless the user switched notifications off.
    pub async fn permission(&self) -> PermissionStatus {
        match self.store.get_raw(keys::NOTIFICATIONS).await.as_deref() {
            Some("false") => PermissionStatus::Denied,
            _ => PermissionStatus::Granted,
        }
    }

    /// Registers a reminder that repeats every day at `hour:minute` local time.
    ///
    /// Scheduling the same habit twice creates two independent reminders. Without permission
    /// nothing is registered and [ReminderError::PermissionDenied] is returned.
    #[instrument(skip(self))]
    pub async fn schedule_daily(
        &self,
        habit_name: &str,
        hour: u32,
        minute: u32,
    ) -> Result<ReminderHandle, ReminderError> {
        let next_fire = compute_next_trigger(hour, minute, &self.clock.now())?;

        if self.permission().await == PermissionStatus::Denied {
            warn!("Notifications are denied, not scheduling {habit_name}");
            return Err(ReminderError::PermissionDenied);
        }

        let mut reminders = self.pending().await;
        let id = reminders.iter().map(|r| r.id + 1).max().unwrap_or(1);
        reminders.push(ScheduledReminder {
            id,
            title: habit_name.to_string(),
            body: format!("Time for your habit: {habit_name}"),
            hour,
            minute,
        });
        self.store.set(keys::REMINDERS, &reminders).await;

        info!("Scheduled reminder {id} for {habit_name}, first fire at {next_fire}");
        Ok(ReminderHandle {
            id,
            state: ReminderState::Scheduled { next_fire },
        })
    }

    /// Clears every pending reminder regardless of the habit it was created for.
    /// Returns a handle in the `Cancelled` state for each reminder that was pending.
    #[instrument(skip(self))]
    pub async fn cancel_all(&self) -> Vec<ReminderHandle> {
        let cancelled = self
            .pending()
            .await
            .into_iter()
            .map(|r| ReminderHandle {
                id: r.id,
                state: ReminderState::Cancelled,
            })
            .collect::<Vec<_>>();
        self.store.remove(keys::REMINDERS).await;
        info!("Cancelled {} reminder(s)", cancelled.len());
        cancelled
    }

    /// Current state of reminder `id`. Ids missing from the table are `Unscheduled`.
    pub async fn state(&self, id: u64) -> ReminderState {
        let now = self.clock.now();
        let Some(reminder) = self.pending().await.into_iter().find(|r| r.id == id) else {
            return ReminderState::Unscheduled;
        };
        match reminder.next_fire(&now) {
            Ok(next_fire) => ReminderState::Scheduled { next_fire },
            Err(e) => {
                warn!("Reminder {id} can't fire: {e}");
                ReminderState::Unscheduled
            }
        }
    }

    pub async fn pending(&self) -> Vec<ScheduledReminder> {
        self.store.get(keys::REMINDERS).await.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Local, NaiveDate, TimeZone};
    use tempfile::{tempdir, TempDir};

    use crate::{
        reminder::{PermissionStatus, ReminderError, ReminderState},
        store::{file_store::FileStore, keys, KeyValueStore},
        utils::{clock::FixedClock, logging::TEST_LOGGING},
    };

    use super::ReminderScheduler;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn scheduler() -> Result<(TempDir, ReminderScheduler<FileStore>)> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().to_owned())?;
        let scheduler = ReminderScheduler::new(store, Box::new(FixedClock::at(today(), 10, 0)));
        Ok((dir, scheduler))
    }

    #[tokio::test]
    async fn test_schedule_daily() -> Result<()> {
        let (_dir, scheduler) = scheduler()?;

        let handle = scheduler.schedule_daily("Drink water", 9, 0).await?;

        let expected = Local
            .from_local_datetime(&today().succ_opt().unwrap().and_hms_opt(9, 0, 0).unwrap())
            .earliest()
            .unwrap();
        assert_eq!(handle.state, ReminderState::Scheduled { next_fire: expected });

        let pending = scheduler.pending().await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, handle.id);
        assert_eq!(pending[0].title, "Drink water");
        assert_eq!(pending[0].body, "Time for your habit: Drink water");
        assert_eq!((pending[0].hour, pending[0].minute), (9, 0));
        Ok(())
    }

    #[tokio::test]
    async fn test_same_name_is_not_deduplicated() -> Result<()> {
        let (_dir, scheduler) = scheduler()?;

        let first = scheduler.schedule_daily("Workout", 18, 0).await?;
        let second = scheduler.schedule_daily("Workout", 18, 0).await?;

        assert_ne!(first.id, second.id);
        assert_eq!(scheduler.pending().await.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_denied_permission_is_reported() -> Result<()> {
        let (_dir, scheduler) = scheduler()?;
        scheduler
            .store
            .set_raw(keys::NOTIFICATIONS, "false".into())
            .await;

        assert_eq!(scheduler.permission().await, PermissionStatus::Denied);
        assert_eq!(
            scheduler.schedule_daily("Workout", 18, 0).await,
            Err(ReminderError::PermissionDenied)
        );
        assert!(scheduler.pending().await.is_empty());

        scheduler
            .store
            .set_raw(keys::NOTIFICATIONS, "true".into())
            .await;
        assert_eq!(scheduler.permission().await, PermissionStatus::Granted);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_time_registers_nothing() -> Result<()> {
        let (_dir, scheduler) = scheduler()?;

        assert!(matches!(
            scheduler.schedule_daily("Workout", 25, 0).await,
            Err(ReminderError::InvalidTime { .. })
        ));
        assert!(scheduler.pending().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_all() -> Result<()> {
        let (_dir, scheduler) = scheduler()?;
        scheduler.schedule_daily("Workout", 18, 0).await?;
        scheduler.schedule_daily("Read", 21, 30).await?;

        let cancelled = scheduler.cancel_all().await;

        assert_eq!(cancelled.len(), 2);
        assert!(cancelled
            .iter()
            .all(|h| h.state == ReminderState::Cancelled));
        assert!(scheduler.pending().await.is_empty());
        assert!(scheduler.cancel_all().await.is_empty());
        let handle = scheduler.schedule_daily("Read", 21, 30).await?;
        assert_eq!(handle.id, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_state_follows_schedule_table() -> Result<()> {
        let (_dir, scheduler) = scheduler()?;
        assert_eq!(scheduler.state(1).await, ReminderState::Unscheduled);

        let handle = scheduler.schedule_daily("Workout", 18, 0).await?;
        assert_eq!(scheduler.state(handle.id).await, handle.state);

        scheduler.cancel_all().await;
        assert_eq!(scheduler.state(handle.id).await, ReminderState::Unscheduled);
        Ok(())
    }
}
