use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn};

use crate::{
    reminder::{
        notifier::{Notification, Notifier},
        scheduler::ReminderScheduler,
        ReminderHandle, ReminderState, ScheduledReminder,
    },
    store::KeyValueStore,
    utils::clock::Clock,
};

/// Fires scheduled reminders. This is the notification facility the scheduler registers with.
pub struct ReminderLoop<S: KeyValueStore> {
    schedule: ReminderScheduler<S>,
    notifier: Box<dyn Notifier>,
    shutdown: CancellationToken,
    /// Upper bound on a single sleep, so changes to the schedule table are picked up.
    refresh_interval: Duration,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> ReminderLoop<S> {
    pub fn new(
        schedule: ReminderScheduler<S>,
        notifier: Box<dyn Notifier>,
        shutdown: CancellationToken,
        refresh_interval: Duration,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            schedule,
            notifier,
            shutdown,
            refresh_interval,
            clock,
        }
    }

    /// Delivers every reminder that came due in `(since, now]`. Returns the delivered ones, each in
    /// the `Fired` state.
    fn fire_due(
        &mut self,
        reminders: &[ScheduledReminder],
        since: DateTime<Local>,
        now: DateTime<Local>,
    ) -> Vec<ReminderHandle> {
        let mut fired = vec![];
        for reminder in reminders {
            let due = match reminder.next_fire(&since) {
                Ok(due) => due,
                Err(e) => {
                    warn!("Skipping reminder {}: {e}", reminder.id);
                    continue;
                }
            };
            if due > now {
                continue;
            }

            let notification = Notification {
                title: reminder.title.clone(),
                body: reminder.body.clone(),
            };
            match self.notifier.deliver(&notification) {
                Ok(()) => {
                    debug!("Reminder {} fired", reminder.id);
                    fired.push(ReminderHandle {
                        id: reminder.id,
                        state: ReminderState::Fired { at: now },
                    });
                }
                Err(e) => error!("Failed to deliver reminder {}: {e:?}", reminder.id),
            }
        }
        fired
    }

    /// How long to sleep from `now`: until the earliest next trigger, but never past the refresh
    /// interval.
    fn next_wake(&self, reminders: &[ScheduledReminder], now: DateTime<Local>) -> Duration {
        reminders
            .iter()
            .filter_map(|r| r.next_fire(&now).ok())
            .filter_map(|next| (next - now).to_std().ok())
            .min()
            .map_or(self.refresh_interval, |until| until.min(self.refresh_interval))
    }

    /// Executes the reminder event loop until shutdown.
    pub async fn run(mut self) -> Result<()> {
        let mut last_wake = self.clock.now();
        info!("Reminder loop started at {last_wake}");
        loop {
            let now = self.clock.now();
            let reminders = self.schedule.pending().await;

            let fired = {
                let _span = info_span!("Firing due reminders").entered();
                self.fire_due(&reminders, last_wake, now)
            };
            if !fired.is_empty() {
                info!("Delivered {} reminder(s)", fired.len());
            }
            last_wake = now;

            let sleep_for = self.next_wake(&reminders, now);
            debug!("Sleeping for {sleep_for:?}");

            tokio::select! {
                biased;
                // Cancellation stops the loop, reminders that are due later are simply not fired.
                _ = self.shutdown.cancelled() => {
                    info!("Reminder loop stopped");
                    return Ok(())
                }
                _ = self.clock.sleep(sleep_for) => ()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        time::Duration,
    };

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::{DateTime, Local, NaiveDate, TimeZone};
    use tempfile::tempdir;
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    use crate::{
        reminder::{
            notifier::{MockNotifier, Notification},
            scheduler::ReminderScheduler,
            ReminderHandle, ReminderState, ScheduledReminder,
        },
        store::file_store::FileStore,
        utils::{clock::Clock, logging::TEST_LOGGING},
    };

    use super::ReminderLoop;

    #[derive(Clone)]
    struct TestClock {
        start_time: DateTime<Local>,
        reference: Instant,
    }

    impl TestClock {
        fn starting_at(hour: u32, minute: u32, second: u32) -> Self {
            let naive = NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(hour, minute, second)
                .unwrap();
            Self {
                start_time: Local.from_local_datetime(&naive).earliest().unwrap(),
                reference: Instant::now(),
            }
        }
    }

    #[async_trait]
    impl Clock for TestClock {
        fn now(&self) -> DateTime<Local> {
            self.start_time + self.reference.elapsed()
        }

        async fn sleep(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }
    }

    async fn run_for(
        clock: TestClock,
        notifier: MockNotifier,
        reminders: &[(&str, u32, u32)],
        run_time: Duration,
    ) -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let store = Arc::new(FileStore::new(dir.path().to_owned())?);
        let scheduler = ReminderScheduler::new(store.clone(), Box::new(clock.clone()));
        for (name, hour, minute) in reminders {
            scheduler.schedule_daily(name, *hour, *minute).await?;
        }

        let shutdown = CancellationToken::new();
        let reminder_loop = ReminderLoop::new(
            ReminderScheduler::new(store, Box::new(clock.clone())),
            Box::new(notifier),
            shutdown.clone(),
            Duration::from_secs(60),
            Box::new(clock),
        );

        let (_, result) = tokio::join!(
            async {
                tokio::time::sleep(run_time).await;
                shutdown.cancel()
            },
            reminder_loop.run(),
        );
        result
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_when_due() -> Result<()> {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_deliver()
            .withf(|n: &Notification| n.title == "Drink water")
            .times(1)
            .returning(|_| Ok(()));

        run_for(
            TestClock::starting_at(8, 58, 30),
            notifier,
            &[("Drink water", 9, 0)],
            Duration::from_secs(10 * 60),
        )
        .await
    }

    #[tokio::test]
    async fn test_fire_due_reports_fired_reminders() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let clock = TestClock::starting_at(9, 0, 0);
        let mut notifier = MockNotifier::new();
        notifier.expect_deliver().times(1).returning(|_| Ok(()));
        let mut reminder_loop = ReminderLoop::new(
            ReminderScheduler::new(FileStore::new(dir.path().to_owned())?, Box::new(clock.clone())),
            Box::new(notifier),
            CancellationToken::new(),
            Duration::from_secs(60),
            Box::new(clock.clone()),
        );
        let reminders = [
            ScheduledReminder {
                id: 1,
                title: "Drink water".into(),
                body: "Time for your habit: Drink water".into(),
                hour: 9,
                minute: 0,
            },
            ScheduledReminder {
                id: 2,
                title: "Workout".into(),
                body: "Time for your habit: Workout".into(),
                hour: 18,
                minute: 0,
            },
        ];
        let now = clock.start_time;

        let fired = reminder_loop.fire_due(&reminders, now - chrono::Duration::minutes(1), now);

        assert_eq!(
            fired,
            vec![ReminderHandle {
                id: 1,
                state: ReminderState::Fired { at: now },
            }]
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_due() -> Result<()> {
        let mut notifier = MockNotifier::new();
        notifier.expect_deliver().times(0);

        run_for(
            TestClock::starting_at(9, 30, 0),
            notifier,
            &[("Drink water", 9, 0), ("Workout", 18, 0)],
            Duration::from_secs(60 * 60),
        )
        .await
    }

    #[tokio::test(start_paused = true)]
    async fn test_delivery_failure_keeps_loop_running() -> Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut notifier = MockNotifier::new();
        notifier.expect_deliver().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("no display"))
        });

        run_for(
            TestClock::starting_at(8, 59, 0),
            notifier,
            &[("Drink water", 9, 0), ("Meditate", 9, 1)],
            Duration::from_secs(5 * 60),
        )
        .await?;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeats_next_day() -> Result<()> {
        let mut notifier = MockNotifier::new();
        notifier.expect_deliver().times(2).returning(|_| Ok(()));

        run_for(
            TestClock::starting_at(8, 0, 0),
            notifier,
            &[("Drink water", 9, 0)],
            Duration::from_secs(26 * 60 * 60),
        )
        .await
    }
}
