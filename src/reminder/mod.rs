//! Daily reminders.
//!
//! A reminder goes through `Unscheduled -> Scheduled -> (Fired -> Scheduled) | Cancelled`.
//! [scheduler::ReminderScheduler] registers reminders in the persisted schedule table, the daemon
//! (see [crate::daemon]) plays the role of the notification facility and fires them through a
//! [notifier::Notifier].

pub mod notifier;
pub mod scheduler;
pub mod trigger;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use trigger::compute_next_trigger;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReminderError {
    #[error("notifications are not permitted")]
    PermissionDenied,
    #[error("{hour:02}:{minute:02} is not a valid time of day")]
    InvalidTime { hour: u32, minute: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderState {
    Unscheduled,
    Scheduled { next_fire: DateTime<Local> },
    Fired { at: DateTime<Local> },
    Cancelled,
}

/// One daily repeating registration, stored under the `reminders` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledReminder {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub hour: u32,
    pub minute: u32,
}

impl ScheduledReminder {
    pub fn next_fire(&self, now: &DateTime<Local>) -> Result<DateTime<Local>, ReminderError> {
        compute_next_trigger(self.hour, self.minute, now)
    }
}

/// Returned to whoever scheduled a reminder. There is no per-habit deduplication, keeping track of
/// handles is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderHandle {
    pub id: u64,
    pub state: ReminderState,
}
