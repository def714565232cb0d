//! User preferences. [Settings] is loaded once at startup and handed to whoever renders; every
//! change goes through a setter that persists the value and returns the new state.

use std::fmt::Display;

use chrono::Timelike;
use clap::ValueEnum;
use tracing::info;

use crate::{
    habits::repository::HabitRepository,
    reminder::{scheduler::ReminderScheduler, ReminderError, ReminderHandle},
    store::{keys, KeyValueStore},
};

/// Title of the reminder scheduled when notifications are switched on and no habit has a time.
pub const DAILY_CHECK_IN_TITLE: &str = "Daily check-in";
pub const DAILY_CHECK_IN_HOUR: u32 = 9;
pub const DAILY_CHECK_IN_MINUTE: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub theme: Theme,
    pub notifications: bool,
}

impl Settings {
    /// Anything but `"dark"` is the light theme. Notifications are on unless explicitly `"false"`.
    pub async fn load(store: &impl KeyValueStore) -> Settings {
        let (theme, notifications) = futures::join!(
            store.get_raw(keys::THEME),
            store.get_raw(keys::NOTIFICATIONS)
        );
        Settings {
            theme: match theme.as_deref() {
                Some("dark") => Theme::Dark,
                _ => Theme::Light,
            },
            notifications: notifications.as_deref() != Some("false"),
        }
    }

    pub async fn set_theme(self, store: &impl KeyValueStore, theme: Theme) -> Settings {
        store.set_raw(keys::THEME, theme.to_string()).await;
        info!("Theme set to {theme}");
        Settings { theme, ..self }
    }

    pub async fn toggle_theme(self, store: &impl KeyValueStore) -> Settings {
        let theme = self.theme.toggled();
        self.set_theme(store, theme).await
    }

    /// Switches reminders on or off.
    ///
    /// Switching off cancels every pending reminder and revokes the permission the scheduler checks.
    /// Switching on grants it again and replaces the pending reminders with one per habit that has
    /// a reminder time, or a single [DAILY_CHECK_IN_TITLE] reminder at 09:00 if none has.
    pub async fn set_notifications<S: KeyValueStore, R: KeyValueStore>(
        self,
        store: &impl KeyValueStore,
        repository: &HabitRepository<S>,
        scheduler: &ReminderScheduler<R>,
        enabled: bool,
    ) -> Result<(Settings, Vec<ReminderHandle>), ReminderError> {
        store
            .set_raw(keys::NOTIFICATIONS, enabled.to_string())
            .await;
        let settings = Settings {
            notifications: enabled,
            ..self
        };
        info!("Notifications set to {enabled}");

        if !enabled {
            scheduler.cancel_all().await;
            return Ok((settings, vec![]));
        }

        scheduler.cancel_all().await;
        let mut wanted = repository
            .load_habits()
            .await
            .into_iter()
            .filter_map(|h| h.reminder_time.map(|time| (h.name, time.hour(), time.minute())))
            .collect::<Vec<_>>();
        if wanted.is_empty() {
            wanted.push((
                DAILY_CHECK_IN_TITLE.to_string(),
                DAILY_CHECK_IN_HOUR,
                DAILY_CHECK_IN_MINUTE,
            ));
        }

        let mut handles = Vec::with_capacity(wanted.len());
        for (name, hour, minute) in wanted {
            handles.push(scheduler.schedule_daily(&name, hour, minute).await?);
        }
        Ok((settings, handles))
    }
}
