//! The reminder daemon. It stands in for the notification facility of the platform: reminders
//! registered by [crate::reminder::scheduler::ReminderScheduler] end up in the store, the daemon
//! reads them back and delivers each one when it comes due.

use std::{path::Path, time::Duration};

use anyhow::Result;
use reminders::ReminderLoop;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{
    reminder::{
        notifier::{LogNotifier, Notifier},
        scheduler::ReminderScheduler,
    },
    store::{file_store::FileStore, KeyValueStore},
    utils::clock::{Clock, DefaultClock},
};

pub mod args;
pub mod reminders;
pub mod shutdown;

const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Represents the starting point for the daemon.
pub async fn start_daemon(dir: &Path) -> Result<()> {
    let store = FileStore::new(store_dir(dir))?;
    let shutdown_token = CancellationToken::new();

    let reminder_loop = create_reminder_loop(store, LogNotifier, &shutdown_token, DefaultClock);
    info!("Daemon serving reminders from {dir:?}");

    let (_, loop_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        async {
            let result = reminder_loop.run().await;
            // The loop only ends on its own because of an error, there's nothing left to wait for.
            shutdown_token.cancel();
            result
        },
    );

    if let Err(e) = &loop_result {
        error!("Reminder loop got an error {e:?}");
    }
    loop_result
}

/// Directory the key-value store lives in, shared by the CLI and the daemon.
pub fn store_dir(app_dir: &Path) -> std::path::PathBuf {
    app_dir.join("store")
}

fn create_reminder_loop<S: KeyValueStore>(
    store: S,
    notifier: impl Notifier + 'static,
    shutdown_token: &CancellationToken,
    clock: impl Clock + Clone,
) -> ReminderLoop<S> {
    ReminderLoop::new(
        ReminderScheduler::new(store, Box::new(clock.clone())),
        Box::new(notifier),
        shutdown_token.clone(),
        DEFAULT_REFRESH_INTERVAL,
        Box::new(clock),
    )
}
