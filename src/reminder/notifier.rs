use anyhow::Result;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Contract for whatever actually shows a reminder to the user.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn deliver(&mut self, notification: &Notification) -> Result<()>;
}

/// Reports notifications through the log and stdout. Used when no desktop integration exists.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn deliver(&mut self, notification: &Notification) -> Result<()> {
        info!(title = %notification.title, "Reminder fired: {}", notification.body);
        println!("{}: {}", notification.title, notification.body);
        Ok(())
    }
}
