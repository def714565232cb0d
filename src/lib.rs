//! Small command line habit tracker. Habits are checked in once per day, the tracker keeps
//! streaks and a weekly completion series, and a background daemon fires daily reminders.
//! Everything is stored locally, there are no runtimes or servers involved.
//!

pub mod aggregate;
pub mod cli;
pub mod daemon;
pub mod fs;
pub mod habits;
pub mod reminder;
pub mod settings;
pub mod store;
pub mod utils;
