use anyhow::Result;
use clap::{Subcommand, ValueEnum};

use crate::{reminder::ReminderState, settings::Theme};

use super::context::AppContext;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    #[command(about = "Show current settings")]
    Show,
    #[command(about = "Set the theme. Toggles between light and dark when no theme is given")]
    Theme { theme: Option<Theme> },
    #[command(about = "Turn daily reminders on or off")]
    Notifications { state: Switch },
}

#[derive(Subcommand, Debug)]
pub enum RemindersCommand {
    #[command(about = "List scheduled reminders")]
    List,
    #[command(about = "Show the state of a reminder")]
    Show { id: u64 },
    #[command(about = "Cancel every scheduled reminder")]
    Cancel,
}

pub async fn process_settings_command(
    context: &mut AppContext,
    command: SettingsCommand,
) -> Result<()> {
    match command {
        SettingsCommand::Show => {}
        SettingsCommand::Theme { theme } => {
            let current = context.settings;
            context.settings = match theme {
                Some(theme) => current.set_theme(&context.store, theme).await,
                None => current.toggle_theme(&context.store).await,
            };
            println!("Switched to {} mode.", context.settings.theme);
        }
        SettingsCommand::Notifications { state } => {
            let enabled = matches!(state, Switch::On);
            let (settings, handles) = context
                .settings
                .set_notifications(
                    &context.store,
                    &context.repository,
                    &context.scheduler,
                    enabled,
                )
                .await?;
            context.settings = settings;
            if enabled {
                println!("Reminders enabled, {} scheduled.", handles.len());
            } else {
                println!("Reminders disabled.");
            }
        }
    }

    let palette = context.palette();
    println!("{}", palette.heading.paint("Settings"));
    println!("theme\t\t{}", context.settings.theme);
    println!(
        "notifications\t{}",
        if context.settings.notifications { "on" } else { "off" }
    );
    Ok(())
}

pub async fn process_reminders_command(
    context: &AppContext,
    command: RemindersCommand,
) -> Result<()> {
    match command {
        RemindersCommand::List => {
            let reminders = context.scheduler.pending().await;
            if reminders.is_empty() {
                println!("No reminders scheduled.");
            }
            for reminder in reminders {
                println!(
                    "{}\t{:02}:{:02}\t{}",
                    reminder.id, reminder.hour, reminder.minute, reminder.title
                );
            }
        }
        RemindersCommand::Show { id } => match context.scheduler.state(id).await {
            ReminderState::Scheduled { next_fire } => {
                println!("Reminder {id} fires next at {}", next_fire.format("%x %H:%M"))
            }
            ReminderState::Fired { at } => {
                println!("Reminder {id} fired at {}", at.format("%x %H:%M"))
            }
            ReminderState::Unscheduled | ReminderState::Cancelled => {
                println!("Reminder {id} is not scheduled")
            }
        },
        RemindersCommand::Cancel => {
            let cancelled = context.scheduler.cancel_all().await;
            println!("Cancelled {} reminder(s).", cancelled.len());
        }
    }
    Ok(())
}
