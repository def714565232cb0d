use anyhow::{anyhow, Result};
use chrono::{Local, NaiveTime, Timelike};
use clap::CommandFactory;

use crate::{
    aggregate::{completion_percentage, recompute_day, streak},
    habits::{entities::Habit, HabitError},
    reminder::{ReminderError, ReminderState},
};

use super::{context::AppContext, dates::DateArgs, Args};

/// Validation errors are reported the same way clap reports bad arguments.
fn validation_error(e: HabitError) -> anyhow::Error {
    Args::command()
        .error(clap::error::ErrorKind::ValueValidation, e.to_string())
        .into()
}

async fn resolve(context: &AppContext, selector: &str) -> Result<Habit> {
    context
        .repository
        .find(selector)
        .await
        .ok_or_else(|| anyhow!("No habit with id or name {selector:?}"))
}

pub async fn add(context: &AppContext, name: String, remind: Option<NaiveTime>) -> Result<()> {
    let habit = context
        .repository
        .add_habit(&name, remind)
        .await
        .map_err(validation_error)?;
    println!("Added {} ({})", habit.name, habit.id);

    let Some(time) = habit.reminder_time else {
        return Ok(());
    };
    match context
        .scheduler
        .schedule_daily(&habit.name, time.hour(), time.minute())
        .await
    {
        Ok(handle) => {
            if let ReminderState::Scheduled { next_fire } = handle.state {
                println!("Daily reminder set, next at {}", next_fire.format("%x %H:%M"));
            }
        }
        Err(ReminderError::PermissionDenied) => {
            println!(
                "Habit saved, but notifications are off so no reminder was set. \
                 Enable them with `habitual settings notifications on`"
            );
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub async fn list(context: &AppContext, window: u32) -> Result<()> {
    let palette = context.palette();
    let today = context.repository.today();
    let habits = context.repository.load_habits().await;

    println!("{}", palette.heading.paint("Today's habits"));
    if habits.is_empty() {
        println!(
            "{}",
            palette.muted.paint("No habits yet. Add one with `habitual add <name>`")
        );
        return Ok(());
    }

    for habit in &habits {
        let done = habit.is_checked_in(today);
        let (mark, style) = if done {
            ("[x]", palette.done)
        } else {
            ("[ ]", palette.pending)
        };
        let reminder = habit
            .reminder_time
            .map(|t| format!("  reminder {}", t.format("%H:%M")))
            .unwrap_or_default();
        println!(
            "{} {}  {}{}",
            style.paint(mark),
            style.paint(habit.name.as_str()),
            palette.muted.paint(format!(
                "streak {}  id {}",
                streak(&habit.history, today, window),
                habit.id
            )),
            palette.muted.paint(reminder),
        );
    }

    let progress = recompute_day(&habits, today);
    println!(
        "\n{}/{} done ({})",
        progress.completed,
        progress.total,
        completion_percentage(progress)
    );
    Ok(())
}

pub async fn check(context: &AppContext, selector: &str, date: &DateArgs) -> Result<()> {
    let habit = resolve(context, selector).await?;
    let date = date.resolve(Local::now())?;
    let progress = context
        .repository
        .toggle_check_in(&habit.id, date)
        .await
        .ok_or_else(|| anyhow!("Habit {} disappeared while checking in", habit.id))?;

    let state = if habit.is_checked_in(date) {
        "unchecked"
    } else {
        "checked in"
    };
    println!(
        "{} {state} for {date}. {}/{} done ({})",
        habit.name,
        progress.completed,
        progress.total,
        completion_percentage(progress)
    );
    Ok(())
}

pub async fn rename(context: &AppContext, selector: &str, new_name: &str) -> Result<()> {
    let habit = resolve(context, selector).await?;
    let renamed = context
        .repository
        .rename_habit(&habit.id, new_name)
        .await
        .map_err(validation_error)?;
    if renamed {
        println!("Renamed {} to {}", habit.name, new_name.trim());
    }
    Ok(())
}

pub async fn delete(context: &AppContext, selector: &str) -> Result<()> {
    let habit = resolve(context, selector).await?;
    if context.repository.delete_habit(&habit.id).await {
        println!("Deleted {}", habit.name);
    }
    Ok(())
}

pub async fn clear(context: &AppContext, confirmed: bool) -> Result<()> {
    if !confirmed {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "Clearing removes every habit. Pass --yes to confirm",
            )
            .into());
    }
    context.repository.clear_all().await;
    println!("All habits have been cleared.");
    Ok(())
}
