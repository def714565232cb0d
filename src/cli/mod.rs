pub mod context;
pub mod daemon_path;
pub mod dates;
pub mod habits;
pub mod process;
pub mod settings;
pub mod stats;

use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveTime;
use clap::{Parser, Subcommand};
use context::AppContext;
use daemon_path::to_daemon_path;
use dates::{parse_time_of_day, DateArgs};
use process::{kill_daemons, restart_daemon};
use settings::{process_reminders_command, process_settings_command, RemindersCommand, SettingsCommand};
use stats::process_stats_command;
use tracing::level_filters::LevelFilter;

use crate::{
    aggregate::{DEFAULT_SERIES_DAYS, DEFAULT_STREAK_WINDOW},
    daemon::start_daemon,
    utils::{
        dir::resolve_application_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

/// Longest window `stats` accepts, roughly ten years.
const MAX_SERIES_DAYS: i64 = 3660;

#[derive(Parser, Debug)]
#[command(name = "Habitual", version, long_about = None)]
#[command(about = "Track daily habits, streaks and reminders", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default $XDG_STATE_HOME/habitual or $HOME/.local/state/habitual"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Add a new habit, optionally with a daily reminder")]
    Add {
        name: String,
        #[arg(long, value_parser = parse_time_of_day, help = "Daily reminder time, e.g. 09:30")]
        remind: Option<NaiveTime>,
    },
    #[command(about = "Show today's habits with their streaks")]
    List {
        #[arg(long, default_value_t = DEFAULT_STREAK_WINDOW, help = "Longest streak that is counted")]
        window: u32,
    },
    #[command(about = "Toggle the check-in of a habit")]
    Check {
        #[arg(help = "Id or name of the habit")]
        habit: String,
        #[command(flatten)]
        date: DateArgs,
    },
    #[command(about = "Rename a habit")]
    Rename { habit: String, new_name: String },
    #[command(about = "Delete a habit")]
    Delete { habit: String },
    #[command(about = "Delete every habit")]
    Clear {
        #[arg(long)]
        yes: bool,
    },
    #[command(about = "Show completion of the last days")]
    Stats {
        #[arg(
            long,
            default_value_t = DEFAULT_SERIES_DAYS,
            value_parser = clap::value_parser!(u32).range(1..=MAX_SERIES_DAYS)
        )]
        days: u32,
        #[command(flatten)]
        end: DateArgs,
    },
    #[command(about = "Show or change settings")]
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommand>,
    },
    #[command(about = "Inspect or cancel scheduled reminders")]
    Reminders {
        #[command(subcommand)]
        command: RemindersCommand,
    },
    #[command(about = "Starts a reminder daemon in the background")]
    Init,
    #[command(about = "Run the reminder daemon in the current console. Used for debugging")]
    Serve,
    #[command(about = "Stop currently running daemon.")]
    Stop,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = resolve_application_path(args.dir)?;
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir.join("logs"), logging_level, args.log)?;

    let mut context = AppContext::open(&app_dir).await?;

    match args.commands {
        Commands::Add { name, remind } => habits::add(&context, name, remind).await,
        Commands::List { window } => habits::list(&context, window).await,
        Commands::Check { habit, date } => habits::check(&context, &habit, &date).await,
        Commands::Rename { habit, new_name } => habits::rename(&context, &habit, &new_name).await,
        Commands::Delete { habit } => habits::delete(&context, &habit).await,
        Commands::Clear { yes } => habits::clear(&context, yes).await,
        Commands::Stats { days, end } => process_stats_command(&context, days, &end).await,
        Commands::Settings { command } => {
            process_settings_command(&mut context, command.unwrap_or(SettingsCommand::Show)).await
        }
        Commands::Reminders { command } => process_reminders_command(&context, command).await,
        Commands::Init => {
            restart_daemon(&daemon_executable()?, &app_dir)?;
            println!("Reminder daemon started");
            Ok(())
        }
        Commands::Serve => start_daemon(&app_dir).await,
        Commands::Stop => {
            let stopped = kill_daemons(&daemon_executable()?);
            println!("Stopped {stopped} daemon(s)");
            Ok(())
        }
    }
}

fn daemon_executable() -> Result<PathBuf> {
    let cli = env::current_exe().context("Can't operate without an executable")?;
    Ok(to_daemon_path(cli))
}
