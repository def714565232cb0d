use anyhow::Result;
use chrono::Local;

use crate::aggregate::{
    average_completed, perfect_day_streak, weekly_series, SeriesPoint, DEFAULT_STREAK_WINDOW,
};

use super::{
    context::{AppContext, Palette},
    dates::DateArgs,
};

const BAR_WIDTH: usize = 20;

/// Prints the completion series for the `days` days ending at the requested date.
pub async fn process_stats_command(context: &AppContext, days: u32, end: &DateArgs) -> Result<()> {
    let end = end.resolve(Local::now())?;
    let (habits, progress) = context.repository.load_all().await;
    let series = weekly_series(&progress, end, days, habits.len() as u32);

    let palette = context.palette();
    println!("{}", palette.heading.paint(format!("Last {days} days")));
    for point in &series {
        println!("{}", format_point(point, &palette));
    }

    println!(
        "\nAverage habits completed per day: {:.1}",
        average_completed(&series)
    );
    println!(
        "Days in a row with everything done: {}",
        perfect_day_streak(&progress, end, days.max(DEFAULT_STREAK_WINDOW))
    );
    Ok(())
}

fn format_point(point: &SeriesPoint, palette: &Palette) -> String {
    let percentage = point.percentage();
    let filled = (*percentage / 100. * BAR_WIDTH as f64).round() as usize;
    format!(
        "{}\t{}/{}\t{:>4}\t{}{}",
        point.date.format("%a %Y-%m-%d"),
        point.completed,
        point.total,
        percentage.to_string(),
        palette.done.paint("#".repeat(filled)),
        palette.muted.paint(".".repeat(BAR_WIDTH - filled)),
    )
}
