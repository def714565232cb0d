use std::fmt::Display;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use chrono_english::parse_date_string;
use clap::ValueEnum;

use crate::utils::time::parse_date_key;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct DateArgs {
    #[arg(
        long = "date",
        short,
        help = "Day to use instead of today. Examples are \"2024-01-05\", \"yesterday\", \"15/03/2025\""
    )]
    pub date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    pub date_style: DateStyle,
}

impl DateArgs {
    /// Resolves the requested day relative to `now`, `now`'s day if none was given.
    pub fn resolve(&self, now: DateTime<Local>) -> Result<NaiveDate> {
        match &self.date {
            Some(date) => parse_day(date, now, self.date_style),
            None => Ok(now.date_naive()),
        }
    }
}

/// Accepts the storage format first and falls back to natural language.
pub fn parse_day(value: &str, now: DateTime<Local>, style: DateStyle) -> Result<NaiveDate> {
    if let Some(date) = parse_date_key(value) {
        return Ok(date);
    }
    parse_date_string(value, now, style.into())
        .map(|v| v.with_timezone(&Local).date_naive())
        .map_err(|e| anyhow!("Failed to parse date {value:?}: {e}"))
}

/// Parses a reminder time such as `09:30`.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|e| format!("expected HH:MM, got {value:?}: {e}"))
}
