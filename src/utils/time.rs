use chrono::{Days, NaiveDate};

/// Parses a date in the format habitual stores day keys in.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d").ok()
}

/// Returns `days` consecutive dates ending at `end` (inclusive), oldest first.
/// The window is cut short at the first representable date.
pub fn trailing_days(end: NaiveDate, days: u32) -> impl Iterator<Item = NaiveDate> {
    let available = end.signed_duration_since(NaiveDate::MIN).num_days() + 1;
    let days = i64::from(days).min(available);
    (0..days)
        .rev()
        .filter_map(move |offset| end.checked_sub_days(Days::new(offset as u64)))
}
