use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone};

use super::ReminderError;

/// How many days ahead a candidate is searched for. A local time that falls into a DST gap
/// doesn't exist on that day, the next day has it.
const MAX_DAY_SHIFTS: u64 = 2;

/// Returns the next moment strictly after `now` at which a daily reminder set to `hour:minute`
/// fires. Today at `hour:minute:00` if that's still ahead, the same time tomorrow otherwise, so
/// the result is always in the future and at most a day away.
pub fn compute_next_trigger<Tz: TimeZone>(
    hour: u32,
    minute: u32,
    now: &DateTime<Tz>,
) -> Result<DateTime<Tz>, ReminderError> {
    let time =
        NaiveTime::from_hms_opt(hour, minute, 0).ok_or(ReminderError::InvalidTime { hour, minute })?;

    let today = now.date_naive();
    for shift in 0..=MAX_DAY_SHIFTS {
        let Some(candidate) = at_local_time(&now.timezone(), today, shift, time) else {
            continue;
        };
        if candidate > *now {
            return Ok(candidate);
        }
    }
    Err(ReminderError::InvalidTime { hour, minute })
}

fn at_local_time<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    shift: u64,
    time: NaiveTime,
) -> Option<DateTime<Tz>> {
    let date = date.checked_add_days(Days::new(shift))?;
    tz.from_local_datetime(&date.and_time(time)).earliest()
}
