use time::{
    Date, Duration, OffsetDateTime, UtcOffset, Weekday, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::{Result, bail};

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Parses a calendar date.
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, in which case the UTC
/// calendar date of that instant is returned.
pub fn parse_date(input: &str) -> Result<Date> {
    let value = input.trim();

    if let Ok(date) = Date::parse(value, DATE_FORMAT) {
        return Ok(date);
    }

    if let Ok(datetime) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(datetime.to_offset(UtcOffset::UTC).date());
    }

    bail!("'{input}' is not a valid date, expected YYYY-MM-DD")
}

pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String> {
    Ok(timestamp.to_offset(UtcOffset::UTC).format(&Rfc3339)?)
}

/// Offsets a date by whole calendar days, rolling over months and years.
pub fn add_days(date: Date, days: i64) -> Result<Date> {
    let Some(shifted) = days
        .checked_mul(86_400)
        .and_then(|_| date.checked_add(Duration::days(days)))
    else {
        bail!(
            "{} + {days} days is outside the supported calendar range",
            format_date(date)
        );
    };

    Ok(shifted)
}

/// Day index 0..=6 where 0 is Sunday.
pub fn weekday_from_index(index: i64) -> Option<Weekday> {
    match u8::try_from(index) {
        Ok(index) if index <= 6 => Some(Weekday::Sunday.nth_next(index)),
        _ => None,
    }
}

pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.number_days_from_sunday()
}

pub fn day_name(weekday: Weekday) -> &'static str {
    DAY_NAMES[usize::from(weekday_index(weekday))]
}

/// Returns the Sunday on or before the given date.
pub fn week_start_for(date: Date) -> Date {
    date.saturating_sub(Duration::days(i64::from(weekday_index(date.weekday()))))
}
