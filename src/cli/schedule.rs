use std::io::Write;

use anyhow::Result;
use mealbox_schedule::SchedulePolicy;
use mealbox_shared::{format_date, parse_date, week_start_for};
use time::OffsetDateTime;

/// Prints the schedule of the week containing `date`.
pub fn schedule(policy: &SchedulePolicy, date: &str, out: &mut impl Write) -> Result<()> {
    let date = parse_date(date)?;
    let week_start = week_start_for(date);
    let schedule = policy.week_schedule(week_start)?;

    tracing::info!(
        date = %format_date(date),
        week_start = %format_date(week_start),
        week_number = schedule.week_number,
        "Computed week schedule"
    );

    serde_json::to_writer_pretty(&mut *out, &schedule)?;
    writeln!(out)?;

    Ok(())
}

pub fn upcoming(
    policy: &SchedulePolicy,
    from: Option<&str>,
    weeks: usize,
    out: &mut impl Write,
) -> Result<()> {
    let from = match from {
        Some(from) => parse_date(from)?,
        None => OffsetDateTime::now_utc().date(),
    };

    let schedules = policy.upcoming_weeks(from, weeks)?;

    tracing::info!(from = %format_date(from), weeks, "Computed upcoming weeks");

    serde_json::to_writer_pretty(&mut *out, &schedules)?;
    writeln!(out)?;

    Ok(())
}
