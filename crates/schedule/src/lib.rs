mod calculator;
mod rotation;

pub use calculator::*;
pub use rotation::*;

use std::sync::LazyLock;

use mealbox_shared::{Result, parse_date};
use time::{Date, OffsetDateTime};

static DEFAULT_POLICY: LazyLock<SchedulePolicy> = LazyLock::new(SchedulePolicy::default);

/// Rotation slot for the week containing `date`, using the default policy.
pub fn week_number_for_date(date: &str) -> Result<u8> {
    Ok(DEFAULT_POLICY.week_number_for_date(parse_date(date)?))
}

pub fn order_deadline(week_start: &str) -> Result<OffsetDateTime> {
    DEFAULT_POLICY.order_deadline(parse_date(week_start)?)
}

pub fn delivery_date(week_start: &str) -> Result<Date> {
    DEFAULT_POLICY.delivery_date(parse_date(week_start)?)
}
