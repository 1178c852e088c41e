use mealbox_shared::{Error, Result, add_days, bail, format_date, iso_date, week_start_for};
use serde::Serialize;
use time::{Date, OffsetDateTime, Time, UtcOffset, macros::time};

use crate::{Rotation, TemplateId};

const MAX_LOOKAHEAD_WEEKS: i64 = 52;

/// Order and delivery rules applied to every week of the rotation.
///
/// Offsets are counted in calendar days from the week start and all
/// timestamps are UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePolicy {
    pub rotation: Rotation,
    pub deadline_offset_days: i64,
    pub deadline_time: Time,
    pub delivery_offset_days: i64,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            rotation: Rotation::default(),
            deadline_offset_days: 3,
            deadline_time: time!(23:59:59),
            delivery_offset_days: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSchedule {
    #[serde(with = "iso_date")]
    pub week_start: Date,
    pub week_number: u8,
    pub template: TemplateId,
    #[serde(with = "time::serde::rfc3339")]
    pub order_deadline: OffsetDateTime,
    #[serde(with = "iso_date")]
    pub delivery_date: Date,
}

impl SchedulePolicy {
    pub fn week_number_for_date(&self, date: Date) -> u8 {
        self.rotation.week_number(date)
    }

    pub fn template_for_date(&self, date: Date) -> &TemplateId {
        self.rotation.template(date)
    }

    /// Cutoff after which orders against the week's menu are rejected.
    pub fn order_deadline(&self, week_start: Date) -> Result<OffsetDateTime> {
        Ok(add_days(week_start, self.deadline_offset_days)?
            .with_time(self.deadline_time)
            .assume_utc())
    }

    pub fn delivery_date(&self, week_start: Date) -> Result<Date> {
        add_days(week_start, self.delivery_offset_days)
    }

    pub fn week_schedule(&self, week_start: Date) -> Result<WeekSchedule> {
        Ok(WeekSchedule {
            week_start,
            week_number: self.week_number_for_date(week_start),
            template: self.template_for_date(week_start).clone(),
            order_deadline: self.order_deadline(week_start)?,
            delivery_date: self.delivery_date(week_start)?,
        })
    }

    pub fn is_ordering_open(&self, week_start: Date, now: OffsetDateTime) -> Result<bool> {
        Ok(now <= self.order_deadline(week_start)?)
    }

    /// Schedules for the week containing `from` and the `count - 1` weeks after it.
    pub fn upcoming_weeks(&self, from: Date, count: usize) -> Result<Vec<WeekSchedule>> {
        let start = week_start_for(from);

        let Some(last_offset) = i64::try_from(count)
            .ok()
            .and_then(|count| count.checked_sub(1))
            .and_then(|weeks| weeks.checked_mul(7))
        else {
            bail!("{count} weeks is outside the supported calendar range");
        };

        if count > 0 {
            add_days(start, last_offset)?;
        }

        let mut weeks = Vec::with_capacity(count.min(MAX_LOOKAHEAD_WEEKS as usize));

        for i in 0..count {
            let week_start = add_days(start, 7 * i as i64)?;
            weeks.push(self.week_schedule(week_start)?);
        }

        Ok(weeks)
    }

    /// First week, starting with the current one, still accepting orders at `now`.
    pub fn next_open_week(&self, now: OffsetDateTime) -> Result<WeekSchedule> {
        let current = week_start_for(now.to_offset(UtcOffset::UTC).date());

        for i in 0..=MAX_LOOKAHEAD_WEEKS {
            let week_start = add_days(current, 7 * i)?;
            let schedule = self.week_schedule(week_start)?;

            if now <= schedule.order_deadline {
                tracing::debug!(
                    week_start = %format_date(week_start),
                    skipped = i,
                    "found open ordering week"
                );

                return Ok(schedule);
            }
        }

        Err(Error::Config(format!(
            "no week accepts orders within {MAX_LOOKAHEAD_WEEKS} weeks of {}, \
             check deadline_offset_days ({}) and deadline_time ({})",
            format_date(current),
            self.deadline_offset_days,
            self.deadline_time
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_order_deadline_default() {
        let policy = SchedulePolicy::default();

        assert_eq!(
            policy.order_deadline(date!(2025 - 01 - 05)).unwrap(),
            datetime!(2025-01-08 23:59:59 UTC)
        );
    }

    #[test]
    fn test_deadline_crosses_month_and_year() {
        let policy = SchedulePolicy::default();

        assert_eq!(
            policy.order_deadline(date!(2024 - 12 - 29)).unwrap(),
            datetime!(2025-01-01 23:59:59 UTC)
        );
        assert_eq!(
            policy.delivery_date(date!(2024 - 12 - 29)).unwrap(),
            date!(2025 - 01 - 04)
        );
        assert_eq!(
            policy.delivery_date(date!(2024 - 02 - 25)).unwrap(),
            date!(2024 - 03 - 02)
        );
    }

    #[test]
    fn test_custom_offsets() {
        let policy = SchedulePolicy {
            deadline_offset_days: -2,
            deadline_time: time!(18:00),
            delivery_offset_days: 1,
            ..Default::default()
        };

        assert_eq!(
            policy.order_deadline(date!(2025 - 01 - 05)).unwrap(),
            datetime!(2025-01-03 18:00 UTC)
        );
        assert_eq!(
            policy.delivery_date(date!(2025 - 01 - 05)).unwrap(),
            date!(2025 - 01 - 06)
        );
    }

    #[test]
    fn test_is_ordering_open() {
        let policy = SchedulePolicy::default();
        let week = date!(2025 - 01 - 05);

        assert!(
            policy
                .is_ordering_open(week, datetime!(2025-01-08 23:59:59 UTC))
                .unwrap()
        );
        assert!(
            !policy
                .is_ordering_open(week, datetime!(2025-01-09 00:00:00 UTC))
                .unwrap()
        );
        // 23:30 at UTC-1 is already past the UTC cutoff
        assert!(
            !policy
                .is_ordering_open(week, datetime!(2025-01-08 23:30:00 -01:00))
                .unwrap()
        );
    }

    #[test]
    fn test_upcoming_weeks_from_midweek() {
        let policy = SchedulePolicy::default();
        let weeks = policy.upcoming_weeks(date!(2025 - 01 - 29), 5).unwrap();

        let starts = weeks.iter().map(|w| w.week_start).collect::<Vec<_>>();
        assert_eq!(
            starts,
            vec![
                date!(2025 - 01 - 26),
                date!(2025 - 02 - 02),
                date!(2025 - 02 - 09),
                date!(2025 - 02 - 16),
                date!(2025 - 02 - 23),
            ]
        );

        let numbers = weeks.iter().map(|w| w.week_number).collect::<Vec<_>>();
        assert_eq!(numbers, vec![4, 1, 2, 3, 4]);
        assert_eq!(weeks[1].template.as_str(), "week-1");
        assert_eq!(weeks[1].delivery_date, date!(2025 - 02 - 08));
    }

    #[test]
    fn test_upcoming_weeks_empty() {
        let policy = SchedulePolicy::default();

        assert!(
            policy
                .upcoming_weeks(date!(2025 - 01 - 05), 0)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_upcoming_weeks_rejects_oversized_count() {
        let policy = SchedulePolicy::default();

        for count in [usize::MAX, usize::MAX / 7, 1_000_000] {
            let err = policy
                .upcoming_weeks(date!(2025 - 01 - 05), count)
                .unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "{count}");
        }

        // Only the last week of the calendar still fits
        let weeks = policy.upcoming_weeks(date!(9999 - 12 - 31), 1).unwrap();
        assert_eq!(weeks.len(), 1);
        assert!(policy.upcoming_weeks(date!(9999 - 12 - 31), 2).is_err());
    }

    #[test]
    fn test_next_open_week_error_names_deadline_fields() {
        let policy = SchedulePolicy {
            deadline_offset_days: -1000,
            ..Default::default()
        };

        let err = policy
            .next_open_week(datetime!(2025-01-06 08:00 UTC))
            .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        let message = err.to_string();
        assert!(message.contains("deadline_offset_days (-1000)"), "{message}");
        assert!(message.contains("deadline_time"), "{message}");
    }

    #[test]
    fn test_next_open_week() {
        let policy = SchedulePolicy::default();

        let open = policy
            .next_open_week(datetime!(2025-01-07 12:00 UTC))
            .unwrap();
        assert_eq!(open.week_start, date!(2025 - 01 - 05));

        let open = policy
            .next_open_week(datetime!(2025-01-10 12:00 UTC))
            .unwrap();
        assert_eq!(open.week_start, date!(2025 - 01 - 12));
        assert_eq!(open.week_number, 2);
    }

    #[test]
    fn test_next_open_week_with_early_deadline() {
        let policy = SchedulePolicy {
            deadline_offset_days: -10,
            ..Default::default()
        };

        // Deadline for the week of 2025-01-19 is 2025-01-09 23:59:59
        let open = policy
            .next_open_week(datetime!(2025-01-06 08:00 UTC))
            .unwrap();
        assert_eq!(open.week_start, date!(2025 - 01 - 19));
    }

    #[test]
    fn test_week_schedule_serializes_camel_case() {
        let policy = SchedulePolicy::default();
        let schedule = policy.week_schedule(date!(2025 - 01 - 05)).unwrap();
        let value = serde_json::to_value(&schedule).unwrap();

        assert_eq!(value["weekStart"], "2025-01-05");
        assert_eq!(value["weekNumber"], 1);
        assert_eq!(value["template"], "week-1");
        assert_eq!(value["orderDeadline"], "2025-01-08T23:59:59Z");
        assert_eq!(value["deliveryDate"], "2025-01-11");
    }
}
