use std::collections::BTreeMap;

use mealbox_shared::{Result, add_days, day_name, format_date, parse_date, weekday_index};
use time::{Date, Weekday};

use crate::{DayMenu, MenuLineItem};

/// Groups menu line items by day for a week starting on `week_start` (`YYYY-MM-DD`).
pub fn group_menu_items_by_day(items: &[MenuLineItem], week_start: &str) -> Result<Vec<DayMenu>> {
    group_by_day(items, parse_date(week_start)?)
}

/// Groups menu line items by day.
///
/// Items without a day in `0..=6` or without a dish are left out. Days come
/// out in ascending order and only when they hold at least one item; within a
/// day items are stably sorted by meal position, a missing position counting
/// as 0.
pub fn group_by_day(items: &[MenuLineItem], week_start: Date) -> Result<Vec<DayMenu>> {
    let mut days: BTreeMap<u8, (Weekday, Vec<MenuLineItem>)> = BTreeMap::new();
    let mut dropped = 0usize;

    for item in items {
        let Some(weekday) = item.weekday().filter(|_| item.is_complete()) else {
            dropped += 1;
            continue;
        };

        days.entry(weekday_index(weekday))
            .or_insert_with(|| (weekday, Vec::new()))
            .1
            .push(item.clone());
    }

    if dropped > 0 {
        tracing::debug!(
            dropped,
            week_start = %format_date(week_start),
            "skipped incomplete menu items"
        );
    }

    days.into_iter()
        .map(|(day_of_week, (weekday, mut dishes))| -> Result<DayMenu> {
            dishes.sort_by_key(MenuLineItem::sort_position);

            Ok(DayMenu {
                day_of_week,
                day_name: day_name(weekday),
                date: add_days(week_start, i64::from(day_of_week))?,
                dishes,
            })
        })
        .collect()
}
