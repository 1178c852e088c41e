use std::io::{Read, Write};

use anyhow::{Context, Result};
use mealbox_menu::{MenuLineItem, group_menu_items_by_day};

/// Reads a JSON array of menu line items and prints them grouped by day.
pub fn group(week_start: &str, input: impl Read, out: &mut impl Write) -> Result<()> {
    let items: Vec<MenuLineItem> =
        serde_json::from_reader(input).context("failed to read menu line items")?;

    let days = group_menu_items_by_day(&items, week_start)?;

    tracing::info!(
        week_start,
        items = items.len(),
        days = days.len(),
        "Grouped menu items by day"
    );

    serde_json::to_writer_pretty(&mut *out, &days)?;
    writeln!(out)?;

    Ok(())
}
