use mealbox_shared::{iso_date, weekday_from_index};
use serde::{Deserialize, Serialize};
use time::{Date, Weekday};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Minor currency units.
    #[serde(default)]
    pub price: Option<u32>,
}

/// One dish assigned to a day and meal slot of a weekly menu.
///
/// Rows come from a relational join, so the day and the dish may be missing
/// on partially seeded menus. The day is kept as read; anything outside
/// `0..=6` is treated as missing.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuLineItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub day_of_week: Option<i64>,
    #[serde(default)]
    pub meal_position: Option<i64>,
    #[serde(default)]
    pub dish: Option<Dish>,
}

impl MenuLineItem {
    pub fn weekday(&self) -> Option<Weekday> {
        self.day_of_week.and_then(weekday_from_index)
    }

    pub fn is_complete(&self) -> bool {
        self.weekday().is_some() && self.dish.is_some()
    }

    pub fn sort_position(&self) -> i64 {
        self.meal_position.unwrap_or(0)
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayMenu {
    pub day_of_week: u8,
    pub day_name: &'static str,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub dishes: Vec<MenuLineItem>,
}

impl DayMenu {
    pub fn meal_positions(&self) -> Vec<i64> {
        self.dishes.iter().map(MenuLineItem::sort_position).collect()
    }

    pub fn dish_names(&self) -> Vec<&str> {
        self.dishes
            .iter()
            .filter_map(|item| item.dish.as_ref().map(|dish| dish.name.as_str()))
            .collect()
    }
}
