pub mod menu;
pub mod schedule;
