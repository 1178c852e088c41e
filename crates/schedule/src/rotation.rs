use std::fmt;

use mealbox_shared::{Error, Result, format_date, week_start_for};
use serde::{Deserialize, Serialize};
use time::{Date, Weekday, macros::date};

/// Number of menu templates in one rotation cycle.
pub const ROTATION_LENGTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Fixed cycle of weekly menu templates.
///
/// The cycle rolls continuously from `epoch`, which must be a Sunday: the week
/// starting on the epoch is week 1, the next one week 2 and so on, wrapping
/// back to week 1 after [`ROTATION_LENGTH`] weeks. Weeks before the epoch
/// count backwards through the same cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    epoch: Date,
    templates: [TemplateId; ROTATION_LENGTH],
}

impl Rotation {
    pub fn new(epoch: Date, templates: [TemplateId; ROTATION_LENGTH]) -> Result<Self> {
        if epoch.weekday() != Weekday::Sunday {
            return Err(Error::Config(format!(
                "rotation epoch {} is a {}, expected a Sunday",
                format_date(epoch),
                epoch.weekday()
            )));
        }

        if let Some(position) = templates.iter().position(|t| t.as_str().trim().is_empty()) {
            return Err(Error::Config(format!(
                "rotation template {} has an empty id",
                position + 1
            )));
        }

        Ok(Self { epoch, templates })
    }

    pub fn epoch(&self) -> Date {
        self.epoch
    }

    pub fn templates(&self) -> &[TemplateId; ROTATION_LENGTH] {
        &self.templates
    }

    /// Rotation slot in `1..=ROTATION_LENGTH` for the week containing `date`.
    pub fn week_number(&self, date: Date) -> u8 {
        let weeks = (week_start_for(date) - self.epoch).whole_weeks();

        (weeks.rem_euclid(ROTATION_LENGTH as i64) + 1) as u8
    }

    pub fn template(&self, date: Date) -> &TemplateId {
        &self.templates[usize::from(self.week_number(date) - 1)]
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self {
            epoch: date!(2025 - 01 - 05),
            templates: [
                TemplateId::from("week-1"),
                TemplateId::from("week-2"),
                TemplateId::from("week-3"),
                TemplateId::from("week-4"),
            ],
        }
    }
}
