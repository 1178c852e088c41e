use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use mealbox_schedule::{ROTATION_LENGTH, Rotation, SchedulePolicy, TemplateId};
use serde::Deserialize;
use std::env;
use strum::{AsRefStr, Display, EnumString};
use time::{Time, macros::format_description};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleConfig {
    /// Sunday that starts week 1 of the rotation, `YYYY-MM-DD`
    #[serde(default = "default_epoch")]
    pub epoch: String,
    #[serde(default = "default_templates")]
    pub templates: Vec<String>,
    #[serde(default = "default_deadline_offset_days")]
    pub deadline_offset_days: i64,
    /// UTC time of day, `HH:MM:SS`
    #[serde(default = "default_deadline_time")]
    pub deadline_time: String,
    #[serde(default = "default_delivery_offset_days")]
    pub delivery_offset_days: i64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            epoch: default_epoch(),
            templates: default_templates(),
            deadline_offset_days: default_deadline_offset_days(),
            deadline_time: default_deadline_time(),
            delivery_offset_days: default_delivery_offset_days(),
        }
    }
}

fn default_epoch() -> String {
    "2025-01-05".to_string()
}

fn default_templates() -> Vec<String> {
    (1..=ROTATION_LENGTH).map(|i| format!("week-{i}")).collect()
}

fn default_deadline_offset_days() -> i64 {
    3
}

fn default_deadline_time() -> String {
    "23:59:59".to_string()
}

fn default_delivery_offset_days() -> i64 {
    6
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (MEALBOX__SCHEDULE__EPOCH, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Config file is optional
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MEALBOX")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("schedule.templates"),
        );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.logging.level.trim().is_empty() {
            return Err("Logging level must not be empty".to_string());
        }

        self.schedule_policy()?;

        Ok(())
    }

    pub fn schedule_policy(&self) -> Result<SchedulePolicy, String> {
        let schedule = &self.schedule;

        let epoch = mealbox_shared::parse_date(&schedule.epoch).map_err(|e| e.to_string())?;

        let templates: [TemplateId; ROTATION_LENGTH] = schedule
            .templates
            .iter()
            .map(|t| TemplateId::new(t.trim()))
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|t: Vec<TemplateId>| {
                format!(
                    "Schedule rotation needs exactly {ROTATION_LENGTH} templates, got {}",
                    t.len()
                )
            })?;

        let deadline_time = Time::parse(
            schedule.deadline_time.trim(),
            format_description!("[hour]:[minute]:[second]"),
        )
        .map_err(|e| format!("Invalid schedule deadline_time '{}': {e}", schedule.deadline_time))?;

        Ok(SchedulePolicy {
            rotation: Rotation::new(epoch, templates).map_err(|e| e.to_string())?,
            deadline_offset_days: schedule.deadline_offset_days,
            deadline_time,
            delivery_offset_days: schedule.delivery_offset_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    #[test]
    fn test_default_matches_default_policy() {
        let policy = Config::default().schedule_policy().unwrap();

        assert_eq!(policy, SchedulePolicy::default());
        assert_eq!(policy.rotation.epoch(), date!(2025 - 01 - 05));
        assert_eq!(policy.deadline_time, time!(23:59:59));
    }

    #[test]
    fn test_validation_wrong_template_count() {
        let config = Config {
            schedule: ScheduleConfig {
                templates: vec!["a".to_string(), "b".to_string()],
                ..Default::default()
            },
            logging: LoggingConfig::default(),
        };

        let err = config.validate().unwrap_err();
        assert!(err.contains("exactly 4 templates"), "{err}");
    }

    #[test]
    fn test_validation_epoch_not_sunday() {
        let config = Config {
            schedule: ScheduleConfig {
                epoch: "2025-01-06".to_string(),
                ..Default::default()
            },
            logging: LoggingConfig::default(),
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bad_deadline_time() {
        let config = Config {
            schedule: ScheduleConfig {
                deadline_time: "25:00:00".to_string(),
                ..Default::default()
            },
            logging: LoggingConfig::default(),
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_log_level() {
        let config = Config {
            schedule: ScheduleConfig::default(),
            logging: LoggingConfig {
                level: " ".to_string(),
                format: LogFormat::Json,
            },
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::Pretty.to_string(), "pretty");
    }
}
