use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calendar::event::TIME_FORMAT;
use crate::calendar::{EmptyWeekdays, RecurrencePolicy, ShortMonths};

pub const APP_DIR: &str = "calgrid";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config: {0}")]
    WriteError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub recurrence: RecurrenceConfig,
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub first_day_of_week: String,
    pub theme: String,
    pub time_format: String,
}

/// Policy names are kept as text so a typo degrades to the default instead
/// of refusing to start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecurrenceConfig {
    pub empty_weekdays: String,
    pub short_months: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EventsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            first_day_of_week: "Sunday".to_string(),
            theme: "default".to_string(),
            time_format: "24h".to_string(),
        }
    }
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            empty_weekdays: "start-weekday".to_string(),
            short_months: "skip".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    pub fn load_or_create() -> Result<Self, ConfigError> {
        Self::load_or_create_at(&Self::config_path())
    }

    pub fn load_or_create_at(config_path: &Path) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_toml(&content)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            tracing::info!("Wrote default config to {}", config_path.display());
            Ok(config)
        }
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        Ok(())
    }

    pub fn policy(&self) -> RecurrencePolicy {
        let empty_weekdays = match self.recurrence.empty_weekdays.to_lowercase().as_str() {
            "start-weekday" => EmptyWeekdays::StartWeekday,
            "reject" => EmptyWeekdays::Reject,
            other => {
                tracing::warn!("Unknown empty_weekdays policy '{}', using start-weekday", other);
                EmptyWeekdays::default()
            }
        };

        let short_months = match self.recurrence.short_months.to_lowercase().as_str() {
            "skip" => ShortMonths::Skip,
            "clamp" => ShortMonths::Clamp,
            other => {
                tracing::warn!("Unknown short_months policy '{}', using skip", other);
                ShortMonths::default()
            }
        };

        RecurrencePolicy { empty_weekdays, short_months }
    }

    pub fn week_start(&self) -> Weekday {
        match self.ui.first_day_of_week.parse::<Weekday>() {
            Ok(day) => day,
            Err(_) => {
                tracing::warn!(
                    "Unknown first_day_of_week '{}', using Sunday",
                    self.ui.first_day_of_week
                );
                Weekday::Sun
            }
        }
    }

    /// strftime pattern for event times, from `time_format = "12h" | "24h"`.
    pub fn clock_format(&self) -> &'static str {
        if self.ui.time_format.eq_ignore_ascii_case("12h") {
            "%I:%M %p"
        } else {
            TIME_FORMAT
        }
    }
}
