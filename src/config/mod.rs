//! Configuration loading and validation.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Roster, RosterMember};
use crate::parse_duration;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Season-wide settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonConfig {
    /// Calendar year used for weekly binning. Defaults to the year of the
    /// earliest playlist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_year: Option<i32>,
}

/// A podium with fixed, hand-entered tallies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualPodium {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(default)]
    pub negative: bool,

    /// Player name to count
    #[serde(default)]
    pub tallies: BTreeMap<String, u32>,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Season snapshot (JSONL, one playlist per line, or a JSON array)
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// How often the snapshot is reloaded (e.g. "12h", "30m")
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub season: SeasonConfig,

    #[serde(default)]
    pub roster: Vec<RosterMember>,

    #[serde(default)]
    pub manual_podiums: Vec<ManualPodium>,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./data/playlists.jsonl")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_refresh_interval() -> String {
    "12h".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_level: default_log_level(),
            refresh_interval: default_refresh_interval(),
            server: ServerConfig::default(),
            season: SeasonConfig::default(),
            roster: Vec::new(),
            manual_podiums: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        match parse_duration(&self.refresh_interval) {
            Some(interval) if !interval.is_zero() => {}
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid refresh interval: {:?}",
                    self.refresh_interval
                )))
            }
        }

        let mut seen = HashSet::new();
        for member in &self.roster {
            if member.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Roster names must not be empty".to_string(),
                ));
            }
            if !seen.insert(member.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Duplicate roster name: {}",
                    member.name
                )));
            }
        }

        if let Some(year) = self.season.week_year {
            // The last week of the year may run six days into the next one
            let representable = NaiveDate::from_ymd_opt(year, 1, 1)
                .zip(NaiveDate::from_ymd_opt(year, 12, 31))
                .and_then(|(_, end)| end.checked_add_days(Days::new(6)))
                .is_some();
            if !representable {
                return Err(ConfigError::ValidationError(format!(
                    "Week year out of range: {}",
                    year
                )));
            }
        }

        if self.manual_podiums.iter().any(|p| p.title.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "Manual podium titles must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// The configured roster.
    pub fn roster(&self) -> Roster {
        Roster::new(self.roster.clone())
    }

    /// Reload interval. Falls back to 12 hours if unparseable.
    pub fn refresh_interval(&self) -> Duration {
        parse_duration(&self.refresh_interval).unwrap_or(Duration::from_secs(12 * 3600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_file, PathBuf::from("./data/playlists.jsonl"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.refresh_interval(), Duration::from_secs(43200));
        assert!(config.roster.is_empty());
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_interval() {
        let mut config = AppConfig::default();
        config.refresh_interval = "soon".to_string();
        assert!(config.validate().is_err());

        config.refresh_interval = "0s".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_duplicate_roster() {
        let mut config = AppConfig::default();
        config.roster = vec![
            RosterMember::new("alpha", "red"),
            RosterMember::new("alpha", "blue"),
        ];

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(msg)) if msg.contains("alpha")
        ));
    }

    #[test]
    fn test_config_validation_week_year_range() {
        let mut config = AppConfig::default();
        config.season.week_year = Some(2025);
        assert!(config.validate().is_ok());

        for year in [NaiveDate::MAX.year(), NaiveDate::MIN.year() - 1, i32::MAX] {
            config.season.week_year = Some(year);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::ValidationError(msg)) if msg.contains("Week year")
            ));
        }
    }

    #[test]
    fn test_config_parse_full() {
        let toml_str = r#"
            data_file = "/srv/season.jsonl"
            refresh_interval = "30m"

            [server]
            port = 9000

            [season]
            week_year = 2025

            [[roster]]
            name = "alpha"
            color = "rgb(173, 10, 202)"

            [[roster]]
            name = "bravo"
            joined = "2025-05-12"

            [[manual_podiums]]
            title = "Most Times Game Uninstalled"
            negative = true
            tallies = { alpha = 4 }
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.season.week_year, Some(2025));
        assert_eq!(config.refresh_interval(), Duration::from_secs(1800));

        let roster = config.roster();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.color_of("alpha"), "rgb(173, 10, 202)");
        assert!(roster.joined("bravo").is_some());

        assert_eq!(config.manual_podiums[0].tallies["alpha"], 4);
        assert!(config.manual_podiums[0].negative);
    }

    #[test]
    fn test_example_config_is_valid() {
        let config: AppConfig = toml::from_str(include_str!("../../config.example.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.roster.len(), 9);
        assert_eq!(config.manual_podiums.len(), 2);
        assert_eq!(
            config.roster().joined("galwayboy7"),
            NaiveDate::from_ymd_opt(2025, 5, 12)
        );
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_file, parsed.data_file);
    }
}
