//! Handles settings for the application. Configuration is read from
//! `config/settings.toml` (optional) and from `IOU_*` environment variables,
//! e.g. `IOU_TELEGRAM__TOKEN`.
//!
//! See `config/settings.example.toml` for the configuration.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/settings";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Database::Sqlite("iou.db".to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct Telegram {
    pub token: String,
    #[serde(default)]
    pub reject_invalid_amounts: bool,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub database: Database,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub telegram: Option<Telegram>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let path =
            std::env::var("IOU_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let settings = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix("IOU")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Parses the configured IANA timezone name.
    pub fn timezone(&self) -> Result<chrono_tz::Tz, String> {
        self.timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|err| format!("invalid timezone {:?}: {err}", self.timezone))
    }
}
