use crate::dates::{Clock, DATE_BEGINNING_DATA};
use crate::error::{DiggerError, Result};
use crate::util::parse_date_safe;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const URL_LATEST_DATA: &str =
    "https://github.com/pcm-dpc/COVID-19/raw/master/dati-json/dpc-covid19-ita-province-latest.json";
pub const URL_ALL_DATA: &str =
    "https://github.com/pcm-dpc/COVID-19/raw/master/dati-json/dpc-covid19-ita-province.json";

pub const DEFAULT_CONFIG_FILE: &str = "covid_digger.toml";
pub const CONFIG_ENV_VAR: &str = "COVID_DIGGER_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub dates: DatesConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub latest_url: String,
    pub full_url: String,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            latest_url: URL_LATEST_DATA.to_string(),
            full_url: URL_ALL_DATA.to_string(),
            timeout_seconds: 30,
            connect_timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatesConfig {
    /// `YYYY-MM-DD`; earlier requests are out of range.
    pub data_start: String,
    pub clock: Clock,
}

impl Default for DatesConfig {
    fn default() -> Self {
        Self { data_start: DATE_BEGINNING_DATA.to_string(), clock: Clock::default() }
    }
}

impl DatesConfig {
    pub fn start_date(&self) -> Result<NaiveDate> {
        parse_date_safe(Some(&self.data_start)).ok_or_else(|| {
            DiggerError::Config(format!(
                "dates.data_start '{}' is not a YYYY-MM-DD date",
                self.data_start
            ))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub hostname: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { hostname: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl Config {
    /// Explicit path first, then `$COVID_DIGGER_CONFIG`, then
    /// `covid_digger.toml` if it exists, else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }
        let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            return Self::from_file(&fallback);
        }
        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DiggerError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.dates.start_date()?;
        Ok(config)
    }
}
