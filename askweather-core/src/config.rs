use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::{
    model::{MeasurementSystem, TempUnit, UnitPreference},
    nlu::EntityKeys,
};

pub const NLU_TOKEN_ENV: &str = "WITAI_CLIENT_ACCESS_TOKEN";
pub const WEATHER_KEY_ENV: &str = "WEATHER_API_KEY";

/// NLU service credentials and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NluConfig {
    pub access_token: Option<String>,
    pub base_url: String,
}

impl Default for NluConfig {
    fn default() -> Self {
        Self { access_token: None, base_url: "https://api.wit.ai".to_string() }
    }
}

/// Weather provider credentials and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: "https://api.weatherapi.com/v1".to_string() }
    }
}

/// Default units, used when a query does not name any.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitsConfig {
    pub temperature: TempUnit,
    pub measurement: MeasurementSystem,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [nlu]
/// access_token = "..."
///
/// [weather]
/// api_key = "..."
///
/// [units]
/// temperature = "fahrenheit"
/// measurement = "imperial"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub nlu: NluConfig,
    pub weather: WeatherConfig,
    pub units: UnitsConfig,
    pub entities: EntityKeys,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "askweather", "askweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn default_units(&self) -> UnitPreference {
        UnitPreference::new(self.units.temperature, self.units.measurement)
    }

    pub fn set_default_units(&mut self, units: UnitPreference) {
        self.units = UnitsConfig { temperature: units.temp_unit, measurement: units.measurement_system };
    }

    /// NLU access token from the config file, falling back to the environment.
    pub fn nlu_access_token(&self) -> Result<String> {
        secret(self.nlu.access_token.as_deref(), NLU_TOKEN_ENV).ok_or_else(|| {
            anyhow!(
                "No NLU access token configured.\n\
                 Hint: run `askweather configure` or set {NLU_TOKEN_ENV}."
            )
        })
    }

    /// Weather API key from the config file, falling back to the environment.
    pub fn weather_api_key(&self) -> Result<String> {
        secret(self.weather.api_key.as_deref(), WEATHER_KEY_ENV).ok_or_else(|| {
            anyhow!(
                "No weather API key configured.\n\
                 Hint: run `askweather configure` or set {WEATHER_KEY_ENV}."
            )
        })
    }
}

fn secret(configured: Option<&str>, env_var: &str) -> Option<String> {
    configured
        .map(str::to_owned)
        .or_else(|| env::var(env_var).ok())
        .filter(|s| !s.trim().is_empty())
}
