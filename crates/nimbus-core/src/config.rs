use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR: &str = "nimbus";
const CONFIG_FILE: &str = "config.toml";
const RECORDS_FILE: &str = "records.json";

/// Top-level configuration stored on disk as TOML.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Weather provider credentials
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Display preferences
    #[serde(default)]
    pub display: DisplayConfig,

    /// Record storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Configuration for the weather provider (API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OpenWeather API key
    /// Create at: https://home.openweathermap.org/api_keys
    pub api_key: String,
}

impl ProviderConfig {
    /// Check if an API key is configured (not the placeholder)
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.api_key.starts_with("YOUR_")
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: "YOUR_OPENWEATHER_API_KEY".to_string(),
        }
    }
}

/// Temperature unit preference for display output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    /// Temperature unit preference
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Override for the saved-records file; defaults to the platform data dir
    #[serde(default)]
    pub records_file: Option<PathBuf>,
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        Ok(config)
    }

    /// Save configuration, creating parent directories as needed
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(&config_path, toml)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Path to the config file under the platform config dir
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(CONFIG_FILE)
    }

    /// Path to the saved-records file: the configured override, or the platform data dir
    pub fn records_path(&self) -> PathBuf {
        if let Some(path) = &self.storage.records_file {
            return path.clone();
        }

        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(RECORDS_FILE)
    }

    /// Validate the configuration, returning any errors or warnings
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        if !self.provider.is_configured() {
            report.warnings.push(
                "provider.api_key: OpenWeather API key not configured - weather lookups will fail"
                    .to_string(),
            );
        }

        if let Some(path) = &self.storage.records_file {
            if path.as_os_str().is_empty() {
                report
                    .errors
                    .push("storage.records_file: path must not be empty".to_string());
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn default_api_key_is_not_configured() {
        let cfg = Config::default();
        assert!(!cfg.provider.is_configured());
    }

    #[test]
    fn real_api_key_is_configured() {
        let mut cfg = Config::default();
        cfg.provider.api_key = "0123456789abcdef".to_string();
        assert!(cfg.provider.is_configured());
    }

    #[test]
    fn empty_api_key_is_not_configured() {
        let mut cfg = Config::default();
        cfg.provider.api_key = String::new();
        assert!(!cfg.provider.is_configured());
    }

    #[test]
    fn validate_warns_on_placeholder_key() {
        let cfg = Config::default();
        let report = cfg.validate();
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("api_key"));
    }

    #[test]
    fn validate_rejects_empty_records_file() {
        let mut cfg = Config::default();
        cfg.storage.records_file = Some(PathBuf::new());
        let report = cfg.validate();
        assert!(!report.is_valid());
    }

    #[test]
    fn toml_round_trip_preserves_settings() {
        let mut cfg = Config::default();
        cfg.provider.api_key = "KEY".to_string();
        cfg.display.temperature_unit = TemperatureUnit::Fahrenheit;
        cfg.storage.records_file = Some(PathBuf::from("/tmp/records.json"));

        let serialized = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.provider.api_key, "KEY");
        assert_eq!(parsed.display.temperature_unit, TemperatureUnit::Fahrenheit);
        assert_eq!(
            parsed.storage.records_file,
            Some(PathBuf::from("/tmp/records.json"))
        );
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.display.temperature_unit, TemperatureUnit::Celsius);
        assert!(parsed.storage.records_file.is_none());
        assert!(!parsed.provider.is_configured());
    }

    #[test]
    fn records_path_honors_override() {
        let mut cfg = Config::default();
        cfg.storage.records_file = Some(PathBuf::from("/tmp/custom.json"));
        assert_eq!(cfg.records_path(), PathBuf::from("/tmp/custom.json"));
    }
}
