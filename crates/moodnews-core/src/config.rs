use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const OPENWEATHER_KEY_ENV: &str = "MOODNEWS_OPENWEATHER_KEY";
pub const NEWSAPI_KEY_ENV: &str = "MOODNEWS_NEWSAPI_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding config.toml and preferences.json
    pub config_dir: PathBuf,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub news: NewsConfig,

    /// Fixed coordinates used in place of a device location
    #[serde(default)]
    pub location: LocationConfig,
}

/// OpenWeather settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeather API key (can be set via MOODNEWS_OPENWEATHER_KEY)
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_weather_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// NewsAPI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// NewsAPI key (can be set via MOODNEWS_NEWSAPI_KEY)
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_news_base_url")]
    pub base_url: String,

    /// Country code for top headlines
    #[serde(default = "default_country")]
    pub country: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_news_base_url() -> String {
    "https://newsapi.org".to_string()
}

fn default_country() -> String {
    "us".to_string()
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_news_base_url(),
            country: default_country(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl NewsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl LocationConfig {
    /// Both coordinates, when both are configured
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            weather: WeatherConfig::default(),
            news: NewsConfig::default(),
            location: LocationConfig::default(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("moodnews")
}

impl Config {
    /// Load configuration from `path`, creating a default file if missing.
    ///
    /// API keys from the environment override the file but are never
    /// written back.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str::<Config>(&contents).context("Failed to parse config file")?
        } else {
            let mut config = Self::default();
            if let Some(parent) = path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(path)?;
            tracing::info!("Created default config at {}", path.display());
            config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated_from(path: &Path) -> Result<(Self, ValidationResult)> {
        let config = Self::load_from(path)?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(OPENWEATHER_KEY_ENV) {
            self.weather.api_key = key;
        }
        if let Ok(key) = std::env::var(NEWSAPI_KEY_ENV) {
            self.news.api_key = key;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);
        self.validate_url(&self.news.base_url, "news.base_url", &mut result);

        if self.weather.api_key.is_empty() {
            result.add_warning(
                "weather.api_key",
                format!("No OpenWeather API key; set it here or in {}", OPENWEATHER_KEY_ENV),
            );
        }
        if self.news.api_key.is_empty() {
            result.add_warning(
                "news.api_key",
                format!("No NewsAPI key; set it here or in {}", NEWSAPI_KEY_ENV),
            );
        }

        if self.weather.timeout_secs == 0 {
            result.add_error("weather.timeout_secs", "Timeout must be greater than 0");
        }
        if self.news.timeout_secs == 0 {
            result.add_error("news.timeout_secs", "Timeout must be greater than 0");
        }

        if self.news.country.len() != 2 {
            result.add_warning(
                "news.country",
                format!("Expected a two-letter country code, got: {}", self.news.country),
            );
        }

        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error("location.latitude", "Latitude must be within -90..=90");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    result.add_error("location.longitude", "Longitude must be within -180..=180");
                }
            }
            (Some(_), None) => {
                result.add_error("location.longitude", "Latitude is set without longitude")
            }
            (None, Some(_)) => {
                result.add_error("location.latitude", "Longitude is set without latitude")
            }
            (None, None) => {}
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }
                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Default path of the configuration file
    pub fn config_path() -> PathBuf {
        default_config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.news.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "news.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.weather.base_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = Config::default();
        config.news.timeout_secs = 0;
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "news.timeout_secs"));
    }

    #[test]
    fn test_half_configured_location_is_error() {
        let mut config = Config::default();
        config.location.latitude = Some(52.5);
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "location.longitude"));
    }

    #[test]
    fn test_out_of_range_latitude() {
        let mut config = Config::default();
        config.location = LocationConfig {
            latitude: Some(95.0),
            longitude: Some(13.4),
        };
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "location.latitude"));
    }

    #[test]
    fn test_missing_keys_are_warnings() {
        let mut config = Config::default();
        config.weather.api_key.clear();
        config.news.api_key.clear();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.api_key"));
        assert!(result.warnings.iter().any(|w| w.field == "news.api_key"));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.config_dir, dir.path());
        assert_eq!(config.news.country, "us");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "config_dir = \"/tmp/moodnews\"\n\n[location]\nlatitude = 48.85\nlongitude = 2.35\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.location.coordinates(), Some((48.85, 2.35)));
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org");
        assert_eq!(config.news.timeout_secs, 10);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
