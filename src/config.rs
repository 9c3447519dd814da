//! Configuration management for the airport locator
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::LocatorError;
use crate::models::EntityLabel;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Geocoding service configuration
    pub geocoder: GeocoderConfig,
    /// Airport dataset configuration
    pub catalog: CatalogConfig,
    /// Entity extraction configuration
    pub extractor: ExtractorConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Base URL of a Nominatim-compatible search API
    #[serde(default = "default_geocoder_base_url")]
    pub base_url: String,
    /// User agent sent with every request (required by Nominatim)
    #[serde(default = "default_geocoder_user_agent")]
    pub user_agent: String,
    /// Preferred language for returned names
    #[serde(default = "default_geocoder_language")]
    pub language: String,
    /// Upper bound for a single lookup, retries included
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_geocoder_max_retries")]
    pub max_retries: u32,
    /// Minimum delay between two requests in milliseconds
    #[serde(default = "default_geocoder_min_interval")]
    pub min_interval_ms: u64,
}

/// Airport dataset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Local CSV file holding the airport table
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
    /// Where to fetch the table from when the file is missing
    #[serde(default = "default_catalog_source_url")]
    pub source_url: String,
    /// Download the table when `path` does not exist
    #[serde(default = "default_true")]
    pub download_if_missing: bool,
    /// Keep only airports with scheduled passenger service
    #[serde(default = "default_true")]
    pub scheduled_only: bool,
    /// Airport types to keep (empty keeps every type)
    #[serde(default = "default_airport_types")]
    pub airport_types: Vec<String>,
}

/// Entity extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Entity labels treated as location candidates
    #[serde(default = "default_extractor_labels")]
    pub labels: Vec<String>,
    /// Geocode the whole input when no entity is found
    #[serde(default)]
    pub fallback_to_full_text: bool,
    /// Extra gazetteer file, one place name per line
    #[serde(default)]
    pub gazetteer_path: Option<PathBuf>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_geocoder_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_geocoder_user_agent() -> String {
    "airport_locator".to_string()
}

fn default_geocoder_language() -> String {
    "en".to_string()
}

fn default_geocoder_timeout() -> u32 {
    10
}

fn default_geocoder_max_retries() -> u32 {
    2
}

fn default_geocoder_min_interval() -> u64 {
    1000
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("dataset/airports.csv")
}

fn default_catalog_source_url() -> String {
    "https://davidmegginson.github.io/ourairports-data/airports.csv".to_string()
}

fn default_true() -> bool {
    true
}

fn default_airport_types() -> Vec<String> {
    ["large_airport", "medium_airport", "small_airport"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_extractor_labels() -> Vec<String> {
    ["GPE", "LOC", "FAC"].into_iter().map(String::from).collect()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_base_url(),
            user_agent: default_geocoder_user_agent(),
            language: default_geocoder_language(),
            timeout_seconds: default_geocoder_timeout(),
            max_retries: default_geocoder_max_retries(),
            min_interval_ms: default_geocoder_min_interval(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            source_url: default_catalog_source_url(),
            download_if_missing: true,
            scheduled_only: true,
            airport_types: default_airport_types(),
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            labels: default_extractor_labels(),
            fallback_to_full_text: false,
            gazetteer_path: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ExtractorConfig {
    /// Parse the configured label names
    pub fn entity_labels(&self) -> crate::Result<Vec<EntityLabel>> {
        self.labels
            .iter()
            .map(|label| {
                label.parse::<EntityLabel>().map_err(|_| {
                    LocatorError::config(format!(
                        "Invalid entity label '{label}'. Must be one of: GPE, LOC, FAC, ORG"
                    ))
                })
            })
            .collect()
    }
}

impl LocatorConfig {
    /// Load configuration from the given file (or the default location) and
    /// environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // AIRPORT_LOCATOR_GEOCODER__TIMEOUT_SECONDS=5 overrides geocoder.timeout_seconds
        builder = builder.add_source(
            Environment::with_prefix("AIRPORT_LOCATOR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: LocatorConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("airport-locator").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.geocoder.base_url.is_empty() {
            self.geocoder.base_url = default_geocoder_base_url();
        }
        if self.geocoder.user_agent.is_empty() {
            self.geocoder.user_agent = default_geocoder_user_agent();
        }
        if self.geocoder.timeout_seconds == 0 {
            self.geocoder.timeout_seconds = default_geocoder_timeout();
        }
        if self.catalog.path.as_os_str().is_empty() {
            self.catalog.path = default_catalog_path();
        }
        if self.catalog.source_url.is_empty() {
            self.catalog.source_url = default_catalog_source_url();
        }
        if self.extractor.labels.is_empty() {
            self.extractor.labels = default_extractor_labels();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.extractor.entity_labels()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.geocoder.timeout_seconds > 120 {
            return Err(
                LocatorError::config("Geocoder timeout cannot exceed 120 seconds").into(),
            );
        }

        if self.geocoder.max_retries > 10 {
            return Err(LocatorError::config("Geocoder max retries cannot exceed 10").into());
        }

        if self.geocoder.min_interval_ms > 60_000 {
            return Err(LocatorError::config(
                "Geocoder minimum request interval cannot exceed 60000 ms",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(LocatorError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(LocatorError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Geocoder base URL", &self.geocoder.base_url),
            ("Catalog source URL", &self.catalog.source_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(LocatorError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = LocatorConfig::default();
        assert_eq!(config.geocoder.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.geocoder.timeout_seconds, 10);
        assert_eq!(config.geocoder.min_interval_ms, 1000);
        assert_eq!(config.catalog.path, PathBuf::from("dataset/airports.csv"));
        assert!(config.catalog.scheduled_only);
        assert_eq!(config.extractor.labels, vec!["GPE", "LOC", "FAC"]);
        assert!(!config.extractor.fallback_to_full_text);
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = LocatorConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = LocatorConfig::default();
        config.geocoder.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_rejects_unknown_label() {
        let mut config = LocatorConfig::default();
        config.extractor.labels = vec!["GPE".to_string(), "PERSON".to_string()];
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid entity label"));
    }

    #[test]
    fn test_config_validation_rejects_non_http_url() {
        let mut config = LocatorConfig::default();
        config.geocoder.base_url = "ftp://example.org".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = LocatorConfig::default();
        config.geocoder.base_url.clear();
        config.extractor.labels.clear();
        config.geocoder.timeout_seconds = 0;
        config.apply_defaults();
        assert_eq!(config.geocoder.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.extractor.labels.len(), 3);
        assert_eq!(config.geocoder.timeout_seconds, 10);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[geocoder]
timeout_seconds = 5
user_agent = "test-agent"

[extractor]
labels = ["GPE", "ORG"]
fallback_to_full_text = true
"#
        )
        .unwrap();

        let config = LocatorConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.geocoder.timeout_seconds, 5);
        assert_eq!(config.geocoder.user_agent, "test-agent");
        assert!(config.extractor.fallback_to_full_text);
        assert_eq!(
            config.extractor.entity_labels().unwrap(),
            vec![EntityLabel::Gpe, EntityLabel::Org]
        );
        // Sections absent from the file keep their defaults
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.geocoder.max_retries, 2);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = LocatorConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("airport-locator"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
