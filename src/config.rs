//! Configuration management for the `WeatherAI` assistant
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WeatherAiError;
use crate::models::{TimeFrame, Units};
use anyhow::{Context, Result};
use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `WeatherAI` assistant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherAiConfig {
    /// Text-generation API configuration
    pub gemini: GeminiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Default query settings
    pub defaults: DefaultsConfig,
}

/// Gemini API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key (may also come from `GEMINI_API_KEY` or `--api-key`)
    pub api_key: Option<String>,
    /// Base URL for the generative language API
    pub base_url: String,
    /// Model used for generation
    pub model: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
    /// Log output destination (console, file, both)
    pub output: String,
    /// Log file path
    pub file_path: String,
}

/// Default query settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Time frame used when none is given on the command line
    pub time_frame: TimeFrame,
    /// Ask for detailed rather than brief output
    pub detailed: bool,
    /// Unit preference; unset leaves units out of the prompt
    pub units: Option<Units>,
    /// Show the moon phase alongside each report
    pub show_moon_phase: bool,
    /// Favorite locations, addressable by index
    pub favorites: Vec<String>,
}

// Default value functions
fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_timeout() -> u32 {
    60
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_output() -> String {
    "console".to_string()
}

fn default_log_file_path() -> String {
    "~/.cache/weatherai/weatherai.log".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
            timeout_seconds: default_gemini_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            output: default_log_output(),
            file_path: default_log_file_path(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            time_frame: TimeFrame::Current,
            detailed: true,
            units: None,
            show_moon_phase: false,
            favorites: Vec::new(),
        }
    }
}

impl WeatherAiConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        Self::load_with_env(config_path, None)
    }

    /// Load with an explicit set of `WEATHERAI_*` variables instead of the
    /// process environment when `env` is `Some`
    fn load_with_env(config_path: Option<PathBuf>, env: Option<Map<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WEATHERAI_GEMINI__MODEL=... overrides [gemini] model
        builder = builder.add_source(
            Environment::with_prefix("WEATHERAI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeatherAiConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize configuration from {}", config_file.display()))?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weatherai").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.gemini.base_url.is_empty() {
            self.gemini.base_url = default_gemini_base_url();
        }
        if self.gemini.model.is_empty() {
            self.gemini.model = default_gemini_model();
        }
        if self.gemini.timeout_seconds == 0 {
            self.gemini.timeout_seconds = default_gemini_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.logging.output.is_empty() {
            self.logging.output = default_log_output();
        }
        if self.logging.file_path.is_empty() {
            self.logging.file_path = default_log_file_path();
        }
        self.defaults
            .favorites
            .retain(|favorite| !favorite.trim().is_empty());
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        // The key is optional here; it can still arrive via flag or environment
        if let Some(api_key) = &self.gemini.api_key {
            if api_key.trim().is_empty() {
                return Err(WeatherAiError::config(
                    "Gemini API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }

            if api_key.len() < 8 {
                return Err(WeatherAiError::config(
                    "Gemini API key appears to be invalid (too short). Please check your API key."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.gemini.timeout_seconds > 300 {
            return Err(WeatherAiError::config(
                "Gemini API timeout cannot exceed 300 seconds"
            ).into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherAiError::config(
                format!("Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_log_levels.join(", ")
                )
            ).into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherAiError::config(
                format!("Invalid log format '{}'. Must be one of: {}",
                    self.logging.format,
                    valid_log_formats.join(", ")
                )
            ).into());
        }

        let valid_log_outputs = ["console", "file", "both"];
        if !valid_log_outputs.contains(&self.logging.output.as_str()) {
            return Err(WeatherAiError::config(
                format!("Invalid log output '{}'. Must be one of: {}",
                    self.logging.output,
                    valid_log_outputs.join(", ")
                )
            ).into());
        }

        if !self.gemini.base_url.starts_with("http://") && !self.gemini.base_url.starts_with("https://") {
            return Err(WeatherAiError::config(
                "Gemini API base URL must be a valid HTTP or HTTPS URL"
            ).into());
        }

        Ok(())
    }
}

/// Expand a leading `~/` to the user's home directory
#[must_use]
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
