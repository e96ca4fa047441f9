//! Caller-owned session state
//!
//! Holds what the user supplied for this invocation: the API key and any
//! favorite locations. The assistant core never touches it; the CLI reads
//! it to pick a location and credentials before building a query.

use tracing::debug;

use crate::api::Credentials;
use crate::config::WeatherAiConfig;
use crate::error::WeatherAiError;

/// Environment variable consulted when no key is configured
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    api_key: Option<Credentials>,
    favorites: Vec<String>,
}

impl SessionState {
    /// Build the session from, in priority order, an explicit key, the
    /// configured key, and the `GEMINI_API_KEY` environment variable.
    #[must_use]
    pub fn from_sources(
        explicit_key: Option<String>,
        config: &WeatherAiConfig,
        env_key: Option<String>,
    ) -> Self {
        let api_key = [explicit_key, config.gemini.api_key.clone(), env_key]
            .into_iter()
            .flatten()
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .map(Credentials::new);
        debug!("Session API key present: {}", api_key.is_some());

        Self {
            api_key,
            favorites: config.defaults.favorites.clone(),
        }
    }

    /// Read the key from the process environment as the last fallback
    #[must_use]
    pub fn from_env(explicit_key: Option<String>, config: &WeatherAiConfig) -> Self {
        Self::from_sources(explicit_key, config, std::env::var(API_KEY_ENV).ok())
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Credentials for the generation call
    pub fn credentials(&self) -> crate::Result<&Credentials> {
        self.api_key.as_ref().ok_or_else(|| {
            WeatherAiError::config(format!(
                "No Gemini API key found. Pass --api-key, set {API_KEY_ENV}, or add api_key under [gemini] in the config file"
            ))
        })
    }

    #[must_use]
    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    /// Pick the location to query: an explicit one wins, otherwise the
    /// favorite at `favorite_index` (zero-based).
    pub fn resolve_location(
        &self,
        explicit: Option<&str>,
        favorite_index: Option<usize>,
    ) -> crate::Result<String> {
        if let Some(location) = explicit.map(str::trim).filter(|l| !l.is_empty()) {
            return Ok(location.to_string());
        }

        match favorite_index {
            Some(index) => self.favorites.get(index).cloned().ok_or_else(|| {
                WeatherAiError::validation(format!(
                    "No favorite at index {index} ({} configured)",
                    self.favorites.len()
                ))
            }),
            None => Err(WeatherAiError::validation(
                "Location cannot be empty. Enter a location or choose a favorite",
            )),
        }
    }
}
