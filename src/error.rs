//! Error types and handling for the `WeatherAI` assistant

use thiserror::Error;

/// Main error type for the `WeatherAI` assistant
#[derive(Error, Debug)]
pub enum WeatherAiError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Credential rejected by the text-generation service
    #[error("Authentication failed ({code}): {message}")]
    Auth { code: u16, message: String },

    /// Request quota exhausted on the text-generation service
    #[error("Rate limit exceeded ({code}): {message}")]
    RateLimit { code: u16, message: String },

    /// Any other failure reported by the text-generation service
    #[error("API error{}: {message}", code_suffix(.code))]
    Api { code: Option<u16>, message: String },

    /// Transport-level failures
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

fn code_suffix(code: &Option<u16>) -> String {
    code.map(|c| format!(" ({c})")).unwrap_or_default()
}

impl WeatherAiError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(code: Option<u16>, message: S) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Classify a non-success HTTP status from the text-generation service.
    ///
    /// 401 and 403 are credential problems, 429 is a quota problem and
    /// everything else is reported with the server's own message.
    pub fn from_status<S: Into<String>>(code: u16, message: S) -> Self {
        let message = message.into();
        match code {
            401 | 403 => Self::Auth { code, message },
            429 => Self::RateLimit { code, message },
            _ => Self::Api {
                code: Some(code),
                message,
            },
        }
    }

    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    #[must_use]
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimit { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherAiError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file and API key.")
            }
            WeatherAiError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            WeatherAiError::Auth { .. } => {
                "API key error. Please check your Gemini API key.".to_string()
            }
            WeatherAiError::RateLimit { .. } => {
                "Rate limit exceeded. Please try again later.".to_string()
            }
            WeatherAiError::Api { message, .. } => format!("An error occurred: {message}"),
            WeatherAiError::Network(err) => format!("An error occurred: {err}"),
            WeatherAiError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
