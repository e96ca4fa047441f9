//! `WeatherAI` - AI weather assistant
//!
//! This library turns a location and time frame into a forecaster prompt,
//! asks a hosted text-generation model for the forecast, and classifies the
//! reply into a display condition.

pub mod api;
pub mod assistant;
pub mod classifier;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod moon;
pub mod prompt;
pub mod session;

// Re-export core types for public API
pub use api::{Credentials, GeminiClient, GeneratedText, TextGenerator};
pub use assistant::WeatherAssistant;
pub use classifier::{ClassificationResult, Condition, KEYWORD_PRIORITY, ResponseClassifier};
pub use config::WeatherAiConfig;
pub use error::WeatherAiError;
pub use models::{TimeFrame, Units, WeatherQuery, WeatherReport};
pub use moon::MoonPhase;
pub use prompt::{GeneratedPrompt, PromptBuilder};
pub use session::SessionState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherAiError>;
