//! Data models for the WeatherAI assistant
//!
//! - Query: what the user asked for and when
//! - Report: the answered query as shown to the user

pub mod query;
pub mod report;

// Re-export all public types for convenient access
pub use query::{TimeFrame, Units, WeatherQuery};
pub use report::WeatherReport;
