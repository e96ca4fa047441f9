//! Weather query model: what the user asked for and when

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::WeatherAiError;

/// Forecast horizon selected by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeFrame {
    #[default]
    #[serde(rename = "current")]
    Current,
    #[serde(rename = "today")]
    TodayForecast,
    #[serde(rename = "24h")]
    Next24h,
    #[serde(rename = "3-days")]
    Next3Days,
    #[serde(rename = "weekly")]
    WeeklyForecast,
}

impl TimeFrame {
    /// Human-readable label used in report headers
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            TimeFrame::Current => "Current weather",
            TimeFrame::TodayForecast => "Today's forecast",
            TimeFrame::Next24h => "Next 24 hours",
            TimeFrame::Next3Days => "Next 3 days",
            TimeFrame::WeeklyForecast => "Weekly forecast",
        }
    }

    /// Number of consecutive days listed in the prompt, if the frame lists days
    #[must_use]
    pub fn listed_days(&self) -> Option<u32> {
        match self {
            TimeFrame::Next3Days => Some(3),
            TimeFrame::WeeklyForecast => Some(7),
            _ => None,
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeFrame {
    type Err = WeatherAiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "current" | "now" | "current-weather" => Ok(TimeFrame::Current),
            "today" | "today-forecast" | "todays-forecast" => Ok(TimeFrame::TodayForecast),
            "24h" | "next-24h" | "next-24-hours" => Ok(TimeFrame::Next24h),
            "3-days" | "3days" | "next-3-days" => Ok(TimeFrame::Next3Days),
            "week" | "weekly" | "weekly-forecast" => Ok(TimeFrame::WeeklyForecast),
            _ => Err(WeatherAiError::validation(format!(
                "Unknown time frame '{s}'. Expected one of: current, today, 24h, 3-days, weekly"
            ))),
        }
    }
}

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    /// Temperature scale named in the prompt
    #[must_use]
    pub fn temperature_scale(&self) -> &'static str {
        match self {
            Units::Metric => "Celsius",
            Units::Imperial => "Fahrenheit",
        }
    }
}

impl FromStr for Units {
    type Err = WeatherAiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "celsius" | "c" => Ok(Units::Metric),
            "imperial" | "fahrenheit" | "f" => Ok(Units::Imperial),
            _ => Err(WeatherAiError::validation(format!(
                "Unknown units '{s}'. Expected metric or imperial"
            ))),
        }
    }
}

/// A single weather request, alive for one render cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherQuery {
    /// Free-text location as typed by the user
    pub location: String,
    /// Requested forecast horizon
    pub time_frame: TimeFrame,
    /// Itemized ("detailed") or short ("brief") answer
    pub detailed: bool,
    /// Unit preference; `None` leaves units out of the prompt entirely
    pub units: Option<Units>,
    /// Local wall-clock time the request was made
    pub requested_at: NaiveDateTime,
}

impl WeatherQuery {
    /// Create a detailed query without a unit preference
    #[must_use]
    pub fn new(location: impl Into<String>, time_frame: TimeFrame, requested_at: NaiveDateTime) -> Self {
        Self {
            location: location.into(),
            time_frame,
            detailed: true,
            units: None,
            requested_at,
        }
    }

    #[must_use]
    pub fn with_detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    #[must_use]
    pub fn with_units(mut self, units: Option<Units>) -> Self {
        self.units = units;
        self
    }

    /// Check the preconditions for building a prompt
    pub fn validate(&self) -> crate::Result<()> {
        if self.location.trim().is_empty() {
            return Err(WeatherAiError::validation("Location cannot be empty"));
        }
        Ok(())
    }
}
