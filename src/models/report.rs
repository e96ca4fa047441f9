//! Weather report model and terminal rendering

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::classifier::ClassificationResult;
use crate::models::TimeFrame;
use crate::moon::MoonPhase;
use crate::prompt::GeneratedPrompt;

/// Everything shown for one answered query
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    /// Location as sent to the model
    pub location: String,
    pub time_frame: TimeFrame,
    /// Prompt that produced `text`
    pub prompt: GeneratedPrompt,
    /// Model output, unmodified
    pub text: String,
    pub classification: ClassificationResult,
    pub moon_phase: Option<MoonPhase>,
    /// Model that generated the text
    pub model: String,
    pub generated_at: NaiveDateTime,
}

impl WeatherReport {
    /// Header line, e.g. `📍 Tokyo — Weekly forecast`
    #[must_use]
    pub fn headline(&self) -> String {
        format!("📍 {} — {}", self.location, self.time_frame.label())
    }
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline())?;
        writeln!(f)?;
        writeln!(f, "{}", self.text.trim())?;
        writeln!(f)?;
        writeln!(f, "   Weather visual: {}", self.classification.emoji())?;

        if let Some(phase) = &self.moon_phase {
            writeln!(f, "   Moon phase: {phase}")?;
        }

        writeln!(f, "---")?;
        write!(f, "✨ Powered by {}", self.model)
    }
}
