//! Keyword classification of generated weather text
//!
//! Maps free-text model output to a single display condition. Matching is
//! plain substring containment on the lower-cased text, evaluated in the
//! order of [`KEYWORD_PRIORITY`]; the first hit wins. There is no
//! tokenization or negation handling, so "no rain expected" is rain.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Display condition derived from a forecast text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Rain,
    Cloud,
    Clear,
    Snow,
    Storm,
    Fog,
    Default,
}

impl Condition {
    #[must_use]
    pub fn emoji(&self) -> &'static str {
        match self {
            Condition::Rain => "🌧️",
            Condition::Cloud => "☁️",
            Condition::Clear => "☀️",
            Condition::Snow => "❄️",
            Condition::Storm => "⛈️",
            Condition::Fog => "🌫️",
            Condition::Default => "🌤️",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}

/// Keyword table in evaluation order.
///
/// Rain outranks the sunny/clear keywords even when both appear. The order
/// is kept for compatibility with existing output; it may not reflect a
/// deliberate meteorological ranking.
pub const KEYWORD_PRIORITY: [(&str, Condition); 9] = [
    ("rain", Condition::Rain),
    ("cloud", Condition::Cloud),
    ("sunny", Condition::Clear),
    ("clear", Condition::Clear),
    ("snow", Condition::Snow),
    ("storm", Condition::Storm),
    ("thunder", Condition::Storm),
    ("fog", Condition::Fog),
    ("mist", Condition::Fog),
];

/// Outcome of classifying one response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub condition: Condition,
    /// Keyword that selected the condition; `None` for the default
    pub matched_keyword: Option<&'static str>,
}

impl ClassificationResult {
    #[must_use]
    pub fn emoji(&self) -> &'static str {
        self.condition.emoji()
    }
}

/// First-match-wins classifier over an ordered keyword table
#[derive(Debug, Clone, Copy)]
pub struct ResponseClassifier {
    rules: &'static [(&'static str, Condition)],
}

impl Default for ResponseClassifier {
    fn default() -> Self {
        Self {
            rules: &KEYWORD_PRIORITY,
        }
    }
}

impl ResponseClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules in evaluation order
    #[must_use]
    pub fn rules(&self) -> &'static [(&'static str, Condition)] {
        self.rules
    }

    #[must_use]
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let text = text.to_lowercase();
        let result = self
            .rules
            .iter()
            .find(|(keyword, _)| text.contains(keyword))
            .map_or(
                ClassificationResult {
                    condition: Condition::Default,
                    matched_keyword: None,
                },
                |&(keyword, condition)| ClassificationResult {
                    condition,
                    matched_keyword: Some(keyword),
                },
            );
        debug!(
            "Classified response as {:?} (keyword: {:?})",
            result.condition, result.matched_keyword
        );
        result
    }
}
