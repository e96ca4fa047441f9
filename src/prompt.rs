//! Prompt assembly for the text-generation call
//!
//! Turns a [`WeatherQuery`] into the instruction string sent to the model.
//! The output depends only on the query, so two builds of the same query
//! are byte-identical.

use std::fmt;

use chrono::{Days, NaiveDateTime};
use serde::Serialize;

use crate::models::{TimeFrame, WeatherQuery};

/// `Monday, 01 January 2024`
const FULL_DATE_FORMAT: &str = "%A, %d %B %Y";
/// `Monday, 01 January`
const LIST_DATE_FORMAT: &str = "%A, %d %B";
const DATE_SEPARATOR: &str = ", ";

/// Prompt text produced once per query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GeneratedPrompt(String);

impl GeneratedPrompt {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneratedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds forecaster instructions from a weather query
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptBuilder;

impl PromptBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Assemble the prompt.
    ///
    /// The caller must have validated the query first; an empty location is
    /// not rejected here.
    #[must_use]
    pub fn build(&self, query: &WeatherQuery) -> GeneratedPrompt {
        let detail_level = detail_level(query.detailed);
        let date_phrase = date_phrase(query.time_frame, query.requested_at);
        let units_line = query
            .units
            .map(|units| format!("Report all temperatures in {}.\n", units.temperature_scale()))
            .unwrap_or_default();

        GeneratedPrompt(format!(
            "
Act as a professional weather forecaster.
Provide {detail_level} weather information for **{location}**, {date_phrase}.
{units_line}
If detailed information is requested, include:
- Temperature (actual and feels like)
- Humidity and precipitation chances
- Wind speed and direction
- Air quality
- Sunrise and sunset times
- Any weather alerts or warnings

Use clear formatting (like bullet points). If unsure about data, state it's an estimate.
Also provide 1–2 friendly weather tips (e.g., carry an umbrella or stay hydrated).
",
            location = query.location.trim(),
        ))
    }
}

fn detail_level(detailed: bool) -> &'static str {
    if detailed { "detailed" } else { "brief" }
}

/// Lead-in naming the period the forecast covers
#[must_use]
pub fn date_phrase(time_frame: TimeFrame, now: NaiveDateTime) -> String {
    let today = now.format(FULL_DATE_FORMAT);
    match time_frame {
        TimeFrame::Current => format!("as of now ({today})"),
        TimeFrame::TodayForecast => format!("for today ({today})"),
        TimeFrame::Next24h => format!("for the next 24 hours (starting {today})"),
        TimeFrame::Next3Days => format!("for the next 3 days ({})", listed_dates(now, time_frame)),
        TimeFrame::WeeklyForecast => {
            format!("for the upcoming week ({})", listed_dates(now, time_frame))
        }
    }
}

fn listed_dates(start: NaiveDateTime, time_frame: TimeFrame) -> String {
    let days = u64::from(time_frame.listed_days().unwrap_or(1));
    (0..days)
        .filter_map(|offset| start.checked_add_days(Days::new(offset)))
        .map(|day| day.format(LIST_DATE_FORMAT).to_string())
        .collect::<Vec<_>>()
        .join(DATE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Units;
    use chrono::NaiveDate;
    use rstest::rstest;

    const WEEKDAYS: [&str; 7] = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ];

    fn new_year() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn query(time_frame: TimeFrame) -> WeatherQuery {
        WeatherQuery::new("Tokyo", time_frame, new_year())
    }

    fn weekday_count(text: &str) -> usize {
        WEEKDAYS.iter().map(|day| text.matches(day).count()).sum()
    }

    #[rstest]
    #[case(TimeFrame::Current, "as of now (Monday, 01 January 2024)")]
    #[case(TimeFrame::TodayForecast, "for today (Monday, 01 January 2024)")]
    #[case(
        TimeFrame::Next24h,
        "for the next 24 hours (starting Monday, 01 January 2024)"
    )]
    #[case(
        TimeFrame::Next3Days,
        "for the next 3 days (Monday, 01 January, Tuesday, 02 January, Wednesday, 03 January)"
    )]
    fn test_date_phrase(#[case] time_frame: TimeFrame, #[case] expected: &str) {
        assert_eq!(date_phrase(time_frame, new_year()), expected);
    }

    #[test]
    fn test_weekly_lists_seven_days() {
        let phrase = date_phrase(TimeFrame::WeeklyForecast, new_year());
        assert!(phrase.starts_with("for the upcoming week (Monday, 01 January, "));
        assert!(phrase.ends_with("Sunday, 07 January)"));
        assert_eq!(weekday_count(&phrase), 7);
    }

    #[test]
    fn test_listed_dates_cross_month_boundary() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 28)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        assert_eq!(
            listed_dates(start, TimeFrame::Next3Days),
            "Wednesday, 28 February, Thursday, 29 February, Friday, 01 March"
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = PromptBuilder::new();
        let q = query(TimeFrame::WeeklyForecast).with_units(Some(Units::Metric));
        assert_eq!(builder.build(&q), builder.build(&q));
    }

    #[test]
    fn test_current_and_today_differ_only_in_lead_in() {
        let builder = PromptBuilder::new();
        let current = builder.build(&query(TimeFrame::Current));
        let today = builder.build(&query(TimeFrame::TodayForecast));
        assert_ne!(current, today);
        assert_eq!(
            current.as_str().replace("as of now", "for today"),
            today.as_str()
        );
    }

    #[test]
    fn test_brief_substitutes_detail_word_only() {
        let builder = PromptBuilder::new();
        let detailed = builder.build(&query(TimeFrame::Current));
        let brief = builder.build(&query(TimeFrame::Current).with_detailed(false));
        assert!(brief.as_str().contains("Provide brief weather information"));
        assert!(brief.as_str().contains("If detailed information is requested, include:"));
        assert_eq!(
            detailed
                .as_str()
                .replacen("Provide detailed", "Provide brief", 1),
            brief.as_str()
        );
    }

    #[test]
    fn test_prompt_carries_instructions() {
        let prompt = PromptBuilder::new().build(&query(TimeFrame::Current));
        let text = prompt.as_str();
        assert!(text.contains("Act as a professional weather forecaster."));
        assert!(text.contains("**Tokyo**"));
        for item in [
            "Temperature (actual and feels like)",
            "Humidity and precipitation chances",
            "Wind speed and direction",
            "Air quality",
            "Sunrise and sunset times",
            "Any weather alerts or warnings",
        ] {
            assert!(text.contains(item), "missing instruction: {item}");
        }
        assert!(text.contains("bullet points"));
        assert!(text.contains("state it's an estimate"));
        assert!(text.contains("1–2 friendly weather tips"));
    }

    #[test]
    fn test_units_sentence_only_when_requested() {
        let builder = PromptBuilder::new();
        let plain = builder.build(&query(TimeFrame::Current));
        assert!(!plain.as_str().contains("Celsius"));
        assert!(!plain.as_str().contains("Fahrenheit"));

        let metric = builder.build(&query(TimeFrame::Current).with_units(Some(Units::Metric)));
        assert!(metric.as_str().contains("Report all temperatures in Celsius."));

        let imperial =
            builder.build(&query(TimeFrame::Current).with_units(Some(Units::Imperial)));
        assert!(imperial.as_str().contains("Report all temperatures in Fahrenheit."));
    }

    #[test]
    fn test_location_is_trimmed() {
        let q = WeatherQuery::new("  Berlin  ", TimeFrame::Current, new_year());
        let prompt = PromptBuilder::new().build(&q);
        assert!(prompt.as_str().contains("**Berlin**,"));
    }
}
