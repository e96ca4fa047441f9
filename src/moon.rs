//! Moon phase for the current instant
//!
//! Independent of any generated text. The lunar age is measured from a
//! reference new moon and converted to the illuminated fraction of the
//! disc, which is then bucketed into eight named phases.

use std::f64::consts::TAU;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

/// Mean length of a synodic month in days
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_853;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Upper bounds (exclusive) on illumination percent for each phase, in order.
/// Anything at or above 29% falls through to `WaningCrescent`, including a
/// fully lit disc.
const PHASE_THRESHOLDS: [(f64, MoonPhase); 7] = [
    (1.5, MoonPhase::New),
    (6.7, MoonPhase::WaxingCrescent),
    (13.8, MoonPhase::FirstQuarter),
    (20.7, MoonPhase::WaxingGibbous),
    (23.8, MoonPhase::Full),
    (27.0, MoonPhase::WaningGibbous),
    (29.0, MoonPhase::LastQuarter),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Bucket an illumination percentage (0-100) into a named phase
    #[must_use]
    pub fn from_illumination(percent: f64) -> Self {
        PHASE_THRESHOLDS
            .iter()
            .find(|(limit, _)| percent < *limit)
            .map_or(MoonPhase::WaningCrescent, |(_, phase)| *phase)
    }

    /// Phase at the given instant
    #[must_use]
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self::from_illumination(illumination_percent(instant))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            MoonPhase::New => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::Full => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }

    #[must_use]
    pub fn emoji(&self) -> &'static str {
        match self {
            MoonPhase::New => "🌑",
            MoonPhase::WaxingCrescent => "🌒",
            MoonPhase::FirstQuarter => "🌓",
            MoonPhase::WaxingGibbous => "🌔",
            MoonPhase::Full => "🌕",
            MoonPhase::WaningGibbous => "🌖",
            MoonPhase::LastQuarter => "🌗",
            MoonPhase::WaningCrescent => "🌘",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.name())
    }
}

/// New moon of 2000-01-06 18:14 UTC
fn reference_new_moon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Days since the most recent new moon, in `[0, SYNODIC_MONTH_DAYS)`
#[must_use]
pub fn lunar_age_days(instant: DateTime<Utc>) -> f64 {
    let elapsed = (instant - reference_new_moon()).num_seconds() as f64 / SECONDS_PER_DAY;
    elapsed.rem_euclid(SYNODIC_MONTH_DAYS)
}

/// Illuminated fraction of the lunar disc as a percentage
#[must_use]
pub fn illumination_percent(instant: DateTime<Utc>) -> f64 {
    let angle = TAU * lunar_age_days(instant) / SYNODIC_MONTH_DAYS;
    (1.0 - angle.cos()) / 2.0 * 100.0
}
