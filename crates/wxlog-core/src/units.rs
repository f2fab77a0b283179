//! Unit conversion and category utilities
//!
//! Pure functions: wind direction to compass point, wind speed to
//! Beaufort category, and UTC epoch seconds to local clock strings.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::fmt;

/// Metres per second to miles per hour
pub const MPS_TO_MPH: f64 = 2.23694;

/// `YYYY-MM-DD hh:mm AM/PM`, local civil time
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %I:%M %p";

/// `hh:mm AM/PM`
pub const CLOCK_FORMAT: &str = "%I:%M %p";

/// One of the 16 points of the compass
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CompassPoint {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl CompassPoint {
    /// Clockwise from north, 22.5° apart
    pub const ALL: [CompassPoint; 16] = [
        CompassPoint::N,
        CompassPoint::NNE,
        CompassPoint::NE,
        CompassPoint::ENE,
        CompassPoint::E,
        CompassPoint::ESE,
        CompassPoint::SE,
        CompassPoint::SSE,
        CompassPoint::S,
        CompassPoint::SSW,
        CompassPoint::SW,
        CompassPoint::WSW,
        CompassPoint::W,
        CompassPoint::WNW,
        CompassPoint::NW,
        CompassPoint::NNW,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NNE => "NNE",
            CompassPoint::NE => "NE",
            CompassPoint::ENE => "ENE",
            CompassPoint::E => "E",
            CompassPoint::ESE => "ESE",
            CompassPoint::SE => "SE",
            CompassPoint::SSE => "SSE",
            CompassPoint::S => "S",
            CompassPoint::SSW => "SSW",
            CompassPoint::SW => "SW",
            CompassPoint::WSW => "WSW",
            CompassPoint::W => "W",
            CompassPoint::WNW => "WNW",
            CompassPoint::NW => "NW",
            CompassPoint::NNW => "NNW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Beaufort wind force categories, calmest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Beaufort {
    Calm,
    LightAir,
    LightBreeze,
    GentleBreeze,
    ModerateBreeze,
    FreshBreeze,
    StrongBreeze,
    NearGale,
    Gale,
    StrongGale,
    Storm,
    ViolentStorm,
    HurricaneForce,
}

/// Upper bound (exclusive, mph) of every band except the last
const BEAUFORT_LIMITS_MPH: [(f64, Beaufort); 12] = [
    (1.0, Beaufort::Calm),
    (4.0, Beaufort::LightAir),
    (8.0, Beaufort::LightBreeze),
    (13.0, Beaufort::GentleBreeze),
    (19.0, Beaufort::ModerateBreeze),
    (25.0, Beaufort::FreshBreeze),
    (32.0, Beaufort::StrongBreeze),
    (39.0, Beaufort::NearGale),
    (47.0, Beaufort::Gale),
    (55.0, Beaufort::StrongGale),
    (64.0, Beaufort::Storm),
    (73.0, Beaufort::ViolentStorm),
];

impl Beaufort {
    pub fn label(self) -> &'static str {
        match self {
            Beaufort::Calm => "Calm",
            Beaufort::LightAir => "Light air",
            Beaufort::LightBreeze => "Light breeze",
            Beaufort::GentleBreeze => "Gentle breeze",
            Beaufort::ModerateBreeze => "Moderate breeze",
            Beaufort::FreshBreeze => "Fresh breeze",
            Beaufort::StrongBreeze => "Strong breeze",
            Beaufort::NearGale => "Near gale",
            Beaufort::Gale => "Gale",
            Beaufort::StrongGale => "Strong gale",
            Beaufort::Storm => "Storm",
            Beaufort::ViolentStorm => "Violent storm",
            Beaufort::HurricaneForce => "Hurricane force",
        }
    }
}

impl fmt::Display for Beaufort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a wind direction in degrees to the nearest of 16 compass points.
///
/// Any finite input is accepted; it is reduced modulo 360 first.
pub fn deg_to_compass(deg: f64) -> CompassPoint {
    let sector = (deg.rem_euclid(360.0) / 22.5).round() as usize;
    CompassPoint::ALL[sector % 16]
}

/// Beaufort category for a wind speed in mph. A speed exactly on a band
/// boundary belongs to the higher band.
pub fn beaufort_category(mph: f64) -> Beaufort {
    BEAUFORT_LIMITS_MPH
        .iter()
        .find(|(limit, _)| mph < *limit)
        .map(|(_, category)| *category)
        .unwrap_or(Beaufort::HurricaneForce)
}

/// Convert m/s to mph, rounded to 2 decimals
pub fn mps_to_mph(mps: f64) -> f64 {
    (mps * MPS_TO_MPH * 100.0).round() / 100.0
}

/// Civil time in `tz` for a UTC epoch, formatted `hh:mm AM/PM`.
///
/// Returns `None` only when the epoch is outside chrono's range.
pub fn utc_epoch_to_local_clock(epoch: i64, tz: &Tz) -> Option<String> {
    let utc = DateTime::<Utc>::from_timestamp(epoch, 0)?;
    Some(utc.with_timezone(tz).format(CLOCK_FORMAT).to_string())
}

/// Drop a single leading zero from a clock string ("06:05 AM" -> "6:05 AM")
pub fn strip_leading_zero(clock: &str) -> &str {
    clock.strip_prefix('0').unwrap_or(clock)
}

/// Local civil time for `instant`, truncated to the minute
pub fn local_minute(instant: DateTime<Utc>, tz: &Tz) -> NaiveDateTime {
    let local = instant.with_timezone(tz).naive_local();
    local
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(local)
}
