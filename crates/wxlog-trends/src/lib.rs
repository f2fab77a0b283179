//! Plot-ready views of the observation log
//!
//! Loads the whole log, orders it by time, and derives the series,
//! night-shading intervals and latest-conditions summary the dashboard
//! renders.

pub mod night;
pub mod panels;
pub mod summary;
pub mod trend;

pub use night::*;
pub use panels::*;
pub use summary::*;
pub use trend::*;

use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use wxlog_log::{LogError, LogRecord};

#[derive(Debug, Error)]
pub enum TrendError {
    #[error("Log error: {0}")]
    Log(#[from] LogError),
}

pub type TrendResult<T> = Result<T, TrendError>;

/// Everything the dashboard needs from one load of the log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub points: Vec<TrendPoint>,
    pub nights: Vec<NightInterval>,
    pub panels: Vec<Panel>,
    pub summary: Option<Summary>,
}

impl Dashboard {
    pub fn from_records(records: Vec<LogRecord>) -> Self {
        let points = build_trend(records);
        let nights = night_intervals(&points);
        let panels = panels(&points);
        let summary = Summary::from_points(&points);
        Self {
            points,
            nights,
            panels,
            summary,
        }
    }

    /// One read of the log at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> TrendResult<Self> {
        let records = wxlog_log::read_log(path)?;
        Ok(Self::from_records(records))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDateTime;
    use wxlog_log::LogRecord;

    /// Clear-sky record at `timestamp` (`%Y-%m-%d %H:%M`)
    pub(crate) fn record(timestamp: &str, rain: Option<f64>) -> LogRecord {
        LogRecord {
            timestamp: NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M").unwrap(),
            description: Some("Clear sky".into()),
            temp: Some(70.0),
            feels_like: Some(69.0),
            humidity: Some(40),
            temp_min: Some(65.0),
            temp_max: Some(75.0),
            wind_speed_mph: Some(5.0),
            wind_deg: Some(90.0),
            wind_compass: Some("E".into()),
            wind_desc: Some("Light breeze".into()),
            cloud_cover: Some(0),
            sunrise: Some("5:42 AM".into()),
            sunset: Some("8:38 PM".into()),
            rain_1h: rain,
            uv_index: Some(3.0),
            us_aqi: Some(20),
            us_aqi_desc: Some("Good".into()),
        }
    }
}
