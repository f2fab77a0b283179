//! Time-ordered trend points with sun times and rolling rainfall

use crate::TrendResult;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::path::Path;
use tracing::{instrument, warn};
use wxlog_core::{TrailingMean, CLOCK_FORMAT};
use wxlog_log::LogRecord;

/// A log record plus the values derived from its position in the log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    #[serde(flatten)]
    pub record: LogRecord,
    /// Record's calendar date combined with its sunrise clock time
    pub sunrise_dt: Option<NaiveDateTime>,
    pub sunset_dt: Option<NaiveDateTime>,
    /// Mean `rain_1h` over the trailing 7 days, this record included
    pub rain_7d_avg: Option<f64>,
}

impl TrendPoint {
    pub fn timestamp(&self) -> NaiveDateTime {
        self.record.timestamp
    }

    pub fn date(&self) -> NaiveDate {
        self.record.timestamp.date()
    }
}

/// Sort records by timestamp (stable, so ties keep file order) and
/// derive each point's sun times and 7-day rainfall mean.
pub fn build_trend(mut records: Vec<LogRecord>) -> Vec<TrendPoint> {
    records.sort_by_key(|r| r.timestamp);

    let mut rain = TrailingMean::weekly();
    records
        .into_iter()
        .map(|record| {
            let date = record.timestamp.date();
            let sunrise_dt = on_date(date, record.sunrise.as_deref());
            let sunset_dt = on_date(date, record.sunset.as_deref());
            let rain_7d_avg = rain.push(record.timestamp, record.rain_1h);
            TrendPoint {
                record,
                sunrise_dt,
                sunset_dt,
                rain_7d_avg,
            }
        })
        .collect()
}

/// Read the log at `path` and build its trend
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_trend<P: AsRef<Path>>(path: P) -> TrendResult<Vec<TrendPoint>> {
    let records = wxlog_log::read_log(path)?;
    Ok(build_trend(records))
}

/// Parse `h:mm AM/PM` (leading zero optional)
pub fn parse_clock(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), CLOCK_FORMAT).ok()
}

fn on_date(date: NaiveDate, clock: Option<&str>) -> Option<NaiveDateTime> {
    let clock = clock?;
    match parse_clock(clock) {
        Some(time) => Some(date.and_time(time)),
        None => {
            warn!(clock, %date, "unparseable sun time");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn test_sorts_out_of_order_records() {
        let points = build_trend(vec![
            record("2024-06-03 09:00", Some(0.0)),
            record("2024-06-01 09:00", Some(0.0)),
            record("2024-06-02 09:00", Some(0.0)),
        ]);
        let days: Vec<u32> = points.iter().map(|p| chrono::Datelike::day(&p.date())).collect();
        assert_eq!(days, vec![1, 2, 3]);
    }

    #[test]
    fn test_equal_timestamps_keep_file_order() {
        let mut first = record("2024-06-01 09:00", Some(1.0));
        first.description = Some("First".into());
        let mut second = record("2024-06-01 09:00", Some(2.0));
        second.description = Some("Second".into());

        let points = build_trend(vec![first, second]);
        assert_eq!(points[0].record.description.as_deref(), Some("First"));
        assert_eq!(points[1].record.description.as_deref(), Some("Second"));
    }

    #[test]
    fn test_sun_times_use_record_date() {
        let points = build_trend(vec![record("2024-06-01 09:00", None)]);
        assert_eq!(points[0].sunrise_dt.unwrap().to_string(), "2024-06-01 05:42:00");
        assert_eq!(points[0].sunset_dt.unwrap().to_string(), "2024-06-01 20:38:00");
    }

    #[test]
    fn test_missing_or_bad_sun_times() {
        let mut r = record("2024-06-01 09:00", None);
        r.sunrise = None;
        r.sunset = Some("dusk".into());
        let points = build_trend(vec![r]);
        assert_eq!(points[0].sunrise_dt, None);
        assert_eq!(points[0].sunset_dt, None);
    }

    #[test]
    fn test_rain_average_single_record() {
        let points = build_trend(vec![record("2024-06-01 09:00", Some(0.42))]);
        assert_eq!(points[0].rain_7d_avg, Some(0.42));
    }

    #[test]
    fn test_rain_average_trailing_window() {
        let points = build_trend(vec![
            record("2024-06-01 09:00", Some(3.0)),
            record("2024-06-04 09:00", Some(1.0)),
            record("2024-06-08 09:00", Some(2.0)),
            record("2024-06-09 09:00", Some(6.0)),
        ]);
        let avgs: Vec<f64> = points.iter().map(|p| p.rain_7d_avg.unwrap()).collect();
        assert_eq!(avgs[0], 3.0);
        assert_eq!(avgs[1], 2.0);
        // 06-01 is exactly seven days back and has dropped out
        assert_eq!(avgs[2], 1.5);
        assert!((avgs[3] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_clock_with_and_without_zero() {
        assert_eq!(parse_clock("6:05 AM"), NaiveTime::from_hms_opt(6, 5, 0));
        assert_eq!(parse_clock("06:05 PM"), NaiveTime::from_hms_opt(18, 5, 0));
        assert_eq!(parse_clock("12:00 AM"), NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(parse_clock("N/A"), None);
    }
}
