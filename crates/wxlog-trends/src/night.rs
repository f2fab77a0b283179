//! Night shading intervals: each day's sunset to the next day's sunrise

use crate::trend::TrendPoint;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Assumed night length when no following sunrise is known
pub const FALLBACK_NIGHT: TimeDelta = TimeDelta::hours(12);

/// Half-open `[start, end)` span of darkness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NightInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Sun times settled for one calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySun {
    pub date: NaiveDate,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
}

/// One entry per date, ascending. The first present sunrise and sunset
/// seen for a date win; later disagreeing values are ignored.
pub fn daily_sun_times(points: &[TrendPoint]) -> Vec<DailySun> {
    let mut days: BTreeMap<NaiveDate, DailySun> = BTreeMap::new();

    for point in points {
        let date = point.date();
        let day = days.entry(date).or_insert(DailySun {
            date,
            sunrise: None,
            sunset: None,
        });
        settle(&mut day.sunrise, point.sunrise_dt, date, "sunrise");
        settle(&mut day.sunset, point.sunset_dt, date, "sunset");
    }

    days.into_values().collect()
}

fn settle(slot: &mut Option<NaiveDateTime>, seen: Option<NaiveDateTime>, date: NaiveDate, which: &str) {
    match (*slot, seen) {
        (None, Some(_)) => *slot = seen,
        (Some(kept), Some(other)) if kept != other => {
            debug!(%date, which, %kept, %other, "conflicting sun time for date, keeping first");
        }
        _ => {}
    }
}

/// One interval per date that has a sunset, in date order.
///
/// The interval ends at the next date's sunrise. Without one (last date,
/// or the next date has no usable sunrise) it ends 12 hours after sunset.
/// An end is never later than the next interval's start.
pub fn night_intervals(points: &[TrendPoint]) -> Vec<NightInterval> {
    let days = daily_sun_times(points);

    days.iter()
        .enumerate()
        .filter_map(|(i, day)| {
            let start = day.sunset?;
            let next = days.get(i + 1);

            let mut end = next
                .and_then(|n| n.sunrise)
                .filter(|sunrise| *sunrise > start)
                .unwrap_or(start + FALLBACK_NIGHT);
            if let Some(next_start) = next.and_then(|n| n.sunset) {
                if next_start > start {
                    end = end.min(next_start);
                }
            }

            Some(NightInterval { start, end })
        })
        .collect()
}
