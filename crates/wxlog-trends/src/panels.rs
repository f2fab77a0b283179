//! Chart panel definitions for the dashboard's plotting layer

use crate::trend::TrendPoint;
use chrono::NaiveDateTime;
use serde::Serialize;

/// A plottable column of the trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Temp,
    FeelsLike,
    UvIndex,
    WindSpeedMph,
    Rain1h,
    Rain7dAvg,
}

impl Metric {
    pub fn value(self, point: &TrendPoint) -> Option<f64> {
        let r = &point.record;
        match self {
            Metric::Temp => r.temp,
            Metric::FeelsLike => r.feels_like,
            Metric::UvIndex => r.uv_index,
            Metric::WindSpeedMph => r.wind_speed_mph,
            Metric::Rain1h => r.rain_1h,
            Metric::Rain7dAvg => point.rain_7d_avg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub x: NaiveDateTime,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: &'static str,
    pub metric: Metric,
    /// Absent values are left out
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn collect(name: &'static str, metric: Metric, points: &[TrendPoint]) -> Self {
        Self {
            name,
            metric,
            points: points
                .iter()
                .filter_map(|p| {
                    metric.value(p).map(|y| SeriesPoint {
                        x: p.timestamp(),
                        y,
                    })
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: &'static str,
    pub y_label: &'static str,
    pub series: Vec<Series>,
    /// Draw night intervals behind this panel
    pub night_shading: bool,
}

/// The four dashboard charts
pub fn panels(points: &[TrendPoint]) -> Vec<Panel> {
    vec![
        Panel {
            title: "Temperature Over Time",
            y_label: "Temperature (°F)",
            series: vec![
                Series::collect("Temperature", Metric::Temp, points),
                Series::collect("Feels Like", Metric::FeelsLike, points),
            ],
            night_shading: true,
        },
        Panel {
            title: "UV Index Over Time",
            y_label: "UV Index",
            series: vec![Series::collect("UV Index", Metric::UvIndex, points)],
            night_shading: false,
        },
        Panel {
            title: "Wind Speed",
            y_label: "Wind Speed (mph)",
            series: vec![Series::collect("Wind Speed (mph)", Metric::WindSpeedMph, points)],
            night_shading: true,
        },
        Panel {
            title: "Rainfall Trends",
            y_label: "Rainfall (mm)",
            series: vec![
                Series::collect("Hourly Rainfall", Metric::Rain1h, points),
                Series::collect("7-Day Avg Rainfall", Metric::Rain7dAvg, points),
            ],
            night_shading: true,
        },
    ]
}
