//! Latest-conditions summary

use crate::trend::TrendPoint;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Description fragments that raise the rain alert
pub const RAIN_KEYWORDS: [&str; 3] = ["storm", "thunderstorm", "rain"];

/// At-a-glance view of the most recent observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub as_of: NaiveDateTime,
    pub description: Option<String>,
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub cloud_cover: Option<u8>,
    pub wind_desc: Option<String>,
    pub rain_alert: bool,
}

impl Summary {
    /// Summary of the last point; `None` for an empty log
    pub fn from_points(points: &[TrendPoint]) -> Option<Self> {
        let latest = &points.last()?.record;
        Some(Self {
            as_of: latest.timestamp,
            description: latest.description.clone(),
            temp: latest.temp,
            feels_like: latest.feels_like,
            temp_max: latest.temp_max,
            temp_min: latest.temp_min,
            cloud_cover: latest.cloud_cover,
            wind_desc: latest.wind_desc.clone(),
            rain_alert: is_rain_alert(latest.description.as_deref()),
        })
    }
}

pub fn is_rain_alert(description: Option<&str>) -> bool {
    let Some(description) = description else {
        return false;
    };
    let lowered = description.to_lowercase();
    RAIN_KEYWORDS.iter().any(|k| lowered.contains(k))
}

fn degrees(value: Option<f64>) -> String {
    // Whole degrees, truncated
    value
        .map(|v| format!("{} °F", v.trunc() as i64))
        .unwrap_or_else(|| "N/A".to_string())
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rain_alert {
            writeln!(f, "⚠️ It is raining ⚠️")?;
        }
        writeln!(f, "As of {}", self.as_of.format(wxlog_core::TIMESTAMP_FORMAT))?;
        writeln!(f, "Weather:     {}", self.description.as_deref().unwrap_or("N/A"))?;
        writeln!(f, "Temp:        {}", degrees(self.temp))?;
        writeln!(f, "Feels like:  {}", degrees(self.feels_like))?;
        writeln!(f, "High:        {}", degrees(self.temp_max))?;
        writeln!(f, "Low:         {}", degrees(self.temp_min))?;
        match self.cloud_cover {
            Some(c) => writeln!(f, "Cloud cover: {}%", c)?,
            None => writeln!(f, "Cloud cover: N/A")?,
        }
        write!(f, "Wind:        {}", self.wind_desc.as_deref().unwrap_or("N/A"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;
    use crate::trend::build_trend;

    #[test]
    fn test_summary_uses_latest_point() {
        let mut newest = record("2024-06-02 09:00", None);
        newest.description = Some("Thunderstorm with rain".into());
        newest.temp = Some(64.9);
        let points = build_trend(vec![newest, record("2024-06-01 09:00", None)]);

        let summary = Summary::from_points(&points).unwrap();
        assert_eq!(summary.as_of.to_string(), "2024-06-02 09:00:00");
        assert_eq!(summary.temp, Some(64.9));
        assert!(summary.rain_alert);
    }

    #[test]
    fn test_empty_log_has_no_summary() {
        assert!(Summary::from_points(&[]).is_none());
    }

    #[test]
    fn test_rain_alert_keywords() {
        assert!(is_rain_alert(Some("Light rain")));
        assert!(is_rain_alert(Some("STORM")));
        assert!(!is_rain_alert(Some("Clear sky")));
        assert!(!is_rain_alert(Some("Drizzle")));
        assert!(!is_rain_alert(None));
    }

    #[test]
    fn test_display_truncates_degrees() {
        let mut r = record("2024-06-01 09:00", None);
        r.temp = Some(71.9);
        r.cloud_cover = None;
        let text = Summary::from_points(&build_trend(vec![r])).unwrap().to_string();

        assert!(text.starts_with("As of 2024-06-01 09:00 AM"));
        assert!(text.contains("Temp:        71 °F"));
        assert!(text.contains("Cloud cover: N/A"));
        assert!(text.ends_with("Wind:        Light breeze"));
        assert!(!text.contains("raining"));
    }
}
