//! US EPA Air Quality Index
//!
//! Sub-indices are linear interpolations inside the published
//! breakpoint bands. Concentrations outside every band are unrated.

use serde::Serialize;
use std::fmt;

/// One band of an EPA breakpoint table: concentrations in
/// `[c_low, c_high]` map linearly onto `[i_low, i_high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub c_low: f64,
    pub c_high: f64,
    pub i_low: u16,
    pub i_high: u16,
}

const fn bp(c_low: f64, c_high: f64, i_low: u16, i_high: u16) -> Breakpoint {
    Breakpoint {
        c_low,
        c_high,
        i_low,
        i_high,
    }
}

/// PM2.5, µg/m³ (24-hour)
pub const PM25_BREAKPOINTS: [Breakpoint; 7] = [
    bp(0.0, 12.0, 0, 50),
    bp(12.1, 35.4, 51, 100),
    bp(35.5, 55.4, 101, 150),
    bp(55.5, 150.4, 151, 200),
    bp(150.5, 250.4, 201, 300),
    bp(250.5, 350.4, 301, 400),
    bp(350.5, 500.4, 401, 500),
];

/// PM10, µg/m³ (24-hour)
pub const PM10_BREAKPOINTS: [Breakpoint; 7] = [
    bp(0.0, 54.0, 0, 50),
    bp(55.0, 154.0, 51, 100),
    bp(155.0, 254.0, 101, 150),
    bp(255.0, 354.0, 151, 200),
    bp(355.0, 424.0, 201, 300),
    bp(425.0, 504.0, 301, 400),
    bp(505.0, 604.0, 401, 500),
];

/// Sub-index for `conc` using the first band (in table order) that
/// contains it. No extrapolation: `None` when no band matches.
pub fn calc_us_aqi(conc: f64, breakpoints: &[Breakpoint]) -> Option<u16> {
    breakpoints
        .iter()
        .find(|b| b.c_low <= conc && conc <= b.c_high)
        .map(|b| {
            let slope = f64::from(b.i_high - b.i_low) / (b.c_high - b.c_low);
            (slope * (conc - b.c_low) + f64::from(b.i_low)).round() as u16
        })
}

/// Health category bands of the US AQI
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HealthCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl HealthCategory {
    pub fn from_aqi(aqi: u16) -> Self {
        match aqi {
            0..=50 => HealthCategory::Good,
            51..=100 => HealthCategory::Moderate,
            101..=150 => HealthCategory::UnhealthyForSensitiveGroups,
            151..=200 => HealthCategory::Unhealthy,
            201..=300 => HealthCategory::VeryUnhealthy,
            _ => HealthCategory::Hazardous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthCategory::Good => "Good",
            HealthCategory::Moderate => "Moderate",
            HealthCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            HealthCategory::Unhealthy => "Unhealthy",
            HealthCategory::VeryUnhealthy => "Very Unhealthy",
            HealthCategory::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for HealthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Health label for an optional AQI; unrated air reads "N/A"
pub fn aqi_health_category(aqi: Option<u16>) -> &'static str {
    aqi.map(|v| HealthCategory::from_aqi(v).label())
        .unwrap_or("N/A")
}

/// Composite AQI: the worst of the available sub-indices
pub fn composite_aqi(sub_indices: &[Option<u16>]) -> Option<u16> {
    sub_indices.iter().flatten().copied().max()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pm25_band_edges() {
        assert_eq!(calc_us_aqi(0.0, &PM25_BREAKPOINTS), Some(0));
        assert_eq!(calc_us_aqi(12.0, &PM25_BREAKPOINTS), Some(50));
        assert_eq!(calc_us_aqi(12.1, &PM25_BREAKPOINTS), Some(51));
        assert_eq!(calc_us_aqi(35.4, &PM25_BREAKPOINTS), Some(100));
        assert_eq!(calc_us_aqi(500.4, &PM25_BREAKPOINTS), Some(500));
    }

    #[test]
    fn test_pm25_interpolates() {
        // (100-51)/(35.4-12.1) * (20-12.1) + 51 = 67.6
        assert_eq!(calc_us_aqi(20.0, &PM25_BREAKPOINTS), Some(68));
    }

    #[test]
    fn test_out_of_table_is_unrated() {
        assert_eq!(calc_us_aqi(600.0, &PM25_BREAKPOINTS), None);
        assert_eq!(calc_us_aqi(605.0, &PM10_BREAKPOINTS), None);
        assert_eq!(calc_us_aqi(-1.0, &PM25_BREAKPOINTS), None);
    }

    #[test]
    fn test_gap_between_bands_is_unrated() {
        assert_eq!(calc_us_aqi(12.05, &PM25_BREAKPOINTS), None);
        assert_eq!(calc_us_aqi(54.5, &PM10_BREAKPOINTS), None);
    }

    #[test]
    fn test_pm10() {
        assert_eq!(calc_us_aqi(54.0, &PM10_BREAKPOINTS), Some(50));
        assert_eq!(calc_us_aqi(55.0, &PM10_BREAKPOINTS), Some(51));
        assert_eq!(calc_us_aqi(604.0, &PM10_BREAKPOINTS), Some(500));
    }

    #[test]
    fn test_health_categories() {
        assert_eq!(aqi_health_category(Some(0)), "Good");
        assert_eq!(aqi_health_category(Some(50)), "Good");
        assert_eq!(aqi_health_category(Some(51)), "Moderate");
        assert_eq!(aqi_health_category(Some(150)), "Unhealthy for Sensitive Groups");
        assert_eq!(aqi_health_category(Some(200)), "Unhealthy");
        assert_eq!(aqi_health_category(Some(300)), "Very Unhealthy");
        assert_eq!(aqi_health_category(Some(301)), "Hazardous");
        assert_eq!(aqi_health_category(None), "N/A");
    }

    #[test]
    fn test_composite_takes_worst_pollutant() {
        assert_eq!(composite_aqi(&[Some(42), Some(67)]), Some(67));
        assert_eq!(composite_aqi(&[None, Some(12)]), Some(12));
        assert_eq!(composite_aqi(&[Some(0), Some(0)]), Some(0));
        assert_eq!(composite_aqi(&[None, None]), None);
    }
}
