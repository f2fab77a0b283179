//! Core data types for weather observations
//!
//! The raw provider structures mirror the upstream JSON. Every group and
//! leaf is optional and decoded leniently: a missing key or a value of
//! the wrong shape degrades that one field instead of failing the whole
//! decode.

use crate::{aqi::HealthCategory, units::Beaufort, units::CompassPoint};
use crate::{NormalizeError, NormalizeResult};
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::debug;

/// Decode an optional value, treating a malformed one as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match T::deserialize(value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(e) => {
            debug!(expected = std::any::type_name::<T>(), error = %e, "malformed field dropped");
            Ok(None)
        }
    }
}

/// Current-weather endpoint response
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CurrentWeather {
    #[serde(default, deserialize_with = "lenient")]
    pub main: Option<MainGroup>,
    #[serde(default, deserialize_with = "lenient")]
    pub weather: Option<Vec<Condition>>,
    #[serde(default, deserialize_with = "lenient")]
    pub wind: Option<WindGroup>,
    #[serde(default, deserialize_with = "lenient")]
    pub clouds: Option<CloudGroup>,
    #[serde(default, deserialize_with = "lenient")]
    pub sys: Option<SunGroup>,
    #[serde(default, deserialize_with = "lenient")]
    pub rain: Option<RainGroup>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MainGroup {
    #[serde(default, deserialize_with = "lenient")]
    pub temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub feels_like: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub temp_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub temp_max: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Condition {
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct WindGroup {
    /// Metres per second
    #[serde(default, deserialize_with = "lenient")]
    pub speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub deg: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CloudGroup {
    #[serde(default, deserialize_with = "lenient")]
    pub all: Option<f64>,
}

/// Sun times as UTC epoch seconds
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SunGroup {
    #[serde(default, deserialize_with = "lenient")]
    pub sunrise: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub sunset: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RainGroup {
    /// Millimetres over the last hour
    #[serde(rename = "1h", default, deserialize_with = "lenient")]
    pub one_hour: Option<f64>,
}

/// UV-index endpoint response
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UvReading {
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<f64>,
}

/// Air-pollution endpoint response
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AirPollution {
    #[serde(default, deserialize_with = "lenient")]
    pub list: Option<Vec<AirReading>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AirReading {
    #[serde(default, deserialize_with = "lenient")]
    pub components: Option<Components>,
}

/// Pollutant concentrations, µg/m³
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Components {
    #[serde(default, deserialize_with = "lenient")]
    pub pm2_5: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub pm10: Option<f64>,
}

impl AirPollution {
    /// Components of the first reading, if any
    pub fn components(&self) -> Option<&Components> {
        self.list
            .as_ref()
            .and_then(|list| list.first())
            .and_then(|reading| reading.components.as_ref())
    }
}

/// The three provider responses fetched for one poll cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawObservation {
    pub current: CurrentWeather,
    pub uv: UvReading,
    pub air: AirPollution,
}

fn decode_err(payload: &'static str) -> impl FnOnce(serde_json::Error) -> NormalizeError {
    move |source| NormalizeError::InvalidJson { payload, source }
}

impl RawObservation {
    /// Decode the three endpoint bodies
    pub fn from_json(current: &str, uv: &str, air: &str) -> NormalizeResult<Self> {
        Ok(Self {
            current: serde_json::from_str(current).map_err(decode_err("current weather"))?,
            uv: serde_json::from_str(uv).map_err(decode_err("uv index"))?,
            air: serde_json::from_str(air).map_err(decode_err("air pollution"))?,
        })
    }
}

/// Wind reading with its derived categories.
///
/// Only constructible from a measured speed, so the compass point and
/// Beaufort category can never exist without their sources.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wind {
    speed_mph: f64,
    compass: Option<CompassPoint>,
    category: Beaufort,
}

impl Wind {
    /// Derive from the provider's un-rounded values
    pub fn from_mps(speed_mps: f64, deg: Option<f64>) -> Self {
        let mph = speed_mps * crate::units::MPS_TO_MPH;
        Self {
            speed_mph: crate::units::mps_to_mph(speed_mps),
            compass: deg.map(crate::units::deg_to_compass),
            category: crate::units::beaufort_category(mph),
        }
    }

    /// Rounded to 2 decimals
    pub fn speed_mph(&self) -> f64 {
        self.speed_mph
    }

    pub fn compass(&self) -> Option<CompassPoint> {
        self.compass
    }

    pub fn category(&self) -> Beaufort {
        self.category
    }
}

/// One normalized observation, built once per poll cycle.
///
/// Fields are read-only; derived values are computed from their sources
/// at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedObservation {
    pub(crate) timestamp: NaiveDateTime,
    pub(crate) description: Option<String>,
    pub(crate) temp: Option<f64>,
    pub(crate) feels_like: Option<f64>,
    pub(crate) humidity: Option<u8>,
    pub(crate) temp_min: Option<f64>,
    pub(crate) temp_max: Option<f64>,
    pub(crate) wind_deg: Option<f64>,
    pub(crate) wind: Option<Wind>,
    pub(crate) cloud_cover: Option<u8>,
    pub(crate) sunrise: Option<String>,
    pub(crate) sunset: Option<String>,
    pub(crate) rain_1h: f64,
    pub(crate) uv_index: Option<f64>,
    pub(crate) us_aqi: Option<u16>,
}

impl NormalizedObservation {
    /// Local civil time of the poll, minute precision
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// °F
    pub fn temp(&self) -> Option<f64> {
        self.temp
    }

    pub fn feels_like(&self) -> Option<f64> {
        self.feels_like
    }

    pub fn humidity(&self) -> Option<u8> {
        self.humidity
    }

    pub fn temp_min(&self) -> Option<f64> {
        self.temp_min
    }

    pub fn temp_max(&self) -> Option<f64> {
        self.temp_max
    }

    pub fn wind_speed_mph(&self) -> Option<f64> {
        self.wind.map(|w| w.speed_mph())
    }

    pub fn wind_deg(&self) -> Option<f64> {
        self.wind_deg
    }

    pub fn wind_compass(&self) -> Option<CompassPoint> {
        self.wind.and_then(|w| w.compass())
    }

    pub fn wind_desc(&self) -> Option<Beaufort> {
        self.wind.map(|w| w.category())
    }

    pub fn cloud_cover(&self) -> Option<u8> {
        self.cloud_cover
    }

    /// `h:mm AM/PM`
    pub fn sunrise(&self) -> Option<&str> {
        self.sunrise.as_deref()
    }

    pub fn sunset(&self) -> Option<&str> {
        self.sunset.as_deref()
    }

    /// Millimetres, 0.0 when the provider reported none
    pub fn rain_1h(&self) -> f64 {
        self.rain_1h
    }

    pub fn uv_index(&self) -> Option<f64> {
        self.uv_index
    }

    pub fn us_aqi(&self) -> Option<u16> {
        self.us_aqi
    }

    pub fn us_aqi_desc(&self) -> Option<HealthCategory> {
        self.us_aqi.map(HealthCategory::from_aqi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_weather_tolerates_missing_groups() {
        let json = r#"{"weather":[{"description":"haze"}],"sys":{}}"#;
        let current: CurrentWeather = serde_json::from_str(json).unwrap();

        assert!(current.main.is_none());
        assert!(current.wind.is_none());
        assert_eq!(current.sys, Some(SunGroup::default()));
    }

    #[test]
    fn test_rain_group_key() {
        let json = r#"{"rain":{"1h":0.42}}"#;
        let current: CurrentWeather = serde_json::from_str(json).unwrap();
        assert_eq!(current.rain.unwrap().one_hour, Some(0.42));
    }

    #[test]
    fn test_air_components_uses_first_reading() {
        let json = r#"{"list":[{"components":{"pm2_5":3.1,"pm10":9.0,"co":201.9}},{"components":{"pm2_5":99.0}}]}"#;
        let air: AirPollution = serde_json::from_str(json).unwrap();
        let components = air.components().unwrap();
        assert_eq!(components.pm2_5, Some(3.1));
        assert_eq!(components.pm10, Some(9.0));

        let empty: AirPollution = serde_json::from_str(r#"{"list":[]}"#).unwrap();
        assert!(empty.components().is_none());
    }

    #[test]
    fn test_wrong_shaped_values_decode_as_absent() {
        let json = r#"{"main":{"temp":"71.6","humidity":40},"rain":[],"clouds":null}"#;
        let current: CurrentWeather = serde_json::from_str(json).unwrap();
        let main = current.main.unwrap();

        assert_eq!(main.temp, None);
        assert_eq!(main.humidity, Some(40.0));
        assert!(current.rain.is_none());
        assert!(current.clouds.is_none());
    }

    #[test]
    fn test_from_json_names_bad_payload() {
        let err = RawObservation::from_json("{}", "not json", "{}").unwrap_err();
        assert!(err.to_string().contains("uv index"));
    }

    #[test]
    fn test_wind_derives_from_unrounded_speed() {
        // 0.447 m/s = 0.99991 mph, which rounds to 1.0 but is still calm
        let wind = Wind::from_mps(0.447, Some(200.0));
        assert_eq!(wind.speed_mph(), 1.0);
        assert_eq!(wind.category(), Beaufort::Calm);
        assert_eq!(wind.compass(), Some(CompassPoint::SSW));
    }
}
