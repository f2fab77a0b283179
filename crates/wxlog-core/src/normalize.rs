//! Raw provider responses to one normalized observation

use crate::aqi::{calc_us_aqi, composite_aqi, PM10_BREAKPOINTS, PM25_BREAKPOINTS};
use crate::types::{NormalizedObservation, RawObservation, Wind};
use crate::units::{local_minute, strip_leading_zero, utc_epoch_to_local_clock};
use crate::{NormalizeError, NormalizeResult};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, instrument, warn};

/// Settings the normalizer needs from the station configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizerConfig {
    /// Local zone for the timestamp and sun times
    pub timezone: Tz,
}

pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn timezone(&self) -> Tz {
        self.config.timezone
    }

    /// Normalize using the current wall-clock instant
    pub fn normalize(&self, raw: &RawObservation) -> NormalizeResult<NormalizedObservation> {
        self.normalize_at(raw, Utc::now())
    }

    /// Normalize with `now` as the poll instant.
    ///
    /// Missing leaves become `None`. Only a missing `weather` condition
    /// list or `sys` sun-time group is fatal.
    #[instrument(skip(self, raw))]
    pub fn normalize_at(
        &self,
        raw: &RawObservation,
        now: DateTime<Utc>,
    ) -> NormalizeResult<NormalizedObservation> {
        let tz = self.config.timezone;
        let current = &raw.current;

        let condition = current
            .weather
            .as_ref()
            .and_then(|conditions| conditions.first())
            .ok_or_else(|| NormalizeError::SchemaViolation("no weather condition entry".into()))?;
        let sun = current
            .sys
            .as_ref()
            .ok_or_else(|| NormalizeError::SchemaViolation("missing sys group".into()))?;

        let main = current.main.clone().unwrap_or_default();
        let wind = current.wind.clone().unwrap_or_default();

        let wind_reading = wind.speed.map(|mps| Wind::from_mps(mps, wind.deg));
        if wind_reading.is_none() {
            debug!("wind speed missing, wind fields left empty");
        }

        let components = raw.air.components().cloned().unwrap_or_default();
        let pm25_aqi = components.pm2_5.and_then(|c| rate(c, "pm2_5", &PM25_BREAKPOINTS));
        let pm10_aqi = components.pm10.and_then(|c| rate(c, "pm10", &PM10_BREAKPOINTS));

        let sun_clock = |epoch: Option<i64>| {
            epoch
                .and_then(|e| utc_epoch_to_local_clock(e, &tz))
                .map(|clock| strip_leading_zero(&clock).to_string())
        };

        Ok(NormalizedObservation {
            timestamp: local_minute(now, &tz),
            description: condition.description.as_deref().map(capitalize_first),
            temp: main.temp,
            feels_like: main.feels_like,
            humidity: main.humidity.map(to_percent),
            temp_min: main.temp_min,
            temp_max: main.temp_max,
            wind_deg: wind.deg,
            wind: wind_reading,
            cloud_cover: current.clouds.as_ref().and_then(|c| c.all).map(to_percent),
            sunrise: sun_clock(sun.sunrise),
            sunset: sun_clock(sun.sunset),
            rain_1h: current
                .rain
                .as_ref()
                .and_then(|r| r.one_hour)
                .unwrap_or(0.0),
            uv_index: raw.uv.value,
            us_aqi: composite_aqi(&[pm25_aqi, pm10_aqi]),
        })
    }
}

fn rate(conc: f64, pollutant: &str, table: &[crate::aqi::Breakpoint]) -> Option<u16> {
    let aqi = calc_us_aqi(conc, table);
    if aqi.is_none() {
        warn!(pollutant, conc, "concentration outside AQI breakpoints");
    }
    aqi
}

/// Uppercase the first character, leave the rest untouched
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn to_percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}
