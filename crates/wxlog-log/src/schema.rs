//! Log record schema
//!
//! IMPORTANT: column names and order are a stable contract with
//! existing log files and the dashboard. Changes must be additive:
//! new columns go at the end, existing ones are never renamed.

use crate::codec::{encode_row, Row};
use crate::{LogError, LogResult};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::str::FromStr;
use wxlog_core::{NormalizedObservation, TIMESTAMP_FORMAT};

/// Text written for any absent value
pub const NA: &str = "N/A";

/// Column order of every record
pub const COLUMNS: [&str; 18] = [
    "timestamp",
    "description",
    "temp",
    "feels_like",
    "humidity",
    "temp_min",
    "temp_max",
    "wind_speed_mph",
    "wind_deg",
    "wind_compass",
    "wind_desc",
    "cloud_cover",
    "sunrise",
    "sunset",
    "rain_1h",
    "uv_index",
    "us_aqi",
    "us_aqi_desc",
];

pub fn header_line() -> String {
    encode_row(&COLUMNS)
}

/// One log row. Mirrors [`NormalizedObservation`] with the derived
/// labels held as the text that was written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub timestamp: NaiveDateTime,
    pub description: Option<String>,
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<u8>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub wind_speed_mph: Option<f64>,
    pub wind_deg: Option<f64>,
    pub wind_compass: Option<String>,
    pub wind_desc: Option<String>,
    pub cloud_cover: Option<u8>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub rain_1h: Option<f64>,
    pub uv_index: Option<f64>,
    pub us_aqi: Option<u16>,
    pub us_aqi_desc: Option<String>,
}

impl From<&NormalizedObservation> for LogRecord {
    fn from(obs: &NormalizedObservation) -> Self {
        Self {
            timestamp: obs.timestamp(),
            description: obs.description().map(str::to_string),
            temp: obs.temp(),
            feels_like: obs.feels_like(),
            humidity: obs.humidity(),
            temp_min: obs.temp_min(),
            temp_max: obs.temp_max(),
            wind_speed_mph: obs.wind_speed_mph(),
            wind_deg: obs.wind_deg(),
            wind_compass: obs.wind_compass().map(|c| c.label().to_string()),
            wind_desc: obs.wind_desc().map(|b| b.label().to_string()),
            cloud_cover: obs.cloud_cover(),
            sunrise: obs.sunrise().map(str::to_string),
            sunset: obs.sunset().map(str::to_string),
            rain_1h: Some(obs.rain_1h()),
            uv_index: obs.uv_index(),
            us_aqi: obs.us_aqi(),
            us_aqi_desc: obs.us_aqi_desc().map(|h| h.label().to_string()),
        }
    }
}

impl LogRecord {
    /// Field text in [`COLUMNS`] order
    pub fn to_fields(&self) -> Vec<String> {
        vec![
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            text(&self.description),
            decimal(self.temp),
            decimal(self.feels_like),
            number(self.humidity),
            decimal(self.temp_min),
            decimal(self.temp_max),
            decimal(self.wind_speed_mph),
            decimal(self.wind_deg),
            text(&self.wind_compass),
            text(&self.wind_desc),
            number(self.cloud_cover),
            text(&self.sunrise),
            text(&self.sunset),
            decimal(self.rain_1h),
            decimal(self.uv_index),
            number(self.us_aqi),
            text(&self.us_aqi_desc),
        ]
    }

    /// One encoded line, without terminator
    pub fn to_line(&self) -> String {
        encode_row(&self.to_fields())
    }

    /// Decode a data row using the column positions from the header
    pub fn from_row(header: &HeaderIndex, row: &Row) -> LogResult<Self> {
        let malformed = |reason: String| LogError::MalformedRecord {
            line: row.line,
            reason,
        };
        if row.fields.len() != header.width {
            return Err(malformed(format!(
                "expected {} fields, found {}",
                header.width,
                row.fields.len()
            )));
        }
        let get = |column: usize| -> LogResult<&str> {
            let position = header.positions[column];
            row.fields.get(position).map(String::as_str).ok_or_else(|| {
                malformed(format!(
                    "expected at least {} fields, found {}",
                    position + 1,
                    row.fields.len()
                ))
            })
        };
        let parsed = |column: usize| -> LogResult<Option<f64>> {
            parse_opt(get(column)?).map_err(|e| malformed(format!("{}: {}", COLUMNS[column], e)))
        };
        let percent = |column: usize| -> LogResult<Option<u8>> {
            Ok(parsed(column)?.map(|v| v.round().clamp(0.0, 100.0) as u8))
        };

        let timestamp_text = get(0)?;
        let timestamp = NaiveDateTime::parse_from_str(timestamp_text, TIMESTAMP_FORMAT)
            .map_err(|e| malformed(format!("timestamp {:?}: {}", timestamp_text, e)))?;

        Ok(Self {
            timestamp,
            description: opt_text(get(1)?),
            temp: parsed(2)?,
            feels_like: parsed(3)?,
            humidity: percent(4)?,
            temp_min: parsed(5)?,
            temp_max: parsed(6)?,
            wind_speed_mph: parsed(7)?,
            wind_deg: parsed(8)?,
            wind_compass: opt_text(get(9)?),
            wind_desc: opt_text(get(10)?),
            cloud_cover: percent(11)?,
            sunrise: opt_text(get(12)?),
            sunset: opt_text(get(13)?),
            rain_1h: parsed(14)?,
            uv_index: parsed(15)?,
            us_aqi: parse_opt(get(16)?).map_err(|e| malformed(format!("us_aqi: {}", e)))?,
            us_aqi_desc: opt_text(get(17)?),
        })
    }
}

/// Where each known column sits in a header row. Unknown trailing
/// columns from later schema additions are ignored, but every data row
/// must have as many fields as the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderIndex {
    positions: [usize; 18],
    width: usize,
}

impl HeaderIndex {
    pub fn from_row(row: &Row) -> LogResult<Self> {
        let names: Vec<&str> = row
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let f = if i == 0 { f.trim_start_matches('\u{feff}') } else { f };
                f.trim()
            })
            .collect();

        let mut positions = [0; 18];
        for (slot, column) in positions.iter_mut().zip(COLUMNS) {
            *slot = names
                .iter()
                .position(|name| *name == column)
                .ok_or(LogError::MissingHeader(column))?;
        }
        Ok(Self {
            positions,
            width: names.len(),
        })
    }

    /// Number of fields in the header row
    pub fn width(&self) -> usize {
        self.width
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| NA.to_string())
}

fn number<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NA.to_string())
}

/// Decimal text that always keeps a fractional part ("3.0", not "3")
fn decimal(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:?}", v))
        .unwrap_or_else(|| NA.to_string())
}

fn is_absent(field: &str) -> bool {
    let field = field.trim();
    field.is_empty() || field == NA
}

fn opt_text(field: &str) -> Option<String> {
    (!is_absent(field)).then(|| field.to_string())
}

fn parse_opt<T: FromStr>(field: &str) -> Result<Option<T>, String>
where
    T::Err: std::fmt::Display,
{
    if is_absent(field) {
        return Ok(None);
    }
    field
        .trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| format!("{:?}: {}", field, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse_rows;
    use chrono::{TimeZone, Utc};
    use wxlog_core::{Normalizer, NormalizerConfig, RawObservation};

    fn observation() -> NormalizedObservation {
        let raw = RawObservation::from_json(
            r#"{
                "weather": [{"description": "light rain"}],
                "main": {"temp": 71.6, "feels_like": 72.1, "temp_min": 69.8, "temp_max": 74.3, "humidity": 83},
                "wind": {"speed": 4.63, "deg": 200},
                "clouds": {"all": 75},
                "sys": {"sunrise": 1717234920, "sunset": 1717288680}
            }"#,
            r#"{"value": 6.2}"#,
            r#"{"list":[{"components":{"pm2_5":20.0,"pm10":30.0}}]}"#,
        )
        .unwrap();
        Normalizer::new(NormalizerConfig {
            timezone: chrono_tz::America::New_York,
        })
        .normalize_at(&raw, Utc.with_ymd_and_hms(2024, 6, 1, 14, 5, 37).unwrap())
        .unwrap()
    }

    fn header() -> HeaderIndex {
        let rows = parse_rows(&header_line()).unwrap();
        HeaderIndex::from_row(&rows[0]).unwrap()
    }

    #[test]
    fn test_header_line() {
        insta::assert_snapshot!(header_line(), @"timestamp,description,temp,feels_like,humidity,temp_min,temp_max,wind_speed_mph,wind_deg,wind_compass,wind_desc,cloud_cover,sunrise,sunset,rain_1h,uv_index,us_aqi,us_aqi_desc");
    }

    #[test]
    fn test_record_line() {
        let record = LogRecord::from(&observation());
        insta::assert_snapshot!(record.to_line(), @"2024-06-01 10:05 AM,Light rain,71.6,72.1,83,69.8,74.3,10.36,200.0,SSW,Gentle breeze,75,5:42 AM,8:38 PM,0.0,6.2,68,Moderate");
    }

    #[test]
    fn test_absent_values_written_as_na() {
        let mut record = LogRecord::from(&observation());
        record.temp = None;
        record.wind_compass = None;
        record.us_aqi = None;
        let fields = record.to_fields();
        assert_eq!(fields[2], NA);
        assert_eq!(fields[9], NA);
        assert_eq!(fields[16], NA);
    }

    #[test]
    fn test_row_decodes_back_to_record() {
        let record = LogRecord::from(&observation());
        let rows = parse_rows(&record.to_line()).unwrap();
        let decoded = LogRecord::from_row(&header(), &rows[0]).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_na_and_integers_from_older_writers() {
        let line = "2024-06-02 07:00 PM,Clear sky,80,79.5,40,75,82,N/A,N/A,N/A,N/A,0,5:42 AM,8:39 PM,0.0,N/A,N/A,N/A";
        let rows = parse_rows(line).unwrap();
        let record = LogRecord::from_row(&header(), &rows[0]).unwrap();

        assert_eq!(record.temp, Some(80.0));
        assert_eq!(record.wind_speed_mph, None);
        assert_eq!(record.uv_index, None);
        assert_eq!(record.us_aqi_desc, None);
        assert_eq!(record.timestamp.to_string(), "2024-06-02 19:00:00");
    }

    #[test]
    fn test_header_with_extra_columns() {
        let text = format!("{},station\n", header_line());
        let rows = parse_rows(&text).unwrap();
        assert!(HeaderIndex::from_row(&rows[0]).is_ok());
    }

    #[test]
    fn test_header_with_byte_order_mark() {
        let text = format!("\u{feff}{}\n", header_line());
        let rows = parse_rows(&text).unwrap();
        assert_eq!(HeaderIndex::from_row(&rows[0]).unwrap().width(), COLUMNS.len());
    }

    #[test]
    fn test_long_row_is_malformed() {
        let line = "2024-06-02 07:00 PM,Clear sky,80,79.5,40,75,82,N/A,N/A,N/A,N/A,0,5:42 AM,8:39 PM,0.0,N/A,N/A,N/A,extra";
        let rows = parse_rows(line).unwrap();
        let err = LogRecord::from_row(&header(), &rows[0]).unwrap_err();
        assert!(err.to_string().contains("expected 18 fields, found 19"));
    }

    #[test]
    fn test_header_missing_column() {
        let rows = parse_rows("timestamp,description\n").unwrap();
        let err = HeaderIndex::from_row(&rows[0]).unwrap_err();
        assert!(matches!(err, LogError::MissingHeader("temp")));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let rows = parse_rows("2024-06-02 07:00 PM,Clear sky\n").unwrap();
        let err = LogRecord::from_row(&header(), &rows[0]).unwrap_err();
        assert!(matches!(err, LogError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_bad_number_is_malformed() {
        let line = "2024-06-02 07:00 PM,Clear sky,hot,79.5,40,75,82,N/A,N/A,N/A,N/A,0,5:42 AM,8:39 PM,0.0,N/A,N/A,N/A";
        let rows = parse_rows(line).unwrap();
        let err = LogRecord::from_row(&header(), &rows[0]).unwrap_err();
        assert!(err.to_string().contains("temp"));
    }
}
