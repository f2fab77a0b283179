use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TIMEZONE: &str = "America/New_York";
pub const DEFAULT_LOG_PATH: &str = "weather_log.csv";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StationConfig {
    /// IANA zone id used for local timestamps and sun times
    pub timezone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LogConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub station: Option<StationConfig>,
    pub log: Option<LogConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown time zone: {0}")]
    UnknownTimezone(String),
}

impl AppConfig {
    /// Load configuration from WXLOG_CONFIG path (TOML) if present, with reasonable defaults
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("WXLOG_CONFIG").unwrap_or_else(|_| "wxlog.toml".to_string());
        Self::load_from(path)
    }

    /// Load from an explicit path; a missing file yields defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let cfg = if path.exists() {
            let s = fs::read_to_string(path)?;
            toml::from_str::<AppConfig>(&s)?
        } else {
            AppConfig::default()
        };
        Ok(cfg)
    }

    /// Station time zone (default America/New_York)
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        let name = self
            .station
            .as_ref()
            .and_then(|s| s.timezone.as_deref())
            .unwrap_or(DEFAULT_TIMEZONE);
        name.parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimezone(name.to_string()))
    }

    /// Station coordinates, when both are configured
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let station = self.station.as_ref()?;
        Some((station.latitude?, station.longitude?))
    }

    /// Log file path (default weather_log.csv)
    pub fn log_path(&self) -> PathBuf {
        self.log
            .as_ref()
            .and_then(|l| l.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH))
    }
}
