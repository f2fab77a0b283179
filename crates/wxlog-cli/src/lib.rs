//! Poll-once and render-once entry points behind the `wxlog` binary

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use wxlog_config::AppConfig;
use wxlog_core::{
    NormalizeError, NormalizedObservation, Normalizer, NormalizerConfig, ObservationSink,
    RawObservation,
};
use wxlog_log::LogAppender;
use wxlog_trends::Dashboard;

/// Files holding the three provider responses of one poll
#[derive(Debug, Clone)]
pub struct RecordInputs {
    pub weather: PathBuf,
    pub uv: PathBuf,
    pub air: PathBuf,
}

pub fn normalizer_for(cfg: &AppConfig) -> Result<Normalizer> {
    let timezone = cfg.timezone().context("invalid station configuration")?;
    Ok(Normalizer::new(NormalizerConfig { timezone }))
}

fn read_payload(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {} from {}", what, path.display()))
}

pub fn load_raw(inputs: &RecordInputs) -> Result<RawObservation> {
    let current = read_payload(&inputs.weather, "current weather")?;
    let uv = read_payload(&inputs.uv, "uv index")?;
    let air = read_payload(&inputs.air, "air pollution")?;
    Ok(RawObservation::from_json(&current, &uv, &air)?)
}

/// Normalize `raw` at `now` and hand it to `sink`. Nothing reaches the
/// sink when the response violates the provider schema.
pub fn record<S: ObservationSink>(
    normalizer: &Normalizer,
    raw: &RawObservation,
    now: DateTime<Utc>,
    sink: &mut S,
) -> Result<NormalizedObservation> {
    let observation = match normalizer.normalize_at(raw, now) {
        Ok(obs) => obs,
        Err(e @ NormalizeError::SchemaViolation(_)) => {
            tracing::error!(error = %e, "provider response rejected, nothing recorded");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    sink.emit(&observation)?;
    Ok(observation)
}

/// Poll once: read the fetched payloads and append one record to the log
pub fn run_record(cfg: &AppConfig, inputs: &RecordInputs) -> Result<NormalizedObservation> {
    let normalizer = normalizer_for(cfg)?;
    let raw = load_raw(inputs)?;
    let mut appender = LogAppender::new(cfg.log_path());
    if let Some((lat, lon)) = cfg.coordinates() {
        tracing::debug!(lat, lon, "recording for station");
    }
    record(&normalizer, &raw, Utc::now(), &mut appender)
        .with_context(|| format!("recording to {}", appender.path().display()))
}

/// Render once: load the whole log into dashboard series
pub fn run_trends(cfg: &AppConfig) -> Result<Dashboard> {
    let path = cfg.log_path();
    Dashboard::load(&path).with_context(|| format!("loading log {}", path.display()))
}

pub fn dashboard_json(dashboard: &Dashboard, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(dashboard)?
    } else {
        serde_json::to_string(dashboard)?
    };
    Ok(json)
}
