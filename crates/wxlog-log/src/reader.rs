//! Whole-log reader

use crate::codec::parse_rows;
use crate::schema::{HeaderIndex, LogRecord};
use crate::{LogError, LogResult};
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

/// Read every record in file order. An empty file has no records.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn read_log<P: AsRef<Path>>(path: P) -> LogResult<Vec<LogRecord>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_log(&text)?;
    debug!(count = records.len(), "log loaded");
    Ok(records)
}

/// Decode log text: a header row followed by data rows
pub fn parse_log(text: &str) -> LogResult<Vec<LogRecord>> {
    let rows = parse_rows(text)?;
    let Some((header, data)) = rows.split_first() else {
        return Ok(Vec::new());
    };
    let index = HeaderIndex::from_row(header)?;
    data.iter()
        .map(|row| LogRecord::from_row(&index, row))
        .collect()
}
