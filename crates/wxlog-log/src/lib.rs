//! Append-only observation log
//!
//! One comma-delimited UTF-8 file, header on the first line, one
//! record per poll. Records are only ever appended.

pub mod appender;
pub mod codec;
pub mod reader;
pub mod schema;

pub use appender::*;
pub use reader::*;
pub use schema::*;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Log I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Log header is missing column {0}")]
    MissingHeader(&'static str),
}

pub type LogResult<T> = Result<T, LogError>;
