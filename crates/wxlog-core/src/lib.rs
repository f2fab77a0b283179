//! Core data types, unit converters, and observation normalization
//!
//! This crate turns raw provider responses into one well-typed
//! observation per poll cycle. It performs no I/O.

pub mod aqi;
pub mod normalize;
pub mod pipeline;
pub mod rollups;
pub mod types;
pub mod units;

pub use aqi::*;
pub use normalize::*;
pub use pipeline::*;
pub use rollups::*;
pub use types::*;
pub use units::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A top-level group the record cannot be built without is missing
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("Invalid {payload} payload: {source}")]
    InvalidJson {
        payload: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type NormalizeResult<T> = Result<T, NormalizeError>;
