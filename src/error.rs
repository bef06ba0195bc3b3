//! Error type shared by the mask converter and the photostimulation containers

use crate::types::series::StimulusFormat;

/// Result type for photostimulation operations
pub type Result<T> = std::result::Result<T, PhotostimError>;

/// Errors raised while validating or mutating photostimulation containers.
///
/// Every error is raised at the point of detection; a failed constructor or
/// mutator leaves no partially assigned state behind.
#[derive(Debug, thiserror::Error)]
pub enum PhotostimError {
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Invalid mask value {value}: mask data must be either 0 (off) or 1 (on)")]
    InvalidMaskValue { value: f64 },

    #[error("'{field}' must be specified {context}")]
    MissingRequiredField {
        field: &'static str,
        context: &'static str,
    },

    #[error("Cannot {operation} with {rank}-dimensional data")]
    UnsupportedDimension { operation: &'static str, rank: usize },

    #[error("{resource} already exists in '{container}'")]
    DuplicateResource {
        resource: &'static str,
        container: String,
    },

    #[error("Invalid value {value} for '{format}' data")]
    InvalidSeriesValue { format: StimulusFormat, value: f64 },

    #[error("Unknown format '{0}': expected 'interval' or 'series'")]
    UnknownFormat(String),

    #[error("Invalid timing: {0}")]
    InvalidTiming(String),

    #[error("Cannot {operation} on a series with format '{format}'")]
    IncompatibleFormat {
        operation: &'static str,
        format: StimulusFormat,
    },

    #[error("Series '{name}' has no data")]
    EmptySeries { name: String },

    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PhotostimError {
    pub(crate) fn missing(field: &'static str, context: &'static str) -> Self {
        Self::MissingRequiredField { field, context }
    }
}
