//! Error type shared by ingestion, configuration and the pipeline entry point.

use thiserror::Error;

/// Errors that abort a pipeline invocation.
///
/// Empty results and incomplete records are not errors; each aggregator
/// absorbs them and returns an empty or reduced structure instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A row's count date could not be parsed. Fails the whole batch.
    #[error("row {row}: unparsable count date `{value}`")]
    MalformedInput { row: usize, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
