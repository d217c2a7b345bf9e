//! Error taxonomy for the ingestion pipeline.
//!
//! `IngestError` aborts a request and maps to an HTTP-like status.
//! `FetchError` is per image: the fetch engine records it and moves on.

use thiserror::Error;

/// Status reported for client-input problems.
pub const STATUS_CLIENT_ERROR: u16 = 400;
/// Status reported for unexpected failures.
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Message shown to the caller for internal failures; details go to the log only.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum IngestError {
    /// Declared content type or size rejected before reading the upload.
    #[error("{0}")]
    Validation(String),

    /// The upload is not well-formed delimited text. I/O failures while
    /// reading it are `Internal`, not `Parse`.
    #[error("Invalid CSV: {0}")]
    Parse(#[source] csv::Error),

    #[error("CSV contains more than the allowed {max} rows.")]
    RowCountExceeded { max: usize },

    #[error("Invalid CSV format. Missing required columns.")]
    MissingColumns { missing: Vec<String> },

    #[error("CSV contains more than the allowed {max} unique image URLs.")]
    TooManyUniqueReferences { unique: usize, max: usize },

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl IngestError {
    /// True for problems caused by the upload itself.
    pub fn is_client_fault(&self) -> bool {
        !matches!(self, IngestError::Internal(_))
    }

    pub fn status(&self) -> u16 {
        if self.is_client_fault() {
            STATUS_CLIENT_ERROR
        } else {
            STATUS_INTERNAL_ERROR
        }
    }

    /// Message safe to hand back to the caller.
    pub fn public_message(&self) -> String {
        match self {
            IngestError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Failure of a single image fetch. Recorded, never propagated past the engine.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Location could not be turned into a local filename (unparseable URL, empty path).
    #[error("invalid image location: {0}")]
    InvalidLocation(String),

    /// Request deadline expired.
    #[error("request timed out")]
    Timeout,

    /// Curl reported an error (connection, DNS, aborted write, etc.).
    #[error("transport: {0}")]
    Transport(#[from] curl::Error),

    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),

    /// Writing the body to disk failed.
    #[error("storage: {0}")]
    Io(#[from] std::io::Error),

    /// The worker running this fetch panicked or was cancelled.
    #[error("fetch task failed: {0}")]
    TaskPanicked(String),
}

impl FetchError {
    /// Maps curl timeouts onto `Timeout`; other curl errors stay `Transport`.
    pub fn from_curl(e: curl::Error) -> Self {
        if e.is_operation_timedout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(e)
        }
    }
}
