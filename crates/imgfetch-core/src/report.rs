//! Result aggregation and the caller-facing response object.

use crate::error::{IngestError, STATUS_CLIENT_ERROR};
use crate::fetch::FetchSummary;
use serde::{Deserialize, Serialize};

pub const STATUS_OK: u16 = 200;

pub fn failure_message(location: &str) -> String {
    format!("Failed to download image: {}", location)
}

/// Outcome of a completed run: how many images were saved and one message
/// per location that was not (fetch failures first, then rejected suffixes).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub success_count: usize,
    pub errors: Vec<String>,
}

impl Report {
    pub fn message(&self) -> String {
        format!("Processed {} images successfully", self.success_count)
    }
}

/// Merges fetch results with the locations rejected by suffix.
pub fn aggregate(summary: &FetchSummary, rejected: &[String]) -> Report {
    let errors = summary
        .failed
        .iter()
        .chain(rejected)
        .map(|l| failure_message(l))
        .collect();
    Report {
        success_count: summary.successful.len(),
        errors,
    }
}

/// JSON body returned to the caller, plus an HTTP-like status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    pub message: String,
    /// Present only for completed runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip)]
    pub status: u16,
}

impl Response {
    /// A completed run always reports success, even with zero images saved.
    pub fn from_report(report: &Report) -> Self {
        Self {
            success: true,
            message: report.message(),
            errors: Some(report.errors.clone()),
            status: STATUS_OK,
        }
    }

    pub fn from_error(err: &IngestError) -> Self {
        if err.is_client_fault() {
            tracing::info!("upload rejected: {}", err);
        } else {
            tracing::error!("ingest failed: {}", err);
        }
        Self {
            success: false,
            message: err.public_message(),
            errors: None,
            status: err.status(),
        }
    }

    pub fn from_result(result: &Result<Report, IngestError>) -> Self {
        match result {
            Ok(report) => Self::from_report(report),
            Err(e) => Self::from_error(e),
        }
    }

    pub fn is_client_error(&self) -> bool {
        (STATUS_CLIENT_ERROR..500).contains(&self.status)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
