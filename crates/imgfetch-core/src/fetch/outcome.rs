//! Per-image fetch outcomes and their accumulation.

use crate::error::FetchError;
use std::path::PathBuf;

/// Result of one fetch attempt. Each fetchable location yields exactly one.
#[derive(Debug)]
pub enum FetchOutcome {
    Success {
        location: String,
        path: PathBuf,
        bytes: u64,
    },
    Failure {
        location: String,
        error: FetchError,
    },
}

impl FetchOutcome {
    pub fn location(&self) -> &str {
        match self {
            FetchOutcome::Success { location, .. } | FetchOutcome::Failure { location, .. } => {
                location
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }
}

/// Successful and failed locations in input order, plus where successes were saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub successful: Vec<String>,
    pub failed: Vec<String>,
    pub saved: Vec<PathBuf>,
}

impl FetchSummary {
    pub fn record(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Success { location, path, bytes } => {
                tracing::debug!(%location, path = %path.display(), bytes, "image saved");
                self.successful.push(location);
                self.saved.push(path);
            }
            FetchOutcome::Failure { location, error } => {
                tracing::warn!(%location, "image fetch failed: {}", error);
                self.failed.push(location);
            }
        }
    }

    pub fn attempted(&self) -> usize {
        self.successful.len() + self.failed.len()
    }
}
