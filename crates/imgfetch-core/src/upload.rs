//! Upload boundary: what the receiving layer hands to the pipeline.
//!
//! Only the declared metadata is checked here; the content is not opened.

use crate::config::{IngestConfig, MIB};
use crate::error::IngestError;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Content type assumed for files without a recognised suffix.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A received upload: declared metadata plus where its bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub content_type: String,
    pub byte_size: u64,
    pub content_path: PathBuf,
}

impl Upload {
    pub fn new(content_type: impl Into<String>, byte_size: u64, content_path: impl Into<PathBuf>) -> Self {
        Self {
            content_type: content_type.into(),
            byte_size,
            content_path: content_path.into(),
        }
    }

    /// Describes a local file: size from metadata, content type from the suffix
    /// unless `content_type` overrides it.
    pub fn from_path(path: &Path, content_type: Option<&str>) -> anyhow::Result<Self> {
        let meta = std::fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
        let content_type = match content_type {
            Some(ct) => ct.to_string(),
            None => guess_content_type(path).to_string(),
        };
        Ok(Self::new(content_type, meta.len(), path))
    }
}

fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => "text/csv",
        _ => FALLBACK_CONTENT_TYPE,
    }
}

/// Checks declared content type and size against the configured limits.
pub fn validate_upload(upload: &Upload, cfg: &IngestConfig) -> Result<(), IngestError> {
    if upload.content_type != cfg.expected_content_type {
        return Err(IngestError::Validation("Only CSV files are allowed".to_string()));
    }
    if upload.byte_size > cfg.max_upload_bytes {
        return Err(IngestError::Validation(format!(
            "File size exceeds the {} limit",
            format_limit(cfg.max_upload_bytes)
        )));
    }
    Ok(())
}

fn format_limit(bytes: u64) -> String {
    if bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}
