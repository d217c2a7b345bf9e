//! End-to-end ingestion: upload checks, CSV validation, extraction,
//! uniqueness ceiling, classification, fetch and aggregation.
//!
//! Every client-fault check completes before the first network request.

use crate::classify::{check_unique_ceiling, classify, Classification};
use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::extract::extract_references;
use crate::fetch::{FetchEngine, Transport};
use crate::report::{aggregate, Report, Response};
use crate::table::read_records;
use crate::upload::{validate_upload, Upload};
use std::sync::Arc;

/// Everything known about an upload before fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub rows: usize,
    /// Extracted locations, repeats included.
    pub references: usize,
    pub unique: usize,
    pub classification: Classification,
}

/// Runs every pre-network step and returns what would be fetched.
pub fn inspect_upload(upload: &Upload, cfg: &IngestConfig) -> Result<Plan, IngestError> {
    validate_upload(upload, cfg)?;
    let records = read_records(&upload.content_path, cfg)?;
    let references = extract_references(&records, &cfg.image_columns);
    let unique = check_unique_ceiling(&references, cfg.max_unique_references)?;
    let reference_count = references.len();
    let classification = classify(references, &cfg.allowed_extensions);

    tracing::debug!(
        rows = records.len(),
        references = reference_count,
        unique,
        fetchable = classification.fetchable.len(),
        rejected = classification.rejected.len(),
        "upload inspected"
    );

    Ok(Plan {
        rows: records.len(),
        references: reference_count,
        unique,
        classification,
    })
}

/// Runs [`inspect_upload`] (file reads, CSV parsing) on the blocking pool.
async fn inspect_blocking(upload: &Upload, cfg: &IngestConfig) -> Result<Plan, IngestError> {
    let upload = upload.clone();
    let cfg = cfg.clone();
    tokio::task::spawn_blocking(move || inspect_upload(&upload, &cfg))
        .await
        .map_err(|e| IngestError::Internal(anyhow::anyhow!("inspect task: {}", e)))?
}

/// Validates the upload, fetches its images and reports the outcome.
pub async fn process_upload(
    upload: &Upload,
    cfg: &IngestConfig,
    transport: Arc<dyn Transport>,
) -> Result<Report, IngestError> {
    let plan = inspect_blocking(upload, cfg).await?;
    let Classification { fetchable, rejected } = plan.classification;

    let engine = FetchEngine::from_config(transport, cfg);
    let summary = engine.fetch_all(fetchable).await?;
    let report = aggregate(&summary, &rejected);

    tracing::info!(
        rows = plan.rows,
        saved = report.success_count,
        failed = summary.failed.len(),
        rejected = rejected.len(),
        "upload processed"
    );
    Ok(report)
}

/// [`process_upload`] mapped onto the caller-facing response.
pub async fn handle_upload(
    upload: &Upload,
    cfg: &IngestConfig,
    transport: Arc<dyn Transport>,
) -> Response {
    Response::from_result(&process_upload(upload, cfg, transport).await)
}
