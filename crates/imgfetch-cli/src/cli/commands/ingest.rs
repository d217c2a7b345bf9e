//! `imgfetch ingest <path>` – validate a CSV and download its images.

use anyhow::{bail, Result};
use imgfetch_core::fetch::{CurlTransport, Transport};
use imgfetch_core::{handle_upload, IngestConfig, Upload};
use std::path::Path;
use std::sync::Arc;

/// Prints the JSON response; a non-200 outcome is returned as an error so the
/// process exits non-zero.
pub async fn run_ingest(cfg: &IngestConfig, path: &Path, content_type: Option<&str>) -> Result<()> {
    let upload = Upload::from_path(path, content_type)?;
    let transport: Arc<dyn Transport> = Arc::new(CurlTransport::from_config(cfg));

    let response = handle_upload(&upload, cfg, transport).await;
    println!("{}", response.to_json()?);

    if !response.success {
        bail!("upload rejected (status {})", response.status);
    }
    Ok(())
}
