//! `imgfetch check <path>` – dry run: validate and classify, no downloads.

use anyhow::Result;
use imgfetch_core::report::failure_message;
use imgfetch_core::{inspect_upload, IngestConfig, Upload};
use std::path::Path;

pub fn run_check(cfg: &IngestConfig, path: &Path, content_type: Option<&str>) -> Result<()> {
    let upload = Upload::from_path(path, content_type)?;
    let plan = inspect_upload(&upload, cfg)?;

    println!("rows:       {}", plan.rows);
    println!("references: {} ({} unique)", plan.references, plan.unique);
    println!("fetchable:  {}", plan.classification.fetchable.len());
    println!("rejected:   {}", plan.classification.rejected.len());
    for location in &plan.classification.rejected {
        println!("  {}", failure_message(location));
    }
    Ok(())
}
