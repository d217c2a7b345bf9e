#![allow(dead_code)]

pub mod image_server;

use imgfetch_core::{IngestConfig, Upload};
use std::path::Path;

pub const HEADER: &str = "sku,Image 1,Image 2,Image 3,Image 4,Image 5\n";

/// Writes `csv` to `dir/products.csv` and describes it as a CSV upload.
pub fn csv_upload(dir: &Path, csv: &str) -> Upload {
    let path = dir.join("products.csv");
    std::fs::write(&path, csv).unwrap();
    Upload::from_path(&path, None).unwrap()
}

/// Default config with downloads going under `dir`.
pub fn config_in(dir: &Path) -> IngestConfig {
    IngestConfig {
        download_dir: dir.join("downloads"),
        ..IngestConfig::default()
    }
}
