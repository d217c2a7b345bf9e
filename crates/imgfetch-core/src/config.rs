//! Pipeline limits and fetch settings, loaded from `~/.config/imgfetch/config.toml`.
//!
//! Every limit the pipeline enforces lives here and is passed explicitly into
//! the entry points; nothing is read from module-level state.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MIB: u64 = 1024 * 1024;

/// Limits and column layout for one ingestion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Declared content type an upload must carry.
    pub expected_content_type: String,
    /// Maximum declared upload size in bytes.
    pub max_upload_bytes: u64,
    /// Maximum number of data rows (header excluded).
    pub max_rows: usize,
    /// Number of images fetched concurrently; batches run one after another.
    pub batch_size: usize,
    /// Maximum number of distinct image locations per upload.
    pub max_unique_references: usize,
    /// Lower-case suffixes (with leading dot) that are fetched.
    pub allowed_extensions: Vec<String>,
    /// Primary identifier column.
    pub id_column: String,
    /// The five image columns, in extraction order.
    pub image_columns: [String; 5],
    /// Target directory; relative paths resolve against the working directory.
    pub download_dir: PathBuf,
    pub connect_timeout_secs: u64,
    /// Whole-request deadline per image; expiry is recorded as a fetch failure.
    pub request_timeout_secs: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            expected_content_type: "text/csv".to_string(),
            max_upload_bytes: 10 * MIB,
            max_rows: 1000,
            batch_size: 50,
            max_unique_references: 5000,
            allowed_extensions: [".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            id_column: "sku".to_string(),
            image_columns: [
                "Image 1".to_string(),
                "Image 2".to_string(),
                "Image 3".to_string(),
                "Image 4".to_string(),
                "Image 5".to_string(),
            ],
            download_dir: PathBuf::from("downloads"),
            connect_timeout_secs: 15,
            request_timeout_secs: 60,
        }
    }
}

impl IngestConfig {
    /// Identifier column followed by the image columns.
    pub fn required_columns(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.id_column.as_str()).chain(self.image_columns.iter().map(String::as_str))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            bail!("timeouts must be non-zero");
        }
        if self.allowed_extensions.is_empty() {
            bail!("allowed_extensions must not be empty");
        }
        if let Some(bad) = self.allowed_extensions.iter().find(|e| !e.starts_with('.')) {
            bail!("allowed extension {:?} must start with '.'", bad);
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<IngestConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: IngestConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<IngestConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = IngestConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}
