//! `imgfetch config` – show where config lives and what is in effect.

use anyhow::Result;
use imgfetch_core::config::{self, IngestConfig};
use std::path::Path;

pub fn run_show_config(cfg: &IngestConfig, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
