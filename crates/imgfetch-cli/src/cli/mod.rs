//! CLI for imgfetch.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use imgfetch_core::config::{self, IngestConfig};
use std::path::{Path, PathBuf};

use commands::{run_check, run_fingerprint, run_ingest, run_show_config};

/// Top-level CLI for imgfetch.
#[derive(Debug, Parser)]
#[command(name = "imgfetch")]
#[command(about = "Validate a product CSV and download the images it references", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/imgfetch/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Validate a CSV upload and download every image it lists.
    Ingest {
        /// Path to the CSV file.
        path: PathBuf,
        /// Declared content type (default: guessed from the file suffix).
        #[arg(long, value_name = "TYPE")]
        content_type: Option<String>,
        /// Directory to save images into (overrides config).
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
        /// Images fetched concurrently per batch (overrides config).
        #[arg(long, value_name = "N")]
        batch_size: Option<usize>,
    },

    /// Run every check without downloading and show what would be fetched.
    Check {
        /// Path to the CSV file.
        path: PathBuf,
        /// Declared content type (default: guessed from the file suffix).
        #[arg(long, value_name = "TYPE")]
        content_type: Option<String>,
    },

    /// Print the fingerprint used to count distinct image locations.
    Fingerprint {
        /// Image location (URL).
        location: String,
    },

    /// Show the config file path and effective settings.
    Config,
}

fn load_config(path: Option<&Path>) -> Result<IngestConfig> {
    match path {
        Some(p) => config::load_from_path(p),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Ingest {
                path,
                content_type,
                download_dir,
                batch_size,
            } => {
                let mut cfg = load_config(cli.config.as_deref())?;
                if let Some(dir) = download_dir {
                    cfg.download_dir = dir;
                }
                if let Some(n) = batch_size {
                    cfg.batch_size = n;
                }
                cfg.validate()?;
                tracing::debug!("effective config: {:?}", cfg);
                run_ingest(&cfg, &path, content_type.as_deref()).await?;
            }
            CliCommand::Check { path, content_type } => {
                let cfg = load_config(cli.config.as_deref())?;
                run_check(&cfg, &path, content_type.as_deref())?;
            }
            CliCommand::Fingerprint { location } => run_fingerprint(&location),
            CliCommand::Config => {
                let cfg = load_config(cli.config.as_deref())?;
                run_show_config(&cfg, cli.config.as_deref())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
