//! CLI command handlers, one per file.

mod check;
mod fingerprint;
mod ingest;
mod show_config;

pub use check::run_check;
pub use fingerprint::run_fingerprint;
pub use ingest::run_ingest;
pub use show_config::run_show_config;
