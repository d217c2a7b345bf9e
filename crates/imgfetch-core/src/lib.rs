pub mod config;
pub mod error;
pub mod logging;

// Pipeline stages, leaves first.
pub mod upload;
pub mod table;
pub mod extract;
pub mod classify;
pub mod naming;
pub mod fetch;
pub mod report;
pub mod pipeline;

pub use config::IngestConfig;
pub use error::{FetchError, IngestError};
pub use pipeline::{handle_upload, inspect_upload, process_upload, Plan};
pub use report::{Report, Response};
pub use upload::Upload;
