//! Network transport for single image fetches.
//!
//! `CurlTransport` issues one GET per image with libcurl and streams the body
//! straight to the destination file. Calls block; the engine runs them on
//! tokio's blocking pool.

use crate::config::IngestConfig;
use crate::error::FetchError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Fetches `location` into a new file at `dest`, returning the bytes written.
///
/// Implementations must not leave a file at `dest` when they return an error.
pub trait Transport: Send + Sync {
    fn fetch_to(&self, location: &str, dest: &Path) -> Result<u64, FetchError>;
}

/// libcurl transport with connect and whole-request deadlines.
#[derive(Debug, Clone, Copy)]
pub struct CurlTransport {
    connect_timeout: Duration,
    timeout: Duration,
}

impl CurlTransport {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            connect_timeout,
            timeout,
        }
    }

    pub fn from_config(cfg: &IngestConfig) -> Self {
        Self::new(cfg.connect_timeout(), cfg.request_timeout())
    }

    fn download(&self, location: &str, dest: &Path) -> Result<u64, FetchError> {
        let file = File::options().write(true).create_new(true).open(dest)?;
        let mut writer = BufWriter::new(file);
        let mut written = 0u64;
        let mut write_err: Option<std::io::Error> = None;

        let mut easy = curl::easy::Easy::new();
        easy.url(location).map_err(FetchError::from_curl)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match writer.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_err {
            return Err(FetchError::Io(e));
        }
        performed.map_err(FetchError::from_curl)?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        writer.flush()?;
        Ok(written)
    }
}

impl Transport for CurlTransport {
    fn fetch_to(&self, location: &str, dest: &Path) -> Result<u64, FetchError> {
        let result = self.download(location, dest);
        if result.is_err() {
            // Partial bodies and error pages are never kept.
            let _ = std::fs::remove_file(dest);
        }
        result
    }
}
