//! Local filename derivation for fetched images.
//!
//! Files are named `{base}{ext}_{stamp}`: the URL's last path segment without
//! its suffix, the suffix of the whole location string, and a per-run
//! timestamp that never repeats.

mod path;
mod sanitize;
mod stamp;

pub use path::{extension_of, image_base_name};
pub use sanitize::sanitize_filename_for_linux;
pub use stamp::Stamper;

use crate::error::FetchError;

/// Base name used when the URL path yields nothing usable.
const DEFAULT_BASE_NAME: &str = "image";

/// Builds the local filename for `location` with the given stamp.
///
/// # Examples
///
/// - `local_filename("http://example.com/a/img1.jpg", "20240101T000000000000000Z")`
///   → `"img1.jpg_20240101T000000000000000Z"`
pub fn local_filename(location: &str, stamp: &str) -> Result<String, FetchError> {
    let base = image_base_name(location)?;
    let base = sanitize_filename_for_linux(&base);
    let base = if base.is_empty() { DEFAULT_BASE_NAME } else { base.as_str() };
    let ext = sanitize_filename_for_linux(extension_of(location));
    let ext = if ext.is_empty() { String::new() } else { format!(".{}", ext) };
    Ok(format!("{}{}_{}", base, ext, stamp))
}
