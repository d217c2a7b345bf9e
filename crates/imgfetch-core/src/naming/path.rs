//! Suffix and base-name extraction from image locations.

use crate::error::FetchError;

/// Suffix of the last `/`-separated component of the raw location, including
/// the dot, or `""`. Query strings and fragments are not stripped, so
/// `".../img.php?x=1.png"` yields `".png"`. Leading-dot names (`".jpg"`) have
/// no suffix; trailing slashes are ignored.
pub fn extension_of(location: &str) -> &str {
    let trimmed = location.trim_end_matches('/');
    let name = trimmed.rsplit('/').next().unwrap_or("");
    if name == ".." {
        return "";
    }
    match name.rfind('.') {
        Some(i) if i > 0 => &name[i..],
        _ => "",
    }
}

/// Last non-empty path segment of the URL with its final suffix removed.
///
/// Returns `""` for root paths and an error if the URL cannot be parsed.
pub fn image_base_name(location: &str) -> Result<String, FetchError> {
    let parsed = url::Url::parse(location)
        .map_err(|e| FetchError::InvalidLocation(format!("{}: {}", location, e)))?;
    let segment = parsed
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .last()
        .unwrap_or("");
    let stem = match segment.rfind('.') {
        Some(i) if i > 0 && segment != ".." => &segment[..i],
        _ => segment,
    };
    Ok(stem.to_string())
}
