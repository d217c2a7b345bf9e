//! Deduplication and classification of extracted image locations.
//!
//! Both checks are pure. The uniqueness ceiling runs over the full extracted
//! list, before classification, so padding an upload with rejected locations
//! cannot hide it.

use crate::error::IngestError;
use crate::naming::extension_of;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;

/// SHA-256 of a location string. Only used to count distinct locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(location: &str) -> Self {
        let digest = Sha256::digest(location.as_bytes());
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        Self(out)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Number of distinct fingerprints in `locations`.
pub fn unique_count(locations: &[String]) -> usize {
    locations
        .iter()
        .map(|l| Fingerprint::of(l))
        .collect::<HashSet<_>>()
        .len()
}

/// Fails with `TooManyUniqueReferences` when more than `max` distinct
/// locations are present. Returns the distinct count otherwise.
pub fn check_unique_ceiling(locations: &[String], max: usize) -> Result<usize, IngestError> {
    let unique = unique_count(locations);
    if unique > max {
        tracing::debug!(unique, max, "unique image ceiling exceeded");
        return Err(IngestError::TooManyUniqueReferences { unique, max });
    }
    Ok(unique)
}

/// Locations split by suffix. Every input lands in exactly one list, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub fetchable: Vec<String>,
    pub rejected: Vec<String>,
}

/// True if the location's suffix matches an entry of `allowed`, ignoring ASCII case.
pub fn is_allowed_extension(location: &str, allowed: &[String]) -> bool {
    let ext = extension_of(location);
    !ext.is_empty() && allowed.iter().any(|a| a.eq_ignore_ascii_case(ext))
}

pub fn classify(locations: Vec<String>, allowed: &[String]) -> Classification {
    let (fetchable, rejected) = locations
        .into_iter()
        .partition(|l| is_allowed_extension(l, allowed));
    Classification { fetchable, rejected }
}
