//! Filename timestamps: ISO-8601 UTC with punctuation stripped.

use chrono::{DateTime, TimeDelta, Utc};

const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S%9fZ";

/// Hands out strictly increasing timestamps for one run, so two images with
/// the same source name never map to the same path.
#[derive(Debug, Default)]
pub struct Stamper {
    last: Option<DateTime<Utc>>,
}

impl Stamper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_stamp(&mut self) -> String {
        self.next_at(Utc::now())
    }

    fn next_at(&mut self, now: DateTime<Utc>) -> String {
        let at = match self.last {
            Some(prev) if now <= prev => prev + TimeDelta::nanoseconds(1),
            _ => now,
        };
        self.last = Some(at);
        at.format(STAMP_FORMAT).to_string()
    }
}
