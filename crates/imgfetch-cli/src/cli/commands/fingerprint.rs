//! `imgfetch fingerprint <location>` – print the SHA-256 fingerprint.

use imgfetch_core::classify::Fingerprint;

pub fn run_fingerprint(location: &str) {
    println!("{}  {}", Fingerprint::of(location), location);
}
