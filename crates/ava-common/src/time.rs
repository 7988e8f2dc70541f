//! ---
//! ava_section: "01-core-functionality"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Shared primitives and utilities for the uploader runtime."
//! ava_version: "v0.0.0-prealpha"
//! ava_owner: "tbd"
//! ---
use std::time::{Duration, Instant};

use chrono::Utc;

/// Wall-clock milliseconds since the Unix epoch, as carried by JSON bundles.
pub fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Truncate a millisecond count to the 32-bit packet timestamp field (mod 2^32).
pub fn wrap_millis(millis: u128) -> u32 {
    (millis % (1u128 << 32)) as u32
}

/// Device-relative monotonic clock used to stamp binary packets.
#[derive(Debug, Clone, Copy)]
pub struct DeviceClock {
    origin: Instant,
}

impl DeviceClock {
    /// Start a clock whose zero is "now".
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Time elapsed since the clock started.
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Elapsed milliseconds, wrapped to fit the packet timestamp field.
    pub fn now_ms(&self) -> u32 {
        wrap_millis(self.elapsed().as_millis())
    }
}

impl Default for DeviceClock {
    fn default() -> Self {
        Self::start()
    }
}
