//! Shared utilities for integration tests.

pub mod harness;

use chrono::{DateTime, TimeZone, Utc};

/// A fixed point in time so rendered dates are stable across runs.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
}

/// The first bytes of a PNG file, enough to stand in for image data.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
