//! ---
//! ava_section: "02-wire-data-model"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Telemetry wire formats and framing."
//! ava_version: "v0.0.0-prealpha"
//! ava_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

use crate::error::{WireError, WireResult};
use crate::frame::WireFrame;
use crate::reading::Reading;

/// Every sensor value occupies one big-endian `u16` in `raw_data`.
pub const BYTES_PER_SENSOR: usize = 2;

/// Saturate a value into the unsigned 16-bit range.
pub fn clamp_u16(value: i64) -> u16 {
    value.clamp(0, i64::from(u16::MAX)) as u16
}

/// Clamp and split a value into `[high, low]`.
pub fn u16_be_bytes(value: i64) -> [u8; BYTES_PER_SENSOR] {
    clamp_u16(value).to_be_bytes()
}

/// Pack values back to back, two bytes each, in input order.
pub fn pack_values_be(values: &[i64]) -> Vec<u8> {
    values.iter().flat_map(|v| u16_be_bytes(*v)).collect()
}

/// JSON envelope accepted by the `/api/ws/send` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleMessage {
    /// Milliseconds since the Unix epoch.
    pub time: i64,
    pub msg_id: Vec<u32>,
    /// Flat byte list, [`BYTES_PER_SENSOR`] bytes per entry of `msg_id`.
    pub raw_data: Vec<u8>,
}

impl BundleMessage {
    /// Decode `raw_data` back into one `u16` per sensor.
    pub fn values(&self) -> Vec<u16> {
        self.raw_data
            .chunks_exact(BYTES_PER_SENSOR)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect()
    }

    pub fn to_json(&self) -> WireResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_frame(&self) -> WireResult<WireFrame> {
        self.to_json().map(WireFrame::Text)
    }
}

/// Build a bundle from a reading stamped with `time_ms`.
///
/// Fails with [`WireError::LengthMismatch`] when the id and value lists differ
/// in length.
pub fn encode_bundle(reading: &Reading, time_ms: i64) -> WireResult<BundleMessage> {
    if !reading.is_consistent() {
        return Err(WireError::LengthMismatch {
            ids: reading.ids.len(),
            values: reading.values.len(),
        });
    }
    Ok(BundleMessage {
        time: time_ms,
        msg_id: reading.ids.clone(),
        raw_data: pack_values_be(&reading.values),
    })
}
