//! ---
//! ava_section: "02-wire-data-model"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Telemetry wire formats and framing."
//! ava_version: "v0.0.0-prealpha"
//! ava_owner: "tbd"
//! ---
use thiserror::Error;

pub type WireResult<T> = std::result::Result<T, WireError>;

/// Errors raised while shaping or inspecting telemetry frames.
#[derive(Debug, Error)]
pub enum WireError {
    /// Sensor ids and values are parallel lists and must line up.
    #[error("sensor id list has {ids} entries but value list has {values}")]
    LengthMismatch { ids: usize, values: usize },
    #[error("payload of {len} bytes exceeds the 8-byte packet capacity")]
    PayloadTooLong { len: usize },
    #[error("channel id {id} is outside the supported range 0..=10")]
    UnknownChannel { id: u8 },
    #[error("packet must be exactly 14 bytes, got {actual}")]
    PacketSize { actual: usize },
    #[error("packet length field {length} exceeds the 8-byte payload")]
    LengthField { length: u8 },
    #[error("payload byte {index} lies beyond the declared length but is non-zero")]
    NonZeroPadding { index: usize },
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WireError {
    /// True for errors caused by caller-supplied input rather than encoding failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WireError::LengthMismatch { .. }
                | WireError::PayloadTooLong { .. }
                | WireError::UnknownChannel { .. }
        )
    }
}
