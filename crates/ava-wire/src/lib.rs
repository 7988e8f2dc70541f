//! ---
//! ava_section: "02-wire-data-model"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Telemetry wire formats and framing."
//! ava_version: "v0.0.0-prealpha"
//! ava_owner: "tbd"
//! ---
//! Wire formats understood by the AVA-02 ingest endpoint.
//!
//! Two framings exist and a run only ever uses one of them:
//!
//! - **Bundle**: a JSON text frame carrying several sensor ids and their
//!   values packed as big-endian `u16` pairs.
//! - **Packet**: a fixed 14-byte binary frame for a single channel.
//!
//! This crate only shapes bytes. It knows nothing about connections or how
//! readings are generated.

mod bundle;
mod error;
mod frame;
mod packet;
mod reading;

pub use bundle::{
    clamp_u16, encode_bundle, pack_values_be, u16_be_bytes, BundleMessage, BYTES_PER_SENSOR,
};
pub use error::{WireError, WireResult};
pub use frame::WireFrame;
pub use packet::{TelemetryPacket, MAX_CHANNEL_ID, PACKET_SIZE, PAYLOAD_CAPACITY};
pub use reading::Reading;
