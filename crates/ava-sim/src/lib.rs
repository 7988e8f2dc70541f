//! ---
//! ava_section: "11-simulation"
//! ava_subsection: "01-bootstrap"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Simulation module exports and shared types."
//! ava_version: "v0.1.0"
//! ava_owner: "tbd"
//! ---
//! Synthetic telemetry generators for the AVA-02 uploader.
//!
//! Generator state is always an explicit value: callers hand the previous
//! state to a tick function and keep the state it returns. Nothing here
//! survives a process restart.

pub mod bench;
pub mod channels;
pub mod driving;
pub mod generator;

pub use bench::BenchPattern;
pub use channels::{channel, ChannelRotor, ChannelSample, ChannelSpec, CHANNEL_TABLE};
pub use driving::{DrivingAction, DrivingState};
pub use generator::{ChannelTick, DrivingTick, SimulationMode, TelemetryGenerator};
