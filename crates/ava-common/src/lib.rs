//! ---
//! ava_section: "01-core-functionality"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Shared primitives and utilities for the uploader runtime."
//! ava_version: "v0.0.0-prealpha"
//! ava_owner: "tbd"
//! ---
//! Core shared primitives for the AVA-02 uploader workspace.
//! This crate exposes configuration loading, tracing setup and the
//! clocks used to stamp outgoing telemetry.

pub mod config;
pub mod logging;
pub mod time;

pub use config::{
    AppConfig, BundleConfig, EndpointConfig, LoggingConfig, PacketConfig, ReconnectConfig,
    SimulationConfig, DEFAULT_ENDPOINT_URL,
};
pub use logging::{init_tracing, LogFormat};
pub use time::{epoch_millis, wrap_millis, DeviceClock};
