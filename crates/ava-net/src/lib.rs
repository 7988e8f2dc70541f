//! ---
//! ava_section: "05-networking"
//! ava_subsection: "01-bootstrap"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "WebSocket uplink exports."
//! ava_version: "v0.1.0"
//! ava_owner: "tbd"
//! ---
//! WebSocket uplink for AVA-02 telemetry.
//!
//! [`ConnectionManager`] holds at most one link to the ingest endpoint. The
//! transport sits behind [`Connector`] and [`Link`] so the reconnect and
//! retry-once rules can be exercised without a network.

pub mod connection;
pub mod error;
pub mod policy;
pub mod transport;

pub use connection::{ConnectionManager, ConnectionState, LinkSnapshot, LinkStatus, SendReport};
pub use error::{BoxError, ConnectError, SendError};
pub use policy::ReconnectPolicy;
pub use transport::{Connector, Link, TungsteniteConnector, TungsteniteLink};
