//! ---
//! ava_section: "05-networking"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Connection and transmit error types."
//! ava_version: "v0.1.0"
//! ava_owner: "tbd"
//! ---
use std::time::Duration;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure to open the WebSocket; the manager retries these indefinitely.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("websocket handshake with {url} failed: {source}")]
    Handshake {
        url: String,
        #[source]
        source: BoxError,
    },
    #[error("websocket handshake with {url} timed out after {timeout:?}")]
    TimedOut { url: String, timeout: Duration },
}

/// Failure to deliver a frame on an open link.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("transmit failed: {0}")]
    Transmit(#[source] BoxError),
    #[error("link is closed")]
    Closed,
    #[error("peer did not accept the frame within {timeout:?}")]
    TimedOut { timeout: Duration },
    #[error("frame not delivered after reconnect: {source}")]
    RetryExhausted {
        #[source]
        source: Box<SendError>,
    },
}

impl SendError {
    /// Wrap any transport error.
    pub fn transmit<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SendError::Transmit(Box::new(err))
    }
}
