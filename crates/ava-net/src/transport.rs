//! ---
//! ava_section: "05-networking"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "WebSocket transport seam and tungstenite client."
//! ava_version: "v0.1.0"
//! ava_owner: "tbd"
//! ---
use std::time::Duration;

use async_trait::async_trait;
use ava_wire::WireFrame;
use futures_util::SinkExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use crate::error::{ConnectError, SendError};

/// Opens links to an endpoint.
#[async_trait]
pub trait Connector: Send + Sync {
    type Link: Link;

    async fn connect(&self, url: &str) -> Result<Self::Link, ConnectError>;
}

/// An open, message-oriented connection.
#[async_trait]
pub trait Link: Send {
    /// Deliver one frame as a single WebSocket message.
    async fn transmit(&mut self, frame: &WireFrame) -> Result<(), SendError>;

    /// Close the link. Errors are swallowed; the link is unusable afterwards either way.
    async fn shutdown(&mut self);
}

/// WebSocket client over tokio-tungstenite; `wss://` uses rustls with native roots.
///
/// `io_timeout` bounds the handshake, every send and the close handshake, so a
/// peer that stops reading surfaces as a failure instead of stalling the caller.
#[derive(Debug, Clone)]
pub struct TungsteniteConnector {
    io_timeout: Duration,
}

impl TungsteniteConnector {
    pub fn new(io_timeout: Duration) -> Self {
        Self { io_timeout }
    }
}

impl Default for TungsteniteConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl Connector for TungsteniteConnector {
    type Link = TungsteniteLink;

    async fn connect(&self, url: &str) -> Result<TungsteniteLink, ConnectError> {
        match tokio::time::timeout(self.io_timeout, connect_async(url)).await {
            Ok(Ok((stream, response))) => {
                debug!(url, status = %response.status(), "websocket handshake complete");
                Ok(TungsteniteLink {
                    stream,
                    io_timeout: self.io_timeout,
                })
            }
            Ok(Err(err)) => Err(ConnectError::Handshake {
                url: url.to_owned(),
                source: Box::new(err),
            }),
            Err(_) => Err(ConnectError::TimedOut {
                url: url.to_owned(),
                timeout: self.io_timeout,
            }),
        }
    }
}

pub struct TungsteniteLink {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    io_timeout: Duration,
}

impl std::fmt::Debug for TungsteniteLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TungsteniteLink")
            .field("io_timeout", &self.io_timeout)
            .finish_non_exhaustive()
    }
}

fn to_message(frame: &WireFrame) -> Message {
    match frame {
        WireFrame::Text(text) => Message::Text(text.clone()),
        WireFrame::Binary(bytes) => Message::Binary(bytes.clone()),
    }
}

#[async_trait]
impl Link for TungsteniteLink {
    async fn transmit(&mut self, frame: &WireFrame) -> Result<(), SendError> {
        let sent = tokio::time::timeout(self.io_timeout, self.stream.send(to_message(frame)))
            .await
            .map_err(|_| SendError::TimedOut {
                timeout: self.io_timeout,
            })?;
        sent.map_err(|err| match err {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                SendError::Closed
            }
            other => SendError::transmit(other),
        })
    }

    async fn shutdown(&mut self) {
        match tokio::time::timeout(self.io_timeout, self.stream.close(None)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => debug!(error = %err, "websocket close handshake did not complete"),
            Err(_) => warn!(
                timeout_ms = self.io_timeout.as_millis() as u64,
                "websocket close handshake timed out; dropping the socket"
            ),
        }
    }
}
