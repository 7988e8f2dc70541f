//! ---
//! ava_section: "05-networking"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Connection lifecycle with reconnect and retry-once delivery."
//! ava_version: "v0.1.0"
//! ava_owner: "tbd"
//! ---
//! Connection lifecycle for a single WebSocket endpoint.
//!
//! ```text
//!                   +-- fail, sleep --+
//!                   v                 |
//! Disconnected --> Connecting --------+--ok--> Connected
//!      ^                                           |
//!      +------------------ send fails -------------+
//! ```
//!
//! A failed send tears the link down, reconnects (retrying forever) and
//! resends the same frame exactly once. A second failure is returned to
//! the caller and the link is left closed.

use std::sync::Arc;

use ava_logging::{log_link_event, LinkOutcome, LogContext};
use ava_wire::WireFrame;
use parking_lot::Mutex;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::error::SendError;
use crate::policy::ReconnectPolicy;
use crate::transport::{Connector, Link};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        }
    }
}

/// Point-in-time view of the link and its counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkSnapshot {
    pub state: ConnectionState,
    pub connects: u64,
    pub failed_connects: u64,
    pub frames_sent: u64,
    pub bytes_sent: u64,
    pub resends: u64,
}

/// Cloneable read handle onto a manager's link status.
#[derive(Debug, Clone, Default)]
pub struct LinkStatus {
    inner: Arc<Mutex<LinkSnapshot>>,
}

impl LinkStatus {
    pub fn snapshot(&self) -> LinkSnapshot {
        *self.inner.lock()
    }

    fn update(&self, apply: impl FnOnce(&mut LinkSnapshot)) {
        apply(&mut self.inner.lock());
    }
}

/// How a frame made it onto the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendReport {
    /// 1 for a first-time success, 2 when the frame was resent.
    pub attempts: u8,
    pub reconnected: bool,
}

/// Owns at most one open link and the policy for replacing it.
pub struct ConnectionManager<C: Connector> {
    connector: C,
    url: String,
    policy: ReconnectPolicy,
    link: Option<C::Link>,
    status: LinkStatus,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C, url: impl Into<String>, policy: ReconnectPolicy) -> Self {
        Self {
            connector,
            url: url.into(),
            policy,
            link: None,
            status: LinkStatus::default(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> ConnectionState {
        self.status.snapshot().state
    }

    pub fn status(&self) -> LinkStatus {
        self.status.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Connect, sleeping `policy.delay` after every failure. Only returns once
    /// a link is open; the number of attempts it took is returned.
    pub async fn connect(&mut self) -> u64 {
        let mut attempt = 0u64;
        loop {
            attempt += 1;
            self.status.update(|s| s.state = ConnectionState::Connecting);
            let ctx = LogContext::new()
                .with_endpoint(&self.url)
                .with_attempt(attempt);
            match self.connector.connect(&self.url).await {
                Ok(link) => {
                    self.link = Some(link);
                    self.status.update(|s| {
                        s.state = ConnectionState::Connected;
                        s.connects += 1;
                    });
                    log_link_event(Some(&ctx), "link.connect", "connected", LinkOutcome::Success);
                    return attempt;
                }
                Err(err) => {
                    let delay = self.policy.delay_after(attempt);
                    self.status.update(|s| s.failed_connects += 1);
                    log_link_event(
                        Some(&ctx),
                        "link.connect",
                        &format!("{err}; next attempt in {}ms", delay.as_millis()),
                        LinkOutcome::Retrying,
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    /// Deliver `frame`, connecting first if needed. On failure the link is
    /// replaced and the frame resent once; a second failure is returned.
    pub async fn send(&mut self, frame: &WireFrame) -> Result<SendReport, SendError> {
        if self.link.is_none() {
            self.connect().await;
        }

        let first = match self.transmit(frame).await {
            Ok(()) => {
                return Ok(SendReport {
                    attempts: 1,
                    reconnected: false,
                })
            }
            Err(err) => err,
        };

        let ctx = LogContext::new().with_endpoint(&self.url).with_attempt(1);
        log_link_event(
            Some(&ctx),
            "link.send",
            &format!("{first}; reconnecting to resend {} frame", frame.kind()),
            LinkOutcome::Retrying,
        );
        self.drop_link().await;
        self.connect().await;

        match self.transmit(frame).await {
            Ok(()) => {
                self.status.update(|s| s.resends += 1);
                Ok(SendReport {
                    attempts: 2,
                    reconnected: true,
                })
            }
            Err(second) => {
                let ctx = LogContext::new().with_endpoint(&self.url).with_attempt(2);
                log_link_event(
                    Some(&ctx),
                    "link.send",
                    &format!("resend failed: {second}"),
                    LinkOutcome::Fault,
                );
                self.drop_link().await;
                Err(SendError::RetryExhausted {
                    source: Box::new(second),
                })
            }
        }
    }

    /// Close the link if one is open. Safe to call repeatedly.
    pub async fn close(&mut self) {
        if self.link.is_some() {
            self.drop_link().await;
            info!(endpoint = %self.url, "websocket connection closed");
        }
    }

    async fn transmit(&mut self, frame: &WireFrame) -> Result<(), SendError> {
        let link = self.link.as_mut().ok_or(SendError::Closed)?;
        link.transmit(frame).await?;
        let len = frame.len() as u64;
        self.status.update(|s| {
            s.frames_sent += 1;
            s.bytes_sent += len;
        });
        debug!(kind = frame.kind(), len, "frame sent");
        Ok(())
    }

    async fn drop_link(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.shutdown().await;
        }
        self.status.update(|s| s.state = ConnectionState::Disconnected);
    }
}

impl<C: Connector> std::fmt::Debug for ConnectionManager<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("url", &self.url)
            .field("policy", &self.policy)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;
    use crate::error::ConnectError;

    #[derive(Debug, Clone, Default)]
    struct Script {
        connect_failures: Arc<Mutex<u32>>,
        transmit_failures: Arc<Mutex<u32>>,
        connects: Arc<Mutex<u32>>,
        shutdowns: Arc<Mutex<u32>>,
        delivered: Arc<Mutex<Vec<WireFrame>>>,
    }

    impl Script {
        fn failing(connects: u32, transmits: u32) -> Self {
            let script = Self::default();
            *script.connect_failures.lock() = connects;
            *script.transmit_failures.lock() = transmits;
            script
        }
    }

    struct MockConnector(Script);

    struct MockLink(Script);

    #[async_trait]
    impl Connector for MockConnector {
        type Link = MockLink;

        async fn connect(&self, url: &str) -> Result<MockLink, ConnectError> {
            *self.0.connects.lock() += 1;
            let mut remaining = self.0.connect_failures.lock();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ConnectError::TimedOut {
                    url: url.to_owned(),
                    timeout: Duration::from_secs(5),
                });
            }
            Ok(MockLink(self.0.clone()))
        }
    }

    #[async_trait]
    impl Link for MockLink {
        async fn transmit(&mut self, frame: &WireFrame) -> Result<(), SendError> {
            let mut remaining = self.0.transmit_failures.lock();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(SendError::Closed);
            }
            self.0.delivered.lock().push(frame.clone());
            Ok(())
        }

        async fn shutdown(&mut self) {
            *self.0.shutdowns.lock() += 1;
        }
    }

    fn manager(script: &Script) -> ConnectionManager<MockConnector> {
        ConnectionManager::new(
            MockConnector(script.clone()),
            "ws://test.invalid/api/ws/send",
            ReconnectPolicy::default(),
        )
    }

    fn text() -> WireFrame {
        WireFrame::Text(r#"{"time":0,"msg_id":[],"raw_data":[]}"#.into())
    }

    #[tokio::test(start_paused = true)]
    async fn connect_retries_forever_with_fixed_delay() {
        let script = Script::failing(3, 0);
        let mut manager = manager(&script);

        let started = Instant::now();
        let attempts = manager.connect().await;
        let elapsed = started.elapsed();

        assert_eq!(attempts, 4);
        assert!(elapsed >= Duration::from_secs(6), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(7), "{elapsed:?}");
        assert_eq!(manager.state(), ConnectionState::Connected);
        let snapshot = manager.status().snapshot();
        assert_eq!(snapshot.failed_connects, 3);
        assert_eq!(snapshot.connects, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stays_connecting_while_waiting_to_retry() {
        let script = Script::failing(2, 0);
        let mut manager = manager(&script);
        let status = manager.status();

        let (attempts, during_backoff) = tokio::join!(manager.connect(), async {
            sleep(Duration::from_millis(1_000)).await;
            status.snapshot().state
        });

        assert_eq!(attempts, 3);
        assert_eq!(during_backoff, ConnectionState::Connecting);
        assert_eq!(status.snapshot().state, ConnectionState::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn first_send_connects_lazily() {
        let script = Script::default();
        let mut manager = manager(&script);
        assert_eq!(manager.state(), ConnectionState::Disconnected);

        let report = manager.send(&text()).await.unwrap();
        assert_eq!(
            report,
            SendReport {
                attempts: 1,
                reconnected: false
            }
        );
        assert_eq!(*script.connects.lock(), 1);
        assert_eq!(script.delivered.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_send_reconnects_and_resends_exactly_once() {
        let script = Script::failing(0, 1);
        let mut manager = manager(&script);
        manager.connect().await;

        let frame = WireFrame::Binary(vec![0; 14]);
        let report = manager.send(&frame).await.unwrap();

        assert_eq!(report.attempts, 2);
        assert!(report.reconnected);
        assert_eq!(*script.delivered.lock(), vec![frame]);
        assert_eq!(*script.connects.lock(), 2);
        assert_eq!(*script.shutdowns.lock(), 1);
        let snapshot = manager.status().snapshot();
        assert_eq!(snapshot.resends, 1);
        assert_eq!(snapshot.bytes_sent, 14);
    }

    #[tokio::test(start_paused = true)]
    async fn reconnect_after_send_failure_waits_out_refusals() {
        let script = Script::failing(0, 1);
        let mut manager = manager(&script);
        manager.connect().await;
        *script.connect_failures.lock() = 2;

        let started = Instant::now();
        manager.send(&text()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(4));
        assert_eq!(script.delivered.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn second_failure_is_returned_and_link_closed() {
        let script = Script::failing(0, 2);
        let mut manager = manager(&script);

        let err = manager.send(&text()).await.unwrap_err();
        assert!(matches!(err, SendError::RetryExhausted { .. }), "{err}");
        assert!(script.delivered.lock().is_empty());
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert!(!manager.is_connected());
        assert_eq!(*script.shutdowns.lock(), 2);
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let script = Script::default();
        let mut manager = manager(&script);
        manager.connect().await;
        manager.close().await;
        manager.close().await;
        assert_eq!(*script.shutdowns.lock(), 1);
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }
}
