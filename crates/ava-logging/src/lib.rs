//! ---
//! ava_section: "03-logging"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Structured logging context and link event helpers."
//! ava_version: "v0.0.0-prealpha"
//! ava_owner: "tbd"
//! ---
#![warn(missing_docs)]

use tracing::Level;

pub mod macros;

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone)]
pub struct LogContext<'a> {
    /// WebSocket endpoint the event relates to.
    pub endpoint: Option<&'a str>,
    /// Wire variant in use (`bundle`, `channels`, `bench`).
    pub variant: Option<&'a str>,
    /// Send-loop tick number.
    pub tick: Option<u64>,
    /// Connect or send attempt counter.
    pub attempt: Option<u64>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an endpoint URL.
    pub fn with_endpoint(mut self, endpoint: &'a str) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Attach a wire variant name.
    pub fn with_variant(mut self, variant: &'a str) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Attach a tick value.
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Attach an attempt counter.
    pub fn with_attempt(mut self, attempt: u64) -> Self {
        self.attempt = Some(attempt);
        self
    }
}

/// Outcome used when emitting connection lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The operation completed successfully.
    Success,
    /// The operation failed and will be retried.
    Retrying,
    /// The operation failed and the error is surfaced to the caller.
    Fault,
}

impl LinkOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            LinkOutcome::Success => "success",
            LinkOutcome::Retrying => "retrying",
            LinkOutcome::Fault => "fault",
        }
    }
}

/// Emit a standardized connection event with its outcome.
pub fn log_link_event(
    context: Option<&LogContext>,
    event: &str,
    message: &str,
    outcome: LinkOutcome,
) {
    let ctx = context.cloned().unwrap_or_default();
    match outcome {
        LinkOutcome::Success => tracing::event!(
            Level::INFO,
            event,
            outcome = outcome.as_str(),
            endpoint = ctx.endpoint.unwrap_or(""),
            variant = ctx.variant.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            attempt = ctx.attempt.unwrap_or_default(),
            message = %message
        ),
        LinkOutcome::Retrying => tracing::event!(
            Level::WARN,
            event,
            outcome = outcome.as_str(),
            endpoint = ctx.endpoint.unwrap_or(""),
            variant = ctx.variant.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            attempt = ctx.attempt.unwrap_or_default(),
            message = %message
        ),
        LinkOutcome::Fault => tracing::event!(
            Level::ERROR,
            event,
            outcome = outcome.as_str(),
            endpoint = ctx.endpoint.unwrap_or(""),
            variant = ctx.variant.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            attempt = ctx.attempt.unwrap_or_default(),
            message = %message
        ),
    }
}
