//! ---
//! ava_section: "05-networking"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Reconnect scheduling."
//! ava_version: "v0.1.0"
//! ava_owner: "tbd"
//! ---
use std::time::Duration;

/// Fixed-delay reconnect policy. Connection attempts are never capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Pause after each failed connection attempt.
    pub delay: Duration,
}

impl ReconnectPolicy {
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Delay before attempt `attempt + 1`; constant regardless of attempt.
    pub fn delay_after(&self, _attempt: u64) -> Duration {
        self.delay
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_does_not_grow() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(2));
        assert_eq!(policy.delay_after(50), Duration::from_secs(2));
    }
}
