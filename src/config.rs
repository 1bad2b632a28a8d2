//! Endpoint configuration.
//!
//! The protocol's "globals table" is a set of fixed constants; this
//! struct exposes them as overridable defaults so a host can, for
//! example, shorten the timeout in a test without touching the
//! production constants in [`crate::constants`].

use std::time::Duration;

use crate::constants::{DEFAULT_TIMEOUT, MAX_DATAGRAM_SIZE, MAX_PAYLOAD_SIZE};

/// Tunables for an [`crate::Endpoint`].
///
/// `Default` reproduces the spec's fixed constants exactly, so
/// `Endpoint::bind` (which uses `EndpointConfig::default()`) is spec
/// compliant out of the box.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Socket receive timeout, reused as the per-frame retransmit
    /// timeout (`T_recv`). There is deliberately no separate RTO.
    pub timeout: Duration,
    /// Maximum size of one datagram on the wire (`B`).
    pub max_datagram_size: usize,
    /// Maximum payload bytes per data frame (`D`).
    pub max_payload_size: usize,
    /// Flow-control window, in bytes, on top of cumulative-ACK
    /// progress. The spec's original source referenced a `kWindowSize`
    /// constant that was never defined in its globals table; this
    /// resolves that open question by defaulting to `None`, meaning
    /// "send without windowing." A host may opt into a window by
    /// setting this, but doing so is outside what this crate's engine
    /// currently enforces (see DESIGN.md).
    pub window_size: Option<u32>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_datagram_size: MAX_DATAGRAM_SIZE,
            max_payload_size: MAX_PAYLOAD_SIZE,
            window_size: None,
        }
    }
}

impl EndpointConfig {
    /// Start from the defaults and override the timeout. Convenience for
    /// tests that want retransmission to happen quickly.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_constants() {
        let cfg = EndpointConfig::default();
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
        assert_eq!(cfg.max_datagram_size, MAX_DATAGRAM_SIZE);
        assert_eq!(cfg.max_payload_size, MAX_PAYLOAD_SIZE);
        assert_eq!(cfg.window_size, None);
    }

    #[test]
    fn with_timeout_overrides_only_timeout() {
        let cfg = EndpointConfig::default().with_timeout(Duration::from_millis(1));
        assert_eq!(cfg.timeout, Duration::from_millis(1));
        assert_eq!(cfg.max_payload_size, MAX_PAYLOAD_SIZE);
    }
}
