//! Error taxonomy for the rudp transport.
//!
//! Only two classes of failure are meant to ever reach a caller:
//! [`TransportError::FatalChannelError`] (the substrate is genuinely
//! broken) and [`TransportError::InvariantViolation`] (programmer error).
//! Everything else -- malformed frames, transient send failures, receive
//! timeouts -- is absorbed internally by the engine and never surfaces
//! through `send`/`recv`.

use thiserror::Error;

/// All errors produced by the rudp transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A decoded datagram was shorter than the fixed 17-byte header, or
    /// claimed a payload longer than the bytes actually present. Dropped
    /// silently at the call site inside `step_once`; this variant exists
    /// so the decode path has a typed return value and so tests can
    /// assert on the drop via [`crate::Endpoint::malformed_frame_count`].
    #[error("malformed frame: expected at least {expected} bytes, got {actual}")]
    MalformedFrame { expected: usize, actual: usize },

    /// The substrate reported a transient failure sending one datagram.
    /// Treated as zero bytes sent; the frame stays enqueued and is
    /// retried through the normal retransmit path. Never escapes
    /// `send`/`recv`.
    #[error("transient send failure")]
    TransientSendFailure,

    /// A non-timeout, non-transient substrate error. Propagates out of
    /// `send`/`recv` -- the one user-visible failure mode of this crate.
    #[error("fatal channel error: {0}")]
    FatalChannelError(#[from] std::io::Error),

    /// A caller violated a precondition of the API (e.g. handed a
    /// sequence/length combination that overflows `u64`). Always a bug
    /// at the call site, never a transport condition.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
