//! Monotonic time source.
//!
//! The Retransmit Queue compares send times against `now` to decide
//! staleness; this must never be wall-clock time (a system clock step
//! would make every in-flight frame look instantly stale or never
//! stale). [`tokio::time::Instant`] already wraps a monotonic clock and,
//! under `#[tokio::test(start_paused = true)]`, can be driven
//! deterministically with `tokio::time::advance`, which is how the
//! integration tests exercise the retransmit timer without real sleeps.

pub use tokio::time::Instant;

/// A source of monotonic instants, abstracted only so call sites read as
/// `Clock::now()` rather than reaching for `tokio::time::Instant::now()`
/// directly -- there is exactly one production implementation.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The real clock, backed by the Tokio runtime's monotonic timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
