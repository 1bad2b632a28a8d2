//! Retransmit Queue: in-flight outbound frames ordered by sequence
//! number, with the earliest offset always the cheapest to inspect.
//!
//! A `BTreeMap<seq, entry>` is used rather than a heap or a bare FIFO
//! (per the Design Notes): the protocol only ever needs the minimum-seq
//! entry, and keying by `seq` makes `prune` and a resend's overwrite of
//! an existing entry both direct map operations instead of a linear
//! scan.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::clock::Instant;
use crate::frame::Frame;

/// A frame currently awaiting acknowledgement, plus the bookkeeping
/// needed to decide when to resend it.
#[derive(Debug, Clone)]
pub struct InFlight {
    pub frame: Frame,
    pub send_time: Instant,
    pub acked: bool,
}

/// Ordered multiset of in-flight frames, keyed by `seq`.
#[derive(Debug, Default)]
pub struct RetransmitQueue {
    entries: BTreeMap<u64, InFlight>,
}

impl RetransmitQueue {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Insert (or overwrite, on resend) a frame with send-time `now` and
    /// `acked = false`.
    pub fn push(&mut self, frame: Frame, now: Instant) {
        let seq = frame.seq;
        self.entries.insert(
            seq,
            InFlight {
                frame,
                send_time: now,
                acked: false,
            },
        );
    }

    /// The minimum-`seq` entry, if any.
    pub fn peek(&self) -> Option<&InFlight> {
        self.entries.values().next()
    }

    /// Remove and return the minimum-`seq` entry.
    pub fn pop_front(&mut self) -> Option<InFlight> {
        let key = *self.entries.keys().next()?;
        self.entries.remove(&key)
    }

    /// Drop every entry whose frame is fully covered by `watermark`,
    /// i.e. `seq + len(payload) <= watermark`.
    pub fn prune(&mut self, watermark: u64) {
        self.entries.retain(|_, entry| entry.frame.end_seq() > watermark);
    }

    /// The minimum-`seq` entry, if it has been in flight longer than
    /// `timeout` as of `now`. Only ever inspects the single earliest
    /// entry -- the caller drives repetition by calling this again on
    /// the next cooperative tick.
    pub fn first_stale(&self, now: Instant, timeout: Duration) -> Option<&InFlight> {
        let candidate = self.peek()?;
        if now.saturating_duration_since(candidate.send_time) > timeout {
            Some(candidate)
        } else {
            None
        }
    }

}
