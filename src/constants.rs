//! Protocol-wide constants shared by every component.
//!
//! Mirrors the globals table a host would otherwise supply: header layout,
//! the maximum datagram/payload sizes, the uniform timeout, and the flag
//! bit assignments. Kept in one place so nothing downstream hardcodes a
//! magic number twice.

use std::time::Duration;

/// Frame header size in bytes: 1 (flags) + 8 (seq) + 8 (ack).
pub const HEADER_SIZE: usize = 1 + 8 + 8;

/// Maximum number of bytes that fit in one datagram on the wire.
pub const MAX_DATAGRAM_SIZE: usize = 1 << 16;

/// Headroom reserved for worst-case IPv4 + TCP-ish framing beneath us,
/// inherited from the original design rather than derived from anything
/// this crate does on the wire.
const MAX_RESERVED_HEADROOM: usize = 60;

/// Maximum payload bytes carried by a single data frame.
pub const MAX_PAYLOAD_SIZE: usize = MAX_DATAGRAM_SIZE - HEADER_SIZE - MAX_RESERVED_HEADROOM;

/// Uniform receive timeout and retransmit timeout. There is no separate
/// RTO: the same duration bounds both the socket read and the staleness
/// check on in-flight frames.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10);

/// Upper bound on how many bytes of a frame's payload get embedded in a
/// log line before being elided, so logging a large transfer does not
/// itself become the bottleneck.
pub const LOG_PAYLOAD_PREVIEW: usize = 10;
