//! Wire frame: fixed 17-byte header plus an optional payload.
//!
//! Layout (all integers big-endian):
//!
//! ```text
//! +-------+-----------+-----------+------------------+
//! | flags |    seq    |    ack    |     payload       |
//! | (1B)  |   (8B)    |   (8B)    |    (0..D bytes)   |
//! +-------+-----------+-----------+------------------+
//! ```
//!
//! `flags == 0` (the `MSG` sentinel) marks a data frame; `ACK` marks a
//! pure control frame with no payload. The other bits (`URG`, `PSH`,
//! `RST`, `SYN`, `FIN`) are reserved codepoints this crate never sets and
//! never acts on if a peer sets them.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::constants::HEADER_SIZE;
use crate::error::{Result, TransportError};

/// A single named bit in the frame's flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FlagBit {
    Urg = 1 << 0,
    Ack = 1 << 1,
    Psh = 1 << 2,
    Rst = 1 << 3,
    Syn = 1 << 4,
    Fin = 1 << 5,
}

/// Typed bitset over the frame's single flag byte.
///
/// `MSG` is not a real bit -- it is the name given to the all-zero value,
/// kept only so logging and the spec's vocabulary line up. Membership
/// checks are bitwise, never string-keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(u8);

impl Flags {
    /// The zero value: a plain data frame, conventionally called `MSG`.
    pub const MSG: Self = Self(0);
    pub const URG: Self = Self(FlagBit::Urg as u8);
    pub const ACK: Self = Self(FlagBit::Ack as u8);
    pub const PSH: Self = Self(FlagBit::Psh as u8);
    pub const RST: Self = Self(FlagBit::Rst as u8);
    pub const SYN: Self = Self(FlagBit::Syn as u8);
    pub const FIN: Self = Self(FlagBit::Fin as u8);

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        other.0 == 0 || (self.0 & other.0) == other.0
    }

    pub fn is_data(self) -> bool {
        self.0 == 0
    }

    pub fn is_ack(self) -> bool {
        self.contains(Self::ACK)
    }
}

impl std::ops::BitOr for Flags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A decoded or to-be-encoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub flags: Flags,
    pub seq: u64,
    pub ack: u64,
    pub payload: Bytes,
}

impl Frame {
    /// Build a data frame (flags = `MSG`, i.e. zero).
    pub fn data(seq: u64, ack: u64, payload: Bytes) -> Self {
        Self {
            flags: Flags::MSG,
            seq,
            ack,
            payload,
        }
    }

    /// Build a pure ACK frame: no payload, `ACK` bit set.
    pub fn pure_ack(seq: u64, ack: u64) -> Self {
        Self {
            flags: Flags::ACK,
            seq,
            ack,
            payload: Bytes::new(),
        }
    }

    pub fn is_data(&self) -> bool {
        self.flags.is_data()
    }

    pub fn is_ack(&self) -> bool {
        self.flags.is_ack()
    }

    /// Byte offset one past the last payload byte of this frame.
    pub fn end_seq(&self) -> u64 {
        self.seq + self.payload.len() as u64
    }

    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Encode into a fresh buffer.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf.freeze()
    }

    /// Encode into a caller-supplied buffer.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u8(self.flags.bits());
        buf.put_u64(self.seq);
        buf.put_u64(self.ack);
        buf.put_slice(&self.payload);
    }

    /// Decode a frame from a byte slice. Fails with
    /// [`TransportError::MalformedFrame`] if fewer than [`HEADER_SIZE`]
    /// bytes are present.
    pub fn decode(mut data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(TransportError::MalformedFrame {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }

        let flags = Flags::from_bits(data.get_u8());
        let seq = data.get_u64();
        let ack = data.get_u64();
        let payload = Bytes::copy_from_slice(data);

        Ok(Self {
            flags,
            seq,
            ack,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_frame_roundtrip() {
        let frame = Frame::data(7, 0, Bytes::from_static(b"hello world"));
        let encoded = frame.encode();
        assert_eq!(encoded.len(), frame.encoded_len());
        let decoded = Frame::decode(&encoded).unwrap();
        assert_eq!(frame, decoded);
        assert!(decoded.is_data());
    }

    #[test]
    fn ack_frame_roundtrip() {
        let frame = Frame::pure_ack(42, 99);
        let encoded = frame.encode();
        assert_eq!(encoded.len(), HEADER_SIZE);
        let decoded = Frame::decode(&encoded).unwrap();
        assert_eq!(frame, decoded);
        assert!(decoded.is_ack());
        assert!(decoded.payload.is_empty());
    }

    #[test]
    fn empty_payload_roundtrips() {
        let frame = Frame::data(0, 0, Bytes::new());
        let encoded = frame.encode();
        let decoded = Frame::decode(&encoded).unwrap();
        assert_eq!(frame, decoded);
    }

    #[test]
    fn decode_rejects_short_buffer() {
        let err = Frame::decode(&[0u8; HEADER_SIZE - 1]).unwrap_err();
        assert!(matches!(err, TransportError::MalformedFrame { .. }));
    }

    #[test]
    fn msg_is_zero_sentinel() {
        assert_eq!(Flags::MSG.bits(), 0);
        assert!(Flags::MSG.is_data());
        assert!(Flags::MSG.contains(Flags::MSG));
    }

    #[test]
    fn flags_combine_and_contain() {
        let combined = Flags::ACK | Flags::FIN;
        assert!(combined.contains(Flags::ACK));
        assert!(combined.contains(Flags::FIN));
        assert!(!combined.contains(Flags::SYN));
    }

    #[test]
    fn end_seq_accounts_for_payload_len() {
        let frame = Frame::data(100, 0, Bytes::from_static(b"12345"));
        assert_eq!(frame.end_seq(), 105);
    }
}
