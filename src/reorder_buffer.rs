//! Reorder Buffer: received data frames awaiting contiguous drain.
//!
//! Keyed by `seq` in a `BTreeMap`, following the same "ordered map, not a
//! heap or FIFO" guidance as the Retransmit Queue. Duplicates by `seq`
//! are accepted on `insert` (the later insert simply overwrites) and
//! discarded during `drain` once they fall behind the watermark.

use std::collections::BTreeMap;

use bytes::{Bytes, BytesMut};

use crate::frame::Frame;

/// Ordered multiset of inbound data frames, keyed by `seq`.
#[derive(Debug, Default)]
pub struct ReorderBuffer {
    pending: BTreeMap<u64, Bytes>,
}

impl ReorderBuffer {
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Insert a received data frame. Duplicates by `seq` are permitted;
    /// the payload is expected to be identical for a given `seq` since
    /// retransmission always resends the same bytes.
    pub fn insert(&mut self, frame: &Frame) {
        self.pending.entry(frame.seq).or_insert_with(|| frame.payload.clone());
    }

    /// Drain every contiguous frame starting at `watermark`, appending
    /// their payloads in order and discarding anything that falls
    /// strictly behind the watermark as a duplicate. Returns the new
    /// watermark and the bytes appended.
    pub fn drain(&mut self, mut watermark: u64) -> (u64, Bytes) {
        let mut appended = BytesMut::new();

        loop {
            let Some((&seq, _)) = self.pending.iter().next() else {
                break;
            };
            if seq > watermark {
                break;
            }

            let (_, payload) = self.pending.remove_entry(&seq).expect("key just observed");
            if seq == watermark {
                watermark += payload.len() as u64;
                appended.extend_from_slice(&payload);
            }
            // seq < watermark: stale duplicate, already delivered, drop.
        }

        (watermark, appended.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_frame(seq: u64, payload: &[u8]) -> Frame {
        Frame::data(seq, 0, Bytes::copy_from_slice(payload))
    }

    #[test]
    fn drains_contiguous_prefix() {
        let mut buf = ReorderBuffer::new();
        buf.insert(&data_frame(0, b"hello"));
        buf.insert(&data_frame(5, b"world"));

        let (watermark, bytes) = buf.drain(0);
        assert_eq!(watermark, 10);
        assert_eq!(&bytes[..], b"helloworld");
        assert!(buf.is_empty());
    }

    #[test]
    fn stops_at_gap() {
        let mut buf = ReorderBuffer::new();
        buf.insert(&data_frame(5, b"world")); // gap: expecting 0 first

        let (watermark, bytes) = buf.drain(0);
        assert_eq!(watermark, 0);
        assert!(bytes.is_empty());
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn duplicate_is_discarded_on_drain() {
        let mut buf = ReorderBuffer::new();
        buf.insert(&data_frame(0, b"hi"));
        let (watermark, _) = buf.drain(0);
        assert_eq!(watermark, 2);

        // A duplicate of seq=0 arrives again after it was already delivered.
        buf.insert(&data_frame(0, b"hi"));
        let (watermark2, bytes) = buf.drain(watermark);
        assert_eq!(watermark2, watermark);
        assert!(bytes.is_empty());
        assert!(buf.is_empty());
    }

    #[test]
    fn out_of_order_insert_then_fill_gap() {
        let mut buf = ReorderBuffer::new();
        buf.insert(&data_frame(3, b"B"));
        buf.insert(&data_frame(0, b"AAA"));

        let (watermark, bytes) = buf.drain(0);
        assert_eq!(watermark, 4);
        assert_eq!(&bytes[..], b"AAAB");
    }
}
