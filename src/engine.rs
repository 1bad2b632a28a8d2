//! Transport Engine: the state machine driving sending, receiving,
//! acknowledgement, and retransmission. [`Endpoint`] is the only type
//! users invoke directly.

use std::net::SocketAddr;

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::channel::{DatagramChannel, RecvOutcome};
use crate::clock::{Clock, Instant, TokioClock};
use crate::config::EndpointConfig;
use crate::constants::{HEADER_SIZE, LOG_PAYLOAD_PREVIEW};
use crate::error::Result;
use crate::frame::Frame;
use crate::reorder_buffer::ReorderBuffer;
use crate::retransmit_queue::RetransmitQueue;

/// One endpoint of a reliable byte-stream flow over UDP.
///
/// An `Endpoint` is both sender and receiver on a single UDP socket
/// connected to a fixed peer. `send`/`recv` are `async fn`s; neither is
/// safe to call concurrently with itself or the other on the same
/// endpoint (see [`crate::SharedEndpoint`] for the supported way to
/// share one endpoint across tasks).
pub struct Endpoint {
    channel: DatagramChannel,
    clock: TokioClock,
    config: EndpointConfig,

    /// Next sequence number to assign to a new outbound byte.
    next_seq: u64,
    /// Cumulative ACK watermark observed from the peer.
    acked_seq: u64,
    /// Total contiguous bytes received into the stream so far.
    recv_bytes: u64,
    /// Bytes drained from the reorder buffer, not yet consumed by a
    /// caller's `recv`.
    recv_buffer: BytesMut,

    retransmit_queue: RetransmitQueue,
    reorder_buffer: ReorderBuffer,

    malformed_frame_count: u64,
}

impl Endpoint {
    /// Bind `local_addr`, target `remote_addr`, using the spec's
    /// default constants.
    pub async fn bind(local_addr: SocketAddr, remote_addr: SocketAddr) -> Result<Self> {
        Self::bind_with_config(local_addr, remote_addr, EndpointConfig::default()).await
    }

    /// Bind with a non-default [`EndpointConfig`].
    pub async fn bind_with_config(
        local_addr: SocketAddr,
        remote_addr: SocketAddr,
        config: EndpointConfig,
    ) -> Result<Self> {
        let channel = DatagramChannel::bind(local_addr, remote_addr, config.timeout).await?;
        Ok(Self {
            channel,
            clock: TokioClock,
            config,
            next_seq: 0,
            acked_seq: 0,
            recv_bytes: 0,
            recv_buffer: BytesMut::new(),
            retransmit_queue: RetransmitQueue::new(),
            reorder_buffer: ReorderBuffer::new(),
            malformed_frame_count: 0,
        })
    }

    /// Send `data` in full. Returns `data.len()` once every byte has
    /// both been handed to the channel and acknowledged by the peer.
    pub async fn send(&mut self, data: &[u8]) -> Result<usize> {
        let total = data.len();
        let mut sent = 0usize;

        while sent != total || self.acked_seq < self.next_seq {
            if sent < total {
                let end = std::cmp::min(sent + self.config.max_payload_size, total);
                let payload = Bytes::copy_from_slice(&data[sent..end]);
                let frame = Frame::data(self.next_seq, self.recv_bytes, payload);
                sent += self.transmit_data_or_control(frame).await?;
            }
            self.step_once().await?;
        }

        Ok(total)
    }

    /// Receive exactly `n` bytes.
    pub async fn recv(&mut self, n: usize) -> Result<Bytes> {
        let mut out = BytesMut::with_capacity(n);
        self.drain_recv_buffer(n, &mut out);

        while out.len() < n {
            self.step_once().await?;
            self.drain_recv_buffer(n, &mut out);
        }

        Ok(out.freeze())
    }

    /// Release the underlying socket. There is no FIN handshake.
    pub async fn close(self) -> Result<()> {
        self.channel.close();
        Ok(())
    }

    /// Number of inbound datagrams dropped for failing to decode as a
    /// well-formed frame.
    pub fn malformed_frame_count(&self) -> u64 {
        self.malformed_frame_count
    }

    /// The cumulative ACK watermark this endpoint has observed from its
    /// peer.
    pub fn acked_seq(&self) -> u64 {
        self.acked_seq
    }

    /// Total contiguous bytes this endpoint has received from its peer.
    pub fn recv_bytes(&self) -> u64 {
        self.recv_bytes
    }

    fn drain_recv_buffer(&mut self, n: usize, out: &mut BytesMut) {
        let take = std::cmp::min(n - out.len(), self.recv_buffer.len());
        if take > 0 {
            out.extend_from_slice(&self.recv_buffer[..take]);
            let _ = self.recv_buffer.split_to(take);
        }
    }

    /// Encode and hand `frame` to the channel, then fold in the
    /// bookkeeping every transmitted frame needs: advance `next_seq`
    /// only for the current leading frame (never on a resend), and
    /// enqueue non-ACK frames for retransmission.
    ///
    /// Returns the number of payload bytes actually transmitted: the
    /// full payload on success, zero on a transient send failure.
    async fn transmit_data_or_control(&mut self, frame: Frame) -> Result<usize> {
        let encoded = frame.encode();
        let total_sent = self.channel.send_datagram(&encoded).await?;
        let payload_sent = total_sent.saturating_sub(HEADER_SIZE);

        trace!(
            seq = frame.seq,
            ack = frame.ack,
            flags = frame.flags.bits(),
            payload_sent,
            preview = ?&frame.payload[..frame.payload.len().min(LOG_PAYLOAD_PREVIEW)],
            "transmitted frame"
        );

        if frame.seq == self.next_seq {
            self.next_seq += payload_sent as u64;
        }

        if !frame.is_ack() {
            let now = self.clock.now();
            self.retransmit_queue.push(frame, now);
        }

        Ok(payload_sent)
    }

    /// One unit of cooperative work: poll for one inbound datagram,
    /// dispatch it, then check whether the oldest in-flight frame is
    /// stale enough to resend.
    async fn step_once(&mut self) -> Result<()> {
        match self.channel.recv_datagram(self.config.max_datagram_size).await? {
            RecvOutcome::TimedOut => {}
            RecvOutcome::Datagram(bytes) => match Frame::decode(&bytes) {
                Ok(frame) => self.on_frame(frame).await?,
                Err(err) => {
                    self.malformed_frame_count += 1;
                    trace!(error = %err, "dropped malformed frame");
                }
            },
        }

        self.retransmit_stale_if_any().await?;
        Ok(())
    }

    async fn on_frame(&mut self, frame: Frame) -> Result<()> {
        if frame.is_data() {
            self.reorder_buffer.insert(&frame);
            let (new_watermark, appended) = self.reorder_buffer.drain(self.recv_bytes);
            if new_watermark != self.recv_bytes {
                debug!(from = self.recv_bytes, to = new_watermark, "recv watermark advanced");
            }
            self.recv_bytes = new_watermark;
            self.recv_buffer.extend_from_slice(&appended);

            let ack = Frame::pure_ack(self.next_seq, self.recv_bytes);
            self.transmit_data_or_control(ack).await?;
        }

        if frame.ack > self.acked_seq {
            self.acked_seq = frame.ack;
            self.retransmit_queue.prune(self.acked_seq);
        }

        Ok(())
    }

    async fn retransmit_stale_if_any(&mut self) -> Result<()> {
        let now = self.clock.now();
        let stale = self
            .retransmit_queue
            .first_stale(now, self.config.timeout)
            .is_some();

        if stale {
            if let Some(entry) = self.retransmit_queue.pop_front() {
                debug!(seq = entry.frame.seq, "retransmitting stale frame");
                self.transmit_data_or_control(entry.frame).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Exercises transmit_data_or_control's bookkeeping in isolation,
    // without a real socket: the frame's seq equals next_seq, so
    // next_seq must advance by the full payload length, and the frame
    // must land in the retransmit queue since it is not an ACK.
    #[tokio::test(start_paused = true)]
    async fn leading_frame_advances_next_seq_and_enqueues() {
        let endpoint = bind_loopback_pair().await;
        let (mut a, _b) = endpoint;

        let sent = a
            .transmit_data_or_control(Frame::data(0, 0, Bytes::from_static(b"hello")))
            .await
            .unwrap();

        assert_eq!(sent, 5);
        assert_eq!(a.next_seq, 5);
        assert_eq!(a.retransmit_queue.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn resend_does_not_double_advance_next_seq() {
        let (mut a, _b) = bind_loopback_pair().await;
        a.transmit_data_or_control(Frame::data(0, 0, Bytes::from_static(b"hi")))
            .await
            .unwrap();
        assert_eq!(a.next_seq, 2);

        // A resend of the same frame: seq (0) no longer equals next_seq (2),
        // so next_seq must not advance again.
        a.transmit_data_or_control(Frame::data(0, 0, Bytes::from_static(b"hi")))
            .await
            .unwrap();
        assert_eq!(a.next_seq, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn pure_ack_is_never_enqueued() {
        let (mut a, _b) = bind_loopback_pair().await;
        a.transmit_data_or_control(Frame::pure_ack(0, 5))
            .await
            .unwrap();
        assert!(a.retransmit_queue.is_empty());
    }

    async fn bind_loopback_pair() -> (Endpoint, Endpoint) {
        let a_sock = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let b_sock = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let a_addr = a_sock.local_addr().unwrap();
        let b_addr = b_sock.local_addr().unwrap();
        drop(a_sock);
        drop(b_sock);

        let a = Endpoint::bind(a_addr, b_addr).await.unwrap();
        let b = Endpoint::bind(b_addr, a_addr).await.unwrap();
        (a, b)
    }
}
