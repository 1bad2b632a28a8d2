//! Datagram Channel: a thin wrapper binding a local address and
//! connecting to a fixed remote address, with a receive bounded by a
//! timeout.
//!
//! This is the transport engine's only I/O dependency. It never
//! interprets frame contents -- encode/decode lives in [`crate::frame`].

use std::net::SocketAddr;

use tokio::net::UdpSocket;
use tracing::trace;

use crate::error::{Result, TransportError};

/// A single datagram arrived, or the receive timed out -- a distinct,
/// non-error control value rather than a variant threaded through
/// `Result`.
pub enum RecvOutcome {
    Datagram(Vec<u8>),
    TimedOut,
}

/// One UDP flow: bound locally, connected to one peer.
pub struct DatagramChannel {
    socket: UdpSocket,
    timeout: std::time::Duration,
}

impl DatagramChannel {
    /// Bind `local_addr` and connect to `remote_addr`. `timeout` bounds
    /// every [`Self::recv_datagram`] call.
    pub async fn bind(
        local_addr: SocketAddr,
        remote_addr: SocketAddr,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let socket = UdpSocket::bind(local_addr).await?;
        socket.connect(remote_addr).await?;
        Ok(Self { socket, timeout })
    }

    /// Send one datagram. Returns the number of bytes written,
    /// including the header, on success. A substrate-level transient
    /// failure (e.g. `WouldBlock`, `ENOBUFS`) is reported as
    /// `Ok(TransportError::TransientSendFailure)`'s caller-visible
    /// equivalent: the engine treats it as zero bytes sent. Anything
    /// else is a [`TransportError::FatalChannelError`].
    pub async fn send_datagram(&self, data: &[u8]) -> Result<usize> {
        match self.socket.send(data).await {
            Ok(n) => Ok(n),
            Err(e) if is_transient(&e) => {
                trace!(error = %e, "transient send failure, treating as zero bytes sent");
                Ok(0)
            }
            Err(e) => Err(TransportError::FatalChannelError(e)),
        }
    }

    /// Wait up to the configured timeout for one datagram.
    pub async fn recv_datagram(&self, max: usize) -> Result<RecvOutcome> {
        let mut buf = vec![0u8; max];
        match tokio::time::timeout(self.timeout, self.socket.recv(&mut buf)).await {
            Ok(Ok(n)) => {
                buf.truncate(n);
                Ok(RecvOutcome::Datagram(buf))
            }
            Ok(Err(e)) => Err(TransportError::FatalChannelError(e)),
            Err(_elapsed) => Ok(RecvOutcome::TimedOut),
        }
    }

    /// Release the underlying socket. Dropping the channel has the same
    /// effect; this exists so `Endpoint::close` reads as an explicit
    /// action rather than relying on a destructor.
    pub fn close(self) {
        drop(self);
    }
}

/// Whether an I/O error from sending one datagram should be treated as
/// recoverable (the frame stays enqueued and is retried) rather than
/// fatal.
fn is_transient(e: &std::io::Error) -> bool {
    use std::io::ErrorKind::*;
    matches!(e.kind(), WouldBlock | Interrupted)
}
