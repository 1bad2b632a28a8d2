//! rudp -- a reliable, ordered byte-stream transport over UDP.
//!
//! Two [`Endpoint`]s, each bound to a local address and pointed at a fixed
//! remote address, exchange framed datagrams and present a TCP-like
//! `send`/`recv` pipe on top: in-order, exactly-once, with cumulative
//! acknowledgement and timeout-driven retransmission.
//!
//! The substrate is assumed to drop, reorder, or duplicate datagrams but
//! never corrupt them (UDP's own checksum covers that). There is no
//! handshake, no congestion control, and no multiplexing -- one endpoint is
//! one byte pipe to one peer.

pub mod channel;
pub mod clock;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod frame;
pub mod reorder_buffer;
pub mod retransmit_queue;
pub mod shared;

pub use config::EndpointConfig;
pub use engine::Endpoint;
pub use error::{Result, TransportError};
pub use frame::{Flags, Frame};
pub use shared::SharedEndpoint;
