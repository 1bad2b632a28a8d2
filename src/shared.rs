//! Multi-task convenience wrapper around [`Endpoint`].
//!
//! `Endpoint` itself carries no internal locking -- per the Design
//! Notes, there is no shared mutable state to protect within one
//! cooperative task. A host that wants more than one task touching the
//! same endpoint (a reader task and a writer task, say) wraps it in
//! `SharedEndpoint`, which holds the single mutex the Design Notes call
//! for. The critical section is the whole `send`/`recv`/`close` call,
//! not just `step_once`, because `step_once` only ever runs from inside
//! one of those calls and the endpoint's invariants must hold across
//! the full call, not just one inner step.
//!
//! The lock is a [`tokio::sync::Mutex`] rather than `parking_lot`'s: the
//! guard is held across the `.await` points inside `send`/`recv`
//! themselves, and only an async-aware mutex keeps that `Send` and free
//! of the "blocking across an await" trap a sync mutex falls into here.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;

use crate::config::EndpointConfig;
use crate::engine::Endpoint;
use crate::error::Result;

/// An [`Endpoint`] shared across tasks behind a single async mutex.
#[derive(Clone)]
pub struct SharedEndpoint {
    inner: Arc<Mutex<Endpoint>>,
}

impl SharedEndpoint {
    pub async fn bind(local_addr: SocketAddr, remote_addr: SocketAddr) -> Result<Self> {
        let endpoint = Endpoint::bind(local_addr, remote_addr).await?;
        Ok(Self::from_endpoint(endpoint))
    }

    pub async fn bind_with_config(
        local_addr: SocketAddr,
        remote_addr: SocketAddr,
        config: EndpointConfig,
    ) -> Result<Self> {
        let endpoint = Endpoint::bind_with_config(local_addr, remote_addr, config).await?;
        Ok(Self::from_endpoint(endpoint))
    }

    pub fn from_endpoint(endpoint: Endpoint) -> Self {
        Self {
            inner: Arc::new(Mutex::new(endpoint)),
        }
    }

    /// Send `data`, holding the lock for the whole call.
    pub async fn send(&self, data: &[u8]) -> Result<usize> {
        self.inner.lock().await.send(data).await
    }

    /// Receive exactly `n` bytes, holding the lock for the whole call.
    pub async fn recv(&self, n: usize) -> Result<Bytes> {
        self.inner.lock().await.recv(n).await
    }

    pub async fn malformed_frame_count(&self) -> u64 {
        self.inner.lock().await.malformed_frame_count()
    }

    pub async fn acked_seq(&self) -> u64 {
        self.inner.lock().await.acked_seq()
    }

    pub async fn recv_bytes(&self) -> u64 {
        self.inner.lock().await.recv_bytes()
    }
}
