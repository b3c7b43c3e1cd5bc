//! src/transport/mod.rs
//!
//! Defines the Peer Transport: a one-shot connection-per-frame outbound
//! send primitive, and the inbound accept loop that dispatches each
//! accepted session to the Gossip Engine or Control Surface.

use crate::error::Result;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub mod connection;

/// Outbound half of the Peer Transport: opens a connection, writes one
/// frame, closes. Failures are logged and swallowed — see the component
/// design's rationale that gossip tolerates silent drops.
pub trait OutboundPort: Send + Sync {
    fn send(&self, addr: SocketAddr, frame: &str);
}

/// A plain blocking-TCP implementation of `OutboundPort`.
pub struct TcpTransport {
    connect_timeout: Duration,
}

impl TcpTransport {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    /// Binds the inbound listener. Bind failures are fatal per the
    /// taxonomy in §7 and propagate to the caller.
    pub fn bind(addr: SocketAddr) -> Result<TcpListener> {
        let listener = TcpListener::bind(addr)?;
        Ok(listener)
    }

    /// Runs the accept loop on the calling thread; each accepted session
    /// is dispatched to its own worker thread. Never returns under normal
    /// operation.
    pub fn listen(
        listener: TcpListener,
        engine: crate::engine::GossipEngine,
        max_frame_size: usize,
    ) {
        for incoming in listener.incoming() {
            match incoming {
                Ok(stream) => {
                    let engine = engine.clone();
                    thread::spawn(move || {
                        connection::handle_session(stream, &engine, max_frame_size);
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to accept connection");
                }
            }
        }
    }
}

impl OutboundPort for TcpTransport {
    fn send(&self, addr: SocketAddr, frame: &str) {
        connection::send_frame(addr, frame, self.connect_timeout);
    }
}

/// Convenience constructor for sharing one transport across the engine and
/// the listener thread.
pub fn shared(connect_timeout: Duration) -> Arc<dyn OutboundPort> {
    Arc::new(TcpTransport::new(connect_timeout))
}
