//! src/app.rs
//!
//! Defines the main `App` struct, which wires together the Log Store,
//! Neighbor Selector, Peer Transport, and Gossip Engine, then runs the
//! listener and anti-entropy ticker for the lifetime of the process.

use crate::{
    anti_entropy,
    config::Config,
    domain::{LogStore, PeerId},
    engine::GossipEngine,
    error::{Error, Result},
    neighbor::Roster,
    transport::TcpTransport,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Encapsulates the entire application and the lifecycle of its threads.
pub struct App {
    config: Config,
}

impl App {
    /// Validates the configuration and creates a new `App`.
    pub fn new(config: Config) -> Result<Self> {
        let max_port = config.base_port.saturating_add(config.n_processes);
        if config.port_no < config.base_port || config.port_no >= max_port {
            return Err(Error::PortOutsideRoster {
                port: config.port_no,
                base: config.base_port,
                max: max_port,
            });
        }
        Ok(Self { config })
    }

    /// Runs the application. Binds the inbound listener on the calling
    /// thread, spawns the anti-entropy ticker on its own thread, then runs
    /// the accept loop. Returns only on a bind/listen failure; `crash`
    /// terminates the whole process directly rather than returning here.
    pub fn run(self) -> Result<()> {
        let self_id = PeerId::new(self.config.port_no.to_string())
            .expect("port renders to a valid PeerId");
        let connect_timeout = Duration::from_millis(self.config.connect_timeout_ms);

        tracing::info!(self_id = %self_id, port = self.config.port_no, "starting node");

        let log_store = Arc::new(LogStore::new(self_id));
        let roster = Roster::new(
            self.config.base_port,
            self.config.n_processes,
            self.config.port_no,
            connect_timeout,
            self.config.enable_liveness_probe,
        );
        let outbound = crate::transport::shared(connect_timeout);
        let engine = GossipEngine::new(log_store, roster, outbound);

        let bind_addr = SocketAddr::from(([127, 0, 0, 1], self.config.port_no));
        let listener = TcpTransport::bind(bind_addr)?;
        tracing::info!(addr = %bind_addr, "listening");

        let ticker_engine = engine.clone();
        let gossip_interval = Duration::from_millis(self.config.gossip_interval_ms);
        thread::spawn(move || anti_entropy::run(ticker_engine, gossip_interval));

        TcpTransport::listen(listener, engine, self.config.max_frame_size);
        Ok(())
    }
}
