//! src/neighbor.rs
//!
//! The static deployment roster and the stateless neighbor-selection
//! function used by both the Gossip Engine and the Anti-Entropy Ticker.

use crate::domain::PeerId;
use rand::seq::SliceRandom;
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

/// The fixed set of peer addresses a deployment knows about: a contiguous
/// port range `[base_port, base_port + n_processes)` on localhost, with
/// `self_port` excluded from any candidate set by construction.
#[derive(Clone, Debug)]
pub struct Roster {
    base_port: u16,
    n_processes: u16,
    self_port: u16,
    connect_timeout: Duration,
    probe_liveness: bool,
}

impl Roster {
    pub fn new(
        base_port: u16,
        n_processes: u16,
        self_port: u16,
        connect_timeout: Duration,
        probe_liveness: bool,
    ) -> Self {
        Self {
            base_port,
            n_processes,
            self_port,
            connect_timeout,
            probe_liveness,
        }
    }

    pub fn addr_for(&self, id: &PeerId) -> Option<SocketAddr> {
        let port: u16 = id.as_str().parse().ok()?;
        Some(SocketAddr::from(([127, 0, 0, 1], port)))
    }

    /// The reference deployment's linear topology: a node's candidates are
    /// its numeric port neighbors `{self-1, self+1}`, clipped to the
    /// deployment's port range. Generalized rosters would widen this set;
    /// this implementation keeps the reference's linear shape.
    fn linear_candidates(&self) -> Vec<u16> {
        let lo = self.base_port;
        let hi = self.base_port.saturating_add(self.n_processes) - 1;
        let mut out = Vec::new();
        if self.self_port > lo {
            out.push(self.self_port - 1);
        }
        if self.self_port < hi {
            out.push(self.self_port + 1);
        }
        out.into_iter().filter(|p| *p >= lo && *p <= hi).collect()
    }

    /// Picks a neighbor uniformly at random from the candidate set, minus
    /// `excluding` if given, optionally filtered by a liveness probe.
    /// Returns `None` when the candidate set is empty.
    pub fn pick_neighbor(&self, excluding: Option<&PeerId>) -> Option<PeerId> {
        let exclude_port: Option<u16> = excluding.and_then(|p| p.as_str().parse().ok());
        let mut candidates: Vec<u16> = self
            .linear_candidates()
            .into_iter()
            .filter(|p| Some(*p) != exclude_port)
            .collect();

        if self.probe_liveness {
            candidates.retain(|p| self.is_alive(*p));
        }

        let mut rng = rand::thread_rng();
        candidates
            .choose(&mut rng)
            .map(|p| PeerId::new(p.to_string()).expect("port renders to a valid PeerId"))
    }

    fn is_alive(&self, port: u16) -> bool {
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        TcpStream::connect_timeout(&addr, self.connect_timeout).is_ok()
    }
}
