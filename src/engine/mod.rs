//! src/engine/mod.rs
//!
//! Defines the `GossipEngine`, the protocol state machine. It mediates
//! between the Log Store, the Neighbor Selector, and the Peer Transport,
//! but never blocks on I/O while holding the Log Store's lock.

use crate::{
    domain::{AdmitResult, Digest, LogStore, Message, PeerId, encode_rumor, encode_status},
    neighbor::Roster,
    transport::OutboundPort,
};
use rand::Rng;
use std::sync::Arc;

pub mod protocol;

use protocol::{decide_status, StatusDecision};

/// The protocol state machine. Cheap to clone (everything behind `Arc`);
/// one instance is shared across the listener's worker threads and the
/// anti-entropy ticker.
#[derive(Clone)]
pub struct GossipEngine {
    log_store: Arc<LogStore>,
    roster: Roster,
    outbound: Arc<dyn OutboundPort>,
    self_id: PeerId,
}

impl GossipEngine {
    pub fn new(log_store: Arc<LogStore>, roster: Roster, outbound: Arc<dyn OutboundPort>) -> Self {
        let self_id = log_store.self_id().clone();
        Self { log_store, roster, outbound, self_id }
    }

    pub fn log_store(&self) -> &Arc<LogStore> {
        &self.log_store
    }

    /// Handles an inbound RUMOR: admit, and if newly accepted, forward to a
    /// neighbor other than the one who minted it.
    pub fn handle_rumor(&self, msg: Message) {
        let origin = msg.origin.clone();
        match self.log_store.admit(msg.clone()) {
            AdmitResult::Accepted => {
                tracing::info!(origin = %origin, seq = msg.seq, "rumor accepted");
                self.forward(&msg, Some(&origin));
            }
            AdmitResult::Duplicate => {
                tracing::debug!(origin = %origin, seq = msg.seq, "rumor duplicate, dropped");
            }
            AdmitResult::Gap => {
                tracing::debug!(origin = %origin, seq = msg.seq, "rumor gap, dropped");
            }
        }
    }

    /// Handles an inbound STATUS digest from `sender`, replying or
    /// propagating per the decision table in `protocol`.
    pub fn handle_status(&self, sender: PeerId, peer_digest: Digest) {
        let local_digest = self.log_store.snapshot_digest();
        let coin_heads: bool = rand::thread_rng().gen();
        let decision = decide_status(&local_digest, &peer_digest, coin_heads);

        match decision {
            StatusDecision::SendMissing(ranges) => {
                for range in ranges {
                    let msgs = self.log_store.messages_from(&range.origin, range.since_seq);
                    tracing::debug!(peer = %sender, origin = %range.origin, count = msgs.len(), "sending missing rumors");
                    for msg in msgs {
                        self.send_to(&sender, &encode_rumor(&msg));
                    }
                }
            }
            StatusDecision::ReplyStatus => {
                tracing::debug!(peer = %sender, "replying with local status");
                self.send_to(&sender, &encode_status(&self.self_id, &local_digest));
            }
            StatusDecision::PropagateStatus => {
                if let Some(next) = self.roster.pick_neighbor(Some(&sender)) {
                    tracing::debug!(peer = %next, "coin heads, propagating status");
                    self.send_to(&next, &encode_status(&self.self_id, &local_digest));
                } else {
                    tracing::debug!("coin heads but no candidate neighbor to propagate to");
                }
            }
            StatusDecision::Stop => {
                tracing::debug!(peer = %sender, "coin tails, gossip round ends");
            }
        }
    }

    /// Handles a locally submitted chat message: mint it and forward to one
    /// neighbor.
    pub fn submit_local(&self, text: String) {
        let msg = self.log_store.mint(text);
        tracing::info!(seq = msg.seq, "local message minted");
        self.forward(&msg, None);
    }

    fn forward(&self, msg: &Message, excluding: Option<&PeerId>) {
        if let Some(neighbor) = self.roster.pick_neighbor(excluding) {
            self.send_to(&neighbor, &encode_rumor(msg));
        } else {
            tracing::debug!("no candidate neighbor to forward rumor to");
        }
    }

    fn send_to(&self, peer: &PeerId, frame: &str) {
        match self.roster.addr_for(peer) {
            Some(addr) => self.outbound.send(addr, frame),
            None => tracing::warn!(peer = %peer, "cannot resolve address for peer"),
        }
    }

    /// This node's own id, for frames that need to identify the sender.
    pub fn self_id(&self) -> &PeerId {
        &self.self_id
    }

    /// Picks any neighbor from the roster, excluding nobody. Used by the
    /// anti-entropy ticker, which has no "sender" to exclude.
    pub fn pick_any_neighbor(&self) -> Option<PeerId> {
        self.roster.pick_neighbor(None)
    }

    /// Sends an already-encoded STATUS frame to `peer`. Exposed for the
    /// anti-entropy ticker, which builds its own frame outside the
    /// RUMOR/STATUS decision table.
    pub fn send_status_to(&self, peer: &PeerId, frame: &str) {
        self.send_to(peer, frame);
    }
}
