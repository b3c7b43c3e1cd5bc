//! src/engine/protocol.rs
//!
//! The STATUS decision table as a pure function. By isolating this logic
//! from the engine's I/O, the termination rule can be tested exhaustively
//! without sockets, threads, or time.

use crate::domain::{Digest, PeerId};

/// A half-open deficit: the peer is missing every message from `origin`
/// with `seq > since_seq`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingRange {
    pub origin: PeerId,
    pub since_seq: u32,
}

/// The outcome of evaluating an incoming STATUS digest against the local
/// version vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusDecision {
    /// The peer is behind on one or more origins; push the deficit as
    /// RUMORs drawn from the log.
    SendMissing(Vec<MissingRange>),
    /// Neither side has anything to push, but we are behind the peer;
    /// send our own digest so the peer can compute its own deficit.
    ReplyStatus,
    /// Both sides are caught up and the coin came up heads: continue the
    /// gossip round with a fresh neighbor.
    PropagateStatus,
    /// Both sides are caught up and the coin came up tails: the round ends
    /// here.
    Stop,
}

/// Evaluates the STATUS decision table (see the component design for the
/// gossip engine). `coin_heads` is injected rather than rolled internally
/// so the termination branch is deterministic under test.
pub fn decide_status(local: &Digest, peer: &Digest, coin_heads: bool) -> StatusDecision {
    let missing_from_peer: Vec<MissingRange> = local
        .iter()
        .filter_map(|(origin, &local_seq)| {
            let peer_seq = peer.get(origin).copied().unwrap_or(0);
            (local_seq > peer_seq).then(|| MissingRange {
                origin: origin.clone(),
                since_seq: peer_seq,
            })
        })
        .collect();

    if !missing_from_peer.is_empty() {
        return StatusDecision::SendMissing(missing_from_peer);
    }

    let self_behind = peer
        .iter()
        .any(|(origin, &peer_seq)| peer_seq > local.get(origin).copied().unwrap_or(0));

    if self_behind {
        return StatusDecision::ReplyStatus;
    }

    if coin_heads {
        StatusDecision::PropagateStatus
    } else {
        StatusDecision::Stop
    }
}
