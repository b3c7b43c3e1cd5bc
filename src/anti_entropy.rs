//! src/anti_entropy.rs
//!
//! The Anti-Entropy Ticker: a dedicated thread that periodically pushes the
//! local status digest to a random neighbor, guaranteeing convergence even
//! if every rumor-forwarding path silently drops its frame.

use crate::domain::encode_status;
use crate::engine::GossipEngine;
use std::thread;
use std::time::Duration;

/// Runs the ticker loop on the calling thread. Intended to be spawned on
/// its own dedicated thread and run for the lifetime of the process.
pub fn run(engine: GossipEngine, interval: Duration) {
    loop {
        thread::sleep(interval);
        tick(&engine);
    }
}

fn tick(engine: &GossipEngine) {
    let Some(neighbor) = engine.pick_any_neighbor() else {
        tracing::debug!("anti-entropy tick: no candidate neighbor, skipping");
        return;
    };
    let digest = engine.log_store().snapshot_digest();
    tracing::debug!(peer = %neighbor, "anti-entropy tick: pushing status");
    engine.send_status_to(&neighbor, &encode_status(engine.self_id(), &digest));
}
