//! tests/integration/topology.rs
//!
//! E2E tests for resilience: unreachable peers and a node joining after
//! the rest of the roster is already gossiping.

use crate::common::harness;
use std::time::Duration;
use test_log::test;

// Scenario 3: A submits while C's port is closed. C starts later and
// catches up via anti-entropy rather than the original rumor forward.
#[test]
fn late_joining_node_catches_up_via_anti_entropy() {
    let base_port = harness::reserve_port_range(3);
    let gossip_interval_ms = 150;

    // Only A and B start; C's port stays closed.
    let node_a = harness::spawn_node(base_port, 3, base_port, gossip_interval_ms);
    let _node_b = harness::spawn_node(base_port, 3, base_port + 1, gossip_interval_ms);

    harness::submit_message(node_a.addr(), "1", "hello").expect("submit to A");

    assert!(
        harness::wait_until(Duration::from_secs(3), || {
            harness::get_chat_log(node_a.addr())
                .map(|log| log == vec!["hello".to_string()])
                .unwrap_or(false)
        }),
        "A should have the message before C ever starts"
    );

    // C joins the roster late; B is its only linear neighbor ({base+1}).
    let node_c = harness::spawn_node(base_port, 3, base_port + 2, gossip_interval_ms);

    assert!(
        harness::wait_until(Duration::from_secs(5), || {
            harness::get_chat_log(node_c.addr())
                .map(|log| log == vec!["hello".to_string()])
                .unwrap_or(false)
        }),
        "C should converge after joining, via anti-entropy through B"
    );
}

// A send to a node whose port never opens must not wedge the sender: its
// own state stays intact and it keeps answering other requests.
#[test]
fn send_to_unreachable_peer_does_not_disrupt_the_sender() {
    let base_port = harness::reserve_port_range(2);
    let node_a = harness::spawn_node(base_port, 2, base_port, 100);
    // Neighbor at base_port + 1 never starts listening.

    harness::submit_message(node_a.addr(), "1", "still here").expect("submit to A");

    assert!(
        harness::wait_until(Duration::from_secs(2), || {
            harness::get_chat_log(node_a.addr())
                .map(|log| log == vec!["still here".to_string()])
                .unwrap_or(false)
        }),
        "A must keep serving its own log even though its only neighbor is unreachable"
    );
}
