//! tests/integration/adversarial.rs
//!
//! E2E tests for malformed and hostile input over the real wire: the node
//! must drop bad frames and keep answering proxy requests.

use crate::common::harness;
use std::time::Duration;
use test_log::test;

// Scenario 6: a malformed frame must not crash the process or corrupt its
// state.
#[test]
fn malformed_frame_is_dropped_without_crashing() {
    let base_port = harness::reserve_port_range(1);
    let node = harness::spawn_node(base_port, 1, base_port, 200);

    harness::send_raw(node.addr(), "FOO bar baz").expect("send malformed frame");

    assert!(
        harness::wait_until(Duration::from_millis(500), || {
            harness::get_chat_log(node.addr()).map(|log| log.is_empty()).unwrap_or(false)
        }),
        "node must still answer get chatLog after a malformed frame"
    );
}

#[test]
fn rumor_with_non_numeric_seq_is_dropped() {
    let base_port = harness::reserve_port_range(1);
    let node = harness::spawn_node(base_port, 1, base_port, 200);

    harness::send_raw(node.addr(), "RUMOR 20001 notanumber hi").expect("send bad rumor");

    assert!(
        harness::get_chat_log(node.addr()).unwrap().is_empty(),
        "a frame with a non-numeric seq must not be admitted"
    );
}

#[test]
fn node_keeps_answering_after_a_burst_of_malformed_frames() {
    let base_port = harness::reserve_port_range(1);
    let node = harness::spawn_node(base_port, 1, base_port, 200);

    for frame in ["", "RUMOR", "STATUS", "garbage\0bytes", "msg"] {
        let _ = harness::send_raw(node.addr(), frame);
    }

    harness::submit_message(node.addr(), "1", "still alive").expect("submit after garbage");

    assert!(
        harness::wait_until(Duration::from_secs(1), || {
            harness::get_chat_log(node.addr())
                .map(|log| log == vec!["still alive".to_string()])
                .unwrap_or(false)
        }),
        "node must keep processing valid requests after a burst of garbage"
    );
}
