//! tests/integration/network.rs
//!
//! Happy-path propagation: real nodes, real TCP loopback sockets, messages
//! submitted through the proxy protocol and observed converging across the
//! cluster.

use crate::common::harness;
use std::time::Duration;
use test_log::test;

// Scenario 1: two nodes, one local submission, observed on both.
#[test]
fn message_propagates_from_submitting_node_to_its_neighbor() {
    let cluster = harness::spawn_cluster(2, 200);
    let a = cluster.node(0).addr();
    let b = cluster.node(1).addr();

    harness::submit_message(a, "1", "hello").expect("submit to A");

    assert!(
        harness::wait_until(Duration::from_secs(3), || {
            harness::get_chat_log(a).map(|log| log == vec!["hello".to_string()]).unwrap_or(false)
        }),
        "A should see its own message immediately"
    );

    assert!(
        harness::wait_until(Duration::from_secs(3), || {
            harness::get_chat_log(b).map(|log| log == vec!["hello".to_string()]).unwrap_or(false)
        }),
        "B should converge onto A's message within an anti-entropy tick"
    );
}

// Scenario 2: three nodes, two sequential local submissions from one
// origin, convergence across the whole cluster.
#[test]
fn two_sequential_messages_converge_across_three_nodes() {
    let cluster = harness::spawn_cluster(3, 150);
    let a = cluster.node(0).addr();

    harness::submit_message(a, "1", "x").expect("submit x to A");
    harness::submit_message(a, "2", "y").expect("submit y to A");

    for i in 0..3 {
        let addr = cluster.node(i).addr();
        assert!(
            harness::wait_until(Duration::from_secs(5), || {
                harness::get_chat_log(addr)
                    .map(|mut log| {
                        log.sort();
                        let mut expected = vec!["x".to_string(), "y".to_string()];
                        expected.sort();
                        log == expected
                    })
                    .unwrap_or(false)
            }),
            "node {i} should eventually see both messages"
        );
    }
}
