//! src/control.rs
//!
//! The Control Surface: the proxy- and client-facing half of the protocol
//! (`get chatLog`, `crash`, `msg <id> <text>`), as distinct from the
//! peer-facing RUMOR/STATUS traffic handled by the engine.

use crate::engine::GossipEngine;

/// Builds the `chatLog` reply frame for a `get chatLog` request.
/// Message order is implementation-defined, not part of the contract.
pub fn render_chat_log(engine: &GossipEngine) -> String {
    let texts = engine.log_store().dump_all_texts();
    format!("chatLog {}\n", texts.join(","))
}

/// Handles a `crash` request: terminate immediately, no flush, exit 0.
pub fn crash() -> ! {
    tracing::warn!("crash command received, terminating immediately");
    std::process::exit(0);
}

/// Handles `msg <id> <text>`: the id is client framing only, not stored.
pub fn submit_client_message(engine: &GossipEngine, text: String) {
    engine.submit_local(text);
}
