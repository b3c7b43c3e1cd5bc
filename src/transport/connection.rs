//! src/transport/connection.rs
//!
//! Per-connection I/O: dialing out a single frame, and reading/dispatching
//! one accepted inbound session.

use crate::{
    control, domain,
    domain::ParseResult,
    engine::GossipEngine,
};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

/// Opens a fresh connection, writes `frame`, and closes. Any failure is
/// logged and otherwise swallowed: the protocol tolerates silent drops and
/// recovers through anti-entropy.
pub fn send_frame(addr: SocketAddr, frame: &str, connect_timeout: Duration) {
    let mut stream = match TcpStream::connect_timeout(&addr, connect_timeout) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!(peer = %addr, error = %e, "connect failed, dropping frame");
            return;
        }
    };
    if let Err(e) = stream.write_all(frame.as_bytes()) {
        tracing::warn!(peer = %addr, error = %e, "write failed, dropping frame");
    }
}

/// Handles one accepted connection: reads up to `max_frame_size` bytes
/// (the session ends when the peer closes its write side), parses the
/// result as a single frame, and dispatches it. Proxy commands that expect
/// a reply (`get chatLog`) write it back on this same connection before it
/// closes; everything else is one-shot and connectionless.
pub fn handle_session(mut stream: TcpStream, engine: &GossipEngine, max_frame_size: usize) {
    let peer = stream.peer_addr().ok();
    let mut buf = vec![0u8; max_frame_size];
    let mut len = 0;

    loop {
        if len >= buf.len() {
            break;
        }
        match stream.read(&mut buf[len..]) {
            Ok(0) => break,
            Ok(n) => len += n,
            Err(e) => {
                tracing::warn!(peer = ?peer, error = %e, "read failed, dropping session");
                return;
            }
        }
    }

    let line = match std::str::from_utf8(&buf[..len]) {
        Ok(s) => s,
        Err(_) => {
            tracing::warn!(peer = ?peer, "non-utf8 frame, dropping");
            return;
        }
    };

    match domain::parse_frame(line) {
        ParseResult::Rumor(msg) => engine.handle_rumor(msg),
        ParseResult::Status { sender, digest } => engine.handle_status(sender, digest),
        ParseResult::ProxyCmd(domain::ProxyCommand::GetChatLog) => {
            let reply = control::render_chat_log(engine);
            if let Err(e) = stream.write_all(reply.as_bytes()) {
                tracing::warn!(peer = ?peer, error = %e, "failed to write chatLog reply");
            }
        }
        ParseResult::ProxyCmd(domain::ProxyCommand::Crash) => control::crash(),
        ParseResult::ClientMsg { text, .. } => control::submit_client_message(engine, text),
        ParseResult::Malformed => {
            tracing::warn!(peer = ?peer, frame = %line, "malformed frame, dropping");
        }
    }
}
