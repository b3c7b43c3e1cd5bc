//! src/domain.rs
//!
//! Consolidates the core data structures and the Log Store. This module is
//! the single source of truth for the application's domain model: the
//! `PeerId`/`Message` types, the wire-frame grammar, and the per-origin
//! log plus version vector that the rest of the system reads and mutates
//! through a single mutex.

use crate::error::{Error, Result};
use std::{
    collections::BTreeMap,
    fmt,
    sync::Mutex,
};

/// A stable identifier for a process. In the reference deployment this is
/// the process's listening port rendered decimally, but the protocol treats
/// it as an opaque, whitespace-free token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(Error::InvalidPeerId(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A digest of highest-contiguous-sequence-number-per-origin, as exchanged
/// in a STATUS frame and held internally as the Log Store's version vector.
/// Kept as a `BTreeMap` rather than a `HashMap` so that encoding is
/// deterministic, which is convenient for tests and logging alike.
pub type Digest = BTreeMap<PeerId, u32>;

/// A single chat message. Immutable once stored; `(origin, seq)` is a
/// globally unique identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub origin: PeerId,
    pub seq: u32,
    pub text: String,
}

/// Outcome of offering a message to the Log Store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdmitResult {
    /// `seq` was exactly `vv[origin] + 1`; the message was appended.
    Accepted,
    /// `seq <= vv[origin]`; already known, discarded.
    Duplicate,
    /// `seq > vv[origin] + 1`; discarded, a STATUS exchange will heal it.
    Gap,
}

struct LogState {
    log: std::collections::HashMap<PeerId, Vec<Message>>,
    vv: Digest,
}

/// The per-origin append-only message log plus its version vector.
///
/// All mutating and reading operations hold a single mutex for their
/// duration. Network I/O must never be performed while that mutex is
/// held — callers construct outbound frames from a returned snapshot
/// *after* releasing the lock.
pub struct LogStore {
    self_id: PeerId,
    state: Mutex<LogState>,
}

impl LogStore {
    pub fn new(self_id: PeerId) -> Self {
        Self {
            self_id,
            state: Mutex::new(LogState {
                log: std::collections::HashMap::new(),
                vv: Digest::new(),
            }),
        }
    }

    pub fn self_id(&self) -> &PeerId {
        &self.self_id
    }

    /// Offers a message to the store. See `AdmitResult` for the contract.
    pub fn admit(&self, msg: Message) -> AdmitResult {
        let mut state = self.state.lock().expect("log store mutex poisoned");
        let highest = *state.vv.get(&msg.origin).unwrap_or(&0);
        if msg.seq <= highest {
            return AdmitResult::Duplicate;
        }
        if msg.seq > highest + 1 {
            return AdmitResult::Gap;
        }
        state.vv.insert(msg.origin.clone(), msg.seq);
        state.log.entry(msg.origin.clone()).or_default().push(msg);
        AdmitResult::Accepted
    }

    /// Atomically mints the next message from this node, bumping its own
    /// version-vector entry. Holding the mutex across the whole operation
    /// is what guarantees `mint`'s strictly-increasing `seq` under
    /// concurrent local submissions (I4, P3).
    pub fn mint(&self, text: String) -> Message {
        let mut state = self.state.lock().expect("log store mutex poisoned");
        let next_seq = state.vv.get(&self.self_id).copied().unwrap_or(0) + 1;
        let msg = Message {
            origin: self.self_id.clone(),
            seq: next_seq,
            text,
        };
        state.vv.insert(self.self_id.clone(), next_seq);
        state.log.entry(self.self_id.clone()).or_default().push(msg.clone());
        msg
    }

    /// A copy of the version vector, for use in STATUS frames.
    pub fn snapshot_digest(&self) -> Digest {
        let state = self.state.lock().expect("log store mutex poisoned");
        state.vv.clone()
    }

    /// All stored messages from `origin` with `seq > since_seq`, in
    /// ascending seq order.
    pub fn messages_from(&self, origin: &PeerId, since_seq: u32) -> Vec<Message> {
        let state = self.state.lock().expect("log store mutex poisoned");
        state
            .log
            .get(origin)
            .map(|msgs| {
                msgs.iter()
                    .filter(|m| m.seq > since_seq)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All stored message texts, in implementation-defined order. Used only
    /// by the proxy's `get chatLog` query; order is not part of the
    /// convergence contract.
    pub fn dump_all_texts(&self) -> Vec<String> {
        let state = self.state.lock().expect("log store mutex poisoned");
        state
            .log
            .values()
            .flat_map(|msgs| msgs.iter().map(|m| m.text.clone()))
            .collect()
    }
}

// --- Wire grammar ---
//
// RUMOR <origin> <seq> <text>
// STATUS <selfId>[ <origin>:<seq>]*
//
// Parsing is dispatched by a tagged variant rather than the original's
// string-find-and-early-return style, per the redesign in SPEC_FULL.md §9.

/// A fully parsed inbound frame or proxy/client command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseResult {
    Rumor(Message),
    Status { sender: PeerId, digest: Digest },
    ProxyCmd(ProxyCommand),
    ClientMsg { id: String, text: String },
    Malformed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProxyCommand {
    GetChatLog,
    Crash,
}

/// Parses a single inbound frame per the grammar above.
pub fn parse_frame(line: &str) -> ParseResult {
    if let Some(rest) = line.strip_prefix("RUMOR ") {
        return parse_rumor(rest);
    }
    if line == "RUMOR" {
        return ParseResult::Malformed;
    }
    if let Some(rest) = line.strip_prefix("STATUS") {
        return parse_status(rest);
    }
    if line == "get chatLog" {
        return ParseResult::ProxyCmd(ProxyCommand::GetChatLog);
    }
    if line == "crash" {
        return ParseResult::ProxyCmd(ProxyCommand::Crash);
    }
    if let Some(rest) = line.strip_prefix("msg ") {
        let mut parts = rest.splitn(2, ' ');
        let id = parts.next().unwrap_or("");
        let text = parts.next();
        return match text {
            Some(text) if !id.is_empty() => ParseResult::ClientMsg {
                id: id.to_string(),
                text: text.to_string(),
            },
            _ => ParseResult::Malformed,
        };
    }
    ParseResult::Malformed
}

fn parse_rumor(rest: &str) -> ParseResult {
    let mut parts = rest.splitn(3, ' ');
    let origin = parts.next();
    let seq = parts.next();
    let text = parts.next();
    match (origin, seq, text) {
        (Some(origin), Some(seq), Some(text)) => {
            match (PeerId::new(origin), seq.parse::<u32>()) {
                (Ok(origin), Ok(seq)) => ParseResult::Rumor(Message {
                    origin,
                    seq,
                    text: text.to_string(),
                }),
                _ => ParseResult::Malformed,
            }
        }
        _ => ParseResult::Malformed,
    }
}

fn parse_status(rest: &str) -> ParseResult {
    let rest = rest.trim_start();
    if rest.is_empty() {
        return ParseResult::Malformed;
    }
    let mut tokens = rest.split(' ');
    let sender = match tokens.next().map(PeerId::new) {
        Some(Ok(sender)) => sender,
        _ => return ParseResult::Malformed,
    };
    let mut digest = Digest::new();
    for token in tokens {
        if token.is_empty() {
            continue;
        }
        let (origin, seq) = match token.split_once(':') {
            Some(pair) => pair,
            None => return ParseResult::Malformed,
        };
        let (origin, seq) = match (PeerId::new(origin), seq.parse::<u32>()) {
            (Ok(origin), Ok(seq)) => (origin, seq),
            _ => return ParseResult::Malformed,
        };
        digest.insert(origin, seq);
    }
    ParseResult::Status { sender, digest }
}

/// Encodes a RUMOR frame. Round-trips through `parse_frame` for any text
/// that does not contain `\n`.
pub fn encode_rumor(msg: &Message) -> String {
    format!("RUMOR {} {} {}", msg.origin, msg.seq, msg.text)
}

/// Encodes a STATUS frame, carrying `sender`'s own id so a one-shot,
/// connectionless responder can address a reply back to it (see
/// SPEC_FULL.md §9).
pub fn encode_status(sender: &PeerId, digest: &Digest) -> String {
    let mut out = format!("STATUS {}", sender);
    for (origin, seq) in digest {
        out.push(' ');
        out.push_str(&format!("{}:{}", origin, seq));
    }
    out
}

// --- Unit Tests ---
