//! # Block Context
//!
//! The per-transaction environment supplied by the replication layer:
//! block height, block time (the only "now" the registry ever sees), the
//! transaction hash, and the event sink successful handlers append to.

use serde::{Deserialize, Serialize};

use zkr_core::Timestamp;

/// Kind of a registry event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    CreateCircuit,
    UpdateCircuit,
    SubmitProof,
    VerifyProof,
    CreateProofRequest,
    CompleteProofRequest,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateCircuit => "create_circuit",
            Self::UpdateCircuit => "update_circuit",
            Self::SubmitProof => "submit_proof",
            Self::VerifyProof => "verify_proof",
            Self::CreateProofRequest => "create_proof_request",
            Self::CompleteProofRequest => "complete_proof_request",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured event: a kind plus ordered key/value attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub attributes: Vec<(String, String)>,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
        }
    }

    /// Append an attribute.
    pub fn attr(mut self, key: &str, value: impl std::fmt::Display) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    /// First value recorded under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Per-transaction execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockContext {
    pub height: u64,
    pub time: Timestamp,
    pub tx_hash: Option<String>,
    /// Events emitted by successful handlers, in order.
    pub events: Vec<Event>,
}

impl BlockContext {
    pub fn new(height: u64, time: Timestamp) -> Self {
        Self {
            height,
            time,
            tx_hash: None,
            events: Vec::new(),
        }
    }

    pub fn with_tx_hash(mut self, tx_hash: impl Into<String>) -> Self {
        self.tx_hash = Some(tx_hash.into());
        self
    }

    pub(crate) fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Events of `kind`, in emission order.
    pub fn events_of(&self, kind: EventKind) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.kind == kind)
    }
}
