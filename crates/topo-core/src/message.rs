//! Message envelope

use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::NodeId;

/// Immutable message envelope
///
/// A message is created once by the sender and never mutated in transit.
/// Multi-hop routes share it behind an `Arc`, so every node along the
/// route sees the same origin, destination, payload and creation time.
///
/// Endpoints are validated by the topology before a message is built;
/// the constructor itself does not check them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    from: NodeId,
    to: NodeId,
    payload: String,
    sent_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message stamped with the current time
    pub fn new(from: NodeId, to: NodeId, payload: impl Into<String>) -> Self {
        Self {
            from,
            to,
            payload: payload.into(),
            sent_at: Utc::now(),
        }
    }

    /// Origin node
    pub fn from(&self) -> NodeId {
        self.from
    }

    /// Destination node
    pub fn to(&self) -> NodeId {
        self.to
    }

    /// Message content
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// When the sender created the message
    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    /// Whether this message is addressed to `node`
    pub fn is_for(&self, node: NodeId) -> bool {
        self.to == node
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{} {:?}", self.from, self.to, self.payload)
    }
}
