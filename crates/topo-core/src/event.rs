//! Delivery records and drop reasons

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::NodeId;
use crate::message::Message;

/// A message observed by a node's receive loop
#[derive(Debug, Clone)]
pub struct Delivery {
    /// The node that dequeued the message
    pub node: NodeId,
    /// The message, shared with every other node on the route
    pub message: Arc<Message>,
    /// When the receive loop dequeued it
    pub received_at: DateTime<Utc>,
}

impl Delivery {
    /// Record that `node` dequeued `message` now
    pub fn now(node: NodeId, message: Arc<Message>) -> Self {
        Self {
            node,
            message,
            received_at: Utc::now(),
        }
    }

    /// Whether the receiving node was the message's destination
    pub fn is_consumption(&self) -> bool {
        self.message.is_for(self.node)
    }

    /// Origin of the delivered message
    pub fn from(&self) -> NodeId {
        self.message.from()
    }

    /// Destination of the delivered message
    pub fn to(&self) -> NodeId {
        self.message.to()
    }

    /// Payload of the delivered message
    pub fn payload(&self) -> &str {
        self.message.payload()
    }
}

/// Reasons a message might be dropped after its send was accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropReason {
    /// The mediator found a destination outside the node range
    DestinationOutOfRange,
    /// The route was cancelled by shutdown before completing
    Cancelled,
    /// The receiving node's inbox no longer exists
    InboxClosed,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DestinationOutOfRange => write!(f, "Destination out of range"),
            Self::Cancelled => write!(f, "Route cancelled"),
            Self::InboxClosed => write!(f, "Inbox closed"),
        }
    }
}
