//! Routes computed by a topology for a single message

use serde::{Deserialize, Serialize};

use crate::identity::NodeId;

/// How one message travels from its origin to its destination
///
/// A route lists the inbox deliveries the engine performs, in order.
/// Only [`Route::Relay`] routes are multi-hop; the engine waits for the
/// topology's hop delay between two consecutive relay hops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Origin and destination are the same node; deliver straight to it
    Local {
        /// The node sending to itself
        node: NodeId,
    },

    /// One delivery straight to the destination
    Direct {
        /// The destination node
        destination: NodeId,
    },

    /// Walk through intermediate nodes; the last hop is the destination
    Relay {
        /// Every node that receives the message, in delivery order
        hops: Vec<NodeId>,
    },

    /// Put the message on the shared medium; every node receives it and
    /// only the destination consumes it
    Broadcast {
        /// Every node attached to the medium
        targets: Vec<NodeId>,
        /// The node that consumes the message
        destination: NodeId,
    },

    /// Hand the message to the central mediator, which delivers it
    Switched {
        /// The destination node
        destination: NodeId,
    },
}

impl Route {
    /// Create a local (self-addressed) route
    pub fn local(node: NodeId) -> Self {
        Self::Local { node }
    }

    /// Create a direct route
    pub fn direct(destination: NodeId) -> Self {
        Self::Direct { destination }
    }

    /// Create a multi-hop relay route
    pub fn relay(hops: Vec<NodeId>) -> Self {
        Self::Relay { hops }
    }

    /// Create a broadcast route over the given targets
    pub fn broadcast(targets: Vec<NodeId>, destination: NodeId) -> Self {
        Self::Broadcast {
            targets,
            destination,
        }
    }

    /// Create a mediated route
    pub fn switched(destination: NodeId) -> Self {
        Self::Switched { destination }
    }

    /// Every inbox the message is delivered to, in order
    pub fn deliveries(&self) -> Vec<NodeId> {
        match self {
            Self::Local { node } => vec![*node],
            Self::Direct { destination } | Self::Switched { destination } => vec![*destination],
            Self::Relay { hops } => hops.clone(),
            Self::Broadcast { targets, .. } => targets.clone(),
        }
    }

    /// Number of link traversals
    ///
    /// A local route crosses no link. A relay route crosses one link per hop.
    /// Direct, broadcast and switched routes cross a single link.
    pub fn hop_count(&self) -> usize {
        match self {
            Self::Local { .. } => 0,
            Self::Relay { hops } => hops.len(),
            Self::Direct { .. } | Self::Broadcast { .. } | Self::Switched { .. } => 1,
        }
    }

    /// The node that finally consumes the message
    pub fn final_destination(&self) -> Option<NodeId> {
        match self {
            Self::Local { node } => Some(*node),
            Self::Direct { destination }
            | Self::Switched { destination }
            | Self::Broadcast { destination, .. } => Some(*destination),
            Self::Relay { hops } => hops.last().copied(),
        }
    }

    /// Nodes that receive the message without consuming it
    pub fn intermediates(&self) -> Vec<NodeId> {
        match self {
            Self::Relay { hops } => hops[..hops.len().saturating_sub(1)].to_vec(),
            Self::Broadcast {
                targets,
                destination,
            } => targets
                .iter()
                .copied()
                .filter(|t| t != destination)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Check if this is a multi-hop relay route
    pub fn is_relay(&self) -> bool {
        matches!(self, Self::Relay { .. })
    }
}
