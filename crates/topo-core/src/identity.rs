//! Node identity
//!
//! Nodes are addressed by a dense index assigned when the topology is
//! configured. The index is stable for the lifetime of the topology.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Dense node index in `[0, node_count)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Create a node id from an index
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the underlying index
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Check whether this id addresses a node in a topology of `count` nodes
    pub const fn in_range(&self, count: usize) -> bool {
        self.0 < count
    }

    /// All ids of a topology with `count` nodes, in order
    pub fn range(count: usize) -> impl Iterator<Item = NodeId> {
        (0..count).map(NodeId)
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<NodeId> for usize {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
