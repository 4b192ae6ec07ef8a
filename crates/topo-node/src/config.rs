//! Configuration for a node actor

use serde::{Deserialize, Serialize};

/// Configuration for a [`Node`](crate::Node)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Record and log messages that pass through this node without being
    /// addressed to it (e.g. a star hub forwarding leaf-to-leaf traffic)
    pub trace_transit: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            trace_transit: true,
        }
    }
}

impl NodeConfig {
    /// A node that silently discards traffic not addressed to it
    pub fn quiet() -> Self {
        Self {
            trace_transit: false,
        }
    }

    /// Set whether in-transit traffic is recorded
    pub fn with_trace_transit(mut self, enabled: bool) -> Self {
        self.trace_transit = enabled;
        self
    }
}
