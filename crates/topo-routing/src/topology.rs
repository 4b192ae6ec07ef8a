//! Topology definitions
//!
//! [`Topology`] is a closed set of connection patterns. Each variant
//! carries the constants its routing policy needs, and every capability
//! (routing, adjacency, visualisation) is an exhaustive match over it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use topo_core::{ConfigError, NodeId, Route, RoutingError, TopologyKind};

use crate::{hypercube, ring, star, tree};

/// A configured interconnection pattern over a fixed number of nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    /// Shared medium: every node hears every message
    Bus { nodes: usize },
    /// Unidirectional ring
    Ring { nodes: usize },
    /// Hub-and-spoke
    Star { nodes: usize, hub: NodeId },
    /// Point-to-point links between every pair
    Mesh { nodes: usize },
    /// Point-to-point links between every pair
    FullyConnected { nodes: usize },
    /// Implicit binary tree rooted at node 0
    Tree { nodes: usize },
    /// `2^dimension` nodes, one edge per differing bit
    Hypercube { nodes: usize, dimension: u32 },
    /// Every node attached to one central switch
    Switched { nodes: usize },
}

impl Topology {
    /// Build a topology of `kind` over `count` nodes
    ///
    /// Fails with [`ConfigError::InvalidTopologySize`] when `count` violates
    /// the kind's structural precondition.
    pub fn new(kind: TopologyKind, count: usize) -> Result<Self, ConfigError> {
        kind.validate(count)?;
        Ok(match kind {
            TopologyKind::Bus => Self::Bus { nodes: count },
            TopologyKind::Ring => Self::Ring { nodes: count },
            TopologyKind::Star => Self::Star {
                nodes: count,
                hub: star::HUB,
            },
            TopologyKind::Mesh => Self::Mesh { nodes: count },
            TopologyKind::FullyConnected => Self::FullyConnected { nodes: count },
            TopologyKind::Tree => Self::Tree { nodes: count },
            TopologyKind::Hypercube => Self::Hypercube {
                nodes: count,
                dimension: hypercube::dimension(count),
            },
            TopologyKind::Switched => Self::Switched { nodes: count },
        })
    }

    /// The kind of this topology
    pub fn kind(&self) -> TopologyKind {
        match self {
            Self::Bus { .. } => TopologyKind::Bus,
            Self::Ring { .. } => TopologyKind::Ring,
            Self::Star { .. } => TopologyKind::Star,
            Self::Mesh { .. } => TopologyKind::Mesh,
            Self::FullyConnected { .. } => TopologyKind::FullyConnected,
            Self::Tree { .. } => TopologyKind::Tree,
            Self::Hypercube { .. } => TopologyKind::Hypercube,
            Self::Switched { .. } => TopologyKind::Switched,
        }
    }

    /// Number of nodes, fixed once built
    pub fn node_count(&self) -> usize {
        match self {
            Self::Bus { nodes }
            | Self::Ring { nodes }
            | Self::Star { nodes, .. }
            | Self::Mesh { nodes }
            | Self::FullyConnected { nodes }
            | Self::Tree { nodes }
            | Self::Hypercube { nodes, .. }
            | Self::Switched { nodes } => *nodes,
        }
    }

    /// All node ids, in order
    pub fn node_ids(&self) -> Vec<NodeId> {
        NodeId::range(self.node_count()).collect()
    }

    /// Check that both endpoints address a node of this topology
    pub fn check_endpoints(&self, from: NodeId, to: NodeId) -> Result<(), RoutingError> {
        let count = self.node_count();
        if from.in_range(count) && to.in_range(count) {
            Ok(())
        } else {
            Err(RoutingError::IndexOutOfRange {
                from: from.index(),
                to: to.index(),
                count,
            })
        }
    }

    /// Compute how a message from `from` reaches `to`
    pub fn route(&self, from: NodeId, to: NodeId) -> Result<Route, RoutingError> {
        self.check_endpoints(from, to)?;

        let route = match self {
            // Switched traffic always goes through the mediator, even to self
            Self::Switched { .. } => Route::switched(to),
            _ if from == to => Route::local(to),
            Self::Bus { .. } => Route::broadcast(self.node_ids(), to),
            Self::Ring { nodes } => Route::relay(ring::walk(from, to, *nodes)),
            Self::Star { hub, .. } => star::route(from, to, *hub),
            Self::Mesh { .. } | Self::FullyConnected { .. } => Route::direct(to),
            Self::Tree { .. } => Route::relay(tree::path(from, to)),
            Self::Hypercube { .. } => Route::relay(hypercube::path(from, to)),
        };

        trace!(
            topology = %self.kind(),
            from = %from,
            to = %to,
            hops = route.hop_count(),
            "Computed route"
        );
        Ok(route)
    }

    /// Nodes directly linked to `id`
    pub fn neighbors(&self, id: NodeId) -> BTreeSet<NodeId> {
        let count = self.node_count();
        if !id.in_range(count) {
            return BTreeSet::new();
        }
        match self {
            Self::Bus { .. }
            | Self::Mesh { .. }
            | Self::FullyConnected { .. }
            | Self::Switched { .. } => NodeId::range(count).filter(|n| *n != id).collect(),
            Self::Ring { .. } => ring::neighbors(id, count),
            Self::Star { hub, .. } => star::neighbors(id, *hub, count),
            Self::Tree { .. } => tree::neighbors(id, count),
            Self::Hypercube { dimension, .. } => hypercube::neighbors(id, *dimension),
        }
    }

    /// Check if two nodes are directly linked
    pub fn are_connected(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Number of undirected links
    pub fn edge_count(&self) -> usize {
        let degree_sum: usize = self
            .node_ids()
            .into_iter()
            .map(|id| self.neighbors(id).len())
            .sum();
        degree_sum / 2
    }

    /// Print a simple ASCII visualization of the topology
    pub fn visualize(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("{} Topology:\n", self.kind()));
        output.push_str(&format!("  Nodes: {}\n", self.node_count()));
        output.push_str(&format!("  Edges: {}\n", self.edge_count()));
        match self {
            Self::Star { hub, .. } => output.push_str(&format!("  Hub: {}\n", hub)),
            Self::Hypercube { dimension, .. } => {
                output.push_str(&format!("  Dimension: {}\n", dimension))
            }
            _ => {}
        }
        output.push('\n');

        for id in self.node_ids() {
            let neighbor_str: Vec<String> =
                self.neighbors(id).iter().map(|n| n.to_string()).collect();
            output.push_str(&format!("  {} -> [{}]\n", id, neighbor_str.join(", ")));
        }
        output
    }
}
