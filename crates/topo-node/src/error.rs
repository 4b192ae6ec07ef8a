//! Error types for the node actor

use thiserror::Error;

use topo_core::NodeId;

/// Errors that can occur while managing a node's receive loop
#[derive(Debug, Error)]
pub enum NodeError {
    /// The receive loop was already started once
    #[error("Node {0} already started")]
    AlreadyStarted(NodeId),
}

/// Result type alias for node operations
pub type NodeResult<T> = Result<T, NodeError>;
