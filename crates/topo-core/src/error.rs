//! Error types for the topology simulator

use thiserror::Error;

use crate::kind::TopologyKind;

/// Top-level error type reported synchronously by the engine
///
/// Delivery-time failures are never reported here: once a send has been
/// accepted, its outcome is only visible through node logs and statistics.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// An operation was invoked before any topology was configured
    #[error("Network is not configured")]
    NotConfigured,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    /// The engine needs a Tokio runtime to spawn its workers
    #[error("No async runtime available to spawn network workers")]
    NoRuntime,

    /// `run` was called twice on the same configuration
    #[error("Network is already running")]
    AlreadyRunning,

    /// The network has been shut down and no longer accepts work
    #[error("Network has been shut down")]
    ShutDown,
}

/// Errors raised while validating a topology configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid topology size for {kind}: {count} nodes ({requirement})")]
    InvalidTopologySize {
        kind: TopologyKind,
        count: usize,
        requirement: &'static str,
    },

    #[error("Unknown topology: {0}")]
    UnknownTopology(String),
}

/// Errors raised while computing a route
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("Index out of range: from={from} to={to} (node count {count})")]
    IndexOutOfRange { from: usize, to: usize, count: usize },
}

/// Result type alias for engine operations
pub type NetworkResult<T> = Result<T, NetworkError>;
