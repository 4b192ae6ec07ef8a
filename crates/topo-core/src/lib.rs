//! # Topo Core
//!
//! Core types and errors shared by every crate of the topology simulator.
//!
//! The simulator models a fixed set of addressable nodes wired in one of the
//! classic interconnection patterns (bus, ring, star, mesh, fully-connected,
//! tree, hypercube, switched) and moves messages between them hop by hop.
//!
//! ## Key Types
//!
//! - [`NodeId`]: Dense node index in `[0, node_count)`
//! - [`Message`]: Immutable envelope (origin, destination, payload, timestamp)
//! - [`Route`]: The delivery plan a topology computes for one message
//! - [`TopologyKind`]: The connection patterns and their structural rules
//! - [`Delivery`] / [`DropReason`]: What a node observed, and why a message was lost
//!
//! ## Errors
//!
//! - [`ConfigError`]: Node count rejected by a topology
//! - [`RoutingError`]: Endpoint outside the configured node range
//! - [`NetworkError`]: Everything the engine reports synchronously

pub mod error;
pub mod event;
pub mod identity;
pub mod kind;
pub mod message;
pub mod route;

// Re-export main types
pub use error::*;
pub use event::*;
pub use identity::*;
pub use kind::*;
pub use message::*;
pub use route::*;
