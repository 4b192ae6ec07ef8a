//! # Topo Routing
//!
//! Path selection for every interconnection pattern the simulator supports.
//!
//! Routing is pure: [`Topology::route`] looks only at the endpoints and the
//! topology's constants and returns a [`Route`]. Executing the route (inbox
//! deliveries, hop delays, cancellation) is the engine's job.
//!
//! ## Routing Policies
//!
//! | Topology | Policy |
//! |---|---|
//! | Bus | Broadcast to every node; each node filters by destination |
//! | Ring | Unidirectional walk `(current + 1) mod n` until the destination |
//! | Star | Leaf → hub → leaf, or one direct delivery when the hub is an endpoint |
//! | Mesh / FullyConnected | One direct delivery |
//! | Tree | Up from the origin to the lowest common ancestor, then down |
//! | Hypercube | Flip the lowest differing bit until the ids match |
//! | Switched | Hand off to the central mediator |
//!
//! ## Example
//!
//! ```rust
//! use topo_core::{NodeId, TopologyKind};
//! use topo_routing::Topology;
//!
//! let cube = Topology::new(TopologyKind::Hypercube, 8).unwrap();
//! let route = cube.route(NodeId(0), NodeId(7)).unwrap();
//! assert_eq!(route.deliveries(), vec![NodeId(1), NodeId(3), NodeId(7)]);
//! ```

pub mod hypercube;
pub mod ring;
pub mod star;
pub mod topology;
pub mod tree;

// Re-export main types
pub use topology::Topology;

// Re-export core routing types for convenience
pub use topo_core::{ConfigError, NodeId, Route, RoutingError, TopologyKind};
