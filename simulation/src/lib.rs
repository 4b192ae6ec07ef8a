//! # Topology Simulator
//!
//! Simulates message delivery across classic interconnection topologies:
//! bus, ring, star, mesh, fully-connected, tree, hypercube and switched.
//!
//! ## Overview
//!
//! - **Nodes** (`topo-node`): one actor per node with an unbounded inbox;
//!   consumes only messages addressed to it
//! - **Routing** (`topo-routing`): one pure routing policy per topology
//! - **Network** (`network.rs`): node workers, relay tasks with hop delays,
//!   the switched mediator and grace-bounded shutdown
//! - **Manager** (`manager.rs`): facade that rejects calls before configure
//! - **Scenarios** (`scenarios.rs`): the demonstration runs
//!
//! ## Example: Star relay
//!
//! ```rust,ignore
//! use topo_simulation::*;
//!
//! let mut manager = NetworkManager::new(SimConfig::default());
//! manager.configure_network(TopologyKind::Star, 5)?;
//! manager.run_network()?;
//!
//! // Leaf to leaf goes through the hub
//! manager.send_message(3, 1, "x")?;
//!
//! let network = manager.network()?;
//! network.node(1).unwrap().wait_for_deliveries(1, Duration::from_secs(1)).await;
//! assert_eq!(network.node(0).unwrap().transit().len(), 1);
//!
//! manager.shutdown().await?;
//! ```

pub mod config;
pub mod manager;
pub mod network;
pub mod scenarios;
pub mod stats;

pub use config::{SimConfig, SimConfigError};
pub use manager::NetworkManager;
pub use network::{MediatorHandle, Network, NetworkState};
pub use stats::{NetworkStats, StatsSnapshot};

pub use topo_core::{Message, NetworkError, NetworkResult, NodeId, Route, TopologyKind};
pub use topo_routing::Topology;
