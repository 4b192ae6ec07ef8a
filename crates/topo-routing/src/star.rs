//! Hub-and-spoke routing

use std::collections::BTreeSet;

use topo_core::{NodeId, Route};

/// The hub of every star topology
pub const HUB: NodeId = NodeId(0);

/// Route a message through the hub
///
/// When either endpoint is the hub the message needs one delivery.
/// Leaf-to-leaf traffic goes to the hub first and then to the leaf.
pub fn route(from: NodeId, to: NodeId, hub: NodeId) -> Route {
    if from == to {
        Route::local(to)
    } else if from == hub || to == hub {
        Route::direct(to)
    } else {
        Route::relay(vec![hub, to])
    }
}

/// Leaves see only the hub; the hub sees every leaf
pub fn neighbors(id: NodeId, hub: NodeId, count: usize) -> BTreeSet<NodeId> {
    if id == hub {
        NodeId::range(count).filter(|n| *n != hub).collect()
    } else {
        BTreeSet::from([hub])
    }
}
