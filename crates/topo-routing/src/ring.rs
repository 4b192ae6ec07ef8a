//! Unidirectional ring routing
//!
//! Node `i` forwards only to `(i + 1) mod n`. A message from `a` to `b`
//! therefore visits every node between them in increasing order, wrapping
//! past the last index back to zero.

use std::collections::BTreeSet;

use topo_core::NodeId;

/// The node `current` forwards to
pub fn next(current: NodeId, count: usize) -> NodeId {
    NodeId((current.index() + 1) % count)
}

/// Number of hops from `from` to `to` walking forward
pub fn distance(from: NodeId, to: NodeId, count: usize) -> usize {
    (to.index() + count - from.index()) % count
}

/// Every node the message is delivered to, ending at `to`
///
/// Empty when `from == to`.
pub fn walk(from: NodeId, to: NodeId, count: usize) -> Vec<NodeId> {
    let mut hops = Vec::with_capacity(distance(from, to, count));
    let mut current = from;
    while current != to {
        current = next(current, count);
        hops.push(current);
    }
    hops
}

/// The two ring neighbours of `id` (one when `count == 2`, none when `count == 1`)
pub fn neighbors(id: NodeId, count: usize) -> BTreeSet<NodeId> {
    let mut set = BTreeSet::new();
    if count > 1 {
        set.insert(next(id, count));
        set.insert(NodeId((id.index() + count - 1) % count));
    }
    set
}
