//! Binary tree routing via the lowest common ancestor
//!
//! Nodes are laid out as an implicit binary heap: the root is `0`, the
//! parent of `i` is `(i - 1) / 2` and its children are `2i + 1` and `2i + 2`.
//!
//! A message climbs from its origin to the lowest common ancestor (LCA) of
//! both endpoints and then descends to the destination. Ancestor chains
//! include the node itself, so when one endpoint is an ancestor of the
//! other the LCA is that endpoint and one leg of the walk is empty.

use std::collections::BTreeSet;

use topo_core::NodeId;

/// Parent of `id`, `None` for the root
pub fn parent(id: NodeId) -> Option<NodeId> {
    match id.index() {
        0 => None,
        i => Some(NodeId((i - 1) / 2)),
    }
}

/// Children of `id` that exist in a tree of `count` nodes
pub fn children(id: NodeId, count: usize) -> Vec<NodeId> {
    let left = 2 * id.index() + 1;
    [left, left + 1]
        .into_iter()
        .filter(|c| *c < count)
        .map(NodeId)
        .collect()
}

/// Distance from the root
pub fn depth(id: NodeId) -> usize {
    // floor(log2(i + 1))
    (usize::BITS - 1 - (id.index() + 1).leading_zeros()) as usize
}

/// `id` followed by each of its ancestors up to and including the root
pub fn ancestors(id: NodeId) -> Vec<NodeId> {
    let mut chain = vec![id];
    let mut current = id;
    while let Some(up) = parent(current) {
        chain.push(up);
        current = up;
    }
    chain
}

/// The deepest node that is an ancestor of both `a` and `b`
///
/// Walks `a`'s chain from `a` toward the root and returns the first node
/// that also appears in `b`'s chain. The root is common to every pair.
pub fn lowest_common_ancestor(a: NodeId, b: NodeId) -> NodeId {
    let b_chain: BTreeSet<NodeId> = ancestors(b).into_iter().collect();
    ancestors(a)
        .into_iter()
        .find(|anc| b_chain.contains(anc))
        .unwrap_or(NodeId(0))
}

/// Every node the message is delivered to, ending at `to`
///
/// Empty when `from == to`.
pub fn path(from: NodeId, to: NodeId) -> Vec<NodeId> {
    let lca = lowest_common_ancestor(from, to);

    // Up: strictly above `from`, through the LCA
    let mut hops: Vec<NodeId> = ancestors(from)
        .into_iter()
        .skip(1)
        .take_while(|n| n.index() >= lca.index())
        .collect();

    // Down: strictly below the LCA, through `to`
    let mut down: Vec<NodeId> = ancestors(to)
        .into_iter()
        .take_while(|n| *n != lca)
        .collect();
    down.reverse();
    hops.extend(down);
    hops
}

/// Parent and children of `id`
pub fn neighbors(id: NodeId, count: usize) -> BTreeSet<NodeId> {
    let mut set: BTreeSet<NodeId> = children(id, count).into_iter().collect();
    if let Some(p) = parent(id) {
        set.insert(p);
    }
    set
}
