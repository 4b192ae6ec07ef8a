//! Hypercube bit-correction routing
//!
//! A `d`-dimensional hypercube has `2^d` nodes and an edge between every
//! pair of ids that differ in exactly one bit. Routing corrects the lowest
//! differing bit at each step, so every hop lowers the Hamming distance to
//! the destination by one and a route never exceeds `d` hops.

use std::collections::BTreeSet;

use topo_core::NodeId;

/// Dimension of a hypercube with `count` nodes (`count` must be a power of two)
pub fn dimension(count: usize) -> u32 {
    count.trailing_zeros()
}

/// Number of bits in which `a` and `b` differ
pub fn hamming_distance(a: NodeId, b: NodeId) -> u32 {
    (a.index() ^ b.index()).count_ones()
}

/// Next node on the way from `current` to `to`, `None` once they match
pub fn next_hop(current: NodeId, to: NodeId) -> Option<NodeId> {
    let diff = current.index() ^ to.index();
    if diff == 0 {
        return None;
    }
    let lowest = diff & diff.wrapping_neg();
    Some(NodeId(current.index() ^ lowest))
}

/// Every node the message is delivered to, ending at `to`
///
/// Empty when `from == to`.
pub fn path(from: NodeId, to: NodeId) -> Vec<NodeId> {
    let mut hops = Vec::with_capacity(hamming_distance(from, to) as usize);
    let mut current = from;
    while let Some(next) = next_hop(current, to) {
        hops.push(next);
        current = next;
    }
    hops
}

/// The `d` nodes one bit-flip away from `id`
pub fn neighbors(id: NodeId, dimension: u32) -> BTreeSet<NodeId> {
    (0..dimension)
        .map(|bit| NodeId(id.index() ^ (1 << bit)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension() {
        assert_eq!(dimension(1), 0);
        assert_eq!(dimension(2), 1);
        assert_eq!(dimension(8), 3);
        assert_eq!(dimension(1024), 10);
    }

    #[test]
    fn test_corner_to_corner() {
        // 000 -> 001 -> 011 -> 111
        assert_eq!(path(NodeId(0), NodeId(7)), vec![NodeId(1), NodeId(3), NodeId(7)]);
    }

    #[test]
    fn test_lowest_bit_first() {
        // 011 -> 001 -> 101
        assert_eq!(path(NodeId(3), NodeId(5)), vec![NodeId(1), NodeId(5)]);
        assert_eq!(next_hop(NodeId(6), NodeId(6)), None);
    }

    #[test]
    fn test_neighbors() {
        let n = neighbors(NodeId(5), 3);
        assert_eq!(n, BTreeSet::from([NodeId(4), NodeId(7), NodeId(1)]));
        assert!(neighbors(NodeId(0), 0).is_empty());
    }
}
