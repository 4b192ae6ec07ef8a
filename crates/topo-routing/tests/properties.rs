//! Route property tests for topo-routing
//!
//! These tests walk every (from, to) pair of small topologies, plus random
//! samples of large ones, and check the structural guarantees of each
//! routing policy.

use rand::Rng;

use topo_core::{NodeId, Route, TopologyKind};
use topo_routing::{Topology, hypercube, ring, tree};

fn all_pairs(count: usize) -> impl Iterator<Item = (NodeId, NodeId)> {
    (0..count).flat_map(move |a| (0..count).map(move |b| (NodeId(a), NodeId(b))))
}

#[test]
fn test_hypercube_hops_equal_hamming_distance() {
    for dim in 0..=6 {
        let count = 1usize << dim;
        let cube = Topology::new(TopologyKind::Hypercube, count).unwrap();

        for (from, to) in all_pairs(count) {
            let route = cube.route(from, to).unwrap();
            let expected = hypercube::hamming_distance(from, to) as usize;
            assert_eq!(route.hop_count(), expected, "{} -> {} in {}-cube", from, to, dim);
            assert!(route.hop_count() <= dim as usize);

            // Every hop flips exactly one bit and lands on a neighbour
            if from != to {
                let mut previous = from;
                for hop in route.deliveries() {
                    assert_eq!(hypercube::hamming_distance(previous, hop), 1);
                    assert!(cube.are_connected(previous, hop));
                    assert_eq!(
                        hypercube::hamming_distance(hop, to) + 1,
                        hypercube::hamming_distance(previous, to)
                    );
                    previous = hop;
                }
            }
            assert_eq!(route.final_destination(), Some(to));
        }
    }
}

#[test]
fn test_hypercube_large_random_samples() {
    const COUNT: usize = 1 << 16;
    const SAMPLES: usize = 2_000;

    let cube = Topology::new(TopologyKind::Hypercube, COUNT).unwrap();
    let mut rng = rand::rng();

    for _ in 0..SAMPLES {
        let from = NodeId(rng.random_range(0..COUNT));
        let to = NodeId(rng.random_range(0..COUNT));
        let route = cube.route(from, to).unwrap();
        assert_eq!(route.hop_count(), hypercube::hamming_distance(from, to) as usize);
        assert!(route.hop_count() <= 16);
    }
}

#[test]
fn test_tree_lca_is_deepest_common_ancestor() {
    const COUNT: usize = 31;

    for (from, to) in all_pairs(COUNT) {
        let lca = tree::lowest_common_ancestor(from, to);
        let from_chain = tree::ancestors(from);
        let to_chain = tree::ancestors(to);

        assert!(from_chain.contains(&lca));
        assert!(to_chain.contains(&lca));

        // Nothing between `from` and the LCA is also an ancestor of `to`
        let nearer: Vec<NodeId> = from_chain.iter().copied().take_while(|n| *n != lca).collect();
        for candidate in nearer {
            assert!(!to_chain.contains(&candidate), "{} is a nearer common ancestor", candidate);
        }
    }
}

#[test]
fn test_tree_route_length_formula() {
    const COUNT: usize = 31;
    let topo = Topology::new(TopologyKind::Tree, COUNT).unwrap();

    for (from, to) in all_pairs(COUNT) {
        let route = topo.route(from, to).unwrap();
        let lca = tree::lowest_common_ancestor(from, to);
        let expected = tree::depth(from) + tree::depth(to) - 2 * tree::depth(lca);
        assert_eq!(route.hop_count(), expected, "{} -> {}", from, to);
        assert_eq!(route.final_destination(), Some(to));

        // Consecutive hops are parent/child links
        let mut previous = from;
        if from != to {
            for hop in route.deliveries() {
                assert!(topo.are_connected(previous, hop), "{} -/- {}", previous, hop);
                previous = hop;
            }
        }
    }
}

#[test]
fn test_ring_route_length_and_final_hop() {
    for count in 1..=9 {
        let topo = Topology::new(TopologyKind::Ring, count).unwrap();
        for (from, to) in all_pairs(count) {
            let route = topo.route(from, to).unwrap();
            if from == to {
                assert_eq!(route, Route::local(to));
                continue;
            }
            let expected = (to.index() + count - from.index()) % count;
            assert_eq!(route.hop_count(), expected);
            assert_eq!(route.hop_count(), ring::distance(from, to, count));
            assert_eq!(route.deliveries().last().copied(), Some(to));
        }
    }
}

#[test]
fn test_every_route_ends_at_destination() {
    for kind in TopologyKind::ALL {
        let topo = Topology::new(kind, 8).unwrap();
        for (from, to) in all_pairs(8) {
            let route = topo.route(from, to).unwrap();
            assert_eq!(route.final_destination(), Some(to), "{} {} -> {}", kind, from, to);
            assert!(!route.intermediates().contains(&to));
        }
    }
}

#[test]
fn test_star_only_relays_leaf_to_leaf() {
    let star = Topology::new(TopologyKind::Star, 6).unwrap();
    for (from, to) in all_pairs(6) {
        let route = star.route(from, to).unwrap();
        let leaf_to_leaf = from != to && from != NodeId(0) && to != NodeId(0);
        assert_eq!(route.is_relay(), leaf_to_leaf);
        if leaf_to_leaf {
            assert_eq!(route.deliveries(), vec![NodeId(0), to]);
        }
    }
}
