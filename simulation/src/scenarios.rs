//! Demonstration scenarios
//!
//! One scenario per topology, each sending a fixed set of messages and
//! then waiting for them to land before shutting the network down.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

use topo_core::{NetworkResult, TopologyKind};

use crate::manager::NetworkManager;
use crate::stats::StatsSnapshot;

/// Settle time between `run` and the first send
const PREPARE_WAIT: Duration = Duration::from_millis(100);
/// Upper bound on delivery for single-hop and shallow topologies
const MEDIUM_WAIT: Duration = Duration::from_secs(2);
/// Upper bound on delivery for the deeper multi-hop topologies
const LONG_WAIT: Duration = Duration::from_secs(3);

/// A scripted run over one topology
#[derive(Debug, Clone)]
pub struct Scenario {
    pub kind: TopologyKind,
    pub nodes: usize,
    pub sends: &'static [(usize, usize, &'static str)],
    /// How long to wait for every message to be consumed
    pub wait: Duration,
}

impl Scenario {
    /// Messages each destination should consume
    pub fn expected_deliveries(&self) -> BTreeMap<usize, usize> {
        let mut expected = BTreeMap::new();
        for (_, to, _) in self.sends {
            *expected.entry(*to).or_insert(0) += 1;
        }
        expected
    }
}

/// Every scenario, in the order the demo runs them
pub static SCENARIOS: [Scenario; 8] = [
    Scenario {
        kind: TopologyKind::Bus,
        nodes: 5,
        sends: &[(0, 1, "Bus 0->1"), (2, 4, "Bus 2->4"), (3, 0, "Bus 3->0")],
        wait: MEDIUM_WAIT,
    },
    Scenario {
        kind: TopologyKind::Ring,
        nodes: 5,
        sends: &[(0, 3, "Ring 0->3"), (4, 1, "Ring 4->1")],
        wait: MEDIUM_WAIT,
    },
    Scenario {
        kind: TopologyKind::Mesh,
        nodes: 4,
        sends: &[(0, 3, "Mesh 0->3"), (3, 1, "Mesh 3->1")],
        wait: MEDIUM_WAIT,
    },
    Scenario {
        kind: TopologyKind::Star,
        nodes: 5,
        sends: &[
            (0, 2, "Star 0->2"),
            (3, 0, "Star 3->0"),
            (4, 1, "Star 4->1"),
            (2, 3, "Star 2->3"),
        ],
        wait: MEDIUM_WAIT,
    },
    Scenario {
        kind: TopologyKind::FullyConnected,
        nodes: 4,
        sends: &[(1, 3, "Fully 1->3"), (2, 0, "Fully 2->0")],
        wait: MEDIUM_WAIT,
    },
    Scenario {
        kind: TopologyKind::Hypercube,
        nodes: 8,
        sends: &[(0, 7, "Hypercube 0->7"), (3, 5, "Hypercube 3->5")],
        wait: LONG_WAIT,
    },
    Scenario {
        kind: TopologyKind::Tree,
        nodes: 7,
        sends: &[(5, 2, "Tree 5->2"), (6, 4, "Tree 6->4"), (3, 3, "Tree 3->3")],
        wait: LONG_WAIT,
    },
    Scenario {
        kind: TopologyKind::Switched,
        nodes: 5,
        sends: &[
            (2, 4, "Switch 2->4"),
            (0, 3, "Switch 0->3"),
            (4, 1, "Switch 4->1"),
        ],
        wait: MEDIUM_WAIT,
    },
];

/// Look up the scenario for one topology kind
pub fn scenario_for(kind: TopologyKind) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.kind == kind)
}

/// Configure, run, send, wait, shut down
pub async fn run_scenario(manager: &mut NetworkManager, scenario: &Scenario) -> NetworkResult<StatsSnapshot> {
    info!("=== Running {} Scenario ===", scenario.kind);
    println!("\n=== Testing {}Network ===", scenario.kind);

    manager.configure_network(scenario.kind, scenario.nodes)?;
    manager.run_network()?;
    tokio::time::sleep(PREPARE_WAIT).await;

    for (from, to, payload) in scenario.sends {
        manager.send_message(*from, *to, *payload)?;
    }

    let network = manager.network()?;
    let deadline = Instant::now() + scenario.wait;
    for (node, count) in scenario.expected_deliveries() {
        if let Some(node) = network.node(node) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            node.wait_for_deliveries(count, remaining).await;
        }
    }

    for node in network.nodes() {
        for delivery in node.deliveries() {
            println!(
                "  Node {} received from {}: {:?} (sent {})",
                node.id(),
                delivery.from(),
                delivery.payload(),
                delivery.message.sent_at().format("%H:%M:%S%.3f")
            );
        }
        for delivery in node.transit() {
            println!(
                "  Node {} relayed {} -> {}",
                node.id(),
                delivery.from(),
                delivery.to()
            );
        }
    }

    manager.shutdown().await?;
    let stats = manager.network()?.stats();
    println!("  {stats}");
    Ok(stats)
}

/// Run every scenario in order
pub async fn run_all(manager: &mut NetworkManager) -> NetworkResult<Vec<StatsSnapshot>> {
    let mut results = Vec::with_capacity(SCENARIOS.len());
    for scenario in &SCENARIOS {
        results.push(run_scenario(manager, scenario).await?);
    }
    println!("\n=== All tests completed ===");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_scenario_per_kind() {
        for kind in TopologyKind::ALL {
            assert!(scenario_for(kind).is_some(), "missing scenario for {kind}");
        }
    }

    #[test]
    fn test_scenario_sizes_are_valid() {
        for scenario in &SCENARIOS {
            assert!(scenario.kind.validate(scenario.nodes).is_ok());
            for (from, to, _) in scenario.sends {
                assert!(*from < scenario.nodes && *to < scenario.nodes);
            }
        }
    }

    #[test]
    fn test_expected_deliveries() {
        let star = scenario_for(TopologyKind::Star).unwrap();
        let expected = star.expected_deliveries();
        assert_eq!(expected.get(&0), Some(&1));
        assert_eq!(expected.get(&3), Some(&1));
        assert_eq!(expected.values().sum::<usize>(), 4);
    }
}
