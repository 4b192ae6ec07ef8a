//! Runs the demonstration scenarios on a paused clock

use topo_simulation::scenarios::{self, SCENARIOS};
use topo_simulation::{NetworkManager, NetworkState, SimConfig, TopologyKind};

#[tokio::test(start_paused = true)]
async fn test_all_scenarios_deliver_everything() {
    let mut manager = NetworkManager::new(SimConfig::default());
    let results = scenarios::run_all(&mut manager).await.unwrap();

    assert_eq!(results.len(), SCENARIOS.len());
    for (scenario, stats) in SCENARIOS.iter().zip(&results) {
        assert_eq!(stats.messages_sent, scenario.sends.len() as u64, "{}", scenario.kind);
        assert_eq!(stats.messages_consumed, scenario.sends.len() as u64, "{}", scenario.kind);
        assert_eq!(stats.messages_dropped, 0);
        assert_eq!(stats.routes_abandoned, 0);
    }

    // The last scenario's network stays attached, stopped
    let network = manager.network().unwrap();
    assert_eq!(network.kind(), TopologyKind::Switched);
    assert_eq!(network.state(), NetworkState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_single_scenario() {
    let mut manager = NetworkManager::default();
    let scenario = scenarios::scenario_for(TopologyKind::Tree).unwrap();
    let stats = scenarios::run_scenario(&mut manager, scenario).await.unwrap();

    assert_eq!(stats.messages_consumed, 3);
    // 5->2 is one hop, 6->4 is four, 3->3 is local
    assert_eq!(stats.hops_delivered, 6);
}
