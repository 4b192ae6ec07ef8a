//! Facade over the active network
//!
//! Holds at most one [`Network`] and forwards every call to it, failing
//! with [`NetworkError::NotConfigured`] until one has been configured.

use tracing::{info, warn};

use topo_core::{NetworkError, NetworkResult, TopologyKind};

use crate::config::SimConfig;
use crate::network::{Network, NetworkState};

/// Entry point used by drivers
#[derive(Debug, Default)]
pub struct NetworkManager {
    config: SimConfig,
    network: Option<Network>,
}

impl NetworkManager {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            network: None,
        }
    }

    /// Configuration applied to every network this manager builds
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Replace the active network with a new one
    ///
    /// A previous network that was not shut down is shut down in the
    /// background. On error the previous network stays active.
    pub fn configure_network(&mut self, kind: TopologyKind, count: usize) -> NetworkResult<()> {
        let network = Network::configure(kind, count, &self.config)?;
        if let Some(previous) = self.network.replace(network) {
            if !matches!(previous.state(), NetworkState::Stopped) {
                warn!(topology = %previous.kind(), "Replacing a network that was not shut down");
                tokio::spawn(async move {
                    let _ = previous.shutdown().await;
                });
            }
        }
        info!(topology = %kind, nodes = count, "Active network replaced");
        Ok(())
    }

    /// Start the active network's node workers
    pub fn run_network(&self) -> NetworkResult<()> {
        self.network()?.run()
    }

    /// Send through the active network
    pub fn send_message(&self, from: usize, to: usize, payload: impl Into<String>) -> NetworkResult<()> {
        self.network()?.send_message(from, to, payload)
    }

    /// Shut the active network down
    pub async fn shutdown(&self) -> NetworkResult<()> {
        self.network()?.shutdown().await
    }

    /// The active network
    pub fn network(&self) -> NetworkResult<&Network> {
        self.network.as_ref().ok_or(NetworkError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_calls_before_configure_fail() {
        let manager = NetworkManager::default();
        assert!(matches!(manager.run_network(), Err(NetworkError::NotConfigured)));
        assert!(matches!(
            manager.send_message(0, 1, "x"),
            Err(NetworkError::NotConfigured)
        ));
        assert!(matches!(manager.shutdown().await, Err(NetworkError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_failed_configure_keeps_previous() {
        let mut manager = NetworkManager::default();
        manager.configure_network(TopologyKind::Ring, 4).unwrap();
        assert!(manager.configure_network(TopologyKind::Hypercube, 3).is_err());
        assert_eq!(manager.network().unwrap().kind(), TopologyKind::Ring);
    }

    #[tokio::test]
    async fn test_reconfigure_replaces_network() {
        let mut manager = NetworkManager::default();
        manager.configure_network(TopologyKind::Bus, 3).unwrap();
        manager.run_network().unwrap();
        manager.configure_network(TopologyKind::Mesh, 5).unwrap();

        let network = manager.network().unwrap();
        assert_eq!(network.kind(), TopologyKind::Mesh);
        assert_eq!(network.node_count(), 5);
        assert_eq!(network.state(), NetworkState::Configured);
        manager.shutdown().await.unwrap();
    }
}
