//! Simulation configuration
//!
//! Timing defaults come from [`TopologyKind`]; a [`SimConfig`] only stores
//! overrides, so an empty JSON object is a valid configuration file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use topo_core::TopologyKind;
use topo_logging::LogConfig;
use topo_node::NodeConfig;

/// Errors loading a configuration file
#[derive(Debug, Error)]
pub enum SimConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for a simulated network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Per-topology delay between consecutive relay hops, in milliseconds
    pub hop_delay_ms: BTreeMap<TopologyKind, u64>,
    /// Per-topology shutdown grace period, in milliseconds
    pub grace_period_ms: BTreeMap<TopologyKind, u64>,
    /// Record and log traffic that passes through a node (e.g. the star hub)
    pub trace_transit: bool,
    /// Logging setup used by the `topo-sim` binary
    pub logging: LogConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            hop_delay_ms: BTreeMap::new(),
            grace_period_ms: BTreeMap::new(),
            trace_transit: true,
            logging: LogConfig::default(),
        }
    }
}

impl SimConfig {
    /// Delay between consecutive relay hops for `kind`
    pub fn hop_delay(&self, kind: TopologyKind) -> Duration {
        self.hop_delay_ms
            .get(&kind)
            .map(|ms| Duration::from_millis(*ms))
            .unwrap_or_else(|| kind.default_hop_delay())
    }

    /// How long shutdown waits for in-flight work on `kind`
    pub fn grace_period(&self, kind: TopologyKind) -> Duration {
        self.grace_period_ms
            .get(&kind)
            .map(|ms| Duration::from_millis(*ms))
            .unwrap_or_else(|| kind.default_grace_period())
    }

    /// Override the hop delay of one topology kind
    pub fn with_hop_delay(mut self, kind: TopologyKind, delay: Duration) -> Self {
        self.hop_delay_ms.insert(kind, delay.as_millis() as u64);
        self
    }

    /// Override the grace period of one topology kind
    pub fn with_grace_period(mut self, kind: TopologyKind, grace: Duration) -> Self {
        self.grace_period_ms.insert(kind, grace.as_millis() as u64);
        self
    }

    /// Set whether nodes record in-transit traffic
    pub fn with_trace_transit(mut self, enabled: bool) -> Self {
        self.trace_transit = enabled;
        self
    }

    /// Set the logging configuration
    pub fn with_logging(mut self, logging: LogConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Configuration handed to every node
    pub fn node_config(&self) -> NodeConfig {
        NodeConfig::default().with_trace_transit(self.trace_transit)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_topology_kind() {
        let config = SimConfig::default();
        assert_eq!(config.hop_delay(TopologyKind::Ring), Duration::from_millis(100));
        assert_eq!(config.hop_delay(TopologyKind::Star), Duration::from_millis(50));
        assert_eq!(config.hop_delay(TopologyKind::Bus), Duration::ZERO);
        assert_eq!(config.grace_period(TopologyKind::Mesh), Duration::from_secs(2));
        assert_eq!(config.grace_period(TopologyKind::Switched), Duration::from_secs(3));
        assert_eq!(config.grace_period(TopologyKind::Tree), Duration::from_secs(4));
        assert!(config.node_config().trace_transit);
    }

    #[test]
    fn test_overrides() {
        let config = SimConfig::default()
            .with_hop_delay(TopologyKind::Ring, Duration::from_millis(5))
            .with_grace_period(TopologyKind::Ring, Duration::from_millis(250))
            .with_trace_transit(false);

        assert_eq!(config.hop_delay(TopologyKind::Ring), Duration::from_millis(5));
        assert_eq!(config.grace_period(TopologyKind::Ring), Duration::from_millis(250));
        assert_eq!(config.hop_delay(TopologyKind::Tree), Duration::from_millis(100));
        assert!(!config.node_config().trace_transit);
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.json");
        let config = SimConfig::default()
            .with_hop_delay(TopologyKind::Hypercube, Duration::from_millis(10))
            .with_logging(LogConfig::development());

        fs::write(&path, config.to_json().unwrap()).unwrap();
        let loaded = SimConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config: SimConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_kebab_case_keys() {
        let config: SimConfig =
            serde_json::from_str(r#"{"hop_delay_ms":{"fully-connected":7}}"#).unwrap();
        assert_eq!(
            config.hop_delay(TopologyKind::FullyConnected),
            Duration::from_millis(7)
        );
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SimConfig::from_json_file("/nonexistent/sim.json"),
            Err(SimConfigError::Io(_))
        ));
    }
}
