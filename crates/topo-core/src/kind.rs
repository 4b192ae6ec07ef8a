//! Topology kinds and their structural rules

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The interconnection patterns the simulator supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopologyKind {
    Bus,
    Ring,
    Star,
    Mesh,
    FullyConnected,
    Tree,
    Hypercube,
    Switched,
}

impl TopologyKind {
    /// Every kind, in the order the demonstration runs them
    pub const ALL: [TopologyKind; 8] = [
        TopologyKind::Bus,
        TopologyKind::Ring,
        TopologyKind::Mesh,
        TopologyKind::Star,
        TopologyKind::FullyConnected,
        TopologyKind::Hypercube,
        TopologyKind::Tree,
        TopologyKind::Switched,
    ];

    /// Smallest node count this kind accepts
    pub const fn min_nodes(&self) -> usize {
        match self {
            Self::Star => 2,
            _ => 1,
        }
    }

    /// Validate a node count against this kind's structural precondition
    pub fn validate(&self, count: usize) -> Result<(), ConfigError> {
        if count < self.min_nodes() {
            return Err(ConfigError::InvalidTopologySize {
                kind: *self,
                count,
                requirement: match self.min_nodes() {
                    2 => "at least 2 nodes",
                    _ => "at least 1 node",
                },
            });
        }
        if matches!(self, Self::Hypercube) && !count.is_power_of_two() {
            return Err(ConfigError::InvalidTopologySize {
                kind: *self,
                count,
                requirement: "node count must be a power of two",
            });
        }
        Ok(())
    }

    /// Simulated link latency between consecutive relay hops
    pub const fn default_hop_delay(&self) -> Duration {
        match self {
            Self::Ring | Self::Tree | Self::Hypercube => Duration::from_millis(100),
            Self::Star => Duration::from_millis(50),
            Self::Bus | Self::Mesh | Self::FullyConnected | Self::Switched => Duration::ZERO,
        }
    }

    /// How long shutdown waits for workers before cancelling them
    pub const fn default_grace_period(&self) -> Duration {
        match self {
            Self::Bus | Self::Mesh | Self::FullyConnected => Duration::from_secs(2),
            Self::Ring | Self::Star | Self::Switched => Duration::from_secs(3),
            Self::Tree | Self::Hypercube => Duration::from_secs(4),
        }
    }

    /// Kebab-case name, as accepted by [`FromStr`]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bus => "bus",
            Self::Ring => "ring",
            Self::Star => "star",
            Self::Mesh => "mesh",
            Self::FullyConnected => "fully-connected",
            Self::Tree => "tree",
            Self::Hypercube => "hypercube",
            Self::Switched => "switched",
        }
    }
}

impl Display for TopologyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Bus => "Bus",
            Self::Ring => "Ring",
            Self::Star => "Star",
            Self::Mesh => "Mesh",
            Self::FullyConnected => "FullyConnected",
            Self::Tree => "Tree",
            Self::Hypercube => "Hypercube",
            Self::Switched => "Switched",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TopologyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "bus" => Ok(Self::Bus),
            "ring" => Ok(Self::Ring),
            "star" => Ok(Self::Star),
            "mesh" => Ok(Self::Mesh),
            "fully-connected" | "fullyconnected" | "full" => Ok(Self::FullyConnected),
            "tree" => Ok(Self::Tree),
            "hypercube" | "cube" => Ok(Self::Hypercube),
            "switched" | "switch" => Ok(Self::Switched),
            _ => Err(ConfigError::UnknownTopology(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_sizes() {
        assert!(TopologyKind::Bus.validate(1).is_ok());
        assert!(TopologyKind::Bus.validate(0).is_err());
        assert!(TopologyKind::Star.validate(1).is_err());
        assert!(TopologyKind::Star.validate(2).is_ok());
        assert!(TopologyKind::Tree.validate(1).is_ok());
    }

    #[test]
    fn test_hypercube_power_of_two() {
        for ok in [1, 2, 4, 8, 16, 64] {
            assert!(TopologyKind::Hypercube.validate(ok).is_ok(), "{} should be valid", ok);
        }
        for bad in [0, 3, 5, 6, 7, 12] {
            let err = TopologyKind::Hypercube.validate(bad).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidTopologySize { kind: TopologyKind::Hypercube, count, .. } if count == bad
            ));
        }
    }

    #[test]
    fn test_default_timings() {
        assert_eq!(TopologyKind::Ring.default_hop_delay(), Duration::from_millis(100));
        assert_eq!(TopologyKind::Star.default_hop_delay(), Duration::from_millis(50));
        assert_eq!(TopologyKind::Bus.default_hop_delay(), Duration::ZERO);
        assert_eq!(TopologyKind::Mesh.default_grace_period(), Duration::from_secs(2));
        assert_eq!(TopologyKind::Switched.default_grace_period(), Duration::from_secs(3));
        assert_eq!(TopologyKind::Hypercube.default_grace_period(), Duration::from_secs(4));
    }

    #[test]
    fn test_parse_names() {
        for kind in TopologyKind::ALL {
            assert_eq!(kind.as_str().parse::<TopologyKind>().unwrap(), kind);
        }
        assert_eq!("Fully_Connected".parse::<TopologyKind>().unwrap(), TopologyKind::FullyConnected);
        assert!(matches!(
            "torus".parse::<TopologyKind>(),
            Err(ConfigError::UnknownTopology(_))
        ));
    }
}
