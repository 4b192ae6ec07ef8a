//! Network-wide counters

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counters updated by the send machinery
///
/// Shared by every routing task and the mediator, so every field is atomic.
/// Consumption is tracked by each node's delivery log and folded in by
/// [`Network::stats`](crate::Network::stats).
#[derive(Debug, Default)]
pub struct NetworkStats {
    messages_sent: AtomicU64,
    hops_delivered: AtomicU64,
    messages_dropped: AtomicU64,
    routes_abandoned: AtomicU64,
}

impl NetworkStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// A send was accepted
    pub fn record_sent(&self) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// One inbox delivery happened
    pub fn record_hop(&self) {
        self.hops_delivered.fetch_add(1, Ordering::Relaxed);
    }

    /// A message was dropped at delivery time
    pub fn record_dropped(&self) {
        self.messages_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// A route was cut short by shutdown
    pub fn record_abandoned(&self) {
        self.routes_abandoned.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            hops_delivered: self.hops_delivered.load(Ordering::Relaxed),
            messages_consumed: 0,
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
            routes_abandoned: self.routes_abandoned.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of the network counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub messages_sent: u64,
    pub hops_delivered: u64,
    pub messages_consumed: u64,
    pub messages_dropped: u64,
    pub routes_abandoned: u64,
}

impl StatsSnapshot {
    /// Fraction of accepted sends that reached their destination
    pub fn delivery_rate(&self) -> f64 {
        if self.messages_sent == 0 {
            0.0
        } else {
            self.messages_consumed as f64 / self.messages_sent as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sent={} consumed={} hops={} dropped={} abandoned={}",
            self.messages_sent,
            self.messages_consumed,
            self.hops_delivered,
            self.messages_dropped,
            self.routes_abandoned
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = NetworkStats::new();
        stats.record_sent();
        stats.record_sent();
        stats.record_hop();
        stats.record_dropped();
        stats.record_abandoned();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.messages_sent, 2);
        assert_eq!(snapshot.hops_delivered, 1);
        assert_eq!(snapshot.messages_dropped, 1);
        assert_eq!(snapshot.routes_abandoned, 1);
    }

    #[test]
    fn test_delivery_rate() {
        assert_eq!(StatsSnapshot::default().delivery_rate(), 0.0);
        let snapshot = StatsSnapshot {
            messages_sent: 4,
            messages_consumed: 3,
            ..Default::default()
        };
        assert!((snapshot.delivery_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_display() {
        let snapshot = StatsSnapshot {
            messages_sent: 3,
            messages_consumed: 3,
            hops_delivered: 5,
            ..Default::default()
        };
        assert_eq!(
            snapshot.to_string(),
            "sent=3 consumed=3 hops=5 dropped=0 abandoned=0"
        );
    }
}
