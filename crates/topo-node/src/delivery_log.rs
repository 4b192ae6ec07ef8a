//! Per-node record of observed messages
//!
//! The delivery log is the only place the outcome of a send becomes
//! visible. A node appends every message addressed to it, and optionally
//! every message it saw in transit.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;

use topo_core::Delivery;

/// Arrival record of a single node
#[derive(Debug)]
pub struct DeliveryLog {
    consumed: Mutex<Vec<Delivery>>,
    transit: Mutex<Vec<Delivery>>,
    /// Number of consumed messages, for waiters
    consumed_count: watch::Sender<usize>,
    /// Messages that arrived after the inbox was closed
    dropped: AtomicU64,
}

impl DeliveryLog {
    /// Create an empty log
    pub fn new() -> Self {
        let (consumed_count, _) = watch::channel(0);
        Self {
            consumed: Mutex::new(Vec::new()),
            transit: Mutex::new(Vec::new()),
            consumed_count,
            dropped: AtomicU64::new(0),
        }
    }

    /// Record a message addressed to this node
    pub fn record_consumed(&self, delivery: Delivery) {
        self.consumed.lock().push(delivery);
        self.consumed_count.send_modify(|count| *count += 1);
    }

    /// Record a message that passed through this node
    pub fn record_transit(&self, delivery: Delivery) {
        self.transit.lock().push(delivery);
    }

    /// Record a message lost because the inbox was closed
    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Messages addressed to this node, in arrival order
    pub fn consumed(&self) -> Vec<Delivery> {
        self.consumed.lock().clone()
    }

    /// Messages seen in transit, in arrival order
    pub fn transit(&self) -> Vec<Delivery> {
        self.transit.lock().clone()
    }

    /// Number of messages addressed to this node
    pub fn consumed_len(&self) -> usize {
        *self.consumed_count.borrow()
    }

    /// Number of messages lost at this node
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Wait until at least `count` messages have been consumed
    ///
    /// Returns `false` if `timeout` elapses first.
    pub async fn wait_for_consumed(&self, count: usize, timeout: Duration) -> bool {
        let mut rx = self.consumed_count.subscribe();
        matches!(
            tokio::time::timeout(timeout, rx.wait_for(|consumed| *consumed >= count)).await,
            Ok(Ok(_))
        )
    }
}

impl Default for DeliveryLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use topo_core::{Message, NodeId};

    use super::*;

    fn delivery(node: usize, from: usize, to: usize) -> Delivery {
        Delivery::now(
            NodeId(node),
            Arc::new(Message::new(NodeId(from), NodeId(to), "payload")),
        )
    }

    #[test]
    fn test_records_are_kept_separately() {
        let log = DeliveryLog::new();
        log.record_transit(delivery(0, 3, 1));
        log.record_consumed(delivery(1, 3, 1));
        log.record_dropped();

        assert_eq!(log.consumed_len(), 1);
        assert_eq!(log.consumed()[0].node, NodeId(1));
        assert_eq!(log.transit().len(), 1);
        assert_eq!(log.dropped(), 1);
    }

    #[tokio::test]
    async fn test_wait_for_consumed_already_satisfied() {
        let log = DeliveryLog::new();
        log.record_consumed(delivery(2, 0, 2));
        assert!(log.wait_for_consumed(1, Duration::from_millis(10)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_consumed_times_out() {
        let log = DeliveryLog::new();
        assert!(!log.wait_for_consumed(1, Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn test_wait_for_consumed_wakes_on_record() {
        let log = Arc::new(DeliveryLog::new());
        let writer = log.clone();
        let waiter = tokio::spawn(async move { log.wait_for_consumed(2, Duration::from_secs(5)).await });

        writer.record_consumed(delivery(1, 0, 1));
        writer.record_consumed(delivery(1, 2, 1));
        assert!(waiter.await.unwrap());
    }
}
