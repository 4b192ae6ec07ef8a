//! # Topo Node
//!
//! The node actor of the topology simulator.
//!
//! A [`Node`] owns an unbounded inbox and runs one long-lived receive loop.
//! The loop accepts every message pushed into the inbox but only *consumes*
//! those addressed to the node; everything else is discarded (optionally
//! recorded as in-transit traffic). Which nodes receive a message is decided
//! entirely by the topology, so the node stays topology-agnostic.
//!
//! ## Lifecycle
//!
//! 1. **Created**: inbox open, loop not running; messages queue up
//! 2. **Running**: [`Node::spawn`] started the receive loop
//! 3. **Draining**: [`Node::stop`] was called; the loop keeps consuming
//!    until the inbox is empty
//! 4. **Stopped**: the loop has exited
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use topo_core::{Message, NodeId};
//! use topo_node::{Node, NodeConfig};
//!
//! let node = Arc::new(Node::new(NodeId(1), NodeConfig::default()));
//! let worker = node.clone().spawn(&tokio::runtime::Handle::current())?;
//!
//! node.receive(Arc::new(Message::new(NodeId(0), NodeId(1), "hello")));
//!
//! node.stop();
//! worker.await?;
//! assert_eq!(node.log().consumed_len(), 1);
//! ```

mod config;
mod delivery_log;
mod error;
pub mod receive_loop;

pub use config::NodeConfig;
pub use delivery_log::DeliveryLog;
pub use error::{NodeError, NodeResult};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

use topo_core::{Delivery, DropReason, Message, NodeId};

/// An addressable actor with an unbounded inbox
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    config: NodeConfig,
    /// Producer side of the inbox, shared by every routing task
    inbox: mpsc::UnboundedSender<Arc<Message>>,
    /// Consumer side, handed to the receive loop when it starts
    receiver: Mutex<Option<mpsc::UnboundedReceiver<Arc<Message>>>>,
    /// Cleared by `stop`
    alive: AtomicBool,
    /// Wakes the receive loop when `stop` is called
    stop_signal: CancellationToken,
    log: Arc<DeliveryLog>,
}

impl Node {
    /// Create a node with an empty inbox
    pub fn new(id: NodeId, config: NodeConfig) -> Self {
        let (inbox, receiver) = mpsc::unbounded_channel();
        Self {
            id,
            config,
            inbox,
            receiver: Mutex::new(Some(receiver)),
            alive: AtomicBool::new(true),
            stop_signal: CancellationToken::new(),
            log: Arc::new(DeliveryLog::new()),
        }
    }

    /// This node's id
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// This node's configuration
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// The node's record of observed messages
    pub fn log(&self) -> &Arc<DeliveryLog> {
        &self.log
    }

    /// Messages addressed to this node, in arrival order
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.log.consumed()
    }

    /// Messages that passed through this node, in arrival order
    pub fn transit(&self) -> Vec<Delivery> {
        self.log.transit()
    }

    /// Wait until at least `count` messages addressed to this node arrived
    pub async fn wait_for_deliveries(&self, count: usize, timeout: Duration) -> bool {
        self.log.wait_for_consumed(count, timeout).await
    }

    /// Whether `stop` has not been called yet
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Whether the receive loop has been handed the inbox
    pub fn is_started(&self) -> bool {
        self.receiver.lock().is_none()
    }

    /// Enqueue a message
    ///
    /// Never blocks. The inbox is unbounded, so the only way a message can
    /// be lost is if the receive loop has already exited; that case is
    /// logged and counted, never reported to the caller.
    pub fn receive(&self, message: Arc<Message>) {
        trace!(node = %self.id, from = %message.from(), to = %message.to(), "Enqueued message");
        if let Err(mpsc::error::SendError(message)) = self.inbox.send(message) {
            warn!(
                node = %self.id,
                from = %message.from(),
                to = %message.to(),
                reason = %DropReason::InboxClosed,
                "Dropped message"
            );
            self.log.record_dropped();
        }
    }

    /// Start the receive loop on `runtime`
    ///
    /// The loop runs until [`Node::stop`] is called and the inbox has been
    /// drained.
    #[instrument(skip(self, runtime), fields(node = %self.id))]
    pub fn spawn(self: Arc<Self>, runtime: &Handle) -> NodeResult<JoinHandle<()>> {
        let receiver = self
            .receiver
            .lock()
            .take()
            .ok_or(NodeError::AlreadyStarted(self.id))?;
        Ok(runtime.spawn(receive_loop::run(self, receiver)))
    }

    /// Ask the receive loop to drain and exit
    ///
    /// Idempotent. Does not dequeue anything itself.
    pub fn stop(&self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            trace!(node = %self.id, "Stop requested");
        }
        self.stop_signal.cancel();
    }

    /// Resolves once `stop` has been called
    pub(crate) async fn stopped(&self) {
        self.stop_signal.cancelled().await
    }

    /// Handle one dequeued message
    pub(crate) fn observe(&self, message: Arc<Message>) {
        let delivery = Delivery::now(self.id, message);
        if delivery.is_consumption() {
            info!(
                node = %self.id,
                from = %delivery.from(),
                to = %delivery.to(),
                payload = %delivery.payload(),
                sent_at = %delivery.message.sent_at(),
                "Message received"
            );
            self.log.record_consumed(delivery);
        } else if self.config.trace_transit {
            debug!(
                node = %self.id,
                from = %delivery.from(),
                to = %delivery.to(),
                "Message in transit"
            );
            self.log.record_transit(delivery);
        }
    }
}
