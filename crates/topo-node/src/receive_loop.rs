//! The node's receive loop
//!
//! Waits on the inbox and the stop signal at the same time, so a stopped
//! node wakes immediately instead of on the next poll. Queued messages
//! always win over the stop signal, and whatever is still queued once the
//! signal fires is drained before the loop exits: no message that made it
//! into the inbox is lost.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use topo_core::Message;

use crate::Node;

/// Run the receive loop until the node is stopped and its inbox is empty
pub async fn run(node: Arc<Node>, mut inbox: mpsc::UnboundedReceiver<Arc<Message>>) {
    info!(node = %node.id(), "Node started");
    let mut handled = 0usize;

    loop {
        tokio::select! {
            biased;

            Some(message) = inbox.recv() => {
                node.observe(message);
                handled += 1;
            }
            _ = node.stopped() => break,
        }
    }

    // Drain
    let mut drained = 0usize;
    while let Ok(message) = inbox.try_recv() {
        node.observe(message);
        drained += 1;
    }

    info!(
        node = %node.id(),
        handled = handled + drained,
        drained,
        "Node stopped"
    );
}
