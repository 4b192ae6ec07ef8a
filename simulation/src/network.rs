//! The running network: node workers, send machinery and shutdown
//!
//! A [`Network`] is built for one topology and one node count. It owns the
//! nodes, the elastic pool of routing tasks and, for the switched topology,
//! the single mediator task with its shared queue.
//!
//! Sends are validated synchronously and then executed without blocking
//! the caller:
//!
//! - local, direct and broadcast routes enqueue straight into the target
//!   inboxes (enqueueing never blocks)
//! - relay routes run on a spawned routing task that waits the hop delay
//!   between consecutive hops
//! - switched routes are pushed onto the mediator queue
//!
//! Delivery outcomes are never reported back to the sender. They show up
//! in node logs, in [`StatsSnapshot`] and in the tracing output.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, timeout_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use topo_core::{
    DropReason, Message, NetworkError, NetworkResult, NodeId, Route, TopologyKind,
};
use topo_node::Node;
use topo_routing::Topology;

use crate::config::SimConfig;
use crate::stats::{NetworkStats, StatsSnapshot};

/// Lifecycle of a [`Network`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkState {
    /// Nodes exist; sends queue up but nothing consumes them yet
    Configured,
    /// Node workers are consuming their inboxes
    Running,
    /// Shutdown in progress
    Draining,
    /// Every worker has exited or been cancelled
    Stopped,
}

/// Shared state handed to routing tasks and the mediator
#[derive(Debug, Clone)]
struct Fabric {
    kind: TopologyKind,
    nodes: Arc<[Arc<Node>]>,
    stats: Arc<NetworkStats>,
    /// Fired when the grace period runs out
    cancel: CancellationToken,
}

impl Fabric {
    /// Deliver into one inbox, dropping ids outside the node range
    fn deliver(&self, target: NodeId, message: &Arc<Message>) -> bool {
        match self.nodes.get(target.index()) {
            Some(node) => {
                node.receive(message.clone());
                self.stats.record_hop();
                true
            }
            None => {
                warn!(
                    topology = %self.kind,
                    from = %message.from(),
                    to = %message.to(),
                    target = %target,
                    reason = %DropReason::DestinationOutOfRange,
                    "Dropped message"
                );
                self.stats.record_dropped();
                false
            }
        }
    }

    /// Walk a multi-hop route, sleeping `delay` between consecutive hops
    async fn relay(self, hops: Vec<NodeId>, message: Arc<Message>, delay: Duration) {
        for (index, hop) in hops.iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                tokio::select! {
                    _ = self.cancel.cancelled() => {
                        warn!(
                            topology = %self.kind,
                            from = %message.from(),
                            to = %message.to(),
                            delivered = index,
                            remaining = hops.len() - index,
                            reason = %DropReason::Cancelled,
                            "Route abandoned"
                        );
                        self.stats.record_abandoned();
                        return;
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            debug!(
                topology = %self.kind,
                from = %message.from(),
                to = %message.to(),
                hop = index + 1,
                node = %hop,
                "Hop"
            );
            self.deliver(*hop, &message);
        }
    }

    /// The switched topology's mediator loop
    ///
    /// Destinations are validated again here, at delivery time; a bad one
    /// is logged and dropped without stopping the loop. Exits once every
    /// sender is gone and the queue is empty, or when cancelled.
    async fn mediate(self, mut queue: mpsc::UnboundedReceiver<Arc<Message>>) {
        info!(topology = %self.kind, "Mediator started");
        let mut forwarded = 0usize;

        loop {
            tokio::select! {
                biased;

                next = queue.recv() => match next {
                    Some(message) => {
                        debug!(from = %message.from(), to = %message.to(), "Mediator forwarding");
                        if self.deliver(message.to(), &message) {
                            forwarded += 1;
                        }
                    }
                    None => break,
                },
                _ = self.cancel.cancelled() => {
                    queue.close();
                    while let Ok(message) = queue.try_recv() {
                        warn!(
                            from = %message.from(),
                            to = %message.to(),
                            reason = %DropReason::Cancelled,
                            "Dropped queued message"
                        );
                        self.stats.record_abandoned();
                    }
                    break;
                }
            }
        }

        info!(topology = %self.kind, forwarded, "Mediator stopped");
    }
}

/// Handle to the switched topology's mediator queue
///
/// [`MediatorHandle::forward`] enqueues without the synchronous range check
/// that [`Network::send_message`] performs, leaving validation entirely to
/// the mediator. Holding a handle does not keep the queue open across
/// shutdown.
#[derive(Debug, Clone)]
pub struct MediatorHandle {
    queue: mpsc::WeakUnboundedSender<Arc<Message>>,
}

impl MediatorHandle {
    /// Enqueue a message as-is
    pub fn forward(&self, message: Message) -> NetworkResult<()> {
        let queue = self.queue.upgrade().ok_or(NetworkError::ShutDown)?;
        queue
            .send(Arc::new(message))
            .map_err(|_| NetworkError::ShutDown)
    }
}

/// A configured network of nodes over one topology
#[derive(Debug)]
pub struct Network {
    topology: Topology,
    hop_delay: Duration,
    grace_period: Duration,
    runtime: Handle,
    fabric: Fabric,
    state: Mutex<NetworkState>,
    /// In-flight relay routes
    routes: Mutex<JoinSet<()>>,
    /// One receive loop per node, once running
    workers: Mutex<Vec<JoinHandle<()>>>,
    mediator_queue: Mutex<Option<mpsc::UnboundedSender<Arc<Message>>>>,
    mediator_task: Mutex<Option<JoinHandle<()>>>,
}

impl Network {
    /// Build `count` nodes over a topology of `kind`
    ///
    /// Must be called from within a Tokio runtime. Node workers are not
    /// started until [`Network::run`]; the switched mediator starts here.
    #[instrument(skip(config))]
    pub fn configure(kind: TopologyKind, count: usize, config: &SimConfig) -> NetworkResult<Self> {
        let topology = Topology::new(kind, count)?;
        let runtime = Handle::try_current().map_err(|_| NetworkError::NoRuntime)?;

        let node_config = config.node_config();
        let nodes: Arc<[Arc<Node>]> = NodeId::range(count)
            .map(|id| Arc::new(Node::new(id, node_config.clone())))
            .collect();

        let fabric = Fabric {
            kind,
            nodes,
            stats: Arc::new(NetworkStats::new()),
            cancel: CancellationToken::new(),
        };

        let (mediator_queue, mediator_task) = if kind == TopologyKind::Switched {
            let (tx, rx) = mpsc::unbounded_channel();
            let task = runtime.spawn(fabric.clone().mediate(rx));
            (Some(tx), Some(task))
        } else {
            (None, None)
        };

        info!(topology = %kind, nodes = count, "Network configured");

        Ok(Self {
            hop_delay: config.hop_delay(kind),
            grace_period: config.grace_period(kind),
            topology,
            runtime,
            fabric,
            state: Mutex::new(NetworkState::Configured),
            routes: Mutex::new(JoinSet::new()),
            workers: Mutex::new(Vec::new()),
            mediator_queue: Mutex::new(mediator_queue),
            mediator_task: Mutex::new(mediator_task),
        })
    }

    /// Start one receive loop per node
    #[instrument(skip(self), fields(topology = %self.kind()))]
    pub fn run(&self) -> NetworkResult<()> {
        let mut state = self.state.lock();
        match *state {
            NetworkState::Configured => {}
            NetworkState::Running => return Err(NetworkError::AlreadyRunning),
            NetworkState::Draining | NetworkState::Stopped => return Err(NetworkError::ShutDown),
        }

        let mut workers = self.workers.lock();
        for node in self.fabric.nodes.iter() {
            // Nodes are only ever spawned here, once
            if let Ok(worker) = node.clone().spawn(&self.runtime) {
                workers.push(worker);
            }
        }
        *state = NetworkState::Running;

        info!(workers = workers.len(), "Network running");
        Ok(())
    }

    /// Send `payload` from node `from` to node `to`
    ///
    /// Returns once the route has been validated and handed off; delivery
    /// happens asynchronously. Allowed before [`Network::run`], in which case
    /// messages wait in the inboxes.
    pub fn send_message(&self, from: usize, to: usize, payload: impl Into<String>) -> NetworkResult<()> {
        let (from, to) = (NodeId(from), NodeId(to));

        // Held until the route is handed off so shutdown sees every task
        let state = self.state.lock();
        if matches!(*state, NetworkState::Draining | NetworkState::Stopped) {
            return Err(NetworkError::ShutDown);
        }

        let route = self.topology.route(from, to)?;
        let message = Arc::new(Message::new(from, to, payload));
        self.fabric.stats.record_sent();

        info!(
            topology = %self.kind(),
            from = %from,
            to = %to,
            hops = route.hop_count(),
            "Sending message"
        );

        match route {
            Route::Local { node } => {
                self.fabric.deliver(node, &message);
            }
            Route::Direct { destination } => {
                self.fabric.deliver(destination, &message);
            }
            Route::Broadcast { targets, .. } => {
                for target in targets {
                    self.fabric.deliver(target, &message);
                }
            }
            Route::Relay { hops } => {
                let mut routes = self.routes.lock();
                while routes.try_join_next().is_some() {}
                routes.spawn_on(
                    self.fabric.clone().relay(hops, message, self.hop_delay),
                    &self.runtime,
                );
            }
            Route::Switched { .. } => {
                self.enqueue_mediated(message)?;
            }
        }

        drop(state);
        Ok(())
    }

    fn enqueue_mediated(&self, message: Arc<Message>) -> NetworkResult<()> {
        let queue = self.mediator_queue.lock();
        let queue = queue.as_ref().ok_or(NetworkError::ShutDown)?;
        queue.send(message).map_err(|_| NetworkError::ShutDown)
    }

    /// Stop accepting work, drain, and stop every worker
    ///
    /// Waits at most the topology's grace period. In-flight routes and the
    /// mediator finish first so their deliveries reach the inboxes, then
    /// every node drains its backlog. Anything still running at the
    /// deadline is cancelled. Calling this again is a no-op.
    #[instrument(skip(self), fields(topology = %self.kind()))]
    pub async fn shutdown(&self) -> NetworkResult<()> {
        let deadline = Instant::now() + self.grace_period;
        {
            let mut state = self.state.lock();
            if matches!(*state, NetworkState::Draining | NetworkState::Stopped) {
                debug!("Shutdown already performed");
                return Ok(());
            }
            *state = NetworkState::Draining;
        }
        info!(grace_ms = self.grace_period.as_millis() as u64, "Shutting down network");

        // Close the intake
        self.mediator_queue.lock().take();
        let mut routes = std::mem::take(&mut *self.routes.lock());
        let mut mediator = self.mediator_task.lock().take();

        let settled = timeout_at(deadline, async {
            while routes.join_next().await.is_some() {}
            if let Some(task) = mediator.as_mut() {
                let _ = task.await;
            }
        })
        .await
        .is_ok();

        if !settled {
            warn!(
                in_flight = routes.len(),
                "Grace period elapsed with routes in flight, cancelling"
            );
            self.fabric.cancel.cancel();
            while routes.join_next().await.is_some() {}
            if let Some(task) = mediator.as_mut() {
                let _ = task.await;
            }
        }

        // Drain the nodes
        for node in self.fabric.nodes.iter() {
            node.stop();
        }
        let mut workers = std::mem::take(&mut *self.workers.lock());
        let drained = timeout_at(deadline, async {
            for worker in workers.iter_mut() {
                let _ = worker.await;
            }
        })
        .await
        .is_ok();

        if !drained {
            let stuck = workers.iter().filter(|w| !w.is_finished()).count();
            warn!(stuck, "Grace period elapsed before nodes drained, aborting");
            for worker in &workers {
                worker.abort();
            }
        }

        *self.state.lock() = NetworkState::Stopped;
        info!(stats = %self.stats(), "Network stopped");
        Ok(())
    }

    /// The topology kind
    pub fn kind(&self) -> TopologyKind {
        self.topology.kind()
    }

    /// The routing policy
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.fabric.nodes.len()
    }

    /// The node with the given index
    pub fn node(&self, id: usize) -> Option<&Arc<Node>> {
        self.fabric.nodes.get(id)
    }

    /// Every node, by index
    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.fabric.nodes
    }

    /// Current lifecycle state
    pub fn state(&self) -> NetworkState {
        *self.state.lock()
    }

    /// Delay between consecutive relay hops
    pub fn hop_delay(&self) -> Duration {
        self.hop_delay
    }

    /// Shutdown grace period
    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// The mediator queue of a switched network
    pub fn mediator(&self) -> Option<MediatorHandle> {
        self.mediator_queue
            .lock()
            .as_ref()
            .map(|queue| MediatorHandle {
                queue: queue.downgrade(),
            })
    }

    /// Counters, with consumption and inbox drops summed over the nodes
    pub fn stats(&self) -> StatsSnapshot {
        let mut snapshot = self.fabric.stats.snapshot();
        for node in self.fabric.nodes.iter() {
            snapshot.messages_consumed += node.log().consumed_len() as u64;
            snapshot.messages_dropped += node.log().dropped();
        }
        snapshot
    }
}
