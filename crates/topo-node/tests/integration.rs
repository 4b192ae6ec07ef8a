//! Integration tests for the node actor
//!
//! Exercises the receive loop through the public API: start, enqueue,
//! stop, and the drain guarantee.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use topo_core::{Message, NodeId};
use topo_node::{Node, NodeConfig, NodeError};

fn create_node(id: usize) -> Arc<Node> {
    Arc::new(Node::new(NodeId(id), NodeConfig::default()))
}

fn message(from: usize, to: usize, payload: &str) -> Arc<Message> {
    Arc::new(Message::new(NodeId(from), NodeId(to), payload))
}

#[tokio::test]
async fn test_node_lifecycle() {
    let node = create_node(1);

    // Initially not started
    assert!(!node.is_started());
    assert!(node.is_alive());

    // Start
    let worker = node.clone().spawn(&Handle::current()).unwrap();
    assert!(node.is_started());

    // Can't start twice
    assert!(matches!(
        node.clone().spawn(&Handle::current()),
        Err(NodeError::AlreadyStarted(_))
    ));

    // Stop
    node.stop();
    assert!(!node.is_alive());
    worker.await.unwrap();
}

#[tokio::test]
async fn test_messages_queued_before_start_are_consumed() {
    let node = create_node(2);
    node.receive(message(0, 2, "early"));

    let worker = node.clone().spawn(&Handle::current()).unwrap();
    assert!(node.wait_for_deliveries(1, Duration::from_secs(1)).await);

    node.stop();
    worker.await.unwrap();
    assert_eq!(node.deliveries()[0].payload(), "early");
}

#[tokio::test]
async fn test_stop_drains_inbox() {
    let node = create_node(0);
    for i in 0..100 {
        node.receive(message(1, 0, &format!("m{i}")));
    }

    // Stop before the loop ever runs: the backlog must still be consumed
    node.stop();
    let worker = node.clone().spawn(&Handle::current()).unwrap();
    worker.await.unwrap();

    let payloads: Vec<String> = node
        .deliveries()
        .iter()
        .map(|d| d.payload().to_string())
        .collect();
    assert_eq!(payloads.len(), 100);
    assert_eq!(payloads[0], "m0");
    assert_eq!(payloads[99], "m99");
}

#[tokio::test]
async fn test_only_addressed_messages_are_consumed() {
    let node = create_node(0);
    let worker = node.clone().spawn(&Handle::current()).unwrap();

    node.receive(message(3, 1, "relay"));
    node.receive(message(3, 0, "mine"));
    assert!(node.wait_for_deliveries(1, Duration::from_secs(1)).await);

    node.stop();
    worker.await.unwrap();

    assert_eq!(node.deliveries().len(), 1);
    assert_eq!(node.deliveries()[0].from(), NodeId(3));
    assert_eq!(node.transit().len(), 1);
    assert_eq!(node.transit()[0].to(), NodeId(1));
}

#[tokio::test]
async fn test_receive_after_exit_is_dropped() {
    let node = create_node(5);
    let worker = node.clone().spawn(&Handle::current()).unwrap();
    node.stop();
    worker.await.unwrap();

    node.receive(message(0, 5, "late"));

    assert!(node.deliveries().is_empty());
    assert_eq!(node.log().dropped(), 1);
}

#[tokio::test]
async fn test_stopped_node_wakes_without_traffic() {
    let node = create_node(7);
    let worker = node.clone().spawn(&Handle::current()).unwrap();

    node.stop();
    tokio::time::timeout(Duration::from_millis(500), worker)
        .await
        .expect("receive loop should exit promptly")
        .unwrap();
}
