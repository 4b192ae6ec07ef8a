//! Topology simulator
//!
//! Runs the demonstration scenarios, sends single messages through a
//! chosen topology, and prints routes and adjacency.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use topo_core::{NodeId, Route, TopologyKind};
use topo_logging::SubscriberBuilder;
use topo_routing::Topology;
use topo_simulation::{NetworkManager, SimConfig, scenarios};

#[derive(Parser)]
#[command(
    name = "topo-sim",
    about = "Message delivery across classic interconnection topologies",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demonstration scenarios
    Demo {
        /// Only run the scenario for this topology
        #[arg(short, long)]
        only: Option<TopologyKind>,
    },

    /// Send one message and wait for it to arrive
    Send {
        /// Type of topology: bus, ring, star, mesh, fully-connected, tree, hypercube, switched
        #[arg(short, long, default_value = "ring")]
        topology: TopologyKind,

        /// Number of nodes
        #[arg(short, long, default_value = "5")]
        nodes: usize,

        /// Maximum time to wait for delivery, in milliseconds
        #[arg(short, long, default_value = "3000")]
        wait_ms: u64,

        from: usize,
        to: usize,
        payload: String,
    },

    /// Print the route a message would take
    Route {
        #[arg(short, long, default_value = "ring")]
        topology: TopologyKind,

        #[arg(short, long, default_value = "5")]
        nodes: usize,

        from: usize,
        to: usize,
    },

    /// Print a topology's adjacency
    Topology {
        #[arg(short, long, default_value = "ring")]
        topology: TopologyKind,

        #[arg(short, long, default_value = "6")]
        nodes: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimConfig::default(),
    };

    // Set up tracing
    let mut logging = SubscriberBuilder::new().with_config(config.logging.clone());
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    let _guard = logging.init()?;

    match cli.command {
        Commands::Demo { only } => {
            let mut manager = NetworkManager::new(config);
            match only {
                Some(kind) => {
                    let scenario = scenarios::scenario_for(kind)
                        .with_context(|| format!("no scenario for {kind}"))?;
                    scenarios::run_scenario(&mut manager, scenario).await?;
                }
                None => {
                    scenarios::run_all(&mut manager).await?;
                }
            }
        }
        Commands::Send {
            topology,
            nodes,
            wait_ms,
            from,
            to,
            payload,
        } => {
            let mut manager = NetworkManager::new(config);
            manager.configure_network(topology, nodes)?;
            manager.run_network()?;
            manager.send_message(from, to, payload)?;

            let network = manager.network()?;
            let arrived = match network.node(to) {
                Some(node) => {
                    node.wait_for_deliveries(1, Duration::from_millis(wait_ms))
                        .await
                }
                None => false,
            };
            manager.shutdown().await?;

            for node in network.nodes() {
                for delivery in node.transit() {
                    println!("  Node {} relayed {} -> {}", node.id(), delivery.from(), delivery.to());
                }
            }
            if arrived {
                println!("Delivered to node {to}");
            } else {
                println!("Not delivered within {wait_ms} ms");
            }
            println!("{}", network.stats());
        }
        Commands::Route {
            topology,
            nodes,
            from,
            to,
        } => {
            let topology = Topology::new(topology, nodes)?;
            let route = topology.route(NodeId(from), NodeId(to))?;
            println!("{}", describe_route(&route));
        }
        Commands::Topology { topology, nodes } => {
            let topology = Topology::new(topology, nodes)?;
            println!("{}", topology.visualize());
        }
    }

    Ok(())
}

fn describe_route(route: &Route) -> String {
    let path = route
        .deliveries()
        .iter()
        .map(NodeId::to_string)
        .collect::<Vec<_>>()
        .join(" -> ");
    let shape = match route {
        Route::Local { .. } => "local",
        Route::Direct { .. } => "direct",
        Route::Relay { .. } => "relay",
        Route::Broadcast { .. } => "broadcast",
        Route::Switched { .. } => "via mediator",
    };
    format!("{shape}: {path} ({} hops)", route.hop_count())
}
