//! `boxwire-cli`: a smoke-test entry point for the routing core.
//!
//! Reads a small newline-delimited plain-text description of nodes and
//! connections from a file argument or stdin, runs the full routing
//! pipeline with the reference [`boxwire::BfsPathfinder`],
//! and prints one outcome line per connection. This is manual-verification
//! scaffolding, not a diagram-persistence product surface: the crate's
//! Diagram JSON format (spec'd for the surrounding system) is deliberately
//! not implemented here.
//!
//! Input format, one directive per line:
//!
//! ```text
//! node <id> <x> <y> <width> <height>
//! conn <id> <from> <to>
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.
use std::io::{self, Read};
use std::sync::Arc;
use std::{env, fs};

use boxwire::{
    assign_connection_ids, BfsPathfinder, Connection, Node, PortAwareObstacleManager, PortManager, RoutingDriver,
    RoutingOutcome, VirtualObstacleConfig,
};

const PORT_WIDTH: i32 = 2;

fn main() -> io::Result<()> {
    env_logger::init();

    let mut args = env::args();
    let src = if args.len() >= 2 {
        let path = args.nth(1).unwrap();
        fs::read_to_string(path)?
    } else {
        let mut s = String::new();
        io::stdin().read_to_string(&mut s)?;
        s
    };

    let (nodes, mut connections) = parse(&src);
    assign_connection_ids(&mut connections);

    let port_manager = Arc::new(PortManager::new(nodes.clone(), PORT_WIDTH));
    let obstacle_manager = PortAwareObstacleManager::new(port_manager.clone(), VirtualObstacleConfig::default());
    let driver = RoutingDriver::new(port_manager, obstacle_manager, BfsPathfinder::new());

    for (conn, outcome) in connections.iter().zip(driver.route_all(&nodes, &connections)) {
        match outcome {
            RoutingOutcome::Routed(path) => {
                let points = path
                    .points()
                    .iter()
                    .map(|p| format!("({},{})", p.x, p.y))
                    .collect::<Vec<_>>()
                    .join(" -> ");
                println!("connection {}: routed, cost {} : {points}", conn.id, path.cost);
            }
            RoutingOutcome::Skipped { connection_id, reason } => {
                println!("connection {connection_id}: skipped ({reason})");
            }
        }
    }

    Ok(())
}

fn parse(src: &str) -> (Vec<Node>, Vec<Connection>) {
    let mut nodes = Vec::new();
    let mut connections = Vec::new();

    for line in src.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            ["node", id, x, y, width, height] => {
                if let (Ok(id), Ok(x), Ok(y), Ok(width), Ok(height)) =
                    (id.parse(), x.parse(), y.parse(), width.parse(), height.parse())
                {
                    nodes.push(Node::new(id, x, y, width, height));
                }
            }
            ["conn", id, from, to] => {
                if let (Ok(id), Ok(from), Ok(to)) = (id.parse(), from.parse(), to.parse()) {
                    connections.push(Connection::new(id, from, to));
                }
            }
            _ => eprintln!("ignoring unrecognized line: {line}"),
        }
    }

    (nodes, connections)
}
