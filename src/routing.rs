//! Routing driver (spec.md §4.4): the contract a routing pipeline presents
//! to an external pathfinder. Orders connections, reserves both endpoint
//! ports, builds the per-connection obstacle predicate, and records the
//! result.
use std::sync::Arc;

use log::{debug, warn};

use crate::error::RoutingError;
use crate::geometry::EdgeSide;
use crate::node::{Connection, ConnectionId, Node};
use crate::path::Path;
use crate::pathfinder::Pathfinder;
use crate::port::PortManager;
use crate::port_obstacle::PortAwareObstacleManager;

/// Per-connection result the driver accumulates (spec.md §7: "a connection
/// that cannot be routed is logged and omitted; successfully routed
/// connections are preserved" — representable as data, not just a log
/// side-effect).
#[derive(Debug, Clone)]
pub enum RoutingOutcome {
    Routed(Path),
    Skipped { connection_id: ConnectionId, reason: String },
}

/// Orders connections, reserves ports for both endpoints, and invokes a
/// [`Pathfinder`] using the per-connection predicate (spec.md §4.4).
///
/// Routing one connection at a time through a single driver observes every
/// earlier connection's reservations (spec.md §5): the driver does not
/// parallelize connections within a diagram.
pub struct RoutingDriver<P: Pathfinder> {
    port_manager: Arc<PortManager>,
    obstacle_manager: PortAwareObstacleManager,
    pathfinder: P,
}

impl<P: Pathfinder> RoutingDriver<P> {
    pub fn new(port_manager: Arc<PortManager>, obstacle_manager: PortAwareObstacleManager, pathfinder: P) -> Self {
        Self { port_manager, obstacle_manager, pathfinder }
    }

    /// Nearest-face heuristic (spec.md §4.4 step 1): each endpoint faces
    /// whichever of its own edges points toward the other node's center.
    /// Not part of the core contract; implementations may use anything, as
    /// long as behavior is stable under input order for identical inputs.
    fn choose_edges(source: &Node, target: &Node) -> (EdgeSide, EdgeSide) {
        let from = source.center();
        let to = target.center();
        let dx = to.x - from.x;
        let dy = to.y - from.y;

        if dx.abs() >= dy.abs() {
            if dx >= 0 {
                (EdgeSide::East, EdgeSide::West)
            } else {
                (EdgeSide::West, EdgeSide::East)
            }
        } else if dy >= 0 {
            (EdgeSide::South, EdgeSide::North)
        } else {
            (EdgeSide::North, EdgeSide::South)
        }
    }

    /// Route every connection in input order, returning one outcome per
    /// connection in the same order.
    pub fn route_all(&self, nodes: &[Node], connections: &[Connection]) -> Vec<RoutingOutcome> {
        connections.iter().map(|conn| self.route_one(nodes, conn)).collect()
    }

    fn route_one(&self, nodes: &[Node], conn: &Connection) -> RoutingOutcome {
        let Some(source_node) = nodes.iter().find(|n| n.id == conn.from) else {
            warn!("connection {} references unknown source node {}", conn.id, conn.from);
            return RoutingOutcome::Skipped {
                connection_id: conn.id,
                reason: RoutingError::UnknownEndpoint(conn.id).to_string(),
            };
        };
        let Some(target_node) = nodes.iter().find(|n| n.id == conn.to) else {
            warn!("connection {} references unknown target node {}", conn.id, conn.to);
            return RoutingOutcome::Skipped {
                connection_id: conn.id,
                reason: RoutingError::UnknownEndpoint(conn.id).to_string(),
            };
        };

        let (source_edge, target_edge) = Self::choose_edges(source_node, target_node);

        let source_port = match self.port_manager.reserve(conn.from, source_edge, conn.id) {
            Ok(port) => port,
            Err(source) => {
                let err = RoutingError::SourcePortUnavailable { connection: conn.id, node: conn.from, source };
                warn!("{err}");
                return RoutingOutcome::Skipped { connection_id: conn.id, reason: err.to_string() };
            }
        };

        let target_port = match self.port_manager.reserve(conn.to, target_edge, conn.id) {
            Ok(port) => port,
            Err(source) => {
                self.port_manager.release(&source_port);
                let err = RoutingError::TargetPortUnavailable { connection: conn.id, node: conn.to, source };
                warn!("{err}");
                return RoutingOutcome::Skipped { connection_id: conn.id, reason: err.to_string() };
            }
        };

        let blocked = self.obstacle_manager.obstacle_func_for(nodes, conn);

        match self.pathfinder.find_path(source_port.point, target_port.point, &blocked) {
            Some(path) => {
                debug!("routed connection {} in {} cells", conn.id, path.len());
                RoutingOutcome::Routed(path)
            }
            None => {
                self.port_manager.release(&source_port);
                self.port_manager.release(&target_port);
                let err = RoutingError::NoPath { connection: conn.id };
                warn!("{err}");
                RoutingOutcome::Skipped { connection_id: conn.id, reason: err.to_string() }
            }
        }
    }
}
