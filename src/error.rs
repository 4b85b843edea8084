//! Error kinds surfaced by the routing core (spec.md §7).
use thiserror::Error;

use crate::geometry::EdgeSide;
use crate::node::{ConnectionId, NodeId};

/// Failures from [`crate::port::PortManager`] reservation and release.
#[derive(Error, Debug)]
pub enum PortManagerError {
    #[error("unknown node `{0}`")]
    UnknownNode(NodeId),
    #[error("no ports available on {edge} of node `{node}` for stacking")]
    NoPortsAvailable { node: NodeId, edge: EdgeSide },
    #[error("port manager lock was poisoned by a panicking reader or writer")]
    Poisoned,
}

/// Failures reported by the routing driver (spec.md §4.4, §7).
///
/// `NoPath` is never raised by the core itself; it is propagated from the
/// external pathfinder's failure to find a route under the given predicate.
#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("could not reserve a source port for connection {connection} on node {node}: {source}")]
    SourcePortUnavailable {
        connection: ConnectionId,
        node: NodeId,
        #[source]
        source: PortManagerError,
    },
    #[error("could not reserve a target port for connection {connection} on node {node}: {source}")]
    TargetPortUnavailable {
        connection: ConnectionId,
        node: NodeId,
        #[source]
        source: PortManagerError,
    },
    #[error("no path found for connection {connection}")]
    NoPath { connection: ConnectionId },
    #[error("connection {0} references an unknown node")]
    UnknownEndpoint(ConnectionId),
}
