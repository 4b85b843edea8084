//! Port manager (spec.md §4.2): authoritative registry of which
//! `(node, edge, position)` slots are free, occupied, or stacked.
use std::collections::HashMap;
use std::sync::RwLock;

use derive_more::Display;
use log::debug;

use crate::error::PortManagerError;
use crate::geometry::{EdgeSide, Point};
use crate::node::{ConnectionId, Node, NodeId};

/// Structured, hashable key for a port slot (spec.md §9 "Key encoding for
/// ports" — a tuple record in place of string-formatted
/// `"nodeID-edge-position"` keys). Primary slots always carry
/// `stack_level == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{}/{}@{}#{}", node_id, edge, position, stack_level)]
pub struct PortKey {
    pub node_id: NodeId,
    pub edge: EdgeSide,
    pub position: i32,
    pub stack_level: u32,
}

impl PortKey {
    pub const fn new(node_id: NodeId, edge: EdgeSide, position: i32, stack_level: u32) -> Self {
        Self { node_id, edge, position, stack_level }
    }
}

/// A reserved (or previously-reserved, now free) attachment point on a
/// node's edge (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Port {
    pub node_id: NodeId,
    pub edge: EdgeSide,
    pub position: i32,
    pub width: i32,
    pub point: Point,
    pub stack_level: u32,
    /// `None` means free; `Some(id)` means reserved by connection `id`.
    /// Spec.md §3 models this as an integer with `-1` meaning free; using
    /// `Option<ConnectionId>` is the idiomatic equivalent for a rewrite that
    /// no longer needs a sentinel value.
    pub connection_id: Option<ConnectionId>,
}

impl Port {
    fn key(&self) -> PortKey {
        PortKey::new(self.node_id, self.edge, self.position, self.stack_level)
    }
}

/// Allocates unique approach points per `(node, edge)` slot, falling back to
/// stacking when a slot's candidate positions are saturated (spec.md §4.2).
///
/// All mutating operations (`reserve`, `release`) take the write side of a
/// single reader/writer lock; all queries take the read side, matching
/// spec.md §5's concurrency model.
#[derive(Debug)]
pub struct PortManager {
    port_width: i32,
    nodes: HashMap<NodeId, Node>,
    ports: RwLock<HashMap<PortKey, Port>>,
}

impl PortManager {
    /// `nodes` is consumed as a snapshot (spec.md §3 Lifecycles: nodes are
    /// immutable for the lifetime of routing); `port_width` is the step
    /// shared by every port this manager allocates.
    pub fn new(nodes: Vec<Node>, port_width: i32) -> Self {
        Self {
            port_width,
            nodes: nodes.into_iter().map(|n| (n.id, n)).collect(),
            ports: RwLock::new(HashMap::new()),
        }
    }

    /// Admissible offsets along `edge`: `{margin, margin+step, ...}` with
    /// `margin = 1`, strictly less than `edge_length - margin`.
    fn candidate_positions(&self, node: &Node, edge: EdgeSide) -> Vec<i32> {
        let edge_length = node.edge_length(edge);
        let margin = 1;
        let mut positions = Vec::new();
        let mut pos = margin;

        while pos < edge_length - margin {
            positions.push(pos);
            pos += self.port_width;
        }

        positions
    }

    fn approach_point(node: &Node, edge: EdgeSide, position: i32) -> Point {
        match edge {
            EdgeSide::North => Point::new(node.x + position, node.y - 1),
            EdgeSide::South => Point::new(node.x + position, node.y + node.height),
            EdgeSide::East => Point::new(node.x + node.width, node.y + position),
            EdgeSide::West => Point::new(node.x - 1, node.y + position),
        }
    }

    /// Perturb a primary approach point for a stacked port (spec.md §4.2
    /// "Stacked approach point").
    fn stacked_point(node: &Node, edge: EdgeSide, base: Point, stack_level: u32) -> Point {
        let direction = if stack_level % 2 == 0 { 1 } else { -1 };
        let offset = ((stack_level + 1) / 2) as i32;
        let shift = direction * offset;

        if edge.is_horizontal_edge() {
            let x = (base.x + shift).clamp(node.x - 2, node.x + node.width + 1);
            Point::new(x, base.y)
        } else {
            let y = (base.y + shift).clamp(node.y - 2, node.y + node.height + 1);
            Point::new(base.x, y)
        }
    }

    fn node(&self, node_id: NodeId) -> Result<&Node, PortManagerError> {
        self.nodes.get(&node_id).ok_or(PortManagerError::UnknownNode(node_id))
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<PortKey, Port>>, PortManagerError> {
        self.ports.read().map_err(|_| PortManagerError::Poisoned)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<PortKey, Port>>, PortManagerError> {
        self.ports.write().map_err(|_| PortManagerError::Poisoned)
    }

    /// Reserve a port on `edge` of `node_id` for `connection_id` (spec.md
    /// §4.2 "Reservation contract").
    pub fn reserve(
        &self,
        node_id: NodeId,
        edge: EdgeSide,
        connection_id: ConnectionId,
    ) -> Result<Port, PortManagerError> {
        let node = self.node(node_id)?;
        let candidates = self.candidate_positions(node, edge);

        if candidates.is_empty() {
            return Err(PortManagerError::NoPortsAvailable { node: node_id, edge });
        }

        let center = node.edge_length(edge) / 2;
        let mut ports = self.write()?;

        // Primary slot: the free candidate position closest to the edge's
        // center, ties broken by lowest position.
        let primary = candidates
            .iter()
            .copied()
            .filter(|&pos| {
                let key = PortKey::new(node_id, edge, pos, 0);
                ports.get(&key).map_or(true, |p| p.connection_id.is_none())
            })
            .min_by_key(|&pos| ((pos - center).abs(), pos));

        if let Some(position) = primary {
            let point = Self::approach_point(node, edge, position);
            let port = Port {
                node_id,
                edge,
                position,
                width: self.port_width,
                point,
                stack_level: 0,
                connection_id: Some(connection_id),
            };
            ports.insert(port.key(), port);
            return Ok(port);
        }

        // Saturated: stack. For each candidate position, the next stack
        // level is the current max stack_level stored for that position,
        // plus one (spec.md §4.2 step 3) — a monotonically increasing
        // counter that never reuses a level vacated by `release`, since
        // `release` never deletes the stored port it frees. Pick the
        // position whose next level is smallest, ties broken by proximity
        // to center.
        let choice = candidates
            .iter()
            .copied()
            .map(|pos| {
                let max_level = ports
                    .keys()
                    .filter(|k| k.node_id == node_id && k.edge == edge && k.position == pos)
                    .map(|k| k.stack_level)
                    .max();
                let next_level = max_level.map_or(0, |lvl| lvl + 1);
                (pos, next_level)
            })
            .min_by_key(|&(pos, level)| (level, (pos - center).abs(), pos));

        let (position, stack_level) = choice.ok_or(PortManagerError::NoPortsAvailable { node: node_id, edge })?;

        let base = Self::approach_point(node, edge, position);
        let point = if stack_level == 0 {
            base
        } else {
            Self::stacked_point(node, edge, base, stack_level)
        };

        debug!(
            "node {node_id} {edge} position {position} saturated; stacking connection {connection_id} at level {stack_level}"
        );

        let port = Port {
            node_id,
            edge,
            position,
            width: self.port_width,
            point,
            stack_level,
            connection_id: Some(connection_id),
        };
        ports.insert(port.key(), port);
        Ok(port)
    }

    /// Release `port`, idempotently. Never fails (spec.md §5 Cancellation):
    /// releasing an already-free or unknown port is a no-op.
    pub fn release(&self, port: &Port) {
        if let Ok(mut ports) = self.write() {
            if let Some(stored) = ports.get_mut(&port.key()) {
                stored.connection_id = None;
            }
        }
    }

    /// Free primary-slot positions on `edge` of `node_id`.
    pub fn available(&self, node_id: NodeId, edge: EdgeSide) -> Result<Vec<i32>, PortManagerError> {
        let node = self.node(node_id)?;
        let candidates = self.candidate_positions(node, edge);
        let ports = self.read()?;

        Ok(candidates
            .into_iter()
            .filter(|&pos| {
                let key = PortKey::new(node_id, edge, pos, 0);
                ports.get(&key).map_or(true, |p| p.connection_id.is_none())
            })
            .collect())
    }

    /// All currently-occupied ports belonging to `node_id`, any edge.
    pub fn occupied(&self, node_id: NodeId) -> Vec<Port> {
        self.read()
            .map(|ports| {
                ports
                    .values()
                    .filter(|p| p.node_id == node_id && p.connection_id.is_some())
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All currently-occupied ports across every node this manager owns.
    pub fn all_occupied(&self) -> Vec<Port> {
        self.read()
            .map(|ports| ports.values().filter(|p| p.connection_id.is_some()).copied().collect())
            .unwrap_or_default()
    }

    pub fn is_occupied(&self, port: &Port) -> bool {
        self.read()
            .ok()
            .and_then(|ports| ports.get(&port.key()).map(|p| p.connection_id.is_some()))
            .unwrap_or(false)
    }

    pub fn port_for_connection(&self, node_id: NodeId, connection_id: ConnectionId) -> Option<Port> {
        self.read().ok().and_then(|ports| {
            ports
                .values()
                .find(|p| p.node_id == node_id && p.connection_id == Some(connection_id))
                .copied()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: NodeId, x: i32, y: i32, width: i32, height: i32) -> Node {
        Node::new(id, x, y, width, height)
    }

    #[test]
    fn reserve_returns_approach_point_one_cell_outside_node() {
        let manager = PortManager::new(vec![node(0, 0, 0, 10, 5)], 2);
        let port = manager.reserve(0, EdgeSide::East, 1).unwrap();

        assert_eq!(port.stack_level, 0);
        assert_eq!(port.point, Point::new(10, port.position));
    }

    #[test]
    fn scenario_a_minimal_two_node_flow() {
        // spec.md §8 Scenario A describes the expected position as "2", but
        // that value is not a member of the candidate set produced by the
        // stated `{margin, margin+step, ...}` formula for a height-5 edge
        // with port_width=2 ({1, 3}); position 1 is the candidate nearest
        // the center (2) with ties broken toward the lower position,
        // consistent with Scenarios B and E (see DESIGN.md).
        let nodes = vec![node(0, 0, 0, 10, 5), node(1, 30, 0, 10, 5)];
        let manager = PortManager::new(nodes, 2);

        let source = manager.reserve(0, EdgeSide::East, 0).unwrap();
        let target = manager.reserve(1, EdgeSide::West, 0).unwrap();

        assert_eq!(source.position, 1);
        assert_eq!(source.point, Point::new(10, 1));
        assert_eq!(target.position, 1);
        assert_eq!(target.point, Point::new(29, 1));
    }

    #[test]
    fn scenario_b_saturation_forces_stacking() {
        let manager = PortManager::new(vec![node(0, 0, 0, 6, 3)], 2);

        assert_eq!(manager.candidate_positions(manager.node(0).unwrap(), EdgeSide::North), vec![1, 3]);

        // Edge center is 6/2 = 3, which is itself a candidate position
        // (distance 0), so the first reservation claims it outright; the
        // second reservation gets the only remaining primary slot, 1
        // (distance 2). The third must stack: both positions now have a
        // next stack level of 1, tied, so the tie is broken toward the
        // position nearer the center (3, distance 0, beats 1, distance 2).
        let a = manager.reserve(0, EdgeSide::North, 1).unwrap();
        let b = manager.reserve(0, EdgeSide::North, 2).unwrap();
        let c = manager.reserve(0, EdgeSide::North, 3).unwrap();

        assert_eq!((a.position, a.stack_level), (3, 0));
        assert_eq!((b.position, b.stack_level), (1, 0));
        assert_eq!(c.stack_level, 1);
        assert_eq!(c.position, 3);
        assert_eq!(c.point.x, a.point.x - 1);
    }

    #[test]
    fn released_stack_level_is_never_reused_stack_level_only_climbs() {
        // spec.md §4.2 step 3: the next stack level is the current max
        // stack_level stored for a position, plus one — a counter that
        // only ever climbs, independent of whether earlier stacked slots
        // have since been released. Uses a node with exactly one candidate
        // position (Scenario E's 3x3/port_width=2 shape) so every
        // reservation after the first is forced to stack on that same
        // position, isolating the climb from any cross-position tie-break.
        let manager = PortManager::new(vec![node(0, 0, 0, 3, 3)], 2);

        manager.reserve(0, EdgeSide::North, 1).unwrap();
        let first_stacked = manager.reserve(0, EdgeSide::North, 2).unwrap();
        assert_eq!(first_stacked.stack_level, 1);
        let second_stacked = manager.reserve(0, EdgeSide::North, 3).unwrap();
        assert_eq!(second_stacked.stack_level, 2);

        manager.release(&second_stacked);

        let third_stacked = manager.reserve(0, EdgeSide::North, 4).unwrap();
        assert_eq!(third_stacked.position, first_stacked.position);
        assert_eq!(third_stacked.stack_level, 3, "must climb past the released level 2, not reuse it");
    }

    #[test]
    fn release_then_reserve_reuses_same_position() {
        let manager = PortManager::new(vec![node(0, 0, 0, 10, 5)], 2);

        let first = manager.reserve(0, EdgeSide::East, 1).unwrap();
        manager.release(&first);
        let second = manager.reserve(0, EdgeSide::East, 2).unwrap();

        assert_eq!(first.position, second.position);
    }

    #[test]
    fn consecutive_reserves_without_release_return_distinct_slots() {
        let manager = PortManager::new(vec![node(0, 0, 0, 20, 5)], 2);

        let a = manager.reserve(0, EdgeSide::North, 1).unwrap();
        let b = manager.reserve(0, EdgeSide::North, 2).unwrap();

        assert_ne!((a.position, a.stack_level), (b.position, b.stack_level));
    }

    #[test]
    fn available_plus_occupied_equals_candidate_count() {
        let manager = PortManager::new(vec![node(0, 0, 0, 20, 5)], 2);
        let candidates = manager.candidate_positions(manager.node(0).unwrap(), EdgeSide::North).len();

        manager.reserve(0, EdgeSide::North, 1).unwrap();
        manager.reserve(0, EdgeSide::North, 2).unwrap();

        let available = manager.available(0, EdgeSide::North).unwrap().len();
        let occupied = manager.occupied(0).iter().filter(|p| p.edge == EdgeSide::North).count();

        assert_eq!(available + occupied, candidates);
    }

    #[test]
    fn after_release_all_occupied_is_empty() {
        let manager = PortManager::new(vec![node(0, 0, 0, 10, 5)], 2);
        let port = manager.reserve(0, EdgeSide::East, 1).unwrap();

        manager.release(&port);

        assert!(manager.occupied(0).is_empty());
    }

    #[test]
    fn release_of_already_free_port_is_a_no_op() {
        let manager = PortManager::new(vec![node(0, 0, 0, 10, 5)], 2);
        let port = manager.reserve(0, EdgeSide::East, 1).unwrap();

        manager.release(&port);
        manager.release(&port);

        assert!(manager.occupied(0).is_empty());
    }

    #[test]
    fn scenario_e_small_node_has_one_candidate() {
        let manager = PortManager::new(vec![node(0, 0, 0, 3, 3)], 2);

        assert_eq!(manager.available(0, EdgeSide::North).unwrap().len(), 1);
    }

    #[test]
    fn reserve_on_unknown_node_fails() {
        let manager = PortManager::new(vec![node(0, 0, 0, 10, 5)], 2);

        assert!(matches!(
            manager.reserve(99, EdgeSide::North, 1),
            Err(PortManagerError::UnknownNode(99))
        ));
    }

    #[test]
    fn node_too_small_for_any_port_fails_even_when_stacking() {
        let manager = PortManager::new(vec![node(0, 0, 0, 2, 2)], 2);

        assert!(matches!(
            manager.reserve(0, EdgeSide::North, 1),
            Err(PortManagerError::NoPortsAvailable { .. })
        ));
    }
}
