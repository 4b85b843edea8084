//! Port-aware obstacle manager (spec.md §4.3): composes the static checker
//! with per-connection dynamic obstacles derived from reserved ports.
use std::sync::Arc;

use crate::config::VirtualObstacleConfig;
use crate::geometry::{EdgeSide, Point};
use crate::node::{Connection, ConnectionId, Node};
use crate::obstacle::{ObstacleZone, ObstacleZoneKind, StaticObstacleChecker, ZoneList};
use crate::port::{Port, PortManager};

/// The corridor a reserved port projects outward from its node (spec.md
/// §4.3 "Port corridor rule"). Stacked ports (`stack_level > 0`) get a
/// minimal length-1 corridor so sibling stacks don't block each other.
fn port_corridor(port: &Port, approach_zone_size: i32) -> ObstacleZone {
    let length = if port.stack_level > 0 { 1 } else { approach_zone_size.max(1) };
    let p = port.point;

    let (min_x, min_y, max_x, max_y) = match port.edge {
        EdgeSide::North => (p.x, p.y - length, p.x, p.y - 1),
        EdgeSide::South => (p.x, p.y + 1, p.x, p.y + length),
        EdgeSide::East => (p.x + 1, p.y, p.x + length, p.y),
        EdgeSide::West => (p.x - length, p.y, p.x - 1, p.y),
    };

    ObstacleZone::new(min_x, min_y, max_x, max_y, ObstacleZoneKind::Port, port.node_id)
}

/// Composes [`StaticObstacleChecker`] with the port manager's occupied-port
/// corridors to produce the per-connection blocking predicate a pathfinder
/// is handed (spec.md §4.3, §4.4).
///
/// Holds a shared handle to the port manager (no back-reference the other
/// way, per spec.md §9 "Back-references and cycles" — there is no cycle to
/// break).
#[derive(Clone)]
pub struct PortAwareObstacleManager {
    port_manager: Arc<PortManager>,
    static_checker: StaticObstacleChecker,
    config: VirtualObstacleConfig,
}

impl PortAwareObstacleManager {
    pub fn new(port_manager: Arc<PortManager>, config: VirtualObstacleConfig) -> Self {
        Self {
            port_manager,
            static_checker: StaticObstacleChecker::new(config),
            config,
        }
    }

    /// Corridor zones for every occupied port belonging to a connection
    /// other than `exclude`. The read lock is held only long enough to
    /// snapshot the occupied ports; the returned zones outlive it (spec.md
    /// §5: obstacle managers hold no locks beyond what the port manager
    /// provides for the duration of a query).
    fn other_connections_corridors(&self, exclude: ConnectionId) -> ZoneList {
        self.port_manager
            .all_occupied()
            .into_iter()
            .filter(|p| p.connection_id != Some(exclude))
            .map(|p| port_corridor(&p, self.config.approach_zone_size))
            .collect()
    }

    /// The per-connection predicate (spec.md §4.3 item 1-2): static zones
    /// scoped to `conn`'s endpoints, plus the corridors of every other
    /// connection's reserved ports.
    pub fn obstacle_func_for(&self, nodes: &[Node], conn: &Connection) -> impl Fn(Point) -> bool {
        let mut zones = self.static_checker.obstacle_zones(nodes, Some((conn.from, conn.to)));
        zones.extend(self.other_connections_corridors(conn.id));

        move |p| zones.iter().any(|z| z.contains(p))
    }

    /// The generic predicate (spec.md §4.3): every node contributes a
    /// padded physical zone (no source/target scoping), plus port
    /// corridors for every connection other than `active_conn_id`.
    pub fn obstacle_func(&self, nodes: &[Node], active_conn_id: ConnectionId) -> impl Fn(Point) -> bool {
        let mut zones = self.static_checker.obstacle_zones(nodes, None);
        zones.extend(self.other_connections_corridors(active_conn_id));

        move |p| zones.iter().any(|z| z.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::EdgeSide;
    use crate::node::Node;

    fn node(id: crate::node::NodeId, x: i32, y: i32, width: i32, height: i32) -> Node {
        Node::new(id, x, y, width, height)
    }

    #[test]
    fn scenario_c_corridor_blocks_perpendicular_crossing() {
        let nodes = vec![node(0, 0, 0, 10, 5), node(1, 30, 0, 10, 5)];
        let port_manager = Arc::new(PortManager::new(nodes.clone(), 2));
        let a = crate::node::Connection::new(0, 0, 1);

        let source_port = port_manager.reserve(0, EdgeSide::East, a.id).unwrap();

        let config = VirtualObstacleConfig { approach_zone_size: 2, ..Default::default() };
        let manager = PortAwareObstacleManager::new(port_manager, config);

        let b = crate::node::Connection::new(1, 1, 0);
        let blocked = manager.obstacle_func_for(&nodes, &b);

        let w = source_port.point.x;
        let yp = source_port.point.y;

        assert!(blocked(Point::new(w + 1, yp)));
        assert!(blocked(Point::new(w + 2, yp)));
        assert!(!blocked(Point::new(w + 1, yp + 1)));
    }

    #[test]
    fn own_connections_reserved_ports_never_self_block() {
        let nodes = vec![node(0, 0, 0, 10, 5), node(1, 30, 0, 10, 5)];
        let port_manager = Arc::new(PortManager::new(nodes.clone(), 2));
        let conn = crate::node::Connection::new(0, 0, 1);

        let source_port = port_manager.reserve(0, EdgeSide::East, conn.id).unwrap();
        let manager = PortAwareObstacleManager::new(port_manager, VirtualObstacleConfig::default());

        let blocked = manager.obstacle_func_for(&nodes, &conn);

        assert!(!blocked(Point::new(source_port.point.x + 1, source_port.point.y)));
    }

    #[test]
    fn stacked_ports_get_minimal_corridor() {
        let nodes = vec![node(0, 0, 0, 6, 3)];
        let port_manager = Arc::new(PortManager::new(nodes.clone(), 2));

        port_manager.reserve(0, EdgeSide::North, 1).unwrap();
        port_manager.reserve(0, EdgeSide::North, 2).unwrap();
        let stacked = port_manager.reserve(0, EdgeSide::North, 3).unwrap();
        assert_eq!(stacked.stack_level, 1);

        let manager = PortAwareObstacleManager::new(port_manager, VirtualObstacleConfig::default());
        let other = crate::node::Connection::new(99, 0, 0);
        let blocked = manager.obstacle_func_for(&nodes, &other);

        // Length-1 corridor: only the immediate cell outward is blocked.
        assert!(blocked(Point::new(stacked.point.x, stacked.point.y - 1)));
        assert!(!blocked(Point::new(stacked.point.x, stacked.point.y - 2)));
    }
}
