//! Static obstacle checker (spec.md §4.1).
//!
//! Materializes an obstacle zone list from a node snapshot and an optional
//! `(source, target)` pair, and compiles it into a pure point-blocking
//! predicate.
use derive_more::Display;
use smallvec::SmallVec;

use crate::config::VirtualObstacleConfig;
use crate::geometry::Point;
use crate::node::{Node, NodeId};

/// The three zone-type tags from spec.md §9, modeled as a closed
/// enumeration rather than loose string tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ObstacleZoneKind {
    #[display(fmt = "physical")]
    Physical,
    #[display(fmt = "virtual")]
    Virtual,
    #[display(fmt = "port")]
    Port,
}

/// An axis-aligned rectangle with **inclusive** bounds on both ends,
/// tagged with the reason it exists.
///
/// Contrast with [`crate::geometry::Bounds`], which is half-open. A point
/// `p` is inside the zone iff `minX <= p.x <= maxX && minY <= p.y <= maxY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleZone {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
    pub kind: ObstacleZoneKind,
    pub node_id: NodeId,
}

impl ObstacleZone {
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32, kind: ObstacleZoneKind, node_id: NodeId) -> Self {
        Self { min_x, min_y, max_x, max_y, kind, node_id }
    }

    pub fn contains(&self, p: Point) -> bool {
        self.min_x <= p.x && p.x <= self.max_x && self.min_y <= p.y && p.y <= self.max_y
    }
}

/// Most diagrams have only a handful of zones live for any one query; the
/// inline capacity avoids a heap allocation in the common case.
pub type ZoneList = SmallVec<[ObstacleZone; 16]>;

/// Builds the static obstacle zone list and blocking predicate described in
/// spec.md §4.1.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticObstacleChecker {
    config: VirtualObstacleConfig,
}

impl StaticObstacleChecker {
    pub fn new(config: VirtualObstacleConfig) -> Self {
        Self { config }
    }

    /// Materialize the obstacle zone list for the given node snapshot.
    ///
    /// When `endpoints` is `Some((source_id, target_id))`, those two nodes
    /// get only an interior physical zone (permitting a path to attach at
    /// the one-unit strip around them); every other node gets a physical
    /// zone padded by one unit on all sides, and optionally a set of
    /// virtual approach zones when [`VirtualObstacleConfig::emit_virtual_side_zones`]
    /// is set.
    pub fn obstacle_zones(&self, nodes: &[Node], endpoints: Option<(NodeId, NodeId)>) -> ZoneList {
        let mut zones = ZoneList::new();

        for node in nodes {
            let is_source = endpoints.map_or(false, |(s, _)| s == node.id);
            let is_target = endpoints.map_or(false, |(_, t)| t == node.id);

            if is_source || is_target {
                zones.push(Self::interior_zone(node));

                if self.config.emit_virtual_side_zones && self.config.approach_zone_size > 1 {
                    let enabled = (is_source && self.config.enable_for_source)
                        || (is_target && self.config.enable_for_target);

                    if enabled {
                        let size = Self::scaled_zone_size(&self.config);
                        zones.extend(Self::virtual_side_zones(node, size, self.config.corner_radius));
                    }
                }
            } else {
                zones.push(Self::padded_zone(node));

                if self.config.emit_virtual_side_zones && self.config.approach_zone_size > 1 {
                    zones.extend(Self::virtual_side_zones(
                        node,
                        self.config.approach_zone_size,
                        self.config.corner_radius,
                    ));
                }
            }
        }

        zones
    }

    /// Build a pure predicate over the given node snapshot. The returned
    /// closure owns a materialized zone list, so evaluating it costs
    /// `O(zones)` and never touches `nodes` again.
    pub fn obstacle_predicate(
        &self,
        nodes: &[Node],
        endpoints: Option<(NodeId, NodeId)>,
    ) -> impl Fn(Point) -> bool {
        let zones = self.obstacle_zones(nodes, endpoints);

        move |p| zones.iter().any(|z| z.contains(p))
    }

    fn interior_zone(node: &Node) -> ObstacleZone {
        ObstacleZone::new(
            node.x,
            node.y,
            node.x + node.width - 1,
            node.y + node.height - 1,
            ObstacleZoneKind::Physical,
            node.id,
        )
    }

    fn padded_zone(node: &Node) -> ObstacleZone {
        ObstacleZone::new(
            node.x - 1,
            node.y - 1,
            node.x + node.width,
            node.y + node.height,
            ObstacleZoneKind::Physical,
            node.id,
        )
    }

    fn scaled_zone_size(config: &VirtualObstacleConfig) -> i32 {
        ((config.approach_zone_size * config.source_target_scale_percent) / 100).max(1)
    }

    /// Four-side virtual approach zones, clearing `corner_radius` cells at
    /// each end of a side so a corner approach remains feasible. This is
    /// the non-minimal strategy from spec.md §9's Open Question; it is
    /// only reachable via [`VirtualObstacleConfig::emit_virtual_side_zones`].
    fn virtual_side_zones(node: &Node, size: i32, corner_radius: i32) -> ZoneList {
        let mut zones = ZoneList::new();
        let clearance = corner_radius.min((node.width - 1).max(0) / 2);
        let clearance_v = corner_radius.min((node.height - 1).max(0) / 2);

        if node.width - 2 * clearance > 0 {
            // North
            zones.push(ObstacleZone::new(
                node.x + clearance,
                node.y - size,
                node.x + node.width - 1 - clearance,
                node.y - 1,
                ObstacleZoneKind::Virtual,
                node.id,
            ));
            // South
            zones.push(ObstacleZone::new(
                node.x + clearance,
                node.y + node.height,
                node.x + node.width - 1 - clearance,
                node.y + node.height + size - 1,
                ObstacleZoneKind::Virtual,
                node.id,
            ));
        }

        if node.height - 2 * clearance_v > 0 {
            // East
            zones.push(ObstacleZone::new(
                node.x + node.width,
                node.y + clearance_v,
                node.x + node.width + size - 1,
                node.y + node.height - 1 - clearance_v,
                ObstacleZoneKind::Virtual,
                node.id,
            ));
            // West
            zones.push(ObstacleZone::new(
                node.x - size,
                node.y + clearance_v,
                node.x - 1,
                node.y + node.height - 1 - clearance_v,
                ObstacleZoneKind::Virtual,
                node.id,
            ));
        }

        zones
    }
}
