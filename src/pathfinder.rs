//! The pathfinder contract spec.md §4.4 hands to an external collaborator,
//! plus a reference implementation used by this crate's own tests and the
//! `route` smoke binary.
//!
//! The search algorithm itself is explicitly out of scope for the routing
//! core (spec.md §1); [`BfsPathfinder`] exists only so the contract is
//! exercisable end to end without a real layout/pathfinding stack.
use fixedbitset::FixedBitSet;
use petgraph::algo;
use petgraph::graphmap::UnGraphMap;

use crate::geometry::Point;
use crate::path::Path;

/// What the routing driver hands an external pathfinder: two approach
/// points and an opaque blocking predicate (spec.md §4.4). The pathfinder
/// returns an orthogonal, 4-connected path whose interior points all
/// satisfy `!blocked`, or `None` if no such path exists.
pub trait Pathfinder {
    fn find_path(&self, start: Point, end: Point, blocked: &dyn Fn(Point) -> bool) -> Option<Path>;
}

/// A reference breadth-first/A* search over a bounded window of the grid
/// around `start`/`end`. Not performance-tuned; it exists to make
/// [`Pathfinder`] testable, not to be the routing core's real search
/// algorithm (spec.md Non-goals keep pathfinding external).
#[derive(Debug, Clone, Copy)]
pub struct BfsPathfinder {
    /// Extra cells of search room beyond the bounding box of `start`/`end`,
    /// so a detour around an obstacle sitting just outside that box is
    /// still reachable.
    margin: i32,
}

impl BfsPathfinder {
    pub fn new() -> Self {
        Self { margin: 6 }
    }

    pub fn with_margin(margin: i32) -> Self {
        Self { margin }
    }
}

impl Default for BfsPathfinder {
    fn default() -> Self {
        Self::new()
    }
}

impl Pathfinder for BfsPathfinder {
    fn find_path(&self, start: Point, end: Point, blocked: &dyn Fn(Point) -> bool) -> Option<Path> {
        let min_x = start.x.min(end.x) - self.margin;
        let max_x = start.x.max(end.x) + self.margin;
        let min_y = start.y.min(end.y) - self.margin;
        let max_y = start.y.max(end.y) + self.margin;

        let width = (max_x - min_x + 1).max(1) as usize;
        let height = (max_y - min_y + 1).max(1) as usize;
        let index = |p: Point| -> usize { ((p.y - min_y) as usize) * width + (p.x - min_x) as usize };

        // Mark every reachable (non-blocked) cell in the search window with
        // a `FixedBitSet` sized to the search window.
        let mut reachable = FixedBitSet::with_capacity(width * height);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point::new(x, y);
                if p == start || p == end || !blocked(p) {
                    reachable.insert(index(p));
                }
            }
        }

        if !reachable.contains(index(start)) || !reachable.contains(index(end)) {
            return None;
        }

        let mut graph: UnGraphMap<Point, u32> = UnGraphMap::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point::new(x, y);
                if !reachable.contains(index(p)) {
                    continue;
                }
                graph.add_node(p);

                for (dx, dy) in [(1, 0), (0, 1)] {
                    let q = Point::new(p.x + dx, p.y + dy);
                    if q.x <= max_x && q.y <= max_y && reachable.contains(index(q)) {
                        graph.add_edge(p, q, 1);
                    }
                }
            }
        }

        let (cost, points) = algo::astar(
            &graph,
            start,
            |n| n == end,
            |edge| *edge.2,
            |n| n.manhattan_distance(&end),
        )?;

        Some(Path::new(points, cost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_corridor_is_found() {
        let pathfinder = BfsPathfinder::new();
        let path = pathfinder
            .find_path(Point::new(0, 0), Point::new(5, 0), &|_| false)
            .expect("path");

        assert_eq!(path.points().first().copied(), Some(Point::new(0, 0)));
        assert_eq!(path.points().last().copied(), Some(Point::new(5, 0)));
        assert_eq!(path.cost, 5);
    }

    #[test]
    fn detours_around_a_blocking_wall() {
        let pathfinder = BfsPathfinder::new();
        // A wall across y=0 from x=2..=2, except a gap at y=1, forces a detour.
        let blocked = |p: Point| p.x == 2 && p.y == 0;

        let path = pathfinder
            .find_path(Point::new(0, 0), Point::new(4, 0), &blocked)
            .expect("path exists via detour");

        assert!(!path.points().iter().any(|&p| blocked(p)));
    }

    #[test]
    fn no_path_when_fully_enclosed() {
        let pathfinder = BfsPathfinder::with_margin(3);
        let blocked = |p: Point| p.x == 2;

        assert!(pathfinder.find_path(Point::new(0, 0), Point::new(5, 0), &blocked).is_none());
    }
}
