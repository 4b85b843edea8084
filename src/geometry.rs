//! Integer grid geometry primitives.
//!
//! Every coordinate in this crate is an `i32` grid cell; there is no
//! sub-cell precision anywhere in the routing core.
use derive_more::Display;

/// A point with integer grid coordinates.
///
/// `Ord`/`PartialOrd` (lexicographic on `(x, y)`) are derived so `Point` can
/// be used as a graph node id in [`crate::pathfinder::BfsPathfinder`]'s
/// `petgraph::graphmap::GraphMap`, which requires `NodeTrait: Copy + Ord +
/// Hash`; there is no other ordering significance to the derived impl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "({}, {})", x, y)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another point.
    pub fn manhattan_distance(&self, other: &Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// The four sides of a rectangular node a connection can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum EdgeSide {
    #[display(fmt = "N")]
    North,
    #[display(fmt = "S")]
    South,
    #[display(fmt = "E")]
    East,
    #[display(fmt = "W")]
    West,
}

impl EdgeSide {
    /// The opposite side. Involutive: `opposite(opposite(e)) == e`.
    pub const fn opposite(self) -> EdgeSide {
        match self {
            EdgeSide::North => EdgeSide::South,
            EdgeSide::South => EdgeSide::North,
            EdgeSide::East => EdgeSide::West,
            EdgeSide::West => EdgeSide::East,
        }
    }

    /// `true` for the two sides whose length runs along the node's width.
    pub const fn is_horizontal_edge(self) -> bool {
        matches!(self, EdgeSide::North | EdgeSide::South)
    }

    pub const fn all() -> [EdgeSide; 4] {
        [EdgeSide::North, EdgeSide::South, EdgeSide::East, EdgeSide::West]
    }
}

/// A half-open rectangle: `p in B <=> minX <= p.x < maxX && minY <= p.y < maxY`.
///
/// Contrast with [`crate::obstacle::ObstacleZone`], which uses fully-closed
/// bound semantics. The two are deliberately different types so the two
/// membership tests can never be confused at a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    pub fn contains(&self, p: Point) -> bool {
        self.min_x <= p.x && p.x < self.max_x && self.min_y <= p.y && p.y < self.max_y
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    /// Grow the bounds by `margin` on every side.
    pub fn padded(&self, margin: i32) -> Bounds {
        Bounds::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_side_opposite_is_involution() {
        for side in EdgeSide::all() {
            assert_eq!(side.opposite().opposite(), side);
            assert_ne!(side.opposite(), side);
        }
    }

    #[test]
    fn edge_side_orientation() {
        assert!(EdgeSide::North.is_horizontal_edge());
        assert!(EdgeSide::South.is_horizontal_edge());
        assert!(!EdgeSide::East.is_horizontal_edge());
        assert!(!EdgeSide::West.is_horizontal_edge());
    }

    #[test]
    fn bounds_are_half_open() {
        let b = Bounds::new(0, 0, 10, 5);

        assert!(b.contains(Point::new(0, 0)));
        assert!(b.contains(Point::new(9, 4)));
        assert!(!b.contains(Point::new(10, 4)));
        assert!(!b.contains(Point::new(9, 5)));
    }

    #[test]
    fn bounds_padded_grows_all_sides() {
        let b = Bounds::new(0, 0, 10, 5).padded(2);

        assert_eq!(b, Bounds::new(-2, -2, 12, 7));
    }

    #[test]
    fn point_manhattan_distance() {
        let a = Point::new(-1, -1);
        let b = Point::new(2, 3);

        assert_eq!(a.manhattan_distance(&b), 3 + 4);
        assert_eq!(a.manhattan_distance(&b), b.manhattan_distance(&a));
    }
}
