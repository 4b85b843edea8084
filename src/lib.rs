//! `boxwire`: the connection routing core for a text/terminal diagram
//! renderer.
//!
//! Given a set of rectangular [`Node`]s placed on an integer grid by an
//! external layout engine, and a set of directed [`Connection`]s between
//! them, this crate chooses an edge-attachment [`port::Port`] on each
//! endpoint and builds the per-connection obstacle predicate an external
//! [`pathfinder::Pathfinder`] needs to find a non-crossing orthogonal path.
//!
//! Node layout, the pathfinder's search algorithm, canvas rasterization,
//! and diagram persistence are all out of scope here — this crate only
//! owns the routing core: port allocation (with a stacking fallback), the
//! dynamic obstacle model, and the contract between them.
pub mod config;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod node;
pub mod obstacle;
pub mod path;
pub mod pathfinder;
pub mod port;
pub mod port_obstacle;
pub mod routing;

pub use config::{VirtualObstacleConfig, VirtualObstacleConfigBuilder};
pub use error::{PortManagerError, RoutingError};
pub use geometry::{Bounds, EdgeSide, Point};
pub use ids::assign_connection_ids;
pub use node::{Connection, ConnectionId, Node, NodeId};
pub use obstacle::{ObstacleZone, ObstacleZoneKind, StaticObstacleChecker};
pub use path::Path;
pub use pathfinder::{BfsPathfinder, Pathfinder};
pub use port::{Port, PortKey, PortManager};
pub use port_obstacle::PortAwareObstacleManager;
pub use routing::{RoutingDriver, RoutingOutcome};
