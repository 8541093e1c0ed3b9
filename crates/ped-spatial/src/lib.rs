//! `ped-spatial` — accessible-area geometry, wall index, and neighbour grid.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`segment`]  | `LineSegment` — closest point, distance, intersection tests |
//! | [`polygon`]  | `Polygon` — validated ring with holes                       |
//! | [`geometry`] | `Geometry` (area + R-tree of walls), `GeometryBuilder`      |
//! | [`grid`]     | `NeighborhoodGrid` — uniform hash grid over agent positions |
//! | [`routing`]  | `Route`, corner visibility graph behind `Geometry::route`   |
//! | [`error`]    | `GeometryError`, `GeometryResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on segments.               |

pub mod error;
pub mod geometry;
pub mod grid;
pub mod polygon;
pub mod routing;
pub mod segment;

#[cfg(test)]
mod tests;

pub use error::{GeometryError, GeometryResult};
pub use geometry::{Geometry, GeometryBuilder};
pub use grid::NeighborhoodGrid;
pub use polygon::Polygon;
pub use routing::{DEFAULT_CORNER_CLEARANCE, Route};
pub use segment::LineSegment;

/// Absolute tolerance for geometric predicates, in metres.
pub const GEOMETRY_EPS: f64 = 1e-9;
