//! Geometry error type.

use ped_core::Point;
use thiserror::Error;

/// Errors produced while building or validating geometry.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("polygon ring needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),

    #[error("polygon ring has zero area")]
    ZeroArea,

    #[error("polygon ring is self-intersecting (edges {0} and {1})")]
    SelfIntersecting(usize, usize),

    #[error("polygon hole lies outside its exterior ring")]
    HoleOutsideExterior,

    #[error("polygon contains a non-finite coordinate")]
    NonFiniteCoordinate,

    #[error("geometry has no accessible area")]
    NoAccessibleArea,

    #[error("neighbourhood grid cell size must be positive and finite, got {0}")]
    InvalidCellSize(f64),

    #[error("corner clearance must be positive and finite, got {0}")]
    InvalidClearance(f64),

    #[error("point {0} is outside the accessible area")]
    NotRoutable(Point),

    #[error("no walkable route from {from} to {to}")]
    NoRoute { from: Point, to: Point },
}

pub type GeometryResult<T> = Result<T, GeometryError>;
