//! Read-only inputs shared by every agent's model step.

use ped_core::Point;
use ped_spatial::Geometry;

/// Snapshot passed to [`PedestrianModel::compute_update`][crate::PedestrianModel::compute_update].
///
/// Built once per iteration by the simulation and shared immutably by all
/// (possibly parallel) model evaluations.
#[derive(Clone, Copy)]
pub struct StepContext<'a> {
    /// Fixed step length in seconds.
    pub dt: f64,
    pub geometry: &'a Geometry,
}

impl<'a> StepContext<'a> {
    #[inline]
    pub fn new(dt: f64, geometry: &'a Geometry) -> Self {
        Self { dt, geometry }
    }

    /// `true` if no wall lies on the straight line between `a` and `b`.
    /// Neighbours behind a wall do not interact.
    #[inline]
    pub fn can_see(&self, a: Point, b: Point) -> bool {
        self.geometry.line_of_sight(a, b)
    }
}
