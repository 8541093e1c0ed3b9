//! The per-agent record.

use ped_core::{AgentId, JourneyId, Point, ProfileId, StageId};

/// Mutable state of one pedestrian.
///
/// Everything the operational models read or write lives here, so a model
/// step is a pure function of `(&Agent, neighbours, geometry) -> update`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id: AgentId,

    pub position:    Point,
    pub velocity:    Point,
    /// Unit heading.  Starts as the caller-supplied orientation.
    pub orientation: Point,

    pub profile: ProfileId,
    pub journey: JourneyId,
    /// Cursor into the journey graph.
    pub stage:   StageId,
    /// Target point of the current stage, refreshed at the start of every
    /// iteration.
    pub waypoint: Point,
    /// Point the agent is steering at now: the next corner of the walking
    /// route to `waypoint`, or `waypoint` itself when it is in sight.
    pub target:  Point,
    /// Number of stage changes so far.  Also numbers the agent's random
    /// branch decisions.
    pub stage_changes: u64,

    /// Relaxed desired direction (the `e0` term of both models).
    pub desired_direction: Point,
    /// Sum of neighbour and wall interaction terms from the last step.
    /// Kept for inspection; models recompute it every step.
    pub interaction: Point,
}

impl Agent {
    /// A resting agent at `position`.  The id is assigned by
    /// [`AgentStore::add`](crate::AgentStore::add).
    pub fn new(
        profile: ProfileId,
        journey: JourneyId,
        stage: StageId,
        position: Point,
        orientation: Point,
    ) -> Self {
        let heading = orientation.normalized();
        Self {
            id: AgentId::INVALID,
            position,
            velocity: Point::ZERO,
            orientation: heading,
            profile,
            journey,
            stage,
            waypoint: position,
            target: position,
            stage_changes: 0,
            desired_direction: heading,
            interaction: Point::ZERO,
        }
    }

    /// Current speed in m/s.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}
