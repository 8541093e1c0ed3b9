//! Output of one model step for one agent.

use ped_agent::Agent;
use ped_core::Point;

/// New kinematic state for one agent, computed in the read phase and
/// written back in the commit phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentUpdate {
    pub position:          Point,
    pub velocity:          Point,
    pub orientation:       Point,
    pub desired_direction: Point,
    pub interaction:       Point,
}

impl AgentUpdate {
    /// Write this update into `agent`.
    #[inline]
    pub fn apply(&self, agent: &mut Agent) {
        agent.position = self.position;
        agent.velocity = self.velocity;
        agent.orientation = self.orientation;
        agent.desired_direction = self.desired_direction;
        agent.interaction = self.interaction;
    }

    /// `true` if every component is finite.  A non-finite update means the
    /// step diverged and the agent cannot be kept.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.orientation.is_finite()
    }
}
