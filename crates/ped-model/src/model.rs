//! The `PedestrianModel` trait and the `OperationalModel` tagged enum.

use ped_agent::Agent;
use ped_core::{Point, ProfileId};

use crate::{
    AgentUpdate, CollisionFreeSpeedModel, ModelResult, SocialForceModel, StepContext,
};

/// Largest exponent fed to `exp` in repulsion terms.  Keeps forces finite
/// when two bodies (or a body and a wall) overlap deeply.
pub(crate) const MAX_EXPONENT: f64 = 50.0;

/// Distances below this are treated as coincident; no direction can be
/// derived so the pair contributes nothing.
pub(crate) const DIST_EPS: f64 = 1e-8;

/// Agents closer than this to their target stop turning towards it.
pub(crate) const GOAL_EPS: f64 = 1e-3;

/// `exp(x)` with `x` clamped to [`MAX_EXPONENT`].
#[inline]
pub(crate) fn clamped_exp(x: f64) -> f64 {
    x.min(MAX_EXPONENT).exp()
}

/// Share of a neighbour's repulsion that turns into a sideways push.
pub(crate) const SIDESTEP_SHARE: f64 = 0.5;

/// Sideways push from a neighbour ahead of an agent walking along `heading`.
///
/// `towards` is the unit vector from the agent to the neighbour and
/// `strength` the size of the neighbour's repulsion.  The push is scaled by
/// how frontal the encounter is and points away from the neighbour's side of
/// the heading line.  A neighbour exactly on that line is passed on the left
/// of `heading`, so two agents meeting head-on step to opposite sides.
pub(crate) fn sidestep(heading: Point, towards: Point, strength: f64) -> Point {
    let ahead = heading.dot(towards);
    if ahead <= 0.0 {
        return Point::ZERO;
    }
    let left = heading.orthogonal();
    let side = if left.dot(towards) > 0.0 { -1.0 } else { 1.0 };
    left * (side * strength * ahead * SIDESTEP_SHARE)
}

/// One operational model: turns an agent plus its surroundings into a new
/// velocity and position for a single step.
///
/// # Thread safety
///
/// The simulation may call `compute_update` for many agents in parallel, so
/// implementations must be `Send + Sync`.  Models hold only immutable
/// parameters; all per-agent state lives in [`Agent`].
pub trait PedestrianModel: Send + Sync {
    /// Radius within which neighbours are passed to
    /// [`compute_update`](Self::compute_update).
    fn cutoff_radius(&self) -> f64;

    /// Body radius of agents using `profile`, if it is registered.
    fn profile_radius(&self, profile: ProfileId) -> Option<f64>;

    fn has_profile(&self, profile: ProfileId) -> bool {
        self.profile_radius(profile).is_some()
    }

    /// Compute the agent's state after one step of `ctx.dt`.
    ///
    /// `neighbors` holds agents within [`cutoff_radius`](Self::cutoff_radius),
    /// in ascending id order, and may include `agent` itself.
    fn compute_update(
        &self,
        ctx:       &StepContext<'_>,
        agent:     &Agent,
        neighbors: &[&Agent],
    ) -> ModelResult<AgentUpdate>;
}

/// Which variant an [`OperationalModel`] is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelKind {
    CollisionFreeSpeed,
    SocialForce,
}

impl ModelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::CollisionFreeSpeed => "collision-free speed",
            ModelKind::SocialForce => "social force",
        }
    }
}

/// The closed set of supported models, chosen once when a simulation is
/// built.
#[derive(Clone, Debug)]
pub enum OperationalModel {
    CollisionFreeSpeed(CollisionFreeSpeedModel),
    SocialForce(SocialForceModel),
}

impl OperationalModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            OperationalModel::CollisionFreeSpeed(_) => ModelKind::CollisionFreeSpeed,
            OperationalModel::SocialForce(_) => ModelKind::SocialForce,
        }
    }

    /// Largest body radius over all registered profiles.
    pub fn max_radius(&self) -> f64 {
        match self {
            OperationalModel::CollisionFreeSpeed(m) => m.max_radius(),
            OperationalModel::SocialForce(m) => m.max_radius(),
        }
    }
}

impl From<CollisionFreeSpeedModel> for OperationalModel {
    fn from(m: CollisionFreeSpeedModel) -> Self {
        OperationalModel::CollisionFreeSpeed(m)
    }
}

impl From<SocialForceModel> for OperationalModel {
    fn from(m: SocialForceModel) -> Self {
        OperationalModel::SocialForce(m)
    }
}

impl PedestrianModel for OperationalModel {
    fn cutoff_radius(&self) -> f64 {
        match self {
            OperationalModel::CollisionFreeSpeed(m) => m.cutoff_radius(),
            OperationalModel::SocialForce(m) => m.cutoff_radius(),
        }
    }

    fn profile_radius(&self, profile: ProfileId) -> Option<f64> {
        match self {
            OperationalModel::CollisionFreeSpeed(m) => m.profile_radius(profile),
            OperationalModel::SocialForce(m) => m.profile_radius(profile),
        }
    }

    #[inline]
    fn compute_update(
        &self,
        ctx:       &StepContext<'_>,
        agent:     &Agent,
        neighbors: &[&Agent],
    ) -> ModelResult<AgentUpdate> {
        match self {
            OperationalModel::CollisionFreeSpeed(m) => m.compute_update(ctx, agent, neighbors),
            OperationalModel::SocialForce(m) => m.compute_update(ctx, agent, neighbors),
        }
    }
}

/// Heading after a step: along the velocity while moving, otherwise along
/// `fallback`, otherwise unchanged.
pub(crate) fn heading(agent: &Agent, velocity: Point, fallback: Point) -> Point {
    const SPEED_EPS: f64 = 1e-6;
    if velocity.norm() > SPEED_EPS {
        velocity.normalized()
    } else if fallback.norm() > DIST_EPS {
        fallback.normalized()
    } else {
        agent.orientation
    }
}
