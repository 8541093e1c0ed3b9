//! Collision-free speed model.
//!
//! First-order model: agents pick a heading and then the largest speed that
//! keeps a time gap `T` to the closest agent ahead of them.
//!
//! Per step, for agent `i` with radius `r_i`:
//!
//! 1. `e0` relaxes towards the unit vector to the target with time constant
//!    `tau`.
//! 2. Heading `e = normalize(e0 + Σ_j R_ij + Σ_w R_iw)` where
//!    `R_ij = -a·exp((r_i + r_j - d_ij)/D)·e_ij` pushes away from each
//!    visible neighbour and `R_iw = -a_w·exp((r_i - d_iw)/D_w)·e_iw` away from
//!    each wall within 5 m.  Neighbours ahead add a sideways share of
//!    `|R_ij|` perpendicular to `e0`, so head-on encounters resolve.
//! 3. Speed `v = clamp((s - r_i - r_j)/T, 0, v0)` where `s` is the distance
//!    to the closest neighbour `j` inside the heading cone
//!    (`e·e_ij ≥ 0` and `|e⊥·e_ij| ≤ (r_i + r_j)/d_ij`).
//! 4. `x += e·v·dt`.  Speed is additionally capped so the agent does not
//!    overshoot its target within one step.

use ped_agent::Agent;
use ped_core::{Point, ProfileId};
use rustc_hash::FxHashMap;

use crate::model::{DIST_EPS, GOAL_EPS, clamped_exp, heading, sidestep};
use crate::{
    AgentUpdate, CollisionFreeSpeedParameters, CollisionFreeSpeedProfile, ModelError,
    ModelResult, PedestrianModel, StepContext,
};

/// Neighbours farther than this are ignored.
const NEIGHBOR_CUTOFF: f64 = 4.0;

/// Walls farther than this are ignored.
const WALL_CUTOFF: f64 = 5.0;

#[derive(Clone, Debug)]
pub struct CollisionFreeSpeedModel {
    params:   CollisionFreeSpeedParameters,
    profiles: FxHashMap<ProfileId, CollisionFreeSpeedProfile>,
}

impl CollisionFreeSpeedModel {
    /// A model with no profiles.  Register at least one with
    /// [`add_profile`](Self::add_profile) before adding agents.
    pub fn new(params: CollisionFreeSpeedParameters) -> ModelResult<Self> {
        params.validate()?;
        Ok(Self { params, profiles: FxHashMap::default() })
    }

    /// Build a model and register `profiles` in one call.
    pub fn with_profiles(
        params:   CollisionFreeSpeedParameters,
        profiles: impl IntoIterator<Item = (ProfileId, CollisionFreeSpeedProfile)>,
    ) -> ModelResult<Self> {
        let mut model = Self::new(params)?;
        for (id, profile) in profiles {
            model.add_profile(id, profile)?;
        }
        Ok(model)
    }

    pub fn add_profile(
        &mut self,
        id:      ProfileId,
        profile: CollisionFreeSpeedProfile,
    ) -> ModelResult<()> {
        profile.validate()?;
        if self.profiles.contains_key(&id) {
            return Err(ModelError::DuplicateProfile(id));
        }
        self.profiles.insert(id, profile);
        Ok(())
    }

    pub fn params(&self) -> &CollisionFreeSpeedParameters {
        &self.params
    }

    pub fn profile(&self, id: ProfileId) -> ModelResult<&CollisionFreeSpeedProfile> {
        self.profiles.get(&id).ok_or(ModelError::UnknownProfile(id))
    }

    pub fn max_radius(&self) -> f64 {
        self.profiles.values().map(|p| p.radius).fold(0.0, f64::max)
    }

    fn neighbor_repulsion(&self, e0: Point, neighbor: &Visible) -> Point {
        let a = self.params.strength_neighbor_repulsion;
        let d = self.params.range_neighbor_repulsion;
        let strength = a * clamped_exp((neighbor.contact - neighbor.distance) / d);
        neighbor.direction * -strength + sidestep(e0, neighbor.direction, strength)
    }

    fn wall_repulsion(&self, ctx: &StepContext<'_>, position: Point, radius: f64) -> Point {
        let a = self.params.strength_geometry_repulsion;
        let d = self.params.range_geometry_repulsion;
        let mut total = Point::ZERO;
        for wall in ctx.geometry.walls_within(position, WALL_CUTOFF) {
            let to_wall = wall.closest_point(position) - position;
            let dist = to_wall.norm();
            if dist < DIST_EPS {
                continue;
            }
            total += to_wall / dist * (-a * clamped_exp((radius - dist) / d));
        }
        total
    }
}

/// A neighbour after the visibility filter, with the quantities both the
/// heading and the speed computation need.
struct Visible {
    /// Unit vector from the agent to the neighbour.
    direction: Point,
    distance:  f64,
    /// Sum of both radii.
    contact:   f64,
}

/// Move `e0` a fraction `dt / tau` of the way towards `desired`.
fn relax(e0: Point, desired: Point, dt: f64, tau: f64) -> Point {
    let relaxed = e0 + (desired - e0) * (dt / tau).min(1.0);
    if relaxed.norm() > DIST_EPS { relaxed.normalized() } else { desired }
}

impl PedestrianModel for CollisionFreeSpeedModel {
    fn cutoff_radius(&self) -> f64 {
        NEIGHBOR_CUTOFF
    }

    fn profile_radius(&self, profile: ProfileId) -> Option<f64> {
        self.profiles.get(&profile).map(|p| p.radius)
    }

    fn compute_update(
        &self,
        ctx:       &StepContext<'_>,
        agent:     &Agent,
        neighbors: &[&Agent],
    ) -> ModelResult<AgentUpdate> {
        let profile = self.profile(agent.profile)?;
        let pos = agent.position;
        let to_target = agent.target - pos;
        let target_distance = to_target.norm();
        let at_goal = target_distance < GOAL_EPS;

        let e0 = if at_goal {
            agent.desired_direction
        } else {
            relax(agent.desired_direction, to_target / target_distance, ctx.dt, profile.tau)
        };

        let mut visible = Vec::with_capacity(neighbors.len());
        for other in neighbors {
            if other.id == agent.id {
                continue;
            }
            let offset = other.position - pos;
            let distance = offset.norm();
            if distance < DIST_EPS || distance > NEIGHBOR_CUTOFF || !ctx.can_see(pos, other.position) {
                continue;
            }
            let other_profile = self.profile(other.profile)?;
            visible.push(Visible {
                direction: offset / distance,
                distance,
                contact: profile.radius + other_profile.radius,
            });
        }

        let neighbor_term = visible
            .iter()
            .fold(Point::ZERO, |acc, v| acc + self.neighbor_repulsion(e0, v));
        let wall_term = if at_goal {
            Point::ZERO
        } else {
            self.wall_repulsion(ctx, pos, profile.radius)
        };
        let interaction = neighbor_term + wall_term;
        let direction = (e0 + interaction).normalized();

        // Free space ahead: smallest gap to a neighbour in the heading cone.
        let lateral = direction.orthogonal();
        let gap = visible
            .iter()
            .filter(|v| {
                direction.dot(v.direction) >= 0.0
                    && lateral.dot(v.direction).abs() <= v.contact / v.distance
            })
            .map(|v| v.distance - v.contact)
            .fold(f64::INFINITY, f64::min);

        let speed = (gap / profile.time_gap)
            .clamp(0.0, profile.v0)
            .min(target_distance / ctx.dt);
        let velocity = direction * speed;

        Ok(AgentUpdate {
            position: pos + velocity * ctx.dt,
            velocity,
            orientation: heading(agent, velocity, direction),
            desired_direction: e0,
            interaction,
        })
    }
}
