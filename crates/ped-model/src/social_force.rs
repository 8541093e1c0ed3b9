//! Social force model.
//!
//! Second-order model: each agent accelerates towards its desired velocity
//! and is pushed by neighbours and walls.
//!
//! ```text
//! a_i = (v0·e_i − v_i)/τ + (Σ_j f_ij + Σ_w f_iw) / m_i
//!
//! f_ij = [A·exp((r_ij − d_ij)/B) + k·g(r_ij − d_ij)]·n_ij + κ·g(r_ij − d_ij)·Δv_ji·t_ij
//! f_iw = [A·exp((r_i − d_iw)/B) + k·g(r_i − d_iw)]·n_iw − κ·g(r_i − d_iw)·(v_i·t_iw)·t_iw
//! ```
//!
//! `g(x)` is `x` when bodies overlap and `0` otherwise.  A neighbour ahead
//! also pushes sideways, perpendicular to the desired direction, with a share
//! of its exponential term.  The step is
//! semi-implicit Euler: velocity first, then position with the new velocity.

use ped_agent::Agent;
use ped_core::{Point, ProfileId};
use rustc_hash::FxHashMap;

use crate::model::{DIST_EPS, clamped_exp, heading, sidestep};
use crate::{
    AgentUpdate, ModelError, ModelResult, PedestrianModel, SocialForceParameters,
    SocialForceProfile, StepContext,
};

/// Neighbours and walls farther than this are ignored.
const CUTOFF: f64 = 2.5;

#[derive(Clone, Debug)]
pub struct SocialForceModel {
    params:   SocialForceParameters,
    profiles: FxHashMap<ProfileId, SocialForceProfile>,
}

impl SocialForceModel {
    pub fn new(params: SocialForceParameters) -> ModelResult<Self> {
        params.validate()?;
        Ok(Self { params, profiles: FxHashMap::default() })
    }

    pub fn with_profiles(
        params:   SocialForceParameters,
        profiles: impl IntoIterator<Item = (ProfileId, SocialForceProfile)>,
    ) -> ModelResult<Self> {
        let mut model = Self::new(params)?;
        for (id, profile) in profiles {
            model.add_profile(id, profile)?;
        }
        Ok(model)
    }

    pub fn add_profile(&mut self, id: ProfileId, profile: SocialForceProfile) -> ModelResult<()> {
        profile.validate()?;
        if self.profiles.contains_key(&id) {
            return Err(ModelError::DuplicateProfile(id));
        }
        self.profiles.insert(id, profile);
        Ok(())
    }

    pub fn params(&self) -> &SocialForceParameters {
        &self.params
    }

    pub fn profile(&self, id: ProfileId) -> ModelResult<&SocialForceProfile> {
        self.profiles.get(&id).ok_or(ModelError::UnknownProfile(id))
    }

    pub fn max_radius(&self) -> f64 {
        self.profiles.values().map(|p| p.radius).fold(0.0, f64::max)
    }

    /// Normal magnitude: exponential social term plus body compression.
    fn pushing(&self, scale: f64, range: f64, contact: f64, distance: f64) -> f64 {
        let mut force = scale * clamped_exp((contact - distance) / range);
        if distance < contact {
            force += self.params.body_force * (contact - distance);
        }
        force
    }

    fn agent_force(
        &self,
        profile: &SocialForceProfile,
        agent:   &Agent,
        other:   &Agent,
        desired: Point,
        contact: f64,
    ) -> Point {
        let offset = agent.position - other.position;
        let distance = offset.norm();
        let normal = offset / distance;
        let social = profile.agent_scale * clamped_exp((contact - distance) / profile.force_distance);
        let mut force = normal
            * self.pushing(profile.agent_scale, profile.force_distance, contact, distance)
            + sidestep(desired, -normal, social);
        if distance < contact {
            let tangent = normal.orthogonal();
            let slip = (other.velocity - agent.velocity).dot(tangent);
            force += tangent * (self.params.friction * (contact - distance) * slip);
        }
        force
    }

    fn obstacle_force(
        &self,
        ctx:     &StepContext<'_>,
        profile: &SocialForceProfile,
        agent:   &Agent,
    ) -> Point {
        let mut total = Point::ZERO;
        for wall in ctx.geometry.walls_within(agent.position, CUTOFF) {
            let offset = agent.position - wall.closest_point(agent.position);
            let distance = offset.norm();
            if distance < DIST_EPS {
                continue;
            }
            let normal = offset / distance;
            total += normal
                * self.pushing(profile.obstacle_scale, profile.force_distance, profile.radius, distance);
            if distance < profile.radius {
                let tangent = normal.orthogonal();
                total -= tangent
                    * (self.params.friction
                        * (profile.radius - distance)
                        * agent.velocity.dot(tangent));
            }
        }
        total
    }
}

impl PedestrianModel for SocialForceModel {
    fn cutoff_radius(&self) -> f64 {
        CUTOFF
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
        let to_target = agent.target - agent.position;
        let desired = to_target.normalized();
        // Slow down over the last `reaction_time * desired_speed` metres to
        // the stage target; intermediate route corners are passed at speed.
        let waypoint_distance = agent.position.distance(agent.waypoint);
        let desired_speed = profile.desired_speed.min(waypoint_distance / profile.reaction_time);
        let driving = (desired * desired_speed - agent.velocity) / profile.reaction_time;

        let mut interaction = Point::ZERO;
        for other in neighbors {
            if other.id == agent.id {
                continue;
            }
            let distance = agent.position.distance(other.position);
            if distance < DIST_EPS || distance > CUTOFF || !ctx.can_see(agent.position, other.position) {
                continue;
            }
            let contact = profile.radius + self.profile(other.profile)?.radius;
            interaction += self.agent_force(profile, agent, other, desired, contact);
        }
        interaction += self.obstacle_force(ctx, profile, agent);

        let acceleration = driving + interaction / profile.mass;
        let velocity = agent.velocity + acceleration * ctx.dt;
        Ok(AgentUpdate {
            position: agent.position + velocity * ctx.dt,
            velocity,
            orientation: heading(agent, velocity, desired),
            desired_direction: desired,
            interaction,
        })
    }
}
