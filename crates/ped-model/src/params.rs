//! Parameter structs for both model variants.
//!
//! Each struct is validated once, when it is handed to a model constructor
//! or registered as a profile; models never re-check values in the hot loop.
//! Defaults are the values pedestrian-dynamics literature uses for these
//! models and are a reasonable starting point for calibration.

use crate::{ModelError, ModelResult};

fn positive(name: &'static str, value: f64) -> ModelResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidParameter { name, value, requirement: "finite and > 0" })
    }
}

fn non_negative(name: &'static str, value: f64) -> ModelResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidParameter { name, value, requirement: "finite and >= 0" })
    }
}

// ── Collision-free speed model ────────────────────────────────────────────────

/// Global coefficients of the collision-free speed model.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CollisionFreeSpeedParameters {
    /// Strength `a` of the neighbour repulsion term.
    pub strength_neighbor_repulsion: f64,
    /// Decay length `D` of the neighbour repulsion term, in metres.
    pub range_neighbor_repulsion:    f64,
    /// Strength of the wall repulsion term.
    pub strength_geometry_repulsion: f64,
    /// Decay length of the wall repulsion term, in metres.
    pub range_geometry_repulsion:    f64,
}

impl Default for CollisionFreeSpeedParameters {
    fn default() -> Self {
        Self {
            strength_neighbor_repulsion: 8.0,
            range_neighbor_repulsion:    0.1,
            strength_geometry_repulsion: 5.0,
            range_geometry_repulsion:    0.02,
        }
    }
}

impl CollisionFreeSpeedParameters {
    pub fn validate(&self) -> ModelResult<()> {
        non_negative("strength_neighbor_repulsion", self.strength_neighbor_repulsion)?;
        positive("range_neighbor_repulsion", self.range_neighbor_repulsion)?;
        non_negative("strength_geometry_repulsion", self.strength_geometry_repulsion)?;
        positive("range_geometry_repulsion", self.range_geometry_repulsion)
    }
}

/// Per-agent-class parameters of the collision-free speed model.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CollisionFreeSpeedProfile {
    /// Time gap `T` in seconds: speed is `(spacing - l) / T`.
    pub time_gap: f64,
    /// Relaxation time of the desired direction, in seconds.
    pub tau:      f64,
    /// Desired (free-flow) speed in m/s.
    pub v0:       f64,
    /// Body radius in metres.
    pub radius:   f64,
}

impl Default for CollisionFreeSpeedProfile {
    fn default() -> Self {
        Self { time_gap: 1.0, tau: 0.5, v0: 1.2, radius: 0.3 }
    }
}

impl CollisionFreeSpeedProfile {
    pub fn validate(&self) -> ModelResult<()> {
        positive("time_gap", self.time_gap)?;
        positive("tau", self.tau)?;
        non_negative("v0", self.v0)?;
        positive("radius", self.radius)
    }
}

// ── Social force model ────────────────────────────────────────────────────────

/// Global coefficients of the social force model.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SocialForceParameters {
    /// Body compression coefficient `k`, in kg/s².
    pub body_force: f64,
    /// Sliding friction coefficient `κ`, in kg/(m·s).
    pub friction:   f64,
}

impl Default for SocialForceParameters {
    fn default() -> Self {
        Self { body_force: 120_000.0, friction: 240_000.0 }
    }
}

impl SocialForceParameters {
    pub fn validate(&self) -> ModelResult<()> {
        non_negative("body_force", self.body_force)?;
        non_negative("friction", self.friction)
    }
}

/// Per-agent-class parameters of the social force model.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SocialForceProfile {
    /// Mass in kg.
    pub mass:           f64,
    /// Desired speed in m/s.
    pub desired_speed:  f64,
    /// Relaxation time towards the desired velocity, in seconds.
    pub reaction_time:  f64,
    /// Strength `A` of agent-agent repulsion, in N.
    pub agent_scale:    f64,
    /// Strength `A` of agent-wall repulsion, in N.
    pub obstacle_scale: f64,
    /// Decay length `B` of both repulsion terms, in metres.
    pub force_distance: f64,
    /// Body radius in metres.
    pub radius:         f64,
}

impl Default for SocialForceProfile {
    fn default() -> Self {
        Self {
            mass:           80.0,
            desired_speed:  0.8,
            reaction_time:  0.5,
            agent_scale:    2000.0,
            obstacle_scale: 2000.0,
            force_distance: 0.08,
            radius:         0.3,
        }
    }
}

impl SocialForceProfile {
    pub fn validate(&self) -> ModelResult<()> {
        positive("mass", self.mass)?;
        non_negative("desired_speed", self.desired_speed)?;
        positive("reaction_time", self.reaction_time)?;
        non_negative("agent_scale", self.agent_scale)?;
        non_negative("obstacle_scale", self.obstacle_scale)?;
        positive("force_distance", self.force_distance)?;
        positive("radius", self.radius)
    }
}
