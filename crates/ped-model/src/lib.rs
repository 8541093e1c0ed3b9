//! `ped-model` — operational models: one fixed-step velocity/position update
//! per agent.
//!
//! # Crate layout
//!
//! | Module             | Contents                                                   |
//! |--------------------|------------------------------------------------------------|
//! | [`params`]         | Validated global and per-profile parameter structs         |
//! | [`context`]        | `StepContext` — read-only inputs shared by every agent     |
//! | [`update`]         | `AgentUpdate` — one agent's result, applied in the commit  |
//! | [`model`]          | `PedestrianModel` trait, `OperationalModel` tagged enum    |
//! | [`collision_free`] | `CollisionFreeSpeedModel` — velocity-based avoidance       |
//! | [`social_force`]   | `SocialForceModel` — force-based dynamics                  |
//! | [`error`]          | `ModelError`, `ModelResult<T>`                             |
//!
//! # Design notes
//!
//! Every model step is a pure function of the agent, its neighbours and the
//! geometry.  The simulation collects all `AgentUpdate`s before committing
//! any of them, so no agent ever sees a neighbour's position from the
//! current step and the computation can be spread over a thread pool.

pub mod collision_free;
pub mod context;
pub mod error;
pub mod model;
pub mod params;
pub mod social_force;
pub mod update;

#[cfg(test)]
mod tests;

pub use collision_free::CollisionFreeSpeedModel;
pub use context::StepContext;
pub use error::{ModelError, ModelResult};
pub use model::{ModelKind, OperationalModel, PedestrianModel};
pub use params::{
    CollisionFreeSpeedParameters, CollisionFreeSpeedProfile, SocialForceParameters,
    SocialForceProfile,
};
pub use social_force::SocialForceModel;
pub use update::AgentUpdate;
