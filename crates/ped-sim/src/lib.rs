//! `ped-sim` — iteration loop orchestrator for the pedestrian simulation
//! workspace.
//!
//! # One iteration
//!
//! ```text
//! iterate():
//!   ① Targets      — refresh every agent's waypoint from its stage and
//!                    steer at the next corner of the route to it.
//!   ② Operational  — PedestrianModel::compute_update for every agent against
//!                    the previous snapshot (parallel with `parallel`).
//!   ③ Commit       — write updates back; agents with non-finite state are
//!                    removed with an error event.
//!   ④ Index        — move every agent's entry in the NeighborhoodGrid.
//!   ⑤ Transitions  — RoutingTable::advance for every agent in ascending id
//!                    order; collect agents that reached an exit.
//!   ⑥ Removal      — drop exited agents from registry, grid and stages.
//!   ⑦ Clock        — iteration counter += 1.
//!   ⑧ Trace        — record phase ② and whole-call durations.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Runs phase ② on Rayon's thread pool.                      |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `SimConfig`.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ped_core::{Point, ProfileId};
//! use ped_journey::JourneyDescription;
//! use ped_model::{CollisionFreeSpeedModel, CollisionFreeSpeedParameters, CollisionFreeSpeedProfile};
//! use ped_sim::{NoopObserver, SimBuilder, SimConfig};
//!
//! let model = CollisionFreeSpeedModel::with_profiles(
//!     CollisionFreeSpeedParameters::default(),
//!     [(ProfileId(0), CollisionFreeSpeedProfile::default())],
//! )?;
//! let mut sim = SimBuilder::new(SimConfig::default(), model, geometry).build()?;
//! let exit = sim.add_exit_stage(exit_polygon)?;
//! let journey = sim.add_journey(&JourneyDescription::new([exit]))?;
//! sim.add_agent(ProfileId(0), journey, Point::new(0.0, 0.0), Point::new(1.0, 0.0))?;
//! sim.run_until_empty(10_000, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod sim;
pub mod trace;


pub use builder::SimBuilder;
pub use config::SimConfig;
pub use error::{ErrorKind, SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Simulation;
pub use trace::Trace;
