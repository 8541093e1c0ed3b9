//! `ped-agent` — agent records and the registry that owns them.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`agent`]   | `Agent` — one pedestrian's mutable simulation state      |
//! | [`store`]   | `AgentStore` — id allocation, lookup, removal            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                 |
//! |---------|--------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Agent`.          |
//!
//! The store does not validate profile, journey or stage references; that
//! is the simulation's job, since only it knows which ids are registered.

pub mod agent;
pub mod store;


pub use agent::Agent;
pub use store::AgentStore;
