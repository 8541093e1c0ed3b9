//! `ped-core` — foundational types for the pedestrian simulation workspace.
//!
//! This crate is a dependency of every other `ped-*` crate.  It has no
//! `ped-*` dependencies and few external ones (`rand`, `thiserror`, `log`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `StageId`, `JourneyId`, `ProfileId`           |
//! | [`point`]       | `Point` — 2-D vector used for positions and velocities   |
//! | [`time`]        | `Iteration`, `SimClock`                                  |
//! | [`rng`]         | `AgentRng` — deterministic per-agent decision RNG        |
//! | [`diag`]        | `Severity`, `DiagnosticSink`, `LogSink`, `NoopSink`      |
//! | [`error`]       | `CoreError`, `CoreResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod diag;
pub mod error;
pub mod ids;
pub mod point;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use diag::{DiagnosticSink, LogSink, NoopSink, Severity};
pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, JourneyId, ProfileId, StageId};
pub use point::Point;
pub use rng::AgentRng;
pub use time::{Iteration, SimClock};
