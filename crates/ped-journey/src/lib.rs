//! `ped-journey` — routing targets and the per-agent stage state machine.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`stage`]      | `Stage` (waypoint, exit, waiting set) and arrival rules     |
//! | [`transition`] | `Transition` — successor selection rules                    |
//! | [`journey`]    | `JourneyDescription` (input), `Journey` (validated graph)   |
//! | [`table`]      | `RoutingTable` — stage and journey arenas, `advance`        |
//! | [`error`]      | `JourneyError`, `JourneyResult<T>`                          |
//!
//! # Design notes
//!
//! Stages and journeys live in two arenas indexed by `StageId` and
//! `JourneyId`.  Journeys only hold ids, so one stage can appear in many
//! journeys and its state (waiting-set flag and occupancy) is shared.
//!
//! Every agent's state is a single `StageId`.  Once per iteration the
//! simulation calls [`RoutingTable::advance`] for each agent in ascending id
//! order; an agent moves at most one stage per call.

pub mod error;
pub mod journey;
pub mod stage;
pub mod table;
pub mod transition;


pub use error::{JourneyError, JourneyResult};
pub use journey::{Journey, JourneyDescription};
pub use stage::{ExitArea, Stage, StageKind, WaitingSet, Waypoint};
pub use table::{Advance, Decision, RoutingTable};
pub use transition::Transition;
