use ped_core::{AgentId, CoreError, Point};
use ped_journey::JourneyError;
use ped_model::ModelError;
use ped_spatial::GeometryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("journey error: {0}")]
    Journey(#[from] JourneyError),

    #[error("agent registry error: {0}")]
    Core(#[from] CoreError),

    #[error("position {0} is outside the accessible area")]
    OutsideGeometry(Point),

    #[error("invariant violated for agent {agent}: {message}")]
    Invariant { agent: AgentId, message: String },
}

/// Broad class of a [`SimError`], for callers that only care whether to fix
/// their setup, their ids, or their agent placement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid geometry, parameters or journey graph.
    Configuration,
    /// An id that is not registered.
    Reference,
    /// An initial position outside the accessible area.
    Placement,
    /// Internal consistency broke during an iteration.
    Invariant,
}

impl SimError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimError::Config(_) | SimError::Geometry(_) => ErrorKind::Configuration,
            SimError::Model(ModelError::UnknownProfile(_)) => ErrorKind::Reference,
            SimError::Model(_) => ErrorKind::Configuration,
            SimError::Journey(
                JourneyError::UnknownStage(_)
                | JourneyError::UnknownJourney(_)
                | JourneyError::NotAWaitingSet(_),
            ) => ErrorKind::Reference,
            SimError::Journey(_) => ErrorKind::Configuration,
            SimError::Core(_) => ErrorKind::Reference,
            SimError::OutsideGeometry(_) => ErrorKind::Placement,
            SimError::Invariant { .. } => ErrorKind::Invariant,
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
