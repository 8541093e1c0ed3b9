//! Journey and stage error type.

use thiserror::Error;

use ped_core::{JourneyId, StageId};

#[derive(Debug, Error, PartialEq)]
pub enum JourneyError {
    #[error("stage {0} not found")]
    UnknownStage(StageId),

    #[error("journey {0} not found")]
    UnknownJourney(JourneyId),

    #[error("stage {0} is not a waiting set")]
    NotAWaitingSet(StageId),

    #[error("invalid stage: {0}")]
    InvalidStage(&'static str),

    #[error("journey has no stages")]
    EmptyJourney,

    #[error("stage {0} appears more than once in the journey")]
    DuplicateStage(StageId),

    #[error("transition refers to stage {0}, which is not part of the journey")]
    StageNotInJourney(StageId),

    #[error("stage {0} has no successor and is not an exit")]
    MissingTransition(StageId),

    #[error("exit stage {0} must not have a transition")]
    TransitionFromExit(StageId),

    #[error("transition from stage {stage} is invalid: {reason}")]
    InvalidTransition { stage: StageId, reason: &'static str },

    #[error("stage {0} is not reachable from the journey's entry")]
    Unreachable(StageId),

    #[error("no exit stage is reachable from the journey's entry")]
    NoReachableExit,
}

pub type JourneyResult<T> = Result<T, JourneyError>;
