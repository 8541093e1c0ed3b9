use ped_core::ProfileId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("invalid parameter `{name}` = {value}: must be {requirement}")]
    InvalidParameter {
        name:        &'static str,
        value:       f64,
        requirement: &'static str,
    },

    #[error("profile {0} registered twice")]
    DuplicateProfile(ProfileId),

    #[error("profile {0} is not registered with this model")]
    UnknownProfile(ProfileId),
}

pub type ModelResult<T> = Result<T, ModelError>;
