//! Base error type shared by the registry-level crates.
//!
//! Sub-crates define their own error enums and wrap `CoreError` via `From`
//! where they surface registry failures.

use thiserror::Error;

use crate::AgentId;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),
}

/// Shorthand result type for `ped-core` and the registry crates.
pub type CoreResult<T> = Result<T, CoreError>;
