//! Errors raised by the state assignment protocol.

use crate::builder::BuildError;
use thiserror::Error;

/// Errors that can occur while linking controllers or assigning states.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Malformed input, such as an empty state chain or a cyclic link.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The controller is already in the middle of a transition.
    #[error("A previous state transition is still in progress")]
    ConcurrentTransition,

    /// A custom state lacks a capability the protocol requires.
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("State method {method} does not exist")]
    MissingStateMethod { method: String },

    #[error(
        "Attempting to set child state \"{child_state}\", but no child controller has been set by the state \"{state}\""
    )]
    MissingChildController { state: String, child_state: String },

    #[error(
        "Attempting to set state \"{state}\", but a child state is missing (a child controller has been set)"
    )]
    MissingChildState { state: String },

    /// A lifecycle hook failed. Displays as the hook's own error.
    #[error(transparent)]
    Hook(Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Build(#[from] BuildError),
}

impl ControllerError {
    /// Wrap a failure raised by a lifecycle hook.
    pub fn hook(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Hook(error.into())
    }
}
