//! Core value types of the controller protocol.
//!
//! This module contains the pieces that do not depend on the controller tree:
//! - State values and their identity rules
//! - The error taxonomy
//! - Bounded transition history

mod error;
mod history;
mod state;

pub use error::ControllerError;
pub use history::{StateHistory, TransitionRecord, DEFAULT_HISTORY_LIMIT};
pub use state::{
    chains_equal, method_name, states_equal, CustomState, IntoChainEntry, State, StateChain,
};

pub(crate) use state::describe;
