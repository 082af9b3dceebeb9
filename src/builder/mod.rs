//! Builder API for ergonomic controller construction.
//!
//! This module provides a fluent builder for controllers and a macro for
//! state chains.

pub mod controller;
pub mod error;
pub mod macros;

pub use controller::ControllerBuilder;
pub use error::BuildError;
