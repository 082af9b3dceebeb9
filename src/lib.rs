//! Stateful controllers: hierarchical asynchronous state machines.
//!
//! A controller owns a slice of application state and may delegate a
//! sub-slice to exactly one child controller, which may do the same. A whole
//! chain is driven with a single call that assigns one state per level.
//!
//! # Core Concepts
//!
//! - **State**: an identifier or a custom object with its own equality test
//! - **Controller**: a node of the chain with a context, a current state and
//!   at most one child
//! - **Hooks**: the behavior of each state (enter, leave, before-enter,
//!   after-leave)
//! - **Transition**: the ordered, awaited leave/enter protocol with rollback
//!
//! # Example
//!
//! ```rust
//! use stateful_controller::{state_chain, Controller, StateHandlers};
//!
//! # futures::executor::block_on(async {
//! let child = Controller::dummy("context");
//! let link = child.clone();
//!
//! // entering "pages" links the child controller that handles the page
//! let front = Controller::new(
//!     "context",
//!     StateHandlers::new().on_enter("pages", move |front, _, _| {
//!         let result = front.set_child(Some(&link));
//!         async move { result }
//!     }),
//! );
//!
//! front.assign_state(Some(state_chain!["pages", "contact"]), false).await.unwrap();
//!
//! assert_eq!(front.current_state().unwrap(), "pages");
//! assert_eq!(child.current_state().unwrap(), "contact");
//! assert_eq!(child.full_state_chain().len(), 2);
//! # });
//! ```

pub mod builder;
pub mod controller;
pub mod core;

// Re-export commonly used types
pub use crate::controller::{Controller, ControllerHooks, DummyHooks, StateHandlers};
pub use crate::core::{ControllerError, CustomState, State, StateChain};
