//! Lifecycle hooks: the collaborator contract of a controller.

use super::Controller;
use crate::core::{ControllerError, State};
use async_trait::async_trait;

/// Behavior of a controller's states.
///
/// The transition engine awaits each hook before starting the next step.
/// Every hook receives the controller it runs for, so it can read the
/// context, inspect the current state or link a child controller.
///
/// Only [`enter`](Self::enter) is required.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use stateful_controller::{Controller, ControllerError, ControllerHooks, State};
///
/// struct Pages;
///
/// #[async_trait(?Send)]
/// impl ControllerHooks<()> for Pages {
///     async fn enter(
///         &self,
///         _controller: &Controller<()>,
///         state: &State,
///         _upgrade: bool,
///     ) -> Result<(), ControllerError> {
///         match state.name() {
///             "home" | "contact" => Ok(()),
///             other => Err(ControllerError::hook(format!("unknown page {other}"))),
///         }
///     }
/// }
///
/// # futures::executor::block_on(async {
/// let pages = Controller::new((), Pages);
/// pages.assign_state(Some(vec![Some("home".into())]), false).await.unwrap();
/// assert!(pages.assign_state(Some(vec![Some("nope".into())]), false).await.is_err());
/// assert_eq!(pages.current_state().unwrap(), "home");
/// # });
/// ```
#[async_trait(?Send)]
pub trait ControllerHooks<C> {
    /// Enter `state`. The controller's current state is already `state`.
    ///
    /// When `upgrade` is true the results of this state already exist (for
    /// example produced by another process) and should be adopted rather than
    /// created.
    async fn enter(
        &self,
        controller: &Controller<C>,
        state: &State,
        upgrade: bool,
    ) -> Result<(), ControllerError>;

    /// Leave `state`. The controller's current state is still `state`.
    async fn leave(
        &self,
        _controller: &Controller<C>,
        _state: &State,
    ) -> Result<(), ControllerError> {
        Ok(())
    }

    /// Runs before `state` is entered; failing aborts the transition.
    async fn before_enter(
        &self,
        _controller: &Controller<C>,
        _state: &State,
        _upgrade: bool,
    ) -> Result<(), ControllerError> {
        Ok(())
    }

    /// Runs after `state` has been left.
    async fn after_leave(
        &self,
        _controller: &Controller<C>,
        _state: &State,
        _upgrade: bool,
    ) -> Result<(), ControllerError> {
        Ok(())
    }
}

/// Hooks that accept a transition to any state and do nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct DummyHooks;

#[async_trait(?Send)]
impl<C> ControllerHooks<C> for DummyHooks {
    async fn enter(
        &self,
        _controller: &Controller<C>,
        _state: &State,
        _upgrade: bool,
    ) -> Result<(), ControllerError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dummy_hooks_accept_everything() {
        let controller = Controller::dummy("foo");
        let state = State::from("anything");

        assert!(DummyHooks.enter(&controller, &state, false).await.is_ok());
        assert!(DummyHooks.leave(&controller, &state).await.is_ok());
        assert!(DummyHooks
            .before_enter(&controller, &state, true)
            .await
            .is_ok());
        assert!(DummyHooks.after_leave(&controller, &state, true).await.is_ok());
    }
}
