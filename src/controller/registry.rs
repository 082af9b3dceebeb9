//! Registry-backed hooks.
//!
//! Handlers are registered under the name derived from their state, e.g.
//! `"enterFooBar"` for the state `"foo bar"`, and looked up the same way when
//! a transition runs. A missing enter handler is an error; a missing leave
//! handler is skipped.

use super::{Controller, ControllerHooks};
use crate::core::{method_name, ControllerError, State};
use async_trait::async_trait;
use futures::future::{FutureExt, LocalBoxFuture};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

type EnterHandler<C> =
    Rc<dyn Fn(Controller<C>, State, bool) -> LocalBoxFuture<'static, Result<(), ControllerError>>>;
type LeaveHandler<C> =
    Rc<dyn Fn(Controller<C>, State) -> LocalBoxFuture<'static, Result<(), ControllerError>>>;

/// Explicit mapping from states to their enter and leave handlers.
///
/// # Example
///
/// ```rust
/// use stateful_controller::{Controller, StateHandlers};
///
/// let handlers = StateHandlers::new()
///     .on_enter("contact page", |_controller, _state, _upgrade| async { Ok(()) })
///     .on_leave("contact page", |_controller, _state| async { Ok(()) });
///
/// assert!(handlers.has_enter("contact page"));
///
/// # futures::executor::block_on(async {
/// let controller = Controller::new((), handlers);
/// controller
///     .assign_state(Some(vec![Some("contact page".into())]), false)
///     .await
///     .unwrap();
/// # });
/// ```
pub struct StateHandlers<C> {
    enter: HashMap<String, EnterHandler<C>>,
    leave: HashMap<String, LeaveHandler<C>>,
    before_enter: Option<EnterHandler<C>>,
    after_leave: Option<EnterHandler<C>>,
}

impl<C: 'static> StateHandlers<C> {
    pub fn new() -> Self {
        Self {
            enter: HashMap::new(),
            leave: HashMap::new(),
            before_enter: None,
            after_leave: None,
        }
    }

    /// Register the handler that enters `state`.
    pub fn on_enter<F, Fut>(mut self, state: impl Into<State>, handler: F) -> Self
    where
        F: Fn(Controller<C>, State, bool) -> Fut + 'static,
        Fut: Future<Output = Result<(), ControllerError>> + 'static,
    {
        let name = method_name("enter", &state.into());
        self.enter.insert(name, boxed_enter(handler));
        self
    }

    /// Register the handler that leaves `state`.
    pub fn on_leave<F, Fut>(mut self, state: impl Into<State>, handler: F) -> Self
    where
        F: Fn(Controller<C>, State) -> Fut + 'static,
        Fut: Future<Output = Result<(), ControllerError>> + 'static,
    {
        let name = method_name("leave", &state.into());
        let handler: LeaveHandler<C> = Rc::new(move |controller: Controller<C>, state: State| {
            handler(controller, state).boxed_local()
        });
        self.leave.insert(name, handler);
        self
    }

    /// Run `handler` before every state is entered.
    pub fn on_before_enter<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Controller<C>, State, bool) -> Fut + 'static,
        Fut: Future<Output = Result<(), ControllerError>> + 'static,
    {
        self.before_enter = Some(boxed_enter(handler));
        self
    }

    /// Run `handler` after every state has been left.
    pub fn on_after_leave<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Controller<C>, State, bool) -> Fut + 'static,
        Fut: Future<Output = Result<(), ControllerError>> + 'static,
    {
        self.after_leave = Some(boxed_enter(handler));
        self
    }

    pub fn has_enter(&self, state: impl Into<State>) -> bool {
        self.enter
            .contains_key(&method_name("enter", &state.into()))
    }

    pub fn has_leave(&self, state: impl Into<State>) -> bool {
        self.leave
            .contains_key(&method_name("leave", &state.into()))
    }
}

fn boxed_enter<C, F, Fut>(handler: F) -> EnterHandler<C>
where
    C: 'static,
    F: Fn(Controller<C>, State, bool) -> Fut + 'static,
    Fut: Future<Output = Result<(), ControllerError>> + 'static,
{
    Rc::new(move |controller: Controller<C>, state: State, upgrade: bool| {
        handler(controller, state, upgrade).boxed_local()
    })
}

impl<C: 'static> Default for StateHandlers<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for StateHandlers<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut enter: Vec<&String> = self.enter.keys().collect();
        let mut leave: Vec<&String> = self.leave.keys().collect();
        enter.sort();
        leave.sort();
        f.debug_struct("StateHandlers")
            .field("enter", &enter)
            .field("leave", &leave)
            .field("before_enter", &self.before_enter.is_some())
            .field("after_leave", &self.after_leave.is_some())
            .finish()
    }
}

#[async_trait(?Send)]
impl<C: 'static> ControllerHooks<C> for StateHandlers<C> {
    async fn enter(
        &self,
        controller: &Controller<C>,
        state: &State,
        upgrade: bool,
    ) -> Result<(), ControllerError> {
        let method = method_name("enter", state);
        let handler = match self.enter.get(&method) {
            Some(handler) => Rc::clone(handler),
            None => return Err(ControllerError::MissingStateMethod { method }),
        };
        handler(controller.clone(), state.clone(), upgrade).await
    }

    async fn leave(&self, controller: &Controller<C>, state: &State) -> Result<(), ControllerError> {
        match self.leave.get(&method_name("leave", state)) {
            Some(handler) => handler(controller.clone(), state.clone()).await,
            None => Ok(()),
        }
    }

    async fn before_enter(
        &self,
        controller: &Controller<C>,
        state: &State,
        upgrade: bool,
    ) -> Result<(), ControllerError> {
        match &self.before_enter {
            Some(handler) => handler(controller.clone(), state.clone(), upgrade).await,
            None => Ok(()),
        }
    }

    async fn after_leave(
        &self,
        controller: &Controller<C>,
        state: &State,
        upgrade: bool,
    ) -> Result<(), ControllerError> {
        match &self.after_leave {
            Some(handler) => handler(controller.clone(), state.clone(), upgrade).await,
            None => Ok(()),
        }
    }
}
