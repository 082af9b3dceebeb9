//! Builder for constructing controllers.

use crate::builder::error::BuildError;
use crate::controller::{Controller, ControllerHooks, DummyHooks, StateHandlers};
use crate::core::DEFAULT_HISTORY_LIMIT;
use std::rc::Rc;

/// Builder for constructing controllers with a fluent API.
///
/// # Example
///
/// ```rust
/// use stateful_controller::builder::ControllerBuilder;
/// use stateful_controller::StateHandlers;
///
/// let controller = ControllerBuilder::new()
///     .context("client context")
///     .handlers(StateHandlers::new().on_enter("home", |_, _, _| async { Ok(()) }))
///     .build()
///     .unwrap();
///
/// assert_eq!(*controller.context(), "client context");
/// ```
pub struct ControllerBuilder<C> {
    context: Option<Rc<C>>,
    hooks: Option<Box<dyn ControllerHooks<C>>>,
    history_limit: usize,
}

impl<C: 'static> ControllerBuilder<C> {
    pub fn new() -> Self {
        Self {
            context: None,
            hooks: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Set the context (required).
    pub fn context(mut self, context: C) -> Self {
        self.context = Some(Rc::new(context));
        self
    }

    /// Share an existing context, typically the parent controller's.
    pub fn shared_context(mut self, context: Rc<C>) -> Self {
        self.context = Some(context);
        self
    }

    /// Set the hooks (required).
    pub fn hooks(mut self, hooks: impl ControllerHooks<C> + 'static) -> Self {
        self.hooks = Some(Box::new(hooks));
        self
    }

    /// Use a handler registry as hooks.
    pub fn handlers(self, handlers: StateHandlers<C>) -> Self {
        self.hooks(handlers)
    }

    /// Accept every state without doing anything.
    pub fn dummy(self) -> Self {
        self.hooks(DummyHooks)
    }

    /// Keep at most `limit` transitions in the controller's history.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Build the controller.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<Controller<C>, BuildError> {
        let context = self.context.ok_or(BuildError::MissingContext)?;
        let hooks = self.hooks.ok_or(BuildError::MissingHooks)?;
        Ok(Controller::from_boxed(context, hooks, self.history_limit))
    }
}

impl<C: 'static> Default for ControllerBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_validates_required_fields() {
        let result = ControllerBuilder::<()>::new().dummy().build();
        assert!(matches!(result, Err(BuildError::MissingContext)));

        let result = ControllerBuilder::new().context(()).build();
        assert!(matches!(result, Err(BuildError::MissingHooks)));
    }

    #[test]
    fn fluent_api_builds_controller() {
        let controller = ControllerBuilder::new()
            .context(42u32)
            .dummy()
            .build()
            .unwrap();

        assert_eq!(*controller.context(), 42);
        assert!(controller.current_state().is_none());
    }

    #[test]
    fn shared_context_is_not_copied() {
        let parent = Controller::dummy(String::from("shared"));
        let child = ControllerBuilder::new()
            .shared_context(parent.shared_context())
            .dummy()
            .build()
            .unwrap();

        assert!(Rc::ptr_eq(&parent.shared_context(), &child.shared_context()));
    }

    #[tokio::test]
    async fn history_limit_bounds_the_history() {
        let controller = ControllerBuilder::new()
            .context(())
            .dummy()
            .history_limit(4)
            .build()
            .unwrap();

        for index in 0..100 {
            let state = if index % 2 == 0 { "a" } else { "b" };
            controller
                .assign_state(Some(vec![Some(state.into())]), false)
                .await
                .unwrap();
        }

        assert_eq!(controller.history().limit(), 4);
        assert_eq!(controller.history().len(), 4);
        assert_eq!(controller.history().transitions()[3].to.as_ref().unwrap(), "b");
    }

    #[tokio::test]
    async fn built_controller_runs_its_handlers() {
        let controller = ControllerBuilder::new()
            .context(())
            .handlers(StateHandlers::new().on_enter("home", |_, _, _| async { Ok(()) }))
            .build()
            .unwrap();

        controller
            .assign_state(Some(vec![Some("home".into())]), false)
            .await
            .unwrap();
        assert_eq!(controller.current_state().unwrap(), "home");
    }
}
