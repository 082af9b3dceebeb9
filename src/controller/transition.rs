//! The state assignment protocol.
//!
//! `assign_state` drives a controller, and recursively its child chain, to a
//! target state chain:
//!
//! 1. the child subtree leaves its states (leaf first)
//! 2. this controller leaves its state and drops its child
//! 3. after-leave notification
//! 4. before-enter check, which may abort
//! 5. this controller enters the target state
//! 6. the child, possibly linked during step 5, is assigned the rest of the chain
//!
//! Each step is awaited before the next starts. On failure the controller's
//! own state is rolled back to the previous state. A controller runs at most
//! one transition at a time; the descriptor stored for the duration of the
//! call is the guard.

use super::Controller;
use crate::core::{describe, states_equal, ControllerError, State, StateChain, TransitionRecord};
use chrono::Utc;
use futures::future::{FutureExt, LocalBoxFuture};
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// The in-flight record of one `assign_state` call.
#[derive(Clone, Debug)]
pub struct TransitionDescriptor {
    /// Correlates log lines of one transition
    pub id: Uuid,
    /// State of the controller when the transition began
    pub previous: Option<State>,
    /// State this controller is moving to
    pub target: Option<State>,
    /// Chain handed to the child; `None` when no child state was requested
    pub child_chain: Option<StateChain>,
    pub upgrade: bool,
}

impl TransitionDescriptor {
    /// The state requested for the child, if one was requested.
    pub fn child_target(&self) -> Option<Option<&State>> {
        self.child_chain
            .as_ref()
            .map(|chain| chain.first().and_then(Option::as_ref))
    }
}

/// Clears the active transition when dropped, on every exit path.
struct TransitionGuard<'a, C> {
    controller: &'a Controller<C>,
}

impl<C> Drop for TransitionGuard<'_, C> {
    fn drop(&mut self) {
        self.controller.node.active_transition.borrow_mut().take();
    }
}

impl<C: 'static> Controller<C> {
    /// Assign a chain of states to this controller and its children.
    ///
    /// Element 0 of `chain` is the state of this controller, element 1 the
    /// state of its child, and so on. `None` leaves the current state without
    /// entering a new one.
    ///
    /// `upgrade` signals that the results of the target states already exist
    /// in some form (for example a page rendered by a server) and hooks should
    /// adopt them instead of creating them.
    ///
    /// # Errors
    ///
    /// - [`ControllerError::InvalidArgument`] for an empty chain
    /// - [`ControllerError::ConcurrentTransition`] while another transition of
    ///   this controller is in flight
    /// - [`ControllerError::MissingChildController`] /
    ///   [`ControllerError::MissingChildState`] when the chain does not match
    ///   the controllers linked by the states
    /// - any error raised by a hook
    pub fn assign_state(
        &self,
        chain: Option<StateChain>,
        upgrade: bool,
    ) -> LocalBoxFuture<'_, Result<(), ControllerError>> {
        async move { self.run_transition(chain, upgrade).await }.boxed_local()
    }

    /// Leave the current state of this controller and its children.
    pub fn clear_state(&self, upgrade: bool) -> LocalBoxFuture<'_, Result<(), ControllerError>> {
        self.assign_state(None, upgrade)
    }

    async fn run_transition(
        &self,
        chain: Option<StateChain>,
        upgrade: bool,
    ) -> Result<(), ControllerError> {
        let mut chain = chain.unwrap_or_else(|| vec![None]);
        if chain.is_empty() {
            return Err(ControllerError::InvalidArgument(
                "a state chain must contain at least one entry".to_string(),
            ));
        }

        let child_chain = (chain.len() > 1).then(|| chain.split_off(1));
        let descriptor = TransitionDescriptor {
            id: Uuid::new_v4(),
            previous: self.current_state(),
            target: chain.pop().flatten(),
            child_chain,
            upgrade,
        };

        let _guard = self.begin(descriptor.clone())?;

        debug!(
            controller = %self.id(),
            transition = %descriptor.id,
            from = %describe(descriptor.previous.as_ref()),
            to = %describe(descriptor.target.as_ref()),
            upgrade,
            "assigning state"
        );

        if states_equal(descriptor.previous.as_ref(), descriptor.target.as_ref())? {
            trace!(transition = %descriptor.id, "state unchanged");
            return self.assign_child_state(&descriptor).await;
        }

        match self.transition(&descriptor).await {
            Ok(()) => {
                self.record(&descriptor);
                Ok(())
            }
            Err(err) => {
                warn!(
                    controller = %self.id(),
                    transition = %descriptor.id,
                    error = %err,
                    "transition failed, restoring {}",
                    describe(descriptor.previous.as_ref())
                );
                self.set_current_state(descriptor.previous.clone());
                Err(err)
            }
        }
    }

    fn begin(
        &self,
        descriptor: TransitionDescriptor,
    ) -> Result<TransitionGuard<'_, C>, ControllerError> {
        let mut active = self.node.active_transition.borrow_mut();
        if active.is_some() {
            return Err(ControllerError::ConcurrentTransition);
        }
        *active = Some(descriptor);
        Ok(TransitionGuard { controller: self })
    }

    async fn transition(&self, t: &TransitionDescriptor) -> Result<(), ControllerError> {
        if let Some(child) = self.child() {
            trace!(transition = %t.id, "child leave");
            child.assign_state(None, t.upgrade).await?;
        }

        if let Some(previous) = &t.previous {
            trace!(transition = %t.id, state = %previous, "leave");
            let left = self.node.hooks.leave(self, previous).await;
            self.set_current_state(None);
            super::linkage::set_child(self, None)?;
            left?;

            trace!(transition = %t.id, state = %previous, "after leave");
            self.node
                .hooks
                .after_leave(self, previous, t.upgrade)
                .await?;
        }

        if let Some(target) = &t.target {
            trace!(transition = %t.id, state = %target, "before enter");
            self.node
                .hooks
                .before_enter(self, target, t.upgrade)
                .await?;

            trace!(transition = %t.id, state = %target, "enter");
            self.set_current_state(Some(target.clone()));
            self.node.hooks.enter(self, target, t.upgrade).await?;
        }

        self.assign_child_state(t).await
    }

    /// Hand the rest of the chain to the child linked by the target state.
    /// A linked child with no state requested for it is an error.
    async fn assign_child_state(&self, t: &TransitionDescriptor) -> Result<(), ControllerError> {
        if t.child_chain.is_some() {
            return self.delegate_to_child(t).await;
        }

        if let (Some(target), Some(_)) = (&t.target, self.child()) {
            return Err(ControllerError::MissingChildState {
                state: target.to_string(),
            });
        }

        Ok(())
    }

    async fn delegate_to_child(&self, t: &TransitionDescriptor) -> Result<(), ControllerError> {
        let Some(chain) = &t.child_chain else {
            return Ok(());
        };

        let Some(child) = self.child() else {
            return Err(ControllerError::MissingChildController {
                state: describe(t.target.as_ref()),
                child_state: describe(t.child_target().flatten()),
            });
        };

        trace!(transition = %t.id, child = %child.id(), "child state");
        child.assign_state(Some(chain.clone()), t.upgrade).await
    }

    fn record(&self, t: &TransitionDescriptor) {
        self.node.history.borrow_mut().record(TransitionRecord {
            from: t.previous.clone(),
            to: t.target.clone(),
            upgrade: t.upgrade,
            timestamp: Utc::now(),
        });
    }
}
