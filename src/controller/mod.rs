//! Controllers and the state assignment protocol.
//!
//! A [`Controller`] owns a context, a current state and at most one child
//! controller. Assigning a state chain to a controller walks the chain down
//! the hierarchy, leaving old states leaf-first and entering new states
//! root-first.
//!
//! # Key Concepts
//!
//! - **Hooks**: the collaborator that gives each state its behavior
//! - **Linkage**: the single parent / single child relation
//! - **Transition**: the ordered leave/enter protocol with rollback
//! - **Queries**: read-only views over the whole chain
//!
//! Controllers are single-threaded: handles are `Rc`-based and transitions
//! are `!Send` futures driven by one cooperative executor.

mod hooks;
pub mod linkage;
mod queries;
mod registry;
mod transition;

pub use hooks::{ControllerHooks, DummyHooks};
pub use registry::StateHandlers;
pub use transition::TransitionDescriptor;

use crate::core::{State, StateHistory, DEFAULT_HISTORY_LIMIT};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use uuid::Uuid;

/// A node of the controller hierarchy.
///
/// `Controller` is a cheap, cloneable handle; clones refer to the same node.
/// A parent owns its child, a child only refers back to its parent.
///
/// # Example
///
/// ```rust
/// use stateful_controller::Controller;
///
/// # futures::executor::block_on(async {
/// let parent = Controller::dummy("context");
/// let child = Controller::dummy("context");
/// parent.set_child(Some(&child)).unwrap();
///
/// parent.assign_state(Some(vec![Some("a".into()), Some("b".into())]), false).await.unwrap();
/// let chain = child.full_state_chain();
/// assert_eq!(chain[0].as_ref().unwrap(), "a");
/// assert_eq!(chain[1].as_ref().unwrap(), "b");
/// # });
/// ```
pub struct Controller<C> {
    node: Rc<Node<C>>,
}

struct Node<C> {
    id: Uuid,
    context: Rc<C>,
    hooks: Box<dyn ControllerHooks<C>>,
    current_state: RefCell<Option<State>>,
    links: RefCell<Links<C>>,
    active_transition: RefCell<Option<TransitionDescriptor>>,
    history: RefCell<StateHistory>,
}

struct Links<C> {
    child: Option<Controller<C>>,
    parent: Weak<Node<C>>,
}

impl<C> Default for Links<C> {
    fn default() -> Self {
        Self {
            child: None,
            parent: Weak::new(),
        }
    }
}

impl<C: 'static> Controller<C> {
    /// Create an unlinked controller with no state.
    pub fn new(context: C, hooks: impl ControllerHooks<C> + 'static) -> Self {
        Self::with_shared_context(Rc::new(context), hooks)
    }

    /// Create a controller sharing an existing context, typically a parent's.
    pub fn with_shared_context(context: Rc<C>, hooks: impl ControllerHooks<C> + 'static) -> Self {
        Self::from_boxed(context, Box::new(hooks), DEFAULT_HISTORY_LIMIT)
    }

    /// Create a controller that accepts any state and does nothing.
    pub fn dummy(context: C) -> Self {
        Self::new(context, DummyHooks)
    }

    pub(crate) fn from_boxed(
        context: Rc<C>,
        hooks: Box<dyn ControllerHooks<C>>,
        history_limit: usize,
    ) -> Self {
        Self {
            node: Rc::new(Node {
                id: Uuid::new_v4(),
                context,
                hooks,
                current_state: RefCell::new(None),
                links: RefCell::new(Links::default()),
                active_transition: RefCell::new(None),
                history: RefCell::new(StateHistory::with_limit(history_limit)),
            }),
        }
    }
}

impl<C> Controller<C> {
    /// Unique id of this node, used in log fields.
    pub fn id(&self) -> Uuid {
        self.node.id
    }

    pub fn context(&self) -> &C {
        &self.node.context
    }

    /// The context as a shared handle, for building child controllers.
    pub fn shared_context(&self) -> Rc<C> {
        Rc::clone(&self.node.context)
    }

    pub fn current_state(&self) -> Option<State> {
        self.node.current_state.borrow().clone()
    }

    pub fn child(&self) -> Option<Controller<C>> {
        self.node.links.borrow().child.clone()
    }

    pub fn parent(&self) -> Option<Controller<C>> {
        self.node
            .links
            .borrow()
            .parent
            .upgrade()
            .map(|node| Controller { node })
    }

    /// The descriptor of the transition in flight, if any.
    pub fn active_transition(&self) -> Option<TransitionDescriptor> {
        self.node.active_transition.borrow().clone()
    }

    pub fn is_transitioning(&self) -> bool {
        self.node.active_transition.borrow().is_some()
    }

    /// The most recent completed transitions of this controller's own state.
    ///
    /// The view borrows the controller; drop it before awaiting a transition.
    pub fn history(&self) -> Ref<'_, StateHistory> {
        self.node.history.borrow()
    }

    /// Do both handles refer to the same node?
    pub fn is_same(&self, other: &Controller<C>) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    fn set_current_state(&self, state: Option<State>) {
        *self.node.current_state.borrow_mut() = state;
    }
}

impl<C> Clone for Controller<C> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
        }
    }
}

/// Identity comparison.
impl<C> PartialEq for Controller<C> {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl<C> Eq for Controller<C> {}

impl<C> fmt::Debug for Controller<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("id", &self.node.id)
            .field("current_state", &*self.node.current_state.borrow())
            .field("is_transitioning", &self.is_transitioning())
            .finish_non_exhaustive()
    }
}
