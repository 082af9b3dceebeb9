//! The parent/child relation between controllers.
//!
//! `set_child` and `set_parent` are two views of one relation update. Both
//! detach the old partners of either endpoint before linking, so that
//! `a.child() == Some(b)` holds exactly when `b.parent() == Some(a)`.
//! Neither touches states or runs hooks.

use super::Controller;
use crate::core::ControllerError;
use std::rc::{Rc, Weak};

/// Make `child` the child of `parent`, or detach `parent`'s child when `None`.
pub fn set_child<C>(
    parent: &Controller<C>,
    child: Option<&Controller<C>>,
) -> Result<(), ControllerError> {
    match child {
        Some(child) => link(parent, child),
        None => {
            detach_child(parent);
            Ok(())
        }
    }
}

/// Make `parent` the parent of `child`, or detach `child` from its parent
/// when `None`.
pub fn set_parent<C>(
    child: &Controller<C>,
    parent: Option<&Controller<C>>,
) -> Result<(), ControllerError> {
    match parent {
        Some(parent) => link(parent, child),
        None => {
            detach_parent(child);
            Ok(())
        }
    }
}

fn link<C>(parent: &Controller<C>, child: &Controller<C>) -> Result<(), ControllerError> {
    if parent.is_same(child) || is_ancestor(child, parent) {
        return Err(ControllerError::InvalidArgument(
            "a controller cannot become its own ancestor".to_string(),
        ));
    }

    if parent.child().is_some_and(|current| current.is_same(child)) {
        return Ok(());
    }

    detach_child(parent);
    detach_parent(child);

    child.node.links.borrow_mut().parent = Rc::downgrade(&parent.node);
    parent.node.links.borrow_mut().child = Some(child.clone());
    Ok(())
}

fn detach_child<C>(parent: &Controller<C>) {
    let old = parent.node.links.borrow_mut().child.take();
    if let Some(old) = old {
        old.node.links.borrow_mut().parent = Weak::new();
    }
}

fn detach_parent<C>(child: &Controller<C>) {
    let old = std::mem::take(&mut child.node.links.borrow_mut().parent).upgrade();
    if let Some(old) = old {
        old.links.borrow_mut().child = None;
    }
}

/// Is `candidate` an ancestor of `node`?
fn is_ancestor<C>(candidate: &Controller<C>, node: &Controller<C>) -> bool {
    let mut current = node.parent();
    while let Some(controller) = current {
        if controller.is_same(candidate) {
            return true;
        }
        current = controller.parent();
    }
    false
}

impl<C> Controller<C> {
    /// See [`set_child`].
    pub fn set_child(&self, child: Option<&Controller<C>>) -> Result<(), ControllerError> {
        set_child(self, child)
    }

    /// See [`set_parent`].
    pub fn set_parent(&self, parent: Option<&Controller<C>>) -> Result<(), ControllerError> {
        set_parent(self, parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controllers() -> (Controller<()>, Controller<()>, Controller<()>, Controller<()>) {
        (
            Controller::dummy(()),
            Controller::dummy(()),
            Controller::dummy(()),
            Controller::dummy(()),
        )
    }

    #[test]
    fn set_child_updates_both_sides() {
        let (parent, child, _, _) = controllers();

        parent.set_child(Some(&child)).unwrap();

        assert_eq!(parent.child(), Some(child.clone()));
        assert_eq!(child.parent(), Some(parent.clone()));
        assert!(parent.parent().is_none());
        assert!(child.child().is_none());
    }

    #[test]
    fn set_parent_updates_both_sides() {
        let (parent, child, _, _) = controllers();

        child.set_parent(Some(&parent)).unwrap();

        assert_eq!(parent.child(), Some(child.clone()));
        assert_eq!(child.parent(), Some(parent));
    }

    #[test]
    fn replacing_child_detaches_previous_child() {
        let (parent, first, second, _) = controllers();

        parent.set_child(Some(&first)).unwrap();
        parent.set_child(Some(&second)).unwrap();

        assert_eq!(parent.child(), Some(second.clone()));
        assert_eq!(second.parent(), Some(parent));
        assert!(first.parent().is_none());
    }

    #[test]
    fn adopting_child_detaches_it_from_previous_parent() {
        let (first, second, child, _) = controllers();

        first.set_child(Some(&child)).unwrap();
        second.set_child(Some(&child)).unwrap();

        assert!(first.child().is_none());
        assert_eq!(second.child(), Some(child.clone()));
        assert_eq!(child.parent(), Some(second));
    }

    #[test]
    fn set_parent_detaches_both_previous_partners() {
        let (a, b, c, d) = controllers();

        a.set_child(Some(&b)).unwrap();
        c.set_child(Some(&d)).unwrap();

        // b moves under c: a loses b, d loses c
        b.set_parent(Some(&c)).unwrap();

        assert!(a.child().is_none());
        assert!(d.parent().is_none());
        assert_eq!(c.child(), Some(b.clone()));
        assert_eq!(b.parent(), Some(c));
    }

    #[test]
    fn clearing_links() {
        let (parent, child, other, _) = controllers();

        parent.set_child(Some(&child)).unwrap();
        parent.set_child(None).unwrap();
        assert!(parent.child().is_none());
        assert!(child.parent().is_none());

        other.set_child(Some(&child)).unwrap();
        child.set_parent(None).unwrap();
        assert!(other.child().is_none());
        assert!(child.parent().is_none());
    }

    #[test]
    fn relinking_same_pair_is_a_noop() {
        let (parent, child, _, _) = controllers();

        parent.set_child(Some(&child)).unwrap();
        parent.set_child(Some(&child)).unwrap();

        assert_eq!(parent.child(), Some(child.clone()));
        assert_eq!(child.parent(), Some(parent));
    }

    #[test]
    fn cycles_are_rejected() {
        let (a, b, c, _) = controllers();
        a.set_child(Some(&b)).unwrap();
        b.set_child(Some(&c)).unwrap();

        assert!(matches!(
            a.set_child(Some(&a)),
            Err(ControllerError::InvalidArgument(_))
        ));
        assert!(matches!(
            c.set_child(Some(&a)),
            Err(ControllerError::InvalidArgument(_))
        ));
        assert!(matches!(
            a.set_parent(Some(&c)),
            Err(ControllerError::InvalidArgument(_))
        ));

        // the failed calls left the chain untouched
        assert_eq!(a.child(), Some(b.clone()));
        assert_eq!(b.child(), Some(c.clone()));
        assert!(a.parent().is_none());
    }

    #[test]
    fn linkage_does_not_touch_state() {
        let (parent, child, _, _) = controllers();

        parent.set_child(Some(&child)).unwrap();

        assert!(parent.current_state().is_none());
        assert!(child.current_state().is_none());
        assert!(!parent.is_transitioning());
    }
}
