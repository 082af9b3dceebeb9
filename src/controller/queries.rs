//! Read-only views over a controller chain.

use super::Controller;
use crate::core::{State, StateChain};

impl<C> Controller<C> {
    /// The top-most controller of this chain.
    pub fn root(&self) -> Controller<C> {
        let mut controller = self.clone();
        while let Some(parent) = controller.parent() {
            controller = parent;
        }
        controller
    }

    /// States of the child, grandchild and so on, nearest first.
    pub fn descendant_states(&self) -> StateChain {
        let mut states = Vec::new();
        let mut current = self.child();
        while let Some(controller) = current {
            states.push(controller.current_state());
            current = controller.child();
        }
        states
    }

    /// States of all ancestors, root first, own parent last.
    pub fn ancestor_states(&self) -> StateChain {
        let mut states = Vec::new();
        let mut current = self.parent();
        while let Some(controller) = current {
            states.push(controller.current_state());
            current = controller.parent();
        }
        states.reverse();
        states
    }

    /// The state chain of the whole tree this controller is part of.
    ///
    /// Same result from any controller of the chain.
    pub fn full_state_chain(&self) -> StateChain {
        self.full_state_chain_with(self.current_state())
    }

    /// Like [`full_state_chain`](Self::full_state_chain), with this
    /// controller's own entry replaced by `replacement`.
    pub fn full_state_chain_with(&self, replacement: Option<State>) -> StateChain {
        let mut states = self.ancestor_states();
        states.push(replacement);
        states.extend(self.descendant_states());
        states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(chain: &[Option<State>]) -> Vec<Option<&str>> {
        chain.iter().map(|s| s.as_ref().map(State::name)).collect()
    }

    fn linked_chain() -> Vec<Controller<()>> {
        let chain: Vec<Controller<()>> = (0..4).map(|_| Controller::dummy(())).collect();
        for pair in chain.windows(2) {
            pair[0].set_child(Some(&pair[1])).unwrap();
        }
        chain
    }

    #[test]
    fn root_follows_parents() {
        let chain = linked_chain();

        for controller in &chain {
            assert_eq!(controller.root(), chain[0]);
        }
    }

    #[test]
    fn unlinked_controller_is_its_own_root() {
        let controller = Controller::dummy(());
        assert_eq!(controller.root(), controller);
        assert!(controller.descendant_states().is_empty());
        assert!(controller.ancestor_states().is_empty());
        assert_eq!(names(&controller.full_state_chain()), vec![None]);
    }

    #[tokio::test]
    async fn state_lists_from_every_level() {
        let chain = linked_chain();
        let states = ["a", "b", "c", "d"]
            .iter()
            .map(|s| Some(State::from(*s)))
            .collect();
        chain[0].assign_state(Some(states), false).await.unwrap();

        assert_eq!(names(&chain[0].descendant_states()), vec![Some("b"), Some("c"), Some("d")]);
        assert_eq!(names(&chain[1].descendant_states()), vec![Some("c"), Some("d")]);
        assert_eq!(names(&chain[2].descendant_states()), vec![Some("d")]);
        assert!(chain[3].descendant_states().is_empty());

        assert!(chain[0].ancestor_states().is_empty());
        assert_eq!(names(&chain[1].ancestor_states()), vec![Some("a")]);
        assert_eq!(names(&chain[2].ancestor_states()), vec![Some("a"), Some("b")]);
        assert_eq!(names(&chain[3].ancestor_states()), vec![Some("a"), Some("b"), Some("c")]);

        for controller in &chain {
            assert_eq!(
                names(&controller.full_state_chain()),
                vec![Some("a"), Some("b"), Some("c"), Some("d")]
            );
        }

        for (index, controller) in chain.iter().enumerate() {
            let replaced = controller.full_state_chain_with(Some(State::from("X")));
            let mut expected = vec![Some("a"), Some("b"), Some("c"), Some("d")];
            expected[index] = Some("X");
            assert_eq!(names(&replaced), expected);
        }
    }
}
