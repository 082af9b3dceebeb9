//! Macros for ergonomic state chain construction.

/// Build a [`StateChain`](crate::core::StateChain).
///
/// Entries may be `&str`, `String`, [`State`](crate::core::State),
/// [`CustomState`](crate::core::CustomState) or `Option<State>`.
///
/// # Example
///
/// ```
/// use stateful_controller::state_chain;
/// use stateful_controller::core::State;
///
/// let chain = state_chain!["pages", "contact", None::<State>];
/// assert_eq!(chain.len(), 3);
/// assert!(chain[2].is_none());
/// ```
#[macro_export]
macro_rules! state_chain {
    () => {
        ::std::vec::Vec::<::std::option::Option<$crate::core::State>>::new()
    };
    ($($state:expr),+ $(,)?) => {
        ::std::vec![$($crate::core::IntoChainEntry::into_chain_entry($state)),+]
    };
}
