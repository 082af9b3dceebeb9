//! State values and their identity rules.
//!
//! A state is either a plain identifier or a custom object carrying a name
//! and its own equality test. Equality is a pattern match over the two
//! shapes; only the left operand's equality test is ever consulted.

use super::error::ControllerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// An ordered sequence of states, one per level of a controller chain.
///
/// Element 0 targets the controller the chain is assigned to, element 1 its
/// child, and so on. `None` means "no state" for that level.
pub type StateChain = Vec<Option<State>>;

type EqualityFn = Rc<dyn Fn(&CustomState, &State) -> bool>;

/// A state value.
///
/// States are immutable once constructed. Cloning is cheap: a custom state
/// shares its payload.
///
/// # Example
///
/// ```rust
/// use stateful_controller::core::{states_equal, State};
///
/// let a = State::from("contact");
/// let b = State::from("contact");
/// assert!(states_equal(Some(&a), Some(&b)).unwrap());
/// assert_eq!(a.name(), "contact");
/// ```
#[derive(Clone, Debug)]
pub enum State {
    /// An opaque identifier compared by value.
    Id(String),
    /// An object state with its own name and equality test.
    Custom(CustomState),
}

impl State {
    /// The name used for display and handler-name derivation.
    pub fn name(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Custom(custom) => custom.name(),
        }
    }

    /// The identifier, if this is an identifier state.
    pub fn as_id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id),
            Self::Custom(_) => None,
        }
    }

    /// The custom state, if this is one.
    pub fn as_custom(&self) -> Option<&CustomState> {
        match self {
            Self::Id(_) => None,
            Self::Custom(custom) => Some(custom),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for State {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for State {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<CustomState> for State {
    fn from(custom: CustomState) -> Self {
        Self::Custom(custom)
    }
}

impl PartialEq<str> for State {
    fn eq(&self, other: &str) -> bool {
        self.as_id() == Some(other)
    }
}

impl PartialEq<&str> for State {
    fn eq(&self, other: &&str) -> bool {
        self.as_id() == Some(*other)
    }
}

/// States cross process boundaries by name only.
impl Serialize for State {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for State {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::Id)
    }
}

/// A state object with a name, an arbitrary payload and an equality test.
///
/// The equality test is mandatory for any custom state that takes part in a
/// comparison; comparing a custom state that lacks one is a
/// [`ControllerError::ContractViolation`].
///
/// # Example
///
/// ```rust
/// use stateful_controller::core::{states_equal, CustomState, State};
///
/// let page = CustomState::new("page", 42u32).with_equality(|me, other| {
///     other
///         .as_custom()
///         .and_then(|other| other.payload::<u32>())
///         .zip(me.payload::<u32>())
///         .is_some_and(|(a, b)| a == b)
/// });
/// let same = CustomState::new("page", 42u32);
///
/// let page = State::from(page);
/// assert!(states_equal(Some(&page), Some(&State::from(same))).unwrap());
/// ```
#[derive(Clone)]
pub struct CustomState {
    name: String,
    payload: Rc<dyn Any>,
    equality: Option<EqualityFn>,
}

impl CustomState {
    /// Create a custom state without an equality test.
    pub fn new<T: Any>(name: impl Into<String>, payload: T) -> Self {
        Self {
            name: name.into(),
            payload: Rc::new(payload),
            equality: None,
        }
    }

    /// Attach the equality test. It receives this state and the other operand.
    pub fn with_equality<F>(mut self, equals: F) -> Self
    where
        F: Fn(&CustomState, &State) -> bool + 'static,
    {
        self.equality = Some(Rc::new(equals));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrow the payload as `T`, if that is its type.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    pub fn has_equality(&self) -> bool {
        self.equality.is_some()
    }

    /// Compare against another state with this state's equality test.
    pub fn is_state_equal(&self, other: &State) -> Result<bool, ControllerError> {
        match &self.equality {
            Some(equals) => Ok(equals(self, other)),
            None => Err(ControllerError::ContractViolation(format!(
                "custom state \"{}\" must implement an equality test",
                self.name
            ))),
        }
    }
}

impl fmt::Debug for CustomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomState")
            .field("name", &self.name)
            .field("has_equality", &self.has_equality())
            .finish_non_exhaustive()
    }
}

/// Are two (optional) states equal?
///
/// Identifiers compare by value. A custom left operand decides with its own
/// equality test; an identifier never equals a custom state on its right.
pub fn states_equal(a: Option<&State>, b: Option<&State>) -> Result<bool, ControllerError> {
    match (a, b) {
        (Some(State::Custom(custom)), Some(other)) => custom.is_state_equal(other),
        (Some(State::Id(a)), Some(State::Id(b))) => Ok(a == b),
        (None, None) => Ok(true),
        _ => Ok(false),
    }
}

/// Are two state chains equal, element by element?
pub fn chains_equal(a: &[Option<State>], b: &[Option<State>]) -> Result<bool, ControllerError> {
    if std::ptr::eq(a, b) {
        return Ok(true);
    }

    if a.len() != b.len() {
        return Ok(false);
    }

    for (left, right) in a.iter().zip(b) {
        if !states_equal(left.as_ref(), right.as_ref())? {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Derive a handler name from a state.
///
/// `method_name("enter", &"foo bar".into())` is `"enterFooBar"`;
/// `method_name("", &"foo bar".into())` is `"fooBar"`.
pub fn method_name(prefix: &str, state: &State) -> String {
    let mut name = String::from(prefix);

    for (index, word) in state.name().split_whitespace().enumerate() {
        if index == 0 && prefix.is_empty() {
            name.push_str(word);
            continue;
        }

        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }

    name
}

/// Conversion into a single state chain entry, used by [`state_chain!`](crate::state_chain).
pub trait IntoChainEntry {
    fn into_chain_entry(self) -> Option<State>;
}

impl IntoChainEntry for &str {
    fn into_chain_entry(self) -> Option<State> {
        Some(State::from(self))
    }
}

impl IntoChainEntry for String {
    fn into_chain_entry(self) -> Option<State> {
        Some(State::from(self))
    }
}

impl IntoChainEntry for State {
    fn into_chain_entry(self) -> Option<State> {
        Some(self)
    }
}

impl IntoChainEntry for CustomState {
    fn into_chain_entry(self) -> Option<State> {
        Some(State::Custom(self))
    }
}

impl IntoChainEntry for Option<State> {
    fn into_chain_entry(self) -> Option<State> {
        self
    }
}

/// Render an optional state for messages and log fields.
pub(crate) fn describe(state: Option<&State>) -> String {
    state.map_or_else(|| "null".to_string(), |s| s.name().to_string())
}
