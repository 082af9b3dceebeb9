//! Transition history of a single controller.
//!
//! A history keeps the most recent transitions only; see [`StateHistory`].

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of one completed change of a controller's own state.
///
/// # Example
///
/// ```rust
/// use stateful_controller::core::{State, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: None,
///     to: Some(State::from("pages")),
///     upgrade: false,
///     timestamp: Utc::now(),
/// };
/// assert!(record.is_enter());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state that was left, if any
    pub from: Option<State>,
    /// The state that was entered, if any
    pub to: Option<State>,
    /// Whether the transition adopted existing results
    pub upgrade: bool,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    /// Entered a state from the unentered condition.
    pub fn is_enter(&self) -> bool {
        self.from.is_none() && self.to.is_some()
    }

    /// Left a state without entering a new one.
    pub fn is_leave(&self) -> bool {
        self.from.is_some() && self.to.is_none()
    }
}

/// Number of transitions a controller keeps unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Bounded, ordered history of a controller's transitions.
///
/// Once `limit` records are held, recording evicts the oldest one. A limit
/// of zero records nothing.
///
/// # Example
///
/// ```rust
/// use stateful_controller::core::{State, StateHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_limit(2);
/// for (from, to) in [(None, "a"), (Some("a"), "b"), (Some("b"), "c")] {
///     history.record(TransitionRecord {
///         from: from.map(State::from),
///         to: Some(State::from(to)),
///         upgrade: false,
///         timestamp: Utc::now(),
///     });
/// }
///
/// assert_eq!(history.len(), 2);
/// let path: Vec<_> = history.path().into_iter().flatten().map(State::name).collect();
/// assert_eq!(path, ["a", "b", "c"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: VecDeque<TransitionRecord>,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl StateHistory {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// An empty history keeping at most `limit` transitions.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
            limit,
        }
    }

    /// Append a transition, evicting the oldest when full.
    pub fn record(&mut self, transition: TransitionRecord) {
        if self.limit == 0 {
            return;
        }
        if self.transitions.len() >= self.limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// States traversed: the first `from`, then every `to`.
    pub fn path(&self) -> Vec<Option<&State>> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.front() {
            path.push(first.from.as_ref());
        }
        for transition in &self.transitions {
            path.push(transition.to.as_ref());
        }
        path
    }

    /// Time between the first and the last recorded transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Retained transitions, oldest first.
    pub fn transitions(&self) -> &VecDeque<TransitionRecord> {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: Option<&str>, to: Option<&str>) -> TransitionRecord {
        TransitionRecord {
            from: from.map(State::from),
            to: to.map(State::from),
            upgrade: false,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.path().is_empty());
        assert!(history.duration().is_none());
    }

    fn history_of(limit: usize, records: impl IntoIterator<Item = TransitionRecord>) -> StateHistory {
        let mut history = StateHistory::with_limit(limit);
        for transition in records {
            history.record(transition);
        }
        history
    }

    #[test]
    fn record_appends_in_place() {
        let mut history = StateHistory::new();
        history.record(record(None, Some("foo")));

        assert_eq!(history.len(), 1);
        assert_eq!(history.limit(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn full_history_evicts_oldest() {
        let states = ["a", "b", "c", "d", "e"];
        let history = history_of(
            3,
            states
                .windows(2)
                .map(|pair| record(Some(pair[0]), Some(pair[1]))),
        );

        assert_eq!(history.len(), 3);
        assert_eq!(history.transitions()[0].from.as_ref().unwrap(), "b");
        assert_eq!(history.transitions()[2].to.as_ref().unwrap(), "e");
    }

    #[test]
    fn long_running_history_stays_bounded() {
        let mut history = StateHistory::with_limit(16);
        for index in 0..10_000 {
            let (from, to) = if index % 2 == 0 { ("a", "b") } else { ("b", "a") };
            history.record(record(Some(from), Some(to)));
        }

        assert_eq!(history.len(), 16);
    }

    #[test]
    fn zero_limit_records_nothing() {
        let history = history_of(0, [record(None, Some("foo"))]);
        assert!(history.is_empty());
    }

    #[test]
    fn path_returns_state_sequence() {
        let history = history_of(
            DEFAULT_HISTORY_LIMIT,
            [
                record(None, Some("foo")),
                record(Some("foo"), Some("bar")),
                record(Some("bar"), None),
            ],
        );

        let names: Vec<Option<&str>> = history
            .path()
            .into_iter()
            .map(|s| s.map(State::name))
            .collect();
        assert_eq!(names, vec![None, Some("foo"), Some("bar"), None]);
    }

    #[test]
    fn duration_spans_first_to_last() {
        let start = Utc::now();
        let mut first = record(None, Some("foo"));
        first.timestamp = start;
        let mut second = record(Some("foo"), None);
        second.timestamp = start + chrono::Duration::milliseconds(10);

        let history = history_of(DEFAULT_HISTORY_LIMIT, [first, second]);
        assert_eq!(history.duration(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn record_kinds() {
        assert!(record(None, Some("foo")).is_enter());
        assert!(record(Some("foo"), None).is_leave());
        assert!(!record(Some("foo"), Some("bar")).is_enter());
    }

    #[test]
    fn history_serializes_by_state_name() {
        let history = history_of(5, [record(Some("foo"), Some("bar"))]);

        let json = serde_json::to_string(&history).unwrap();
        assert!(json.contains(r#""from":"foo""#));

        let deserialized: StateHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.len(), 1);
        assert_eq!(deserialized.limit(), 5);
        assert_eq!(deserialized.transitions()[0].to.as_ref().unwrap(), "bar");
    }
}
