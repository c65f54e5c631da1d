//! Terminal and non-terminal states of a stochastic process

use serde::{Deserialize, Serialize};

/// A state of a Markov process, classified as terminal or non-terminal.
///
/// `Terminal` is absorbing: no transition is defined for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State<S> {
    /// The process has ended
    Terminal(S),
    /// The process may continue
    NonTerminal(S),
}

impl<S> State<S> {
    /// Apply `f` to the payload of a non-terminal state, or return `default`.
    ///
    /// `f` is never called for a terminal state.
    pub fn on_non_terminal<X, F>(&self, f: F, default: X) -> X
    where
        F: FnOnce(&S) -> X,
    {
        match self {
            Self::NonTerminal(state) => f(state),
            Self::Terminal(_) => default,
        }
    }

    /// Whether the process has ended
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    /// The payload, regardless of classification
    pub fn state(&self) -> &S {
        match self {
            Self::Terminal(state) | Self::NonTerminal(state) => state,
        }
    }

    /// Consume the state and return its payload
    pub fn into_inner(self) -> S {
        match self {
            Self::Terminal(state) | Self::NonTerminal(state) => state,
        }
    }

    /// The non-terminal witness, if this state can still transition
    pub fn non_terminal(self) -> Option<NonTerminal<S>> {
        match self {
            Self::NonTerminal(state) => Some(NonTerminal(state)),
            Self::Terminal(_) => None,
        }
    }

    /// Transform the payload, keeping the classification
    pub fn map<T, F>(self, f: F) -> State<T>
    where
        F: FnOnce(S) -> T,
    {
        match self {
            Self::Terminal(state) => State::Terminal(f(state)),
            Self::NonTerminal(state) => State::NonTerminal(f(state)),
        }
    }
}

/// A payload known to be non-terminal; the only input a transition accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NonTerminal<S>(pub S);

impl<S> NonTerminal<S> {
    /// The payload
    pub fn state(&self) -> &S {
        &self.0
    }

    /// Consume the witness and return its payload
    pub fn into_inner(self) -> S {
        self.0
    }
}

impl<S> From<NonTerminal<S>> for State<S> {
    fn from(state: NonTerminal<S>) -> Self {
        Self::NonTerminal(state.0)
    }
}
