//! Reducer trait for MVI architecture.

use super::intent::Intent;
use super::state::StoreState;

/// Reducer transforms state based on intents.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: (State, Intent) -> State
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: StoreState;

    /// The intent type this reducer handles.
    type Intent: Intent;

    /// Process an intent and return the new state.
    ///
    /// This should be a pure function with no side effects. It must not
    /// fail: every intent has a defined transition for every state.
    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
