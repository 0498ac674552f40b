//! Base trait for intents in MVI architecture.

/// Marker trait for intent objects.
///
/// Intents represent lifecycle events (an operation started, succeeded or
/// failed) and are processed by reducers to produce new states.
pub trait Intent: Send + 'static {}
