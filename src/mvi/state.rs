//! Base trait for store state in MVI architecture.

/// Marker trait for state objects.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Self-contained (all data a reader needs)
/// - Comparable (PartialEq for detecting changes)
/// - Shareable across tasks (handed out as `Arc` snapshots)
pub trait StoreState: Clone + PartialEq + Default + Send + Sync + 'static {}
