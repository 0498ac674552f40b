//! Client-side feed state machine.
//!
//! # Architecture
//!
//! Uses the MVI pattern:
//! - `state.rs` - posts, comments by post, cursor, request status
//! - `event.rs` - started / succeeded / failed lifecycle events
//! - `reducer.rs` - pure state transitions
//! - `controller.rs` - async operations that call the backend and emit events

mod controller;
mod event;
mod reducer;
mod state;

pub use controller::FeedController;
pub use event::FeedEvent;
pub use reducer::FeedReducer;
pub use state::{Cursor, FeedState, OperationKind, DEFAULT_PAGE_LIMIT};

use crate::mvi::Store;

/// Shared feed store handle.
pub type FeedStore = Store<FeedReducer>;
