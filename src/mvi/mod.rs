//! Model-View-Intent (MVI) primitives shared by the feed and session layers.
//!
//! # Architecture
//!
//! ```text
//! Controller ──→ Intent ──→ Reducer ──→ State ──→ subscribers
//!     ↑                                              │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! - **State**: Immutable snapshot, shared with readers behind an `Arc`
//! - **Intent**: Lifecycle events emitted by asynchronous operations
//! - **Reducer**: Pure function that transforms state based on intents
//! - **Store**: Applies intents one at a time and publishes snapshots

mod intent;
mod reducer;
mod state;
mod status;
mod store;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::StoreState;
pub use status::RequestStatus;
pub use store::Store;
