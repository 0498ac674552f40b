//! REST transport for the feed backend.
//!
//! [`RemoteClient`] issues one HTTP call per operation, attaches the bearer
//! token held by the session's token store, bounds every call with a
//! timeout and never retries. Responses are decoded into one explicit
//! schema per endpoint; anything else is rejected at this boundary.

mod client;
pub mod endpoints;
mod error;
pub mod schema;
mod timeout;

pub use client::RemoteClient;
pub use error::{ApiError, FailureKind};
pub use schema::{LikeResponse, LoginResponse};
pub use timeout::TimeoutConfig;
