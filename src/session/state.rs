//! Authentication state.

use crate::model::User;
use crate::mvi::{RequestStatus, StoreState};

/// Where the session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Persisted credentials have not been inspected yet.
    #[default]
    Checking,
    SignedOut,
    SignedIn,
}

/// Snapshot of the authentication state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub user: Option<User>,
    /// Status of the most recent auth request.
    pub status: RequestStatus,
    /// Last human-readable outcome (success or failure).
    pub message: String,
}

impl StoreState for SessionState {}

impl SessionState {
    pub fn is_signed_in(&self) -> bool {
        self.phase == SessionPhase::SignedIn
    }

    /// Signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        if self.is_signed_in() {
            self.user.as_ref()
        } else {
            None
        }
    }
}
