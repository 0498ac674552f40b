//! Lifecycle events for authentication operations.

use crate::model::User;
use crate::mvi::Intent;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    RestoreStarted,
    Restored { user: Option<User> },
    RestoreFailed { message: String },

    RegisterStarted,
    RegisterSucceeded { message: String },
    RegisterFailed { message: String },

    LoginStarted,
    LoginSucceeded { user: User, message: String },
    LoginFailed { message: String },

    /// Covers profile fetch and profile image upload.
    ProfileStarted,
    ProfileSucceeded { user: User },
    ProfileFailed { message: String },

    PasswordChangeStarted,
    PasswordChanged { message: String },
    PasswordChangeFailed { message: String },

    LoggedOut,
}

impl Intent for SessionEvent {}
