//! Reducer for authentication state.

use crate::mvi::{Reducer, RequestStatus};

use super::event::SessionEvent;
use super::state::{SessionPhase, SessionState};

pub struct SessionReducer;

impl Reducer for SessionReducer {
    type State = SessionState;
    type Intent = SessionEvent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            SessionEvent::RestoreStarted => SessionState {
                phase: SessionPhase::Checking,
                ..state
            },

            SessionEvent::Restored { user } => {
                let phase = if user.is_some() {
                    SessionPhase::SignedIn
                } else {
                    SessionPhase::SignedOut
                };
                SessionState {
                    phase,
                    user,
                    ..state
                }
            }

            SessionEvent::RestoreFailed { message } => SessionState {
                phase: SessionPhase::SignedOut,
                user: None,
                status: RequestStatus::Failed(message.clone()),
                message,
            },

            SessionEvent::RegisterStarted
            | SessionEvent::LoginStarted
            | SessionEvent::ProfileStarted
            | SessionEvent::PasswordChangeStarted => SessionState {
                status: RequestStatus::Pending,
                ..state
            },

            SessionEvent::RegisterSucceeded { message }
            | SessionEvent::PasswordChanged { message } => SessionState {
                status: RequestStatus::Succeeded,
                message,
                ..state
            },

            SessionEvent::LoginSucceeded { user, message } => SessionState {
                phase: SessionPhase::SignedIn,
                user: Some(user),
                status: RequestStatus::Succeeded,
                message,
            },

            SessionEvent::ProfileSucceeded { user } => SessionState {
                user: Some(user),
                status: RequestStatus::Succeeded,
                ..state
            },

            SessionEvent::RegisterFailed { message }
            | SessionEvent::LoginFailed { message }
            | SessionEvent::ProfileFailed { message }
            | SessionEvent::PasswordChangeFailed { message } => SessionState {
                status: RequestStatus::Failed(message.clone()),
                message,
                ..state
            },

            SessionEvent::LoggedOut => SessionState {
                phase: SessionPhase::SignedOut,
                ..SessionState::default()
            },
        }
    }
}
