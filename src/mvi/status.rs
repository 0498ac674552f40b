//! Request lifecycle status tracked per operation group.

/// Lifecycle of the most recent request in an operation group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestStatus {
    /// Nothing issued yet.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// The last request completed successfully.
    Succeeded,
    /// The last request failed; carries a human-readable message.
    Failed(String),
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Failure message, if the last request failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}
