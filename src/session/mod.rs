//! Authentication: the bearer credential, its persistence, and the
//! signed-in state that the feed depends on.

mod controller;
mod credentials;
mod event;
mod reducer;
mod state;
mod token_store;

pub use controller::SessionController;
pub use credentials::{build_auth_header, AuthHeader, SecureString};
pub use event::SessionEvent;
pub use reducer::SessionReducer;
pub use state::{SessionPhase, SessionState};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};

use crate::mvi::Store;

pub type SessionStore = Store<SessionReducer>;
