use std::sync::Arc;

use crate::api::{ApiError, RemoteClient};
use crate::config::Config;
use crate::feed::{FeedController, FeedState, FeedStore};
use crate::session::{SessionController, SessionStore, TokenStore};

/// Wires the client, stores and controllers together.
///
/// Cloning is cheap; clones share the same stores.
#[derive(Clone)]
pub struct App {
    pub feed: FeedController,
    pub session: SessionController,
}

impl App {
    pub fn new(config: &Config, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let client = RemoteClient::new(&config.api, tokens.clone())?;
        let feed_store = FeedStore::new(FeedState::with_page_limit(config.feed.page_limit));
        let session_store = SessionStore::default();

        let feed = FeedController::new(client.clone(), feed_store.clone(), session_store.clone());
        let session = SessionController::new(client, tokens, session_store, feed_store);

        Ok(Self { feed, session })
    }
}
