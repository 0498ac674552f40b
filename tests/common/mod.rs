//! Shared test utilities and fixtures.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use std::sync::Arc;

use feedclient::app::App;
use feedclient::config::Config;
use feedclient::model::User;
use feedclient::session::{MemoryTokenStore, TokenStore};
use serde_json::{json, Value};

pub use mock_backend::{CapturedRequest, MockBackend, MockResponse};

pub const TOKEN: &str = "test-token-123";

pub fn user() -> User {
    serde_json::from_value(json!({
        "_id": "u1",
        "userName": "ada",
        "email": "ada@example.com"
    }))
    .unwrap()
}

/// Post as the list and single endpoints return it.
pub fn post_json(id: &str, likes: u64, liked: bool) -> Value {
    json!({
        "_id": id,
        "title": format!("Title {id}"),
        "content": format!("Content {id}"),
        "user": {"_id": "u2", "userName": "grace", "profileImageSecureUrl": "https://cdn/u2.png"},
        "media": [],
        "likesCount": likes,
        "isLikedByUser": liked,
        "createdAt": "2024-05-01T10:00:00.000Z"
    })
}

pub fn page_json(ids: &[&str]) -> MockResponse {
    let posts: Vec<Value> = ids.iter().map(|id| post_json(id, 0, false)).collect();
    MockResponse::value(json!({"success": true, "data": posts}))
}

pub fn like_json(likes: u64, liked: bool) -> MockResponse {
    MockResponse::value(json!({"success": true, "likesCount": likes, "isLikedByUser": liked}))
}

pub fn config_for(mock: &MockBackend) -> Config {
    let mut config = Config::default();
    config.api.base_url = mock.api_url();
    config.api.timeout_seconds = 2;
    config.api.connect_timeout_seconds = 1;
    config
}

/// App signed in as [`user`] against `mock`.
pub async fn signed_in_app(mock: &MockBackend) -> (App, Arc<MemoryTokenStore>) {
    let tokens = Arc::new(MemoryTokenStore::with_session(TOKEN, user()));
    let app = App::new(&config_for(mock), tokens.clone()).unwrap();
    assert!(app.session.restore().await.unwrap());
    (app, tokens)
}

/// App with no stored session.
pub fn signed_out_app(mock: &MockBackend) -> (App, Arc<MemoryTokenStore>) {
    let tokens = Arc::new(MemoryTokenStore::new());
    let app = App::new(&config_for(mock), tokens.clone()).unwrap();
    (app, tokens)
}
