//! Async authentication operations.

use std::sync::Arc;

use crate::api::{endpoints, ApiError, RemoteClient};
use crate::feed::{FeedEvent, FeedStore};
use crate::model::{Attachment, User};

use super::credentials::SecureString;
use super::event::SessionEvent;
use super::token_store::TokenStore;
use super::SessionStore;

/// Drives sign-in state and keeps the persisted credential in step with it.
#[derive(Clone)]
pub struct SessionController {
    client: RemoteClient,
    tokens: Arc<dyn TokenStore>,
    store: SessionStore,
    feed: FeedStore,
}

impl SessionController {
    pub fn new(
        client: RemoteClient,
        tokens: Arc<dyn TokenStore>,
        store: SessionStore,
        feed: FeedStore,
    ) -> Self {
        Self {
            client,
            tokens,
            store,
            feed,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Load the persisted session. Returns whether a user is signed in.
    pub async fn restore(&self) -> Result<bool, ApiError> {
        self.store.dispatch(SessionEvent::RestoreStarted);

        let stored = self
            .tokens
            .token()
            .and_then(|token| Ok((token, self.tokens.user()?)));
        match stored {
            Ok((Some(_), Some(user))) => {
                tracing::debug!(user = %user.user_name, "Restored session");
                self.store
                    .dispatch(SessionEvent::Restored { user: Some(user) });
                Ok(true)
            }
            Ok(_) => {
                self.store.dispatch(SessionEvent::Restored { user: None });
                Ok(false)
            }
            Err(err) => {
                let err = ApiError::from(err);
                tracing::warn!(error = %err, "Could not read saved session");
                self.store.dispatch(SessionEvent::RestoreFailed {
                    message: err.user_message(),
                });
                Err(err)
            }
        }
    }

    /// Create an account. Does not sign in.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let failed = |message| SessionEvent::RegisterFailed { message };
        self.require(&[("Username", username), ("Email", email), ("Password", password)], failed)?;

        self.store.dispatch(SessionEvent::RegisterStarted);
        match self.client.register(username.trim(), email.trim(), password).await {
            Ok(message) => {
                tracing::info!(username = %username.trim(), "Registered");
                self.store
                    .dispatch(SessionEvent::RegisterSucceeded { message: message.clone() });
                Ok(message)
            }
            Err(err) => Err(self.fail(err, failed)),
        }
    }

    /// Sign in and persist the returned token together with the user.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let failed = |message| SessionEvent::LoginFailed { message };
        self.require(&[("Email", email), ("Password", password)], failed)?;

        self.store.dispatch(SessionEvent::LoginStarted);
        let response = match self.client.login(email.trim(), password).await {
            Ok(response) => response,
            Err(err) => return Err(self.fail(err, failed)),
        };

        let (Some(token), Some(user)) = (response.token, response.user) else {
            let err = ApiError::MalformedResponse {
                endpoint: endpoints::display(endpoints::LOGIN),
                reason: "login response is missing the token or the user".to_string(),
            };
            return Err(self.fail(err, failed));
        };

        if let Err(err) = self.tokens.save(&SecureString::new(token), &user) {
            return Err(self.fail(err.into(), failed));
        }

        tracing::info!(user = %user.user_name, "Signed in");
        self.store.dispatch(SessionEvent::LoginSucceeded {
            user: user.clone(),
            message: response.message,
        });
        Ok(user)
    }

    /// Forget the credential and drop all cached feed data.
    ///
    /// The in-memory session is cleared even when the stored one could not
    /// be removed; that error is still returned.
    pub fn logout(&self) -> Result<(), ApiError> {
        let cleared = self.tokens.clear();
        self.store.dispatch(SessionEvent::LoggedOut);
        self.feed.dispatch(FeedEvent::Reset);
        tracing::info!("Signed out");
        cleared.map_err(ApiError::from)
    }

    /// Reload the signed-in user's profile.
    pub async fn fetch_profile(&self) -> Result<User, ApiError> {
        self.store.dispatch(SessionEvent::ProfileStarted);
        match self.client.profile().await {
            Ok(user) => Ok(self.profile_updated(user)),
            Err(err) => Err(self.fail(err, |message| SessionEvent::ProfileFailed { message })),
        }
    }

    /// Replace the profile image. Only images are accepted.
    pub async fn upload_profile_image(&self, image: &Attachment) -> Result<User, ApiError> {
        let failed = |message| SessionEvent::ProfileFailed { message };
        if !image.mime_type.starts_with("image/") {
            return Err(self.reject("Profile image must be an image", failed));
        }

        self.store.dispatch(SessionEvent::ProfileStarted);
        match self.client.upload_profile_image(image).await {
            Ok(user) => Ok(self.profile_updated(user)),
            Err(err) => Err(self.fail(err, failed)),
        }
    }

    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<String, ApiError> {
        let failed = |message| SessionEvent::PasswordChangeFailed { message };
        self.require(
            &[("Current password", old_password), ("New password", new_password)],
            failed,
        )?;

        self.store.dispatch(SessionEvent::PasswordChangeStarted);
        match self.client.change_password(old_password, new_password).await {
            Ok(message) => {
                self.store
                    .dispatch(SessionEvent::PasswordChanged { message: message.clone() });
                Ok(message)
            }
            Err(err) => Err(self.fail(err, failed)),
        }
    }

    /// Publish a fresh profile and keep the persisted copy current.
    fn profile_updated(&self, user: User) -> User {
        match self.tokens.token() {
            Ok(Some(token)) => {
                if let Err(err) = self.tokens.save(&token, &user) {
                    tracing::warn!(error = %err, "Could not persist updated profile");
                }
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "Could not read saved session"),
        }
        self.store
            .dispatch(SessionEvent::ProfileSucceeded { user: user.clone() });
        user
    }

    fn require(
        &self,
        fields: &[(&str, &str)],
        failed: impl FnOnce(String) -> SessionEvent,
    ) -> Result<(), ApiError> {
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(self.reject(&format!("{name} must not be empty"), failed)),
            None => Ok(()),
        }
    }

    fn reject(&self, message: &str, failed: impl FnOnce(String) -> SessionEvent) -> ApiError {
        self.store.dispatch(failed(message.to_string()));
        ApiError::InvalidArgument(message.to_string())
    }

    fn fail(&self, err: ApiError, failed: impl FnOnce(String) -> SessionEvent) -> ApiError {
        tracing::warn!(error = %err, kind = err.error_type(), "Session operation failed");
        self.store.dispatch(failed(err.user_message()));
        err
    }
}
