//! Persistence of the session token and signed-in user.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::credentials::SecureString;
use crate::model::User;

/// Errors that can occur when reading or writing persisted credentials.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Failed to access session file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse session file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value persistence for the session credential.
///
/// Reads are scoped acquisitions: callers fetch the token per request
/// and drop it afterwards; nothing needs releasing.
pub trait TokenStore: Send + Sync {
    /// Stored bearer token, if any.
    fn token(&self) -> Result<Option<SecureString>, TokenStoreError>;

    /// Stored signed-in user, if any.
    fn user(&self) -> Result<Option<User>, TokenStoreError>;

    /// Persist a token together with its user, replacing any previous session.
    fn save(&self, token: &SecureString, user: &User) -> Result<(), TokenStoreError>;

    /// Forget the stored session.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
    user: User,
}

/// JSON file token store.
///
/// Default location is `<data_dir>/feedclient/session.json`. Writes take an
/// exclusive lock on the file and reads a shared one, so concurrent client
/// processes never observe a half-written session.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default session file path.
    pub fn default_path() -> PathBuf {
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        data_dir.join("feedclient").join("session.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read(&self) -> Result<Option<StoredSession>, TokenStoreError> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        FileExt::lock_shared(&file).map_err(|e| self.io_error(e))?;
        let mut content = String::new();
        let read = file.read_to_string(&mut content);
        FileExt::unlock(&file).map_err(|e| self.io_error(e))?;
        read.map_err(|e| self.io_error(e))?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| TokenStoreError::Parse {
                path: self.path.clone(),
                source: e,
            })
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Result<Option<SecureString>, TokenStoreError> {
        Ok(self
            .read()?
            .map(|s| SecureString::new(s.token))
            .filter(|t| !t.is_empty()))
    }

    fn user(&self) -> Result<Option<User>, TokenStoreError> {
        Ok(self.read()?.map(|s| s.user))
    }

    fn save(&self, token: &SecureString, user: &User) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let stored = StoredSession {
            token: token.expose().to_string(),
            user: user.clone(),
        };
        let content = serde_json::to_vec_pretty(&stored).map_err(|e| TokenStoreError::Parse {
            path: self.path.clone(),
            source: e,
        })?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(false);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(|e| self.io_error(e))?;

        // Truncate only once the lock is held.
        FileExt::lock_exclusive(&file).map_err(|e| self.io_error(e))?;
        let written = (|| -> std::io::Result<()> {
            file.set_len(0)?;
            file.write_all(&content)?;
            file.sync_all()
        })();
        FileExt::unlock(&file).map_err(|e| self.io_error(e))?;
        written.map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// In-memory token store for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    session: Mutex<Option<(SecureString, User)>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a signed-in session.
    pub fn with_session(token: &str, user: User) -> Self {
        Self {
            session: Mutex::new(Some((SecureString::new(token.to_string()), user))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Result<Option<SecureString>, TokenStoreError> {
        Ok(self.session.lock().as_ref().map(|(token, _)| token.clone()))
    }

    fn user(&self) -> Result<Option<User>, TokenStoreError> {
        Ok(self.session.lock().as_ref().map(|(_, user)| user.clone()))
    }

    fn save(&self, token: &SecureString, user: &User) -> Result<(), TokenStoreError> {
        *self.session.lock() = Some((token.clone(), user.clone()));
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.session.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user() -> User {
        User {
            id: "u1".into(),
            user_name: "ada".into(),
            email: "ada@example.com".into(),
            profile_image: None,
        }
    }

    #[test]
    fn file_store_empty_when_missing() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));
        assert!(store.token().unwrap().is_none());
        assert!(store.user().unwrap().is_none());
    }

    #[test]
    fn file_store_save_then_read() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));
        store
            .save(&SecureString::new("tok-1".into()), &user())
            .unwrap();

        assert_eq!(store.token().unwrap().unwrap().expose(), "tok-1");
        assert_eq!(store.user().unwrap(), Some(user()));
    }

    #[test]
    fn file_store_overwrite_shrinks_file() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));
        let mut long_user = user();
        long_user.email = "x".repeat(500);
        store
            .save(&SecureString::new("long".into()), &long_user)
            .unwrap();
        store.save(&SecureString::new("short".into()), &user()).unwrap();

        assert_eq!(store.token().unwrap().unwrap().expose(), "short");
        assert_eq!(store.user().unwrap(), Some(user()));
    }

    #[test]
    fn file_store_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));
        store.save(&SecureString::new("tok".into()), &user()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.token().unwrap().is_none());
    }

    #[test]
    fn file_store_reports_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileTokenStore::new(path);
        assert!(matches!(store.token(), Err(TokenStoreError::Parse { .. })));
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.token().unwrap().is_none());
        store.save(&SecureString::new("t".into()), &user()).unwrap();
        assert_eq!(store.user().unwrap(), Some(user()));
        store.clear().unwrap();
        assert!(store.user().unwrap().is_none());
    }
}
