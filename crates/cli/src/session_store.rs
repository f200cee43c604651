//! On-disk session persistence.
//!
//! The CLI runs one command per process, so the session obtained by
//! `qkart login` is written to a JSON file and read back by later
//! commands. `qkart logout` deletes the file.
//!
//! # Location
//!
//! 1. `QKART_SESSION_FILE`, if set
//! 2. `$XDG_CONFIG_HOME/qkart/session.json`
//! 3. `$HOME/.config/qkart/session.json`

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use qkart_storefront::Session;

const SESSION_FILE_NAME: &str = "session.json";
#[cfg(unix)]
const OWNER_ONLY: u32 = 0o600;

/// Errors reading or writing the session file.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("cannot locate session file: set QKART_SESSION_FILE or HOME")]
    NoLocation,
    #[error("session file I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Serialized form of a [`Session`].
#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
    username: String,
    balance: Decimal,
}

/// Session file handle.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Use the session file at `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Locate the session file from the environment.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError::NoLocation` if no candidate variable is set.
    pub fn from_env() -> Result<Self, SessionStoreError> {
        if let Some(path) = non_empty_env("QKART_SESSION_FILE") {
            return Ok(Self::new(PathBuf::from(path)));
        }

        let config_dir = non_empty_env("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| non_empty_env("HOME").map(|home| Path::new(&home).join(".config")))
            .ok_or(SessionStoreError::NoLocation)?;

        Ok(Self::new(config_dir.join("qkart").join(SESSION_FILE_NAME)))
    }

    /// Path of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved session; `None` when logged out.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        let stored: StoredSession =
            serde_json::from_str(&contents).map_err(|source| SessionStoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        Ok(Some(Session::new(
            SecretString::from(stored.token),
            stored.username,
            stored.balance,
        )))
    }

    /// Save `session`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its directory cannot be written.
    pub async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        let stored = StoredSession {
            token: session.token().expose_secret().to_string(),
            username: session.username().to_string(),
            balance: session.balance(),
        };
        let contents = serde_json::to_string_pretty(&stored).map_err(|source| {
            SessionStoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        write_owner_only(&self.path, contents.as_bytes())
            .await
            .map_err(|source| self.io_error(source))?;

        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// Delete the saved session. Returns `true` if one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub async fn clear(&self) -> Result<bool, SessionStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> SessionStoreError {
        SessionStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Write `contents` to `path`, readable and writable by the owner only.
///
/// The file holds a bearer token, so its mode is set before any byte is
/// written. An existing file keeps its inode but loses wider permissions.
async fn write_owner_only(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(OWNER_ONLY);

    let mut file = options.open(path).await?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(OWNER_ONLY))
            .await?;
    }

    file.write_all(contents).await?;
    file.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("nested").join(SESSION_FILE_NAME))
    }

    fn session() -> Session {
        Session::new(
            SecretString::from("token-123"),
            "crio.do".to_string(),
            Decimal::new(5000, 0),
        )
    }

    #[tokio::test]
    async fn test_load_missing_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&session()).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded.username(), "crio.do");
        assert_eq!(loaded.balance(), Decimal::new(5000, 0));
        assert_eq!(loaded.token().expose_secret(), "token-123");
    }

    #[tokio::test]
    async fn test_clear_removes_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(!store.clear().await.unwrap());
        store.save(&session()).await.unwrap();
        assert!(store.clear().await.unwrap());
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);
        tokio::fs::write(&path, "{not json").await.unwrap();

        let err = SessionStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, SessionStoreError::Corrupt { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_save_tightens_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let store = SessionStore::new(path);
        store.save(&session()).await.unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().await.unwrap().unwrap().username(), "crio.do");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&session()).await.unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
