//! Credential storage.
//!
//! The menu does not care where the API key lives. Hosts plug in any
//! [`CredentialStore`]; this module ships a JSON file store, a read-only
//! environment store, an in-memory store and a chain of two stores.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use xai_balance_core::Credentials;

use crate::controller::RefreshHandle;
use crate::error::MenuError;

/// Environment variable holding the management API key.
pub const API_KEY_VAR: &str = "XAI_API_KEY";
/// Environment variable holding the team id.
pub const TEAM_ID_VAR: &str = "XAI_TEAM_ID";

/// Errors from a credential store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("credential store I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stored credentials could not be parsed.
    #[error("malformed credentials: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The store cannot be written to.
    #[error("credential store is read-only: {0}")]
    ReadOnly(&'static str),
}

/// Somewhere credentials are kept between runs.
pub trait CredentialStore: Send + Sync {
    /// Load stored credentials; `Ok(None)` if there are none.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read.
    fn load(&self) -> Result<Option<Credentials>, StoreError>;

    /// Replace the stored credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn save(&self, credentials: &Credentials) -> Result<(), StoreError>;
}

/// Credentials in a JSON file: `{"api_key": "...", "team_id": "..."}`.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store backed by `path`. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credentials>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let credentials: Credentials = serde_json::from_str(&contents)?;
        if !credentials.is_complete() {
            tracing::warn!(path = %self.path.display(), "Stored credentials are incomplete");
            return Ok(None);
        }
        Ok(Some(credentials))
    }

    fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        let contents = serde_json::to_string_pretty(credentials)?;
        write_private(&self.path, contents.as_bytes())?;
        tracing::info!(path = %self.path.display(), team_id = %credentials.team_id, "Credentials saved");
        Ok(())
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    fs::write(path, contents)
}

/// Read-only credentials from `XAI_API_KEY` and `XAI_TEAM_ID`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentialStore;

impl CredentialStore for EnvCredentialStore {
    fn load(&self) -> Result<Option<Credentials>, StoreError> {
        let api_key = std::env::var(API_KEY_VAR).ok();
        let team_id = std::env::var(TEAM_ID_VAR).ok();
        Ok(api_key
            .zip(team_id)
            .map(|(api_key, team_id)| Credentials::new(api_key, team_id))
            .filter(Credentials::is_complete))
    }

    fn save(&self, _credentials: &Credentials) -> Result<(), StoreError> {
        Err(StoreError::ReadOnly("environment"))
    }
}

/// In-process store, for embedding hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credentials: Mutex<Option<Credentials>>,
}

impl MemoryCredentialStore {
    /// Store holding `credentials`.
    #[must_use]
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials: Mutex::new(Some(credentials)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credentials>, StoreError> {
        Ok(self
            .credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        *self
            .credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(credentials.clone());
        Ok(())
    }
}

/// Loads from `primary`, falling back to `fallback`; saves to `primary`.
#[derive(Debug, Clone)]
pub struct ChainedCredentialStore<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> ChainedCredentialStore<P, F> {
    /// Chain two stores.
    pub const fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: CredentialStore, F: CredentialStore> CredentialStore for ChainedCredentialStore<P, F> {
    fn load(&self) -> Result<Option<Credentials>, StoreError> {
        match self.primary.load() {
            Ok(Some(credentials)) => return Ok(Some(credentials)),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "Primary credential store unreadable, trying fallback");
            }
        }
        self.fallback.load()
    }

    fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        self.primary.save(credentials)
    }
}

/// Save newly entered credentials and apply them.
///
/// The credentials are applied even if saving fails, so the current session
/// uses them; the save error is still returned for the host to report.
///
/// # Errors
///
/// Returns [`MenuError::Store`] if saving failed or [`MenuError::Refresh`]
/// if the controller has stopped.
pub fn submit_credentials(
    store: &dyn CredentialStore,
    handle: &RefreshHandle,
    credentials: Credentials,
) -> Result<(), MenuError> {
    let saved = store.save(&credentials);
    if let Err(err) = &saved {
        tracing::warn!(error = %err, "Failed to save credentials");
    }
    handle.set_credentials(credentials)?;
    saved.map_err(MenuError::from)
}
