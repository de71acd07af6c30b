//! Session storage and observable session state.
//!
//! The session is the client-local belief about authentication: a pair of
//! bearer tokens persisted as a TOML file under the platform config
//! directory. Token presence is the only signal of "logged in" — there is
//! no expiry tracking and no client-side token validation.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::{RsvpError, RsvpResult};

/// Access and refresh tokens as persisted locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Whether the client currently believes it is authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

/// Storage capability for session tokens.
///
/// [`FileSessionStore`] is the production implementation;
/// [`MemorySessionStore`] is an in-memory double for tests.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> RsvpResult<Option<SessionTokens>>;
    fn set(&self, tokens: &SessionTokens) -> RsvpResult<()>;
    fn clear(&self) -> RsvpResult<()>;
}

/// Token storage at ~/.config/rsvp/session.toml
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSessionStore { path: path.into() }
    }

    /// Default session path under the platform config directory.
    pub fn default_path() -> RsvpResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RsvpError::Config("Could not determine config directory".into()))?;

        Ok(config_dir.join("rsvp").join("session.toml"))
    }

    pub fn open_default() -> RsvpResult<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> RsvpResult<Option<SessionTokens>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;

        let tokens: SessionTokens = toml::from_str(&contents).map_err(|e| {
            RsvpError::Session(format!(
                "Failed to parse session from {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(Some(tokens))
    }

    fn set(&self, tokens: &SessionTokens) -> RsvpResult<()> {
        let contents =
            toml::to_string_pretty(tokens).map_err(|e| RsvpError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.path, contents)?;

        // Set to owner-only (0600) since the file contains bearer tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    fn clear(&self) -> RsvpResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory token storage, for tests.
#[derive(Default)]
pub struct MemorySessionStore {
    tokens: Mutex<Option<SessionTokens>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RsvpResult<std::sync::MutexGuard<'_, Option<SessionTokens>>> {
        self.tokens
            .lock()
            .map_err(|_| RsvpError::Session("Session store mutex poisoned".into()))
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> RsvpResult<Option<SessionTokens>> {
        Ok(self.lock()?.clone())
    }

    fn set(&self, tokens: &SessionTokens) -> RsvpResult<()> {
        *self.lock()? = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> RsvpResult<()> {
        *self.lock()? = None;
        Ok(())
    }
}

/// Observable session handle shared by the API client and the view layer.
///
/// Wraps a [`SessionStore`] and publishes [`SessionState`] over a watch
/// channel. Login success, explicit logout, and a detected-invalid-token
/// all publish through here, so the view subscribes to transitions instead
/// of re-checking after every action.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
    tx: watch::Sender<SessionState>,
}

impl Session {
    /// Wrap a store, seeding the state from current token presence. An
    /// unreadable store reads as logged-out, never as a failure, so
    /// clearing it stays possible.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (tx, _rx) = watch::channel(derive_state(store.as_ref()));

        Session { store, tx }
    }

    pub fn state(&self) -> SessionState {
        *self.tx.borrow()
    }

    /// Subscribe to session state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Tokens currently in the store, read fresh on every call.
    pub fn tokens(&self) -> RsvpResult<Option<SessionTokens>> {
        self.store.get()
    }

    /// Persist tokens from a successful authentication and publish the
    /// transition to logged-in.
    pub fn store_tokens(&self, tokens: &SessionTokens) -> RsvpResult<()> {
        self.store.set(tokens)?;
        self.publish();
        Ok(())
    }

    /// Remove any stored tokens and publish the transition to logged-out.
    /// Clearing an already-empty session changes nothing and notifies
    /// nobody.
    pub fn clear(&self) -> RsvpResult<()> {
        self.store.clear()?;
        self.publish();
        Ok(())
    }

    fn publish(&self) {
        let state = derive_state(self.store.as_ref());

        self.tx.send_if_modified(|current| {
            if *current != state {
                *current = state;
                true
            } else {
                false
            }
        });
    }
}

fn derive_state(store: &dyn SessionStore) -> SessionState {
    match store.get() {
        Ok(Some(_)) => SessionState::LoggedIn,
        // A token we cannot read is no token.
        Ok(None) | Err(_) => SessionState::LoggedOut,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tokens() -> SessionTokens {
        SessionTokens {
            access_token: "A".to_string(),
            refresh_token: "R".to_string(),
        }
    }

    fn file_store(dir: &tempfile::TempDir) -> FileSessionStore {
        FileSessionStore::new(dir.path().join("session.toml"))
    }

    // --- stores ---

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);

        assert_eq!(store.get().unwrap(), None);
        store.set(&sample_tokens()).unwrap();
        assert_eq!(store.get().unwrap(), Some(sample_tokens()));
    }

    #[test]
    fn file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);

        store.set(&sample_tokens()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);

        // Clearing twice looks exactly like clearing once.
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn file_store_writes_owner_only_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);
        store.set(&sample_tokens()).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn file_store_rejects_corrupt_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);

        std::fs::write(store.path(), "not valid toml [").unwrap();
        assert!(store.get().is_err());
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemorySessionStore::new();

        assert_eq!(store.get().unwrap(), None);
        store.set(&sample_tokens()).unwrap();
        assert_eq!(store.get().unwrap(), Some(sample_tokens()));
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    // --- observable session ---

    #[test]
    fn session_seeds_state_from_token_presence() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(&sample_tokens()).unwrap();

        let session = Session::new(store);
        assert_eq!(session.state(), SessionState::LoggedIn);
    }

    #[test]
    fn storing_tokens_publishes_logged_in() {
        let session = Session::new(Arc::new(MemorySessionStore::new()));
        let mut rx = session.subscribe();

        assert_eq!(session.state(), SessionState::LoggedOut);
        session.store_tokens(&sample_tokens()).unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SessionState::LoggedIn);
    }

    #[test]
    fn clearing_publishes_logged_out() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(&sample_tokens()).unwrap();
        let session = Session::new(store);
        let mut rx = session.subscribe();

        session.clear().unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SessionState::LoggedOut);
        assert_eq!(session.tokens().unwrap(), None);
    }

    #[test]
    fn repeated_clear_publishes_nothing_new() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(&sample_tokens()).unwrap();
        let session = Session::new(store);
        let mut rx = session.subscribe();

        session.clear().unwrap();
        rx.borrow_and_update();

        session.clear().unwrap();
        assert!(!rx.has_changed().unwrap());
        assert_eq!(session.state(), SessionState::LoggedOut);
    }

    #[test]
    fn token_presence_is_the_login_signal() {
        let store = Arc::new(MemorySessionStore::new());
        let session = Session::new(store.clone());

        assert_eq!(session.state(), SessionState::LoggedOut);

        session.store_tokens(&sample_tokens()).unwrap();
        assert_eq!(session.state(), SessionState::LoggedIn);
        assert_eq!(store.get().unwrap(), Some(sample_tokens()));

        session.clear().unwrap();
        assert_eq!(session.state(), SessionState::LoggedOut);
    }

    #[test]
    fn corrupt_session_file_reads_as_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);
        std::fs::write(store.path(), "not valid toml [").unwrap();

        let session = Session::new(Arc::new(store));

        assert_eq!(session.state(), SessionState::LoggedOut);
        // Reading the tokens themselves still reports the problem.
        assert!(session.tokens().is_err());
    }

    #[test]
    fn clearing_recovers_a_corrupt_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);
        std::fs::write(store.path(), "not valid toml [").unwrap();

        let session = Session::new(Arc::new(store));
        session.clear().unwrap();

        assert_eq!(session.state(), SessionState::LoggedOut);
        assert_eq!(session.tokens().unwrap(), None);
    }
}
