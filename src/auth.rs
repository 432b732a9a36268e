//! Persisted authentication state.
//!
//! Holds the signed-in user, the bearer token and the farmer id the API client
//! attaches to every request. Enforcement happens server-side; this store only
//! remembers what the backend handed out.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AuthState {
    user: Option<User>,
    is_authenticated: bool,
    token: Option<String>,
    farmer_id: Option<String>,
    #[serde(skip)]
    is_loading: bool,
}

/// Authentication store, optionally persisted to a JSON file.
#[derive(Debug)]
pub struct AuthStore {
    path: Option<PathBuf>,
    state: RwLock<AuthState>,
}

impl AuthStore {
    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: RwLock::new(AuthState::default()),
        }
    }

    /// Load the store from `path`. A missing file yields a signed-out store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AuthState::default(),
            Err(e) => return Err(e.into()),
        };
        debug!("Loaded auth state from {}", path.display());
        Ok(Self {
            path: Some(path),
            state: RwLock::new(state),
        })
    }

    /// Where the store persists, if anywhere.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Remember `user` and `token` and mark the session authenticated.
    pub fn login(&self, user: User, token: impl Into<String>) -> Result<()> {
        {
            let mut state = self.write();
            state.farmer_id = Some(user.id.clone());
            state.token = Some(token.into());
            state.user = Some(user);
            state.is_authenticated = true;
            state.is_loading = false;
        }
        info!("Signed in");
        self.persist()
    }

    /// Forget the user and every credential.
    pub fn logout(&self) -> Result<()> {
        {
            let mut state = self.write();
            *state = AuthState::default();
        }
        info!("Signed out");
        self.persist()
    }

    /// Replace the user; the session is authenticated iff a user is present.
    pub fn set_user(&self, user: Option<User>) -> Result<()> {
        {
            let mut state = self.write();
            state.is_authenticated = user.is_some();
            state.user = user;
        }
        self.persist()
    }

    pub fn set_loading(&self, loading: bool) {
        self.write().is_loading = loading;
    }

    /// Store a bearer token without touching the user.
    pub fn set_token(&self, token: impl Into<String>) -> Result<()> {
        self.write().token = Some(token.into());
        self.persist()
    }

    pub fn set_farmer_id(&self, farmer_id: impl Into<String>) -> Result<()> {
        self.write().farmer_id = Some(farmer_id.into());
        self.persist()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn farmer_id(&self) -> Option<String> {
        self.read().farmer_id.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&*self.read())?;
        fs::write(path, json)?;
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, AuthState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "f-1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Okafor".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_login_sets_token_and_farmer_id() {
        let store = AuthStore::in_memory();
        store.login(user(), "secret").unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("secret"));
        assert_eq!(store.farmer_id().as_deref(), Some("f-1"));

        store.logout().unwrap();
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
        assert!(store.user().is_none());
    }

    #[test]
    fn test_state_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("auth.json");

        let store = AuthStore::load(&path).unwrap();
        assert!(!store.is_authenticated());
        store.login(user(), "token-123").unwrap();

        let reloaded = AuthStore::load(&path).unwrap();
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.user(), Some(user()));
        assert_eq!(reloaded.token().as_deref(), Some("token-123"));
    }

    #[test]
    fn test_set_user_drives_flag() {
        let store = AuthStore::in_memory();
        store.set_user(Some(user())).unwrap();
        assert!(store.is_authenticated());
        store.set_user(None).unwrap();
        assert!(!store.is_authenticated());
    }
}
