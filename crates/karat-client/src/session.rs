//! Persisted authentication session.
//!
//! The store holds two values: the opaque bearer token and a JSON copy of the
//! signed-in user's profile. A token without a profile (or the reverse) is
//! never left behind by a completed login or logout.

use crate::error::StorageError;
use crate::navigate::{LogNavigator, Navigator};
use crate::storage::{MemoryStorage, SessionStorage};
use karat_core::User;
use std::fmt;
use std::sync::Arc;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key for the JSON-serialized user profile.
pub const USER_KEY: &str = "user";

/// Snapshot of the signed-in state.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: Option<User>,
}

/// Client-side authentication state, shared by every surface in the process.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    navigator: Arc<dyn Navigator>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            navigator: Arc::new(LogNavigator),
        }
    }

    /// Store backed by process memory only.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// The stored bearer token, if any.
    ///
    /// An unreadable store counts as signed out.
    pub fn token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    /// True iff a token is stored. The token is not validated locally.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The cached profile, or `None` if absent or unparseable.
    pub fn current_user(&self) -> Option<User> {
        let raw = match self.storage.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cached user");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!(error = %e, "Cached user is not valid JSON");
                None
            }
        }
    }

    pub fn session(&self) -> Option<Session> {
        let token = self.token()?;
        Some(Session {
            token,
            user: self.current_user(),
        })
    }

    pub(crate) fn store_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token)
    }

    pub(crate) fn store_user(&self, user: &User) -> Result<(), StorageError> {
        let raw = serde_json::to_string(user)?;
        self.storage.set(USER_KEY, &raw)
    }

    /// Remove both keys. Attempts both even if the first fails and returns
    /// the first error.
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.storage.remove(TOKEN_KEY);
        let user = self.storage.remove(USER_KEY);
        token.and(user)
    }

    /// Sign out: clear the session and go to the login page.
    ///
    /// Navigation happens even if clearing fails.
    pub fn logout(&self) -> Result<(), StorageError> {
        let result = self.clear();
        match &result {
            Ok(()) => tracing::info!("Logged out"),
            Err(e) => tracing::warn!(error = %e, "Failed to clear session on logout"),
        }
        self.navigator.to_login();
        result
    }

    /// The server rejected the credential.
    pub(crate) fn expire(&self) {
        tracing::warn!("Session rejected by API; clearing");
        self.discard();
        self.navigator.to_login();
    }

    /// Clear without navigating. Failures are logged, not returned.
    pub(crate) fn discard(&self) {
        if let Err(e) = self.clear() {
            tracing::warn!(error = %e, "Failed to clear session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use karat_core::Role;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingNavigator(AtomicUsize);

    impl Navigator for CountingNavigator {
        fn to_login(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn owner() -> User {
        User {
            id: 1,
            username: "owner1".to_string(),
            email: "owner@example.com".to_string(),
            full_name: "Olive Owner".to_string(),
            role: Role::Owner,
            is_active: true,
            created_at: "2024-01-01T00:00:00".to_string(),
        }
    }

    #[test]
    fn test_empty_store_is_signed_out() {
        let store = SessionStore::in_memory();
        assert!(!store.is_authenticated());
        assert!(store.current_user().is_none());
        assert!(store.session().is_none());
    }

    #[test]
    fn test_authenticated_iff_token_present() {
        let store = SessionStore::in_memory();
        store.store_token("tok123").unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("tok123"));
        assert!(store.current_user().is_none());
    }

    #[test]
    fn test_user_round_trips_through_storage() {
        let store = SessionStore::in_memory();
        store.store_token("tok123").unwrap();
        store.store_user(&owner()).unwrap();

        let user = store.current_user().unwrap();
        assert_eq!(user.username, "owner1");
        assert_eq!(user.role, Role::Owner);
    }

    #[test]
    fn test_unparseable_user_reads_as_none() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(USER_KEY, "{not json").unwrap();
        let store = SessionStore::new(storage);
        assert!(store.current_user().is_none());
    }

    #[test]
    fn test_logout_clears_and_navigates() {
        let nav = Arc::new(CountingNavigator::default());
        let store = SessionStore::in_memory().with_navigator(nav.clone());
        store.store_token("tok123").unwrap();
        store.store_user(&owner()).unwrap();

        store.logout().unwrap();
        assert!(!store.is_authenticated());
        assert!(store.current_user().is_none());
        assert_eq!(nav.0.load(Ordering::SeqCst), 1);

        // Logging out twice is harmless.
        store.logout().unwrap();
        assert_eq!(nav.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_expire_clears_and_navigates() {
        let nav = Arc::new(CountingNavigator::default());
        let store = SessionStore::in_memory().with_navigator(nav.clone());
        store.store_token("tok123").unwrap();

        store.expire();
        assert!(!store.is_authenticated());
        assert_eq!(nav.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_discard_clears_without_navigating() {
        let nav = Arc::new(CountingNavigator::default());
        let store = SessionStore::in_memory().with_navigator(nav.clone());
        store.store_token("tok123").unwrap();
        store.storage.set(USER_KEY, "{}").unwrap();

        store.discard();
        assert!(store.token().is_none());
        assert!(store.storage.get(USER_KEY).unwrap().is_none());
        assert_eq!(nav.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::in_memory();
        let other = store.clone();
        store.store_token("tok123").unwrap();
        assert!(other.is_authenticated());
        other.clear().unwrap();
        assert!(!store.is_authenticated());
    }
}
