//! # Session Store
//!
//! Single owner of the `(token, userId)` pair. Every other component reads the session
//! through a clone of this handle; clones share the same underlying storage.

use std::sync::{Arc, RwLock};

use domains::{KeyValueStore, UserId};
use secrecy::{ExposeSecret, SecretString};

const TOKEN_KEY: &str = "token";
const USER_ID_KEY: &str = "userId";
const AUTHENTICATED_FLAG_KEY: &str = "isAuthenticated";

/// The current authenticated actor.
#[derive(Debug)]
pub struct Session {
    pub token: SecretString,
    pub user_id: UserId,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    storage: Arc<dyn KeyValueStore>,
    // Held for writing across multi-key updates so readers never see half a session.
    guard: RwLock<()>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                storage,
                guard: RwLock::new(()),
            }),
        }
    }

    /// Stores both values as one unit, replacing any previous session.
    pub fn set_session(&self, token: impl Into<String>, user_id: UserId) {
        let token = SecretString::from(token.into());
        let _write = self.inner.guard.write().unwrap_or_else(|e| e.into_inner());
        let storage = &self.inner.storage;
        storage.set(TOKEN_KEY, token.expose_secret());
        storage.set(USER_ID_KEY, user_id.as_str());
        storage.set(AUTHENTICATED_FLAG_KEY, "true");
        tracing::debug!(user_id = %user_id, "session stored");
    }

    /// Erases the token, the user id and the cached authenticated flag.
    pub fn clear_session(&self) {
        let _write = self.inner.guard.write().unwrap_or_else(|e| e.into_inner());
        let storage = &self.inner.storage;
        storage.remove(TOKEN_KEY);
        storage.remove(USER_ID_KEY);
        storage.remove(AUTHENTICATED_FLAG_KEY);
    }

    pub fn token(&self) -> Option<SecretString> {
        let _read = self.inner.guard.read().unwrap_or_else(|e| e.into_inner());
        self.inner
            .storage
            .get(TOKEN_KEY)
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
    }

    pub fn user_id(&self) -> Option<UserId> {
        let _read = self.inner.guard.read().unwrap_or_else(|e| e.into_inner());
        self.inner
            .storage
            .get(USER_ID_KEY)
            .filter(|id| !id.is_empty())
            .map(UserId::new)
    }

    /// Both halves, or nothing.
    pub fn current(&self) -> Option<Session> {
        let _read = self.inner.guard.read().unwrap_or_else(|e| e.into_inner());
        let storage = &self.inner.storage;
        let token = storage.get(TOKEN_KEY).filter(|t| !t.is_empty())?;
        let user_id = storage.get(USER_ID_KEY).filter(|id| !id.is_empty())?;
        Some(Session {
            token: SecretString::from(token),
            user_id: UserId::new(user_id),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MapStore;
    use domains::MockKeyValueStore;

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(MapStore::default()))
    }

    #[test]
    fn set_then_get_round_trips() {
        let session = store();
        session.set_session("tok-123", UserId::from(7));

        assert_eq!(session.token().unwrap().expose_secret(), "tok-123");
        assert_eq!(session.user_id(), Some(UserId::from(7)));
        assert!(session.is_authenticated());
    }

    #[test]
    fn clear_returns_absent_for_both() {
        let session = store();
        session.set_session("tok-123", UserId::from(7));
        session.clear_session();

        assert!(session.token().is_none());
        assert!(session.user_id().is_none());
        assert!(session.current().is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn second_login_overwrites() {
        let session = store();
        session.set_session("first", UserId::from(1));
        session.set_session("second", UserId::from(2));

        let current = session.current().unwrap();
        assert_eq!(current.token.expose_secret(), "second");
        assert_eq!(current.user_id, UserId::from(2));
    }

    #[test]
    fn clones_share_state() {
        let a = store();
        let b = a.clone();
        a.set_session("tok", UserId::from(3));
        assert!(b.is_authenticated());
        b.clear_session();
        assert!(!a.is_authenticated());
    }

    #[test]
    fn half_a_session_is_no_session() {
        let raw = Arc::new(MapStore::default());
        raw.set(TOKEN_KEY, "orphan");
        let session = SessionStore::new(raw);
        assert!(session.current().is_none());
    }

    #[test]
    fn clear_removes_the_authenticated_flag() {
        let mut storage = MockKeyValueStore::new();
        for key in [TOKEN_KEY, USER_ID_KEY, AUTHENTICATED_FLAG_KEY] {
            storage
                .expect_remove()
                .withf(move |k| k == key)
                .times(1)
                .return_const(());
        }
        SessionStore::new(Arc::new(storage)).clear_session();
    }
}
