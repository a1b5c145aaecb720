//! Process-local session store.
//!
//! Sessions are keyed by a random id handed to the browser in a cookie. A
//! session idle for longer than the configured timeout is discarded the next
//! time the store is touched, and a visitor presenting its id gets a fresh one.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::SessionError;
use crate::session::Session;

/// Result of a store access: which session was used and what the closure
/// returned.
#[derive(Debug)]
pub struct SessionAccess<T> {
    pub id: Uuid,
    /// True when the session did not exist (or had expired) and was created.
    pub created: bool,
    pub value: T,
}

pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout_minutes: u32) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout: Duration::minutes(i64::from(idle_timeout_minutes)),
        }
    }

    /// Whether a session has been idle longer than the timeout.
    pub fn is_expired(&self, session: &Session) -> bool {
        Utc::now() - session.last_seen > self.idle_timeout
    }

    /// Run `f` against the session for `id`, creating it with defaults when
    /// `id` is absent, unknown or expired.
    ///
    /// The store lock is held for the duration of `f`, so `f` must not block.
    pub fn with_session<T>(
        &self,
        id: Option<Uuid>,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Result<SessionAccess<T>, SessionError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| SessionError::LockPoisoned(e.to_string()))?;

        let before = sessions.len();
        sessions.retain(|_, s| !self.is_expired(s));
        let purged = before - sessions.len();
        if purged > 0 {
            debug!(purged, "Expired sessions discarded");
        }

        let (id, created) = match id {
            Some(id) if sessions.contains_key(&id) => (id, false),
            _ => {
                let id = Uuid::new_v4();
                sessions.insert(id, Session::default());
                debug!(session_id = %id, "Session created");
                (id, true)
            }
        };

        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| SessionError::LockPoisoned("session vanished under lock".into()))?;
        session.last_seen = Utc::now();
        let value = f(session);

        Ok(SessionAccess { id, created, value })
    }

    /// Clone of the session state for rendering.
    pub fn snapshot(&self, id: Option<Uuid>) -> Result<SessionAccess<Session>, SessionError> {
        self.with_session(id, |s| s.clone())
    }

    /// Drop a session.
    pub fn remove(&self, id: Uuid) -> Result<bool, SessionError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| SessionError::LockPoisoned(e.to_string()))?;
        Ok(sessions.remove(&id).is_some())
    }

    /// Number of live sessions, expired ones included until the next purge.
    pub fn len(&self) -> Result<usize, SessionError> {
        self.sessions
            .lock()
            .map(|s| s.len())
            .map_err(|e| SessionError::LockPoisoned(e.to_string()))
    }

    pub fn is_empty(&self) -> Result<bool, SessionError> {
        self.len().map(|n| n == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_session_on_first_access() {
        let store = SessionStore::new(60);
        let access = store.snapshot(None).unwrap();
        assert!(access.created);
        assert!(access.value.name.is_empty());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_reuses_known_session() {
        let store = SessionStore::new(60);
        let first = store.with_session(None, |s| s.set_name("Ada")).unwrap();

        let second = store.snapshot(Some(first.id)).unwrap();
        assert!(!second.created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.value.name, "Ada");
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_unknown_id_gets_fresh_session() {
        let store = SessionStore::new(60);
        let stale = Uuid::new_v4();
        let access = store.snapshot(Some(stale)).unwrap();
        assert!(access.created);
        assert_ne!(access.id, stale);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new(60);
        let a = store.with_session(None, |s| s.set_name("A")).unwrap();
        let b = store.with_session(None, |s| s.set_name("B")).unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.snapshot(Some(a.id)).unwrap().value.name, "A");
        assert_eq!(store.snapshot(Some(b.id)).unwrap().value.name, "B");
    }

    #[test]
    fn test_expired_session_is_replaced() {
        let store = SessionStore::new(0);
        let first = store.with_session(None, |s| s.set_name("Old")).unwrap();

        // Backdate the session past the zero-minute timeout.
        {
            let mut sessions = store.sessions.lock().unwrap();
            let session = sessions.get_mut(&first.id).unwrap();
            session.last_seen = Utc::now() - Duration::seconds(5);
        }

        let second = store.snapshot(Some(first.id)).unwrap();
        assert!(second.created);
        assert_ne!(second.id, first.id);
        assert!(second.value.name.is_empty());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_remove() {
        let store = SessionStore::new(60);
        let access = store.snapshot(None).unwrap();
        assert!(store.remove(access.id).unwrap());
        assert!(!store.remove(access.id).unwrap());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = SessionStore::new(60);
        store.snapshot(None).unwrap();

        let panicked = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = store.with_session(None, |_| panic!("handler panicked mid-update"));
        }));
        assert!(panicked.is_err());

        assert!(matches!(store.len(), Err(SessionError::LockPoisoned(_))));
        assert!(matches!(store.is_empty(), Err(SessionError::LockPoisoned(_))));
        assert!(matches!(
            store.snapshot(None),
            Err(SessionError::LockPoisoned(_))
        ));
    }
}
