//! In-memory session store with a sliding TTL.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use portal_core::user::{TokenPair, User};

use crate::preferences::{Preferences, PreferencesUpdate};
use crate::session::{Session, SessionId};
use crate::token::TokenStore;
use crate::SessionError;

/// Sessions keyed by identifier.
///
/// Every successful lookup through [`SessionStore::touch`] pushes the
/// expiry back by the TTL. Expired sessions are invisible to readers and
/// dropped by [`SessionStore::purge_expired`].
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create an empty store
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Session lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Open a new anonymous session
    pub fn create(&self) -> SessionId {
        let id = SessionId::generate();
        let session = Session::new(Instant::now() + self.ttl);
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, session);
        tracing::debug!(session = %id, "Session created");
        id
    }

    /// Snapshot of a live session
    pub fn get(&self, id: &SessionId) -> Option<Session> {
        let now = Instant::now();
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .filter(|s| !s.is_expired_at(now))
            .cloned()
    }

    /// Extend a live session; returns `false` when it is unknown or expired
    pub fn touch(&self, id: &SessionId) -> bool {
        let now = Instant::now();
        let ttl = self.ttl;
        self.with_session(id, |s| s.expires_at = now + ttl).is_some()
    }

    /// Run `f` on a live session
    pub fn with_session<T>(&self, id: &SessionId, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        match sessions.get_mut(id) {
            Some(session) if !session.is_expired_at(now) => Some(f(session)),
            Some(_) => {
                sessions.remove(id);
                None
            }
            None => None,
        }
    }

    /// Drop a session
    pub fn remove(&self, id: &SessionId) -> Option<Session> {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        if removed.is_some() {
            tracing::debug!(session = %id, "Session removed");
        }
        removed
    }

    /// Drop every expired session, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    fn purge_expired_at(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::info!(purged, remaining = sessions.len(), "Expired sessions purged");
        }
        purged
    }

    /// Number of stored sessions, expired ones included
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Preferences of a live session
    pub fn preferences(&self, id: &SessionId) -> Option<Preferences> {
        self.get(id).map(|s| s.preferences)
    }

    /// Apply a settings form to a live session
    pub fn update_preferences(
        &self,
        id: &SessionId,
        update: &PreferencesUpdate,
    ) -> Option<Result<(), SessionError>> {
        self.with_session(id, |s| s.preferences.apply(update))
    }

    /// [`TokenStore`] view of one session
    pub fn handle(self: &Arc<Self>, id: SessionId) -> SessionHandle {
        SessionHandle {
            store: Arc::clone(self),
            id,
        }
    }
}

/// One session seen as a [`TokenStore`].
///
/// Writes to an expired or removed session are dropped.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    store: Arc<SessionStore>,
    id: SessionId,
}

impl SessionHandle {
    /// Session identifier
    pub fn id(&self) -> SessionId {
        self.id
    }
}

impl TokenStore for SessionHandle {
    fn access_token(&self) -> Option<String> {
        self.store.get(&self.id).and_then(|s| s.access_token)
    }

    fn refresh_token(&self) -> Option<String> {
        self.store.get(&self.id).and_then(|s| s.refresh_token)
    }

    fn set_access_token(&self, access: String) {
        self.store.with_session(&self.id, |s| s.access_token = Some(access));
    }

    fn set_tokens(&self, tokens: TokenPair) {
        self.store.with_session(&self.id, |s| {
            s.access_token = Some(tokens.access);
            s.refresh_token = Some(tokens.refresh);
        });
    }

    fn user(&self) -> Option<User> {
        self.store.get(&self.id).and_then(|s| s.user)
    }

    fn set_user(&self, user: User) {
        self.store.with_session(&self.id, |s| s.user = Some(user));
    }

    fn clear(&self) {
        self.store.remove(&self.id);
    }
}
