//! Session extractors.
//!
//! [`MaybeSession`] never rejects; [`PortalSession`] sends anonymous visitors
//! to `/login` with a 303.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::response::Redirect;
use infra_session::{Session, SessionHandle, SessionId};
use portal_core::User;

use crate::routes::AppState;

/// A live session resolved from the request cookie.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    /// Session identifier
    pub id: SessionId,
    /// Snapshot taken when the request arrived
    pub session: Session,
    /// Token view for the backend client
    pub handle: SessionHandle,
}

impl ActiveSession {
    /// Cached user, if the login returned one
    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    /// Whether the session holds data service tokens
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

/// Resolve the session named by the request cookies and slide its expiry.
pub fn resolve(parts: &Parts, state: &AppState) -> Option<ActiveSession> {
    let id = parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| state.cookies.session_id(header))?;

    if !state.sessions.touch(&id) {
        tracing::debug!(session = %id, "Unknown or expired session cookie");
        return None;
    }
    let session = state.sessions.get(&id)?;
    Some(ActiveSession {
        id,
        session,
        handle: state.sessions.handle(id),
    })
}

/// Session when the cookie names a live one.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<ActiveSession>);

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(resolve(parts, state)))
    }
}

/// Authenticated session, required by the client-space pages.
#[derive(Debug, Clone)]
pub struct PortalSession(pub ActiveSession);

impl FromRequestParts<AppState> for PortalSession {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve(parts, state) {
            Some(active) if active.is_authenticated() => Ok(PortalSession(active)),
            _ => {
                tracing::debug!(path = %parts.uri.path(), "No authenticated session, redirecting to login");
                Err(Redirect::to("/login"))
            }
        }
    }
}
