//! # infra_session: Server-Side Sessions for the Portal
//!
//! Access and refresh tokens issued by the data service never reach the
//! browser. The browser holds an opaque session cookie; this crate maps it to
//! the tokens, the cached user and the display preferences.
//!
//! - [`TokenStore`]: the token operations the backend client needs for
//!   refresh-and-retry
//! - [`SessionStore`]: in-memory sessions with a sliding TTL
//! - [`SessionHandle`]: one session seen through [`TokenStore`]
//! - [`cookie`]: `Cookie` parsing and `Set-Cookie` building
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use infra_session::{SessionStore, TokenStore};
//! use portal_core::user::TokenPair;
//!
//! let store = Arc::new(SessionStore::new(Duration::from_secs(1800)));
//! let id = store.create();
//!
//! let handle = store.handle(id);
//! handle.set_tokens(TokenPair { access: "a1".into(), refresh: "r1".into() });
//! assert_eq!(handle.access_token().as_deref(), Some("a1"));
//!
//! handle.clear();
//! assert!(store.get(&id).is_none());
//! ```

#![warn(missing_docs)]

pub mod cookie;
pub mod error;
pub mod preferences;
pub mod session;
pub mod store;
pub mod token;

pub use error::SessionError;
pub use preferences::{NavigationStyle, Preferences, PreferencesUpdate};
pub use session::{Session, SessionId};
pub use store::{SessionHandle, SessionStore};
pub use token::TokenStore;
