//! Token storage seam used by the backend client.

use portal_core::user::{TokenPair, User};

/// Storage for the tokens and user of one authenticated client.
///
/// Implementations are synchronous: every operation is a map lookup.
pub trait TokenStore: Send + Sync {
    /// Current access token
    fn access_token(&self) -> Option<String>;

    /// Current refresh token
    fn refresh_token(&self) -> Option<String>;

    /// Replace the access token after a refresh
    fn set_access_token(&self, access: String);

    /// Store a fresh token pair after login
    fn set_tokens(&self, tokens: TokenPair);

    /// Cached user
    fn user(&self) -> Option<User>;

    /// Cache the user returned by login or profile
    fn set_user(&self, user: User);

    /// Forget everything (logout)
    fn clear(&self);

    /// Whether an access token is present
    fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }
}
