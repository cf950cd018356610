//! Data service location and service-level credentials.

use std::time::Duration;

use reqwest::header::COOKIE;
use reqwest::RequestBuilder;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Username/password pair for HTTP basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Credentials the portal itself presents for non-user calls.
///
/// All configured schemes are sent: the session cookie alongside the
/// `Authorization` header, and basic credentials win over the API token when
/// both are configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceAuth {
    /// Bearer token
    pub api_token: Option<String>,
    /// Value of the data service's `sessionid` cookie
    pub session_key: Option<String>,
    /// Basic credentials
    pub basic: Option<BasicCredentials>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ServiceAuth {
    /// Assemble from optional settings; basic auth needs both parts.
    pub fn from_parts(
        api_token: Option<String>,
        session_key: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        let basic = match (non_empty(username), non_empty(password)) {
            (Some(username), Some(password)) => Some(BasicCredentials { username, password }),
            _ => None,
        };
        Self {
            api_token: non_empty(api_token),
            session_key: non_empty(session_key),
            basic,
        }
    }

    /// Whether any credential is configured
    pub fn is_configured(&self) -> bool {
        self.api_token.is_some() || self.session_key.is_some() || self.basic.is_some()
    }

    /// Attach the credentials to a request
    pub fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = match &self.session_key {
            Some(key) => builder.header(COOKIE, format!("sessionid={key}")),
            None => builder,
        };
        match (&self.basic, &self.api_token) {
            (Some(basic), _) => builder.basic_auth(&basic.username, Some(&basic.password)),
            (None, Some(token)) => builder.bearer_auth(token),
            (None, None) => builder,
        }
    }
}

/// Where and how to reach the data service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL without trailing slash
    pub base_url: String,
    /// Service-level credentials
    pub service_auth: ServiceAuth,
    /// Per-request timeout
    pub timeout: Duration,
}

impl BackendConfig {
    /// Config for `base_url` with no credentials and the default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_auth: ServiceAuth::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the service credentials
    pub fn with_service_auth(mut self, auth: ServiceAuth) -> Self {
        self.service_auth = auth;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    #[test]
    fn test_base_url_is_trimmed() {
        let config = BackendConfig::new("http://localhost:8000///");
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_basic_requires_both_parts() {
        let auth = ServiceAuth::from_parts(None, None, Some("svc".into()), None);
        assert!(auth.basic.is_none());
        assert!(!auth.is_configured());

        let auth = ServiceAuth::from_parts(Some(" ".into()), None, Some("svc".into()), Some("pw".into()));
        assert!(auth.api_token.is_none());
        assert_eq!(auth.basic.as_ref().unwrap().username, "svc");
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = BasicCredentials {
            username: "svc".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{creds:?}").contains("hunter2"));
    }

    #[test]
    fn test_basic_wins_over_bearer() {
        let auth = ServiceAuth::from_parts(
            Some("tok".into()),
            Some("sess".into()),
            Some("svc".into()),
            Some("pw".into()),
        );
        let request = auth
            .apply(reqwest::Client::new().get("http://localhost/"))
            .build()
            .unwrap();
        let values: Vec<_> = request.headers().get_all(AUTHORIZATION).iter().collect();
        assert_eq!(values.len(), 1);
        assert!(values[0].to_str().unwrap().starts_with("Basic "));
        assert_eq!(request.headers()[COOKIE], "sessionid=sess");
    }

    #[test]
    fn test_bearer_only() {
        let auth = ServiceAuth::from_parts(Some("tok".into()), None, None, None);
        let request = auth
            .apply(reqwest::Client::new().get("http://localhost/"))
            .build()
            .unwrap();
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer tok");
        assert!(request.headers().get(COOKIE).is_none());
    }
}
