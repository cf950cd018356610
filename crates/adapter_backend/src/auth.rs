//! Per-request authentication choice.

use reqwest::RequestBuilder;

use crate::config::ServiceAuth;

/// Who a data-service call is made as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestAuth {
    /// The portal's own service credentials
    Service,
    /// A user's access token
    Bearer(String),
}

impl RequestAuth {
    /// Use `token` when present, else the service credentials
    pub fn bearer_or_service(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.is_empty() => Self::Bearer(token),
            _ => Self::Service,
        }
    }

    /// Attach the matching headers
    pub fn apply(&self, builder: RequestBuilder, service: &ServiceAuth) -> RequestBuilder {
        match self {
            Self::Service => service.apply(builder),
            Self::Bearer(token) => builder.bearer_auth(token),
        }
    }
}
