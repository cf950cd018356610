//! Data service client.

use std::future::Future;

use infra_session::TokenStore;
use portal_core::backend::{map_detailed, BackendPage, BackendProduct, BackendProductDetail, ProductPage};
use portal_core::user::{
    login_error_message, registration_error_message, LoginRequest, LoginResponse, RegisterRequest,
    User,
};
use portal_core::{Isin, Product};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::RequestAuth;
use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::query::ProductQuery;

/// Outcome of a reachability probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    /// Whether a response came back at all
    pub success: bool,
    /// Probed URL
    pub backend_url: String,
    /// Response status code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Response reason phrase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    /// Transport error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Summary sentence
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}

/// Client for the structured-product data service.
#[derive(Debug, Clone)]
pub struct BackendClient {
    config: BackendConfig,
    http: reqwest::Client,
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    match response.status() {
        StatusCode::UNAUTHORIZED => Err(BackendError::Unauthorized),
        StatusCode::NOT_FOUND => Err(BackendError::NotFound),
        status if !status.is_success() => Err(BackendError::status(status)),
        _ => response
            .json::<T>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string())),
    }
}

impl BackendClient {
    /// Build a client with the configured timeout
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    /// Configuration in use
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn transport(&self, source: reqwest::Error) -> BackendError {
        if source.is_connect() || source.is_timeout() {
            BackendError::Unreachable {
                url: self.config.base_url.clone(),
                source,
            }
        } else {
            BackendError::Transport(source)
        }
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
        auth: &RequestAuth,
    ) -> Result<Response, BackendError> {
        let url = self.url(path);
        tracing::debug!(%url, ?query, "GET data service");
        let builder = self.http.get(&url).query(query);
        auth.apply(builder, &self.config.service_auth)
            .send()
            .await
            .map_err(|e| self.transport(e))
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, BackendError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST data service");
        self.http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport(e))
    }

    /// `GET /api/products/`
    pub async fn list_products(
        &self,
        query: &ProductQuery,
        auth: &RequestAuth,
    ) -> Result<ProductPage, BackendError> {
        let response = self.get("/api/products/", &query.to_pairs(), auth).await?;
        let page: BackendPage<BackendProduct> = decode(response).await?;
        let page = ProductPage::from_backend(page);
        tracing::debug!(count = page.count, returned = page.products.len(), "Products fetched");
        Ok(page)
    }

    /// `GET /api/products/<isin>/`
    pub async fn product_detail(&self, isin: &Isin, auth: &RequestAuth) -> Result<Product, BackendError> {
        let path = format!("/api/products/{}/", isin);
        self.fetch_detail(&path, isin, auth).await
    }

    /// `GET /api/products/isin/<isin>/`
    pub async fn product_by_isin(&self, isin: &Isin, auth: &RequestAuth) -> Result<Product, BackendError> {
        let path = format!("/api/products/isin/{}/", isin);
        self.fetch_detail(&path, isin, auth).await
    }

    async fn fetch_detail(
        &self,
        path: &str,
        isin: &Isin,
        auth: &RequestAuth,
    ) -> Result<Product, BackendError> {
        let response = self.get(path, &[], auth).await?;
        let detail: BackendProductDetail = decode(response).await.inspect_err(|e| {
            tracing::warn!(%isin, error = %e, "Product lookup failed");
        })?;
        Ok(map_detailed(&detail))
    }

    /// `GET /api/categories/`
    pub async fn categories(&self, auth: &RequestAuth) -> Result<Value, BackendError> {
        let response = self.get("/api/categories/", &[], auth).await?;
        decode(response).await
    }

    /// `GET /api/product-stats/`
    pub async fn product_stats(&self, auth: &RequestAuth) -> Result<Value, BackendError> {
        let response = self.get("/api/product-stats/", &[], auth).await?;
        decode(response).await
    }

    /// `POST /api/login/`, identifying by email when `identifier` contains `@`.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse, BackendError> {
        let request = LoginRequest::new(identifier, password);
        let response = self.post("/api/login/", &request).await?;
        let status = response.status();
        let json = is_json(&response);

        if !status.is_success() {
            if json {
                let body: Value = response.json().await.map_err(|_| {
                    BackendError::Rejected(format!("Login failed with status {}", status.as_u16()))
                })?;
                let message = login_error_message(&body);
                tracing::info!(status = status.as_u16(), %message, "Login rejected");
                return Err(BackendError::Rejected(message));
            }
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                body = %text.chars().take(200).collect::<String>(),
                "Non-JSON login error"
            );
            if text.contains("RuntimeError") || text.contains("Django") {
                return Err(BackendError::Rejected(
                    "Backend server error - Please contact support".to_string(),
                ));
            }
            return Err(BackendError::Rejected(format!(
                "Login failed - Server returned status {}",
                status.as_u16()
            )));
        }

        if !json {
            return Err(BackendError::InvalidResponse(
                "Invalid response format from server".to_string(),
            ));
        }
        response
            .json::<LoginResponse>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    /// `POST /api/register/`
    pub async fn register(&self, request: &RegisterRequest) -> Result<Value, BackendError> {
        let response = self.post("/api/register/", request).await?;
        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = registration_error_message(&body);
            tracing::info!(status = status.as_u16(), %message, "Registration rejected");
            return Err(BackendError::Rejected(message));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    /// `GET /api/profile/`
    pub async fn profile(&self, access: &str) -> Result<User, BackendError> {
        let response = self
            .get("/api/profile/", &[], &RequestAuth::Bearer(access.to_string()))
            .await?;
        decode(response).await
    }

    /// `POST /api/logout/`. Failures are logged and swallowed.
    pub async fn logout(&self, refresh: &str) {
        match self.post("/api/logout/", &json!({ "refresh": refresh })).await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("Refresh token revoked");
            }
            Ok(response) => {
                tracing::warn!(status = response.status().as_u16(), "Logout refused by data service");
            }
            Err(e) => tracing::warn!(error = %e, "Logout error"),
        }
    }

    /// `POST /api/token/refresh/`, returning the new access token
    pub async fn refresh(&self, refresh: &str) -> Result<String, BackendError> {
        let response = self
            .post("/api/token/refresh/", &json!({ "refresh": refresh }))
            .await?;
        if !response.status().is_success() {
            tracing::info!(status = response.status().as_u16(), "Token refresh refused");
            return Err(BackendError::RefreshFailed);
        }
        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        Ok(body.access)
    }

    /// `GET` on the base URL. Never fails; the report says what happened.
    pub async fn ping(&self) -> ConnectionReport {
        let backend_url = self.config.base_url.clone();
        tracing::info!(%backend_url, "Testing data service connection");
        match self.http.get(&backend_url).send().await {
            Ok(response) => {
                let status = response.status();
                ConnectionReport {
                    success: true,
                    backend_url,
                    status: Some(status.as_u16()),
                    status_text: Some(status.canonical_reason().unwrap_or_default().to_string()),
                    error: None,
                    message: "Backend connection test completed".to_string(),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Data service connection test failed");
                ConnectionReport {
                    success: false,
                    backend_url,
                    status: None,
                    status_text: None,
                    error: Some(e.to_string()),
                    message: "Backend connection failed".to_string(),
                }
            }
        }
    }

    /// Run `op` with the stored access token, refreshing once on 401.
    ///
    /// - no access token: [`BackendError::MissingToken`]
    /// - refresh impossible, refused or returning the same token, or a second
    ///   401: the store is cleared and [`BackendError::AuthenticationFailed`]
    ///   is returned
    /// - any other error is returned untouched and the store is kept
    pub async fn with_refresh<S, T, F, Fut>(&self, store: &S, op: F) -> Result<T, BackendError>
    where
        S: TokenStore + ?Sized,
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        let access = store.access_token().ok_or(BackendError::MissingToken)?;
        match op(access.clone()).await {
            Err(BackendError::Unauthorized) => {}
            other => return other,
        }

        tracing::info!("Access token rejected, refreshing");
        let renewed = match store.refresh_token() {
            Some(refresh) => self.refresh(&refresh).await,
            None => Err(BackendError::MissingToken),
        };
        let renewed = match renewed {
            Ok(token) if token != access => token,
            Ok(_) => {
                tracing::warn!("Refresh returned the rejected token");
                store.clear();
                return Err(BackendError::AuthenticationFailed);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, clearing session");
                store.clear();
                return Err(BackendError::AuthenticationFailed);
            }
        };
        store.set_access_token(renewed.clone());

        match op(renewed).await {
            Err(BackendError::Unauthorized) => {
                tracing::warn!("Refreshed token rejected, clearing session");
                store.clear();
                Err(BackendError::AuthenticationFailed)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = BackendClient::new(BackendConfig::new("http://backend:8000/")).unwrap();
        assert_eq!(client.url("/api/products/"), "http://backend:8000/api/products/");
    }

    #[test]
    fn test_connection_report_serialization() {
        let report = ConnectionReport {
            success: false,
            backend_url: "http://backend:8000".into(),
            status: None,
            status_text: None,
            error: Some("connection refused".into()),
            message: "Backend connection failed".into(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["backendUrl"], "http://backend:8000");
        assert!(json.get("statusText").is_none());
        assert_eq!(json["error"], "connection refused");
    }

    #[test]
    fn test_missing_token_short_circuits() {
        use std::sync::Arc;
        use std::time::Duration;

        let store = Arc::new(infra_session::SessionStore::new(Duration::from_secs(60)));
        let handle = store.handle(store.create());
        let client = BackendClient::new(BackendConfig::new("http://127.0.0.1:9")).unwrap();

        let result: Result<(), _> =
            tokio_test::block_on(client.with_refresh(&handle, |_| async { Ok(()) }));
        assert!(matches!(result, Err(BackendError::MissingToken)));
    }
}
