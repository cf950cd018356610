//! Route modules of the portal server
//!
//! - health: liveness and readiness probes
//! - products: JSON proxy of the product catalog
//! - auth: JSON login, registration and token routes
//! - public: marketing site and catalog pages
//! - portal: client-space pages behind the session

pub mod auth;
pub mod health;
pub mod portal;
pub mod products;
pub mod public;

use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use adapter_backend::{BackendClient, BackendError};
use axum::http::header::SET_COOKIE;
use axum::http::{StatusCode, Uri};
use axum::response::{AppendHeaders, Html, IntoResponse, Response};
use axum::Router;
use infra_session::cookie::CookieSettings;
use infra_session::SessionStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::session::MaybeSession;
use crate::views::layout::PublicLayout;
use crate::views::pages::NotFoundPage;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Data service client
    pub backend: Arc<BackendClient>,
    /// Server-side sessions
    pub sessions: Arc<SessionStore>,
    /// Session cookie attributes
    pub cookies: CookieSettings,
    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    /// Build the state; fails only if the HTTP client cannot be created
    pub fn new(config: ServerConfig) -> Result<Self, BackendError> {
        let backend = BackendClient::new(config.backend_config())?;
        Ok(Self {
            cookies: config.cookie_settings(),
            sessions: Arc::new(SessionStore::new(config.session_ttl())),
            backend: Arc::new(backend),
            config: Arc::new(config),
            start_time: Instant::now(),
        })
    }
}

/// Render a view into an HTML response
pub(crate) fn html(view: impl Display) -> Html<String> {
    Html(view.to_string())
}

/// Attach a `Set-Cookie` header to a response
pub(crate) fn with_cookie(cookie: String, response: impl IntoResponse) -> Response {
    (AppendHeaders([(SET_COOKIE, cookie)]), response).into_response()
}

async fn not_found(MaybeSession(active): MaybeSession, uri: Uri) -> impl IntoResponse {
    tracing::debug!(path = %uri.path(), "No route");
    let user = active.as_ref().and_then(|a| a.user());
    (
        StatusCode::NOT_FOUND,
        html(PublicLayout {
            title: "Page introuvable",
            active: "",
            user,
            body: NotFoundPage,
        }),
    )
}

/// Build the main application router by merging all route modules
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .merge(health::routes())
        .merge(products::routes())
        .merge(auth::routes())
        .merge(public::routes())
        .merge(portal::routes())
        .nest_service("/static", static_files)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_build_router_serves_health() {
        let state = offline_state();
        let response = get(&state, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_html_404() {
        let state = offline_state();
        let response = get(&state, "/unknown/path", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_string(response).await;
        assert!(body.contains("Page introuvable"));
    }

    #[tokio::test]
    async fn test_static_assets_are_served() {
        let state = offline_state();
        let response = get(&state, "/static/portal.css", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let response = build_router(offline_state())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }
}
