//! Server startup and binding
//!
//! Builds the shared state once, binds the listener and runs the session
//! sweeper next to the HTTP server.

use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use adapter_backend::BackendError;
use axum::Router;
use infra_session::SessionStore;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::routes::{self, AppState};

/// Upper bound between two sweeps of expired sessions
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Server instance that can be started
pub struct Server {
    /// Server configuration
    config: Arc<ServerConfig>,
    /// Session store, swept in the background while serving
    sessions: Arc<SessionStore>,
    /// The built router
    router: Router,
}

impl Server {
    /// Create a new server instance with the given configuration
    pub fn new(config: ServerConfig) -> Result<Self, BackendError> {
        let state = AppState::new(config)?;
        let config = state.config.clone();
        let sessions = state.sessions.clone();
        let router = routes::build_router(state);

        Ok(Self {
            config,
            sessions,
            router,
        })
    }

    /// Get the socket address the server will bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.config.socket_addr().parse()
    }

    /// Get the configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind the configured host/port and serve requests
    pub async fn run(self) -> Result<(), std::io::Error> {
        let addr = self
            .socket_addr()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        let listener = TcpListener::bind(addr).await?;
        self.run_with_listener(listener).await
    }

    /// Run the server with a specific listener
    ///
    /// Tests bind port 0 and pass the listener in.
    pub async fn run_with_listener(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!("Server listening on {}", addr);

        let sweeper = spawn_session_sweeper(self.sessions.clone(), self.config.session_ttl());
        let result = axum::serve(listener, self.router).await;
        sweeper.abort();
        result
    }

    /// Create a test server and return the bound address
    #[cfg(test)]
    pub async fn spawn_test_server(config: ServerConfig) -> (SocketAddr, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = Self::new(config).unwrap();
        let handle = tokio::spawn(async move {
            server.run_with_listener(listener).await.ok();
        });

        tokio::time::sleep(Duration::from_millis(10)).await;

        (addr, handle)
    }
}

/// Drop expired sessions every `min(ttl, 60s)`
fn spawn_session_sweeper(sessions: Arc<SessionStore>, ttl: Duration) -> JoinHandle<()> {
    let period = ttl.min(MAX_SWEEP_INTERVAL).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let purged = sessions.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, remaining = sessions.len(), "Expired sessions removed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn offline_config() -> ServerConfig {
        ServerConfig {
            backend_url: "http://127.0.0.1:9".to_string(),
            backend_timeout_secs: 1,
            ..ServerConfig::default()
        }
    }

    #[test]
    fn test_server_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..ServerConfig::default()
        };

        let server = Server::new(config).unwrap();
        assert_eq!(server.socket_addr().unwrap().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_invalid_host_is_an_error() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        let server = Server::new(config).unwrap();
        assert!(server.socket_addr().is_err());
    }

    #[test]
    fn test_server_config_access() {
        let config = ServerConfig {
            port: 9999,
            ..ServerConfig::default()
        };

        let server = Server::new(config).unwrap();
        assert_eq!(server.config().port, 9999);
    }

    #[tokio::test]
    async fn test_server_health_endpoint() {
        let (addr, handle) = Server::spawn_test_server(offline_config()).await;

        let response = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], "healthy");

        handle.abort();
    }

    #[tokio::test]
    async fn test_server_serves_home_page_offline() {
        let (addr, handle) = Server::spawn_test_server(offline_config()).await;

        let response = reqwest::get(format!("http://{}/", addr)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.text().await.unwrap().contains("<!DOCTYPE html>"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_server_unknown_route_returns_404() {
        let (addr, handle) = Server::spawn_test_server(offline_config()).await;

        let response = reqwest::get(format!("http://{}/unknown/path", addr)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_purges_expired_sessions() {
        let ttl = Duration::from_millis(50);
        let sessions = Arc::new(SessionStore::new(ttl));
        sessions.create();
        let sweeper = spawn_session_sweeper(sessions.clone(), ttl);

        tokio::time::sleep(Duration::from_millis(1300)).await;
        sweeper.abort();
        assert!(sessions.is_empty());
    }
}
