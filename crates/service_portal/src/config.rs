//! Portal configuration
//!
//! Layered sources, lowest to highest: built-in defaults, a TOML file,
//! `PORTAL_*` environment variables, command-line flags.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use adapter_backend::{BackendConfig, ServiceAuth};
use infra_session::cookie::CookieSettings;
use serde::Deserialize;
use thiserror::Error;

/// Why a configuration was refused
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Port {0} cannot be bound; use 1-65535")]
    InvalidPort(u16),

    #[error("Unknown log level {0:?}; expected one of {expected}", expected = LogLevel::expected())]
    InvalidLogLevel(String),

    #[error("Unknown environment {0:?}; expected one of {expected}", expected = Environment::expected())]
    InvalidEnvironment(String),

    #[error("Invalid backend URL: {0}. Must start with http:// or https://")]
    InvalidBackendUrl(String),

    #[error("Invalid session TTL: must be greater than zero")]
    InvalidSessionTtl,

    #[error("Config file: {0}")]
    FileError(String),

    #[error("Environment: {0}")]
    EnvError(String),
}

/// Case-insensitive lookup of `raw` in an alias table
fn lookup_alias<T: Copy>(table: &[(&str, T)], raw: &str) -> Option<T> {
    let wanted = raw.trim().to_ascii_lowercase();
    table
        .iter()
        .find(|(alias, _)| *alias == wanted)
        .map(|(_, value)| *value)
}

/// Serde adapter so TOML values go through the same parsing as env and CLI
fn deserialize_from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

/// Verbosity handed to the tracing filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    const ALIASES: [(&'static str, LogLevel); 5] = [
        ("trace", LogLevel::Trace),
        ("debug", LogLevel::Debug),
        ("info", LogLevel::Info),
        ("warn", LogLevel::Warn),
        ("error", LogLevel::Error),
    ];

    fn expected() -> &'static str {
        "trace, debug, info, warn, error"
    }

    /// Directive understood by `EnvFilter`
    pub fn as_filter_str(&self) -> &'static str {
        Self::ALIASES
            .iter()
            .find(|(_, level)| level == self)
            .map_or("info", |(name, _)| *name)
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup_alias(&Self::ALIASES, s).ok_or_else(|| ConfigError::InvalidLogLevel(s.to_string()))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// Where the portal runs; production turns on `Secure` cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Canonical name first, then accepted short forms
    const ALIASES: [(&'static str, Environment); 6] = [
        ("development", Environment::Development),
        ("staging", Environment::Staging),
        ("production", Environment::Production),
        ("dev", Environment::Development),
        ("stage", Environment::Staging),
        ("prod", Environment::Production),
    ];

    fn expected() -> &'static str {
        "development, staging, production"
    }

    /// Whether cookies must be marked `Secure`
    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }

    fn name(&self) -> &'static str {
        Self::ALIASES
            .iter()
            .find(|(_, env)| env == self)
            .map_or("development", |(name, _)| *name)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup_alias(&Self::ALIASES, s).ok_or_else(|| ConfigError::InvalidEnvironment(s.to_string()))
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Environment variable names
pub mod env {
    pub const HOST: &str = "PORTAL_HOST";
    pub const PORT: &str = "PORTAL_PORT";
    pub const LOG_LEVEL: &str = "PORTAL_LOG_LEVEL";
    pub const ENVIRONMENT: &str = "PORTAL_ENVIRONMENT";
    pub const BACKEND_URL: &str = "PORTAL_BACKEND_URL";
    pub const BACKEND_API_TOKEN: &str = "PORTAL_BACKEND_API_TOKEN";
    pub const BACKEND_SESSION_KEY: &str = "PORTAL_BACKEND_SESSION_KEY";
    pub const BACKEND_USERNAME: &str = "PORTAL_BACKEND_USERNAME";
    pub const BACKEND_PASSWORD: &str = "PORTAL_BACKEND_PASSWORD";
    pub const BACKEND_TIMEOUT_SECS: &str = "PORTAL_BACKEND_TIMEOUT_SECS";
    pub const SESSION_COOKIE: &str = "PORTAL_SESSION_COOKIE";
    pub const SESSION_TTL_SECS: &str = "PORTAL_SESSION_TTL_SECS";
    pub const STATIC_DIR: &str = "PORTAL_STATIC_DIR";
}

/// Server configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub host: String,
    /// Listen port
    pub port: u16,
    #[serde(deserialize_with = "deserialize_from_str")]
    pub log_level: LogLevel,
    #[serde(deserialize_with = "deserialize_from_str")]
    pub environment: Environment,
    /// Base URL of the product data service
    pub backend_url: String,
    /// Service bearer token for anonymous catalog calls
    pub backend_api_token: Option<String>,
    /// Service session cookie value
    pub backend_session_key: Option<String>,
    /// Service basic-auth username
    pub backend_username: Option<String>,
    /// Service basic-auth password
    pub backend_password: Option<String>,
    /// Per-request timeout towards the data service
    pub backend_timeout_secs: u64,
    /// Name of the session cookie
    pub session_cookie_name: String,
    /// Sliding session lifetime
    pub session_ttl_secs: u64,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: LogLevel::Info,
            environment: Environment::Development,
            backend_url: "http://localhost:8000".to_string(),
            backend_api_token: None,
            backend_session_key: None,
            backend_username: None,
            backend_password: None,
            backend_timeout_secs: 10,
            session_cookie_name: "portal_session".to_string(),
            session_ttl_secs: 1800,
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        }
    }
}

fn parse_number<T: FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::EnvError(format!("{name} must be a number, got {raw:?}")))
}

impl ServerConfig {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overwrite every field whose variable `lookup` knows about
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(env::HOST) {
            self.host = host;
        }
        if let Some(port) = lookup(env::PORT) {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidPort(0))?;
        }
        if let Some(level) = lookup(env::LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(environment) = lookup(env::ENVIRONMENT) {
            self.environment = Environment::from_str(&environment)?;
        }
        if let Some(url) = lookup(env::BACKEND_URL) {
            self.backend_url = url;
        }
        if let Some(token) = lookup(env::BACKEND_API_TOKEN) {
            self.backend_api_token = Some(token);
        }
        if let Some(key) = lookup(env::BACKEND_SESSION_KEY) {
            self.backend_session_key = Some(key);
        }
        if let Some(username) = lookup(env::BACKEND_USERNAME) {
            self.backend_username = Some(username);
        }
        if let Some(password) = lookup(env::BACKEND_PASSWORD) {
            self.backend_password = Some(password);
        }
        if let Some(secs) = lookup(env::BACKEND_TIMEOUT_SECS) {
            self.backend_timeout_secs = parse_number(env::BACKEND_TIMEOUT_SECS, &secs)?;
        }
        if let Some(name) = lookup(env::SESSION_COOKIE) {
            self.session_cookie_name = name;
        }
        if let Some(secs) = lookup(env::SESSION_TTL_SECS) {
            self.session_ttl_secs = parse_number(env::SESSION_TTL_SECS, &secs)?;
        }
        if let Some(dir) = lookup(env::STATIC_DIR) {
            self.static_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Read a TOML file; absent keys keep their defaults
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("{}: {e}", path.display())))?;
        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }

        let url = self.backend_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBackendUrl(self.backend_url.clone()));
        }

        if self.session_ttl_secs == 0 {
            return Err(ConfigError::InvalidSessionTtl);
        }

        Ok(())
    }

    /// `host:port` to bind
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Data service settings for the backend client
    pub fn backend_config(&self) -> BackendConfig {
        let auth = ServiceAuth::from_parts(
            self.backend_api_token.clone(),
            self.backend_session_key.clone(),
            self.backend_username.clone(),
            self.backend_password.clone(),
        );
        BackendConfig::new(self.backend_url.trim())
            .with_service_auth(auth)
            .with_timeout(Duration::from_secs(self.backend_timeout_secs))
    }

    /// Session cookie attributes; `Secure` in production
    pub fn cookie_settings(&self) -> CookieSettings {
        CookieSettings::new(self.session_cookie_name.clone(), self.environment.is_production())
    }

    /// Session lifetime
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Apply command-line overrides
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(host) = &cli.host {
            self.host.clone_from(host);
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(level) = cli.log_level.as_deref() {
            self.log_level = level.parse()?;
        }
        if let Some(environment) = cli.environment.as_deref() {
            self.environment = environment.parse()?;
        }
        if let Some(url) = &cli.backend_url {
            self.backend_url.clone_from(url);
        }
        Ok(())
    }
}

/// Command-line overrides, already parsed by clap
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// TOML file to start from
    pub config_file: Option<PathBuf>,
    /// Host address override
    pub host: Option<String>,
    /// Port override
    pub port: Option<u16>,
    /// Log level override
    pub log_level: Option<String>,
    /// Environment override
    pub environment: Option<String>,
    /// Data service URL override
    pub backend_url: Option<String>,
}

/// Resolve the final configuration: file or defaults, then env, then CLI
pub fn build_config(cli: &CliArgs) -> Result<ServerConfig, ConfigError> {
    let mut config = match &cli.config_file {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    config.apply_env(|name| std::env::var(name).ok())?;
    config.merge_with_cli(cli)?;
    config.validate()?;
    Ok(config)
}
