//! # adapter_backend: Data Service Client
//!
//! ## Adapter Layer Role
//!
//! The portal owns no product data and no accounts. Both live in an external
//! data service reached over HTTP. This crate is the only place that knows
//! its URLs, its authentication schemes and its error payloads:
//!
//! - [`BackendConfig`] / [`ServiceAuth`]: where the service lives and the
//!   service-level credentials used for anonymous catalog reads
//! - [`RequestAuth`]: per-call choice between service credentials and a
//!   user's bearer token
//! - [`BackendClient`]: one method per data-service endpoint
//! - [`BackendClient::with_refresh`]: retry-once-after-refresh around any
//!   user-authenticated call
//!
//! Product rows are mapped onto portal types with
//! [`portal_core::backend`] before they leave this crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use adapter_backend::{BackendClient, BackendConfig, ProductQuery, RequestAuth};
//!
//! # async fn demo() -> Result<(), adapter_backend::BackendError> {
//! let client = BackendClient::new(BackendConfig::new("http://localhost:8000"))?;
//! let page = client
//!     .list_products(&ProductQuery::default(), &RequestAuth::Service)
//!     .await?;
//! println!("{} products", page.count);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod query;

pub use auth::RequestAuth;
pub use client::{BackendClient, ConnectionReport};
pub use config::{BackendConfig, BasicCredentials, ServiceAuth};
pub use error::BackendError;
pub use query::ProductQuery;
