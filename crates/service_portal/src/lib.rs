//! Web server for the structured-products portal
//!
//! This crate serves the marketing site and the client portal:
//! - JSON routes under `/api` that proxy the product data service
//! - HTML pages rendered on the server, charts included as inline SVG
//! - server-side sessions holding the data service tokens

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod session;
pub mod views;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
