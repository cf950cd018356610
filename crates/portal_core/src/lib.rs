//! # portal_core: Domain Layer for the Structured-Products Portal
//!
//! ## Core Layer Role
//!
//! portal_core sits below every other portal crate and provides:
//! - Product types and display formatting (`product`)
//! - Backend record shapes and the field mapping onto them (`backend`)
//! - ISIN lookup keys (`isin`)
//! - Users, roles and authentication payloads (`user`)
//! - Client holdings, documents and alerts (`portfolio`)
//! - Chart series and risk metrics (`stats`)
//! - Static marketing and demo content (`showcase`)
//!
//! The crate performs no I/O. Everything here is a value type or a pure
//! function, which keeps the proxy and page layers thin.
//!
//! ## Usage Examples
//!
//! ```rust
//! use portal_core::backend::{map_summary, BackendProduct, BackendStatus};
//! use portal_core::product::{Family, ProductStatus};
//!
//! let record: BackendProduct = serde_json::from_str(r#"{
//!     "id": 7,
//!     "label": "Athena Euro Stoxx",
//!     "isin": "FR0013412345",
//!     "deliver": "BNP Paribas",
//!     "family": "Autocall",
//!     "category": "Indices",
//!     "launch_date": "2025-02-14"
//! }"#).unwrap();
//! let status = BackendStatus { id: 1, code: "LIVE".into(), description: None };
//!
//! let product = map_summary(&record, Some(&status));
//! assert_eq!(product.family, Family::Autocall);
//! assert_eq!(product.status, ProductStatus::Started);
//! assert_eq!(product.start_date, "Fév. 2025");
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod backend;
pub mod error;
pub mod isin;
pub mod portfolio;
pub mod product;
pub mod showcase;
pub mod stats;
pub mod user;

pub use error::CoreError;
pub use isin::Isin;
pub use product::{Family, Product, ProductStatus};
pub use user::{Role, User};
