//! Page bodies, rendered inside [`PublicLayout`](super::layout::PublicLayout)
//! or [`PortalLayout`](super::layout::PortalLayout).

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod documents;
pub mod home;
pub mod not_found;
pub mod portfolio;
pub mod profile;
pub mod settings;
pub mod stats;

pub use auth::{LoginPage, RegisterForm, RegisterPage};
pub use catalog::{CatalogFilter, CatalogPage, ProductDetailPage, ProductUnavailable, SortOrder};
pub use dashboard::DashboardPage;
pub use documents::{DocumentsPage, DocumentsQuery};
pub use home::{HomePage, HomeQuery};
pub use not_found::NotFoundPage;
pub use portfolio::{HoldingDetailPage, PortfolioPage};
pub use profile::ProfilePage;
pub use settings::SettingsPage;
pub use stats::StatsPage;
