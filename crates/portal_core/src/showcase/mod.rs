//! Static showcase content.
//!
//! The data service only exposes products and accounts. Everything else the
//! portal displays (editorial content, the advisor network and the client
//! space figures) comes from here.

pub mod marketing;
pub mod portfolio;

pub use marketing::{
    blog_posts, consultant_for_region, consultants, region_id_from_name, regions, sample_products,
    team_figures, tools, BlogPost, Consultant, Region, TeamFigure, Tool,
};
pub use portfolio::{
    alerts, asset_allocation, client_documents, current_client, holdings, monthly_performance,
    risk_metrics, wishlist, yearly_comparison, Advisor, ClientProfile,
};
