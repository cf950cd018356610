//! Reusable page fragments.

pub mod charts;
pub mod map;
pub mod marketing;
pub mod product_card;

pub use charts::{AreaChart, BarChart, DonutChart, LineChart};
pub use map::RegionMap;
pub use marketing::{BlogSection, ConsultantCard, ProductsIntro, TeamSection, ToolsBand};
pub use product_card::{ProductCard, ProductGallery};
