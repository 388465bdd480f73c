//! Reporting layer over the sales warehouse.
//!
//! - `report_customers` / `report_products` views
//! - Window-function trend patterns
//! - Exploratory and advanced analytics
//! - Version-keyed view cache and scheduled refresh

pub mod analytics;
pub mod customer;
pub mod product;
pub mod quality;
pub mod refresh;
pub mod scheduler;
pub mod settings;
pub mod star;
pub mod trends;
pub mod views;
pub mod window;

pub use analytics::{AnalyticsOptions, AnalyticsReport};
pub use customer::{build_customer_report, CustomerReport};
pub use product::{build_product_report, ProductReport};
pub use quality::QualityReport;
pub use refresh::{refresh_once, RefreshSummary};
pub use scheduler::{RefreshConfig, RefreshScheduler};
pub use settings::ReportSettings;
pub use star::{JoinedLine, StarSchema};
pub use trends::{trend_over_period, EntityTrend, Metric, TimeGrain};
pub use views::{ReportSet, ReportViews};
pub use window::Ranked;
