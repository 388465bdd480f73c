//! Exploratory and advanced analytics over one warehouse snapshot.

pub mod exploration;
pub mod measures;
pub mod ranking;
pub mod segmentation;
pub mod time_series;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::customer::build_customer_report;
use crate::star::StarSchema;
use crate::trends::TimeGrain;
use crate::window::Ranked;

pub use exploration::{DateRange, ProductHierarchy, TableInventory};
pub use measures::{CustomerRevenue, GroupMeasure, MeasuresOverview};
pub use ranking::{CustomerOrders, ProductRevenue};
pub use segmentation::{CategoryShare, CostRangeCount, SegmentCount};
pub use time_series::{CumulativePoint, PeriodSummary, ProductYearPerformance};

/// Knobs for an analytics run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsOptions {
    pub grain: TimeGrain,
    pub top_n: usize,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            grain: TimeGrain::Month,
            top_n: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Magnitude {
    pub customers_by_country: Vec<GroupMeasure>,
    pub customers_by_gender: Vec<GroupMeasure>,
    pub products_by_category: Vec<GroupMeasure>,
    pub average_cost_by_category: Vec<GroupMeasure>,
    pub revenue_by_category: Vec<GroupMeasure>,
    pub revenue_by_customer: Vec<CustomerRevenue>,
    pub items_sold_by_country: Vec<GroupMeasure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Rankings {
    pub top_products: Vec<Ranked<ProductRevenue>>,
    pub bottom_products: Vec<Ranked<ProductRevenue>>,
    pub top_customers: Vec<Ranked<CustomerRevenue>>,
    pub fewest_orders_customers: Vec<Ranked<CustomerOrders>>,
}

/// Every analysis, serialized as one JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub as_of: NaiveDate,
    pub grain: TimeGrain,
    pub tables: Vec<TableInventory>,
    pub countries: Vec<String>,
    pub product_hierarchy: Vec<ProductHierarchy>,
    pub date_range: DateRange,
    pub measures: MeasuresOverview,
    pub magnitude: Magnitude,
    pub rankings: Rankings,
    pub change_over_time: Vec<PeriodSummary>,
    pub cumulative: Vec<CumulativePoint>,
    pub product_performance: Vec<ProductYearPerformance>,
    pub category_contribution: Vec<CategoryShare>,
    pub cost_ranges: Vec<CostRangeCount>,
    pub customer_segments: Vec<SegmentCount>,
}

impl AnalyticsReport {
    pub fn build(star: &StarSchema<'_>, as_of: NaiveDate, options: &AnalyticsOptions) -> Self {
        let n = options.top_n;
        let customers = build_customer_report(star, as_of);

        let report = Self {
            as_of,
            grain: options.grain,
            tables: exploration::table_inventory(star),
            countries: exploration::countries(star),
            product_hierarchy: exploration::product_hierarchy(star),
            date_range: exploration::date_range(star, as_of),
            measures: measures::measures_overview(star),
            magnitude: Magnitude {
                customers_by_country: measures::customers_by_country(star),
                customers_by_gender: measures::customers_by_gender(star),
                products_by_category: measures::products_by_category(star),
                average_cost_by_category: measures::average_cost_by_category(star),
                revenue_by_category: measures::revenue_by_category(star),
                revenue_by_customer: measures::revenue_by_customer(star),
                items_sold_by_country: measures::items_sold_by_country(star),
            },
            rankings: Rankings {
                top_products: ranking::top_products(star, n),
                bottom_products: ranking::bottom_products(star, n),
                top_customers: ranking::top_customers(star, n),
                fewest_orders_customers: ranking::fewest_orders_customers(star, n),
            },
            change_over_time: time_series::change_over_time(star, options.grain),
            cumulative: time_series::cumulative_analysis(star, options.grain),
            product_performance: time_series::yearly_product_performance(star),
            category_contribution: segmentation::category_contribution(star),
            cost_ranges: segmentation::cost_ranges(star),
            customer_segments: segmentation::customer_segment_counts(&customers),
        };

        debug!(
            grain = %options.grain,
            top_n = n,
            periods = report.change_over_time.len(),
            "Built analytics"
        );
        report
    }
}
