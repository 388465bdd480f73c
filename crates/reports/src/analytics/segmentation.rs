//! Part-to-whole and data segmentation.

use serde::Serialize;
use std::collections::BTreeMap;
use warehouse_core::kpi::{percentage_of, saturating_sum};
use warehouse_core::{CostRange, CustomerSegment};

use crate::customer::CustomerReport;
use crate::star::StarSchema;

/// A category's share of total sales.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Option<String>,
    pub total_sales: i64,
    /// Percent of overall sales, two decimals
    pub percentage_of_total: f64,
}

pub fn category_contribution(star: &StarSchema<'_>) -> Vec<CategoryShare> {
    let mut totals: BTreeMap<Option<String>, i64> = BTreeMap::new();
    for joined in star.joined() {
        let total = totals
            .entry(joined.category().map(str::to_owned))
            .or_default();
        *total = total.saturating_add(joined.line.sales());
    }
    let overall = saturating_sum(totals.values().copied());

    let mut rows: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, total_sales)| CategoryShare {
            category,
            total_sales,
            percentage_of_total: percentage_of(total_sales, overall),
        })
        .collect();
    rows.sort_by(|a, b| b.total_sales.cmp(&a.total_sales));
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostRangeCount {
    pub cost_range: CostRange,
    pub total_products: usize,
}

/// Products per cost band, most populated first.
pub fn cost_ranges(star: &StarSchema<'_>) -> Vec<CostRangeCount> {
    let mut counts: BTreeMap<CostRange, usize> = BTreeMap::new();
    for product in star.products {
        *counts.entry(CostRange::classify(product.cost)).or_default() += 1;
    }

    let mut rows: Vec<CostRangeCount> = counts
        .into_iter()
        .map(|(cost_range, total_products)| CostRangeCount {
            cost_range,
            total_products,
        })
        .collect();
    rows.sort_by(|a, b| b.total_products.cmp(&a.total_products));
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentCount {
    pub customer_segment: CustomerSegment,
    pub total_customers: usize,
}

/// Customers per segment, taken from the customer report rows.
pub fn customer_segment_counts(customers: &[CustomerReport]) -> Vec<SegmentCount> {
    let mut counts: BTreeMap<CustomerSegment, usize> = BTreeMap::new();
    for row in customers {
        *counts.entry(row.customer_segment).or_default() += 1;
    }

    let mut rows: Vec<SegmentCount> = counts
        .into_iter()
        .map(|(customer_segment, total_customers)| SegmentCount {
            customer_segment,
            total_customers,
        })
        .collect();
    rows.sort_by(|a, b| b.total_customers.cmp(&a.total_customers));
    rows
}
