//! `report_products`: one row per product key seen in dated sales.

use chrono::NaiveDate;
use loader::ReportRow;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use warehouse_core::calendar::months_between;
use warehouse_core::kpi::{average_monthly_revenue, average_order_value, mean, round_to};
use warehouse_core::{PerformanceSegment, Product, QuantitySegment};

use crate::star::StarSchema;

/// A row of `report_products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReport {
    pub product_key: Option<i64>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub cost: Option<i64>,
    pub last_sale_date: NaiveDate,
    pub recency_months: i64,
    pub performance_segment: PerformanceSegment,
    pub quantity_segment: QuantitySegment,
    pub lifespan_months: i64,
    pub total_orders: i64,
    pub total_sales: i64,
    pub total_quantity: i64,
    pub total_customers: i64,
    /// Mean of per-line unit prices, one decimal; null when no line has a
    /// non-zero quantity
    pub avg_selling_price: Option<f64>,
    pub avg_order_revenue: i64,
    pub avg_monthly_revenue: i64,
}

impl ReportRow for ProductReport {
    const COLUMNS: &'static [&'static str] = &[
        "product_key",
        "product_name",
        "category",
        "subcategory",
        "cost",
        "last_sale_date",
        "recency_months",
        "performance_segment",
        "quantity_segment",
        "lifespan_months",
        "total_orders",
        "total_sales",
        "total_quantity",
        "total_customers",
        "avg_selling_price",
        "avg_order_revenue",
        "avg_monthly_revenue",
    ];
}

#[derive(Default)]
struct ProductTotals<'a> {
    product: Option<&'a Product>,
    orders: HashSet<&'a str>,
    customers: HashSet<i64>,
    total_sales: i64,
    total_quantity: i64,
    price_sum: f64,
    price_count: usize,
    first_sale: Option<NaiveDate>,
    last_sale: Option<NaiveDate>,
}

impl ProductTotals<'_> {
    fn avg_selling_price(&self) -> Option<f64> {
        if self.price_count == 0 {
            None
        } else {
            Some(round_to(self.price_sum / self.price_count as f64, 1))
        }
    }
}

/// Build `report_products` as of the given date.
///
/// The quantity segment compares each product against the mean total quantity
/// of all rows in this report.
pub fn build_product_report(star: &StarSchema<'_>, as_of: NaiveDate) -> Vec<ProductReport> {
    let mut groups: BTreeMap<Option<i64>, ProductTotals<'_>> = BTreeMap::new();

    for (date, joined) in star.dated() {
        let line = joined.line;
        let totals = groups.entry(line.product_key).or_default();
        totals.product = joined.product;
        totals.orders.insert(line.order_number.as_str());
        if let Some(key) = line.customer_key {
            totals.customers.insert(key);
        }
        totals.total_sales = totals.total_sales.saturating_add(line.sales());
        totals.total_quantity = totals.total_quantity.saturating_add(line.units());
        if let Some(price) = line.unit_price() {
            totals.price_sum += price;
            totals.price_count += 1;
        }
        totals.first_sale = Some(totals.first_sale.map_or(date, |d| d.min(date)));
        totals.last_sale = Some(totals.last_sale.map_or(date, |d| d.max(date)));
    }

    let mean_quantity =
        mean(groups.values().map(|t| t.total_quantity as f64)).unwrap_or_default();

    groups
        .into_iter()
        .filter_map(|(product_key, totals)| {
            let first_sale = totals.first_sale?;
            let last_sale = totals.last_sale?;
            let lifespan_months = months_between(first_sale, last_sale);
            let total_orders = totals.orders.len() as i64;
            let product = totals.product;

            Some(ProductReport {
                product_key,
                product_name: product.and_then(|p| p.product_name.clone()),
                category: product.and_then(|p| p.category.clone()),
                subcategory: product.and_then(|p| p.subcategory.clone()),
                cost: product.and_then(|p| p.cost),
                last_sale_date: last_sale,
                recency_months: months_between(last_sale, as_of),
                performance_segment: PerformanceSegment::classify(totals.total_sales),
                quantity_segment: QuantitySegment::classify(totals.total_quantity, mean_quantity),
                lifespan_months,
                total_orders,
                total_sales: totals.total_sales,
                total_quantity: totals.total_quantity,
                total_customers: totals.customers.len() as i64,
                avg_selling_price: totals.avg_selling_price(),
                avg_order_revenue: average_order_value(totals.total_sales, total_orders),
                avg_monthly_revenue: average_monthly_revenue(totals.total_sales, lifespan_months),
            })
        })
        .collect()
}
