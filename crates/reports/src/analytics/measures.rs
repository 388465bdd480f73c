//! Measures overview and magnitude breakdowns.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use warehouse_core::kpi::{integer_average, saturating_sum};

use crate::star::StarSchema;

/// Headline totals over the whole fact table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeasuresOverview {
    pub total_sales: i64,
    pub total_quantity: i64,
    pub average_price: Option<i64>,
    pub total_orders: usize,
    pub total_products: usize,
    pub total_customers: usize,
    pub customers_with_orders: usize,
}

pub fn measures_overview(star: &StarSchema<'_>) -> MeasuresOverview {
    let sales = star.sales;

    MeasuresOverview {
        total_sales: saturating_sum(sales.iter().map(|s| s.sales())),
        total_quantity: saturating_sum(sales.iter().map(|s| s.units())),
        average_price: integer_average(sales.iter().map(|s| s.price)),
        total_orders: sales
            .iter()
            .map(|s| s.order_number.as_str())
            .collect::<HashSet<_>>()
            .len(),
        total_products: star.products.len(),
        total_customers: star.customers.len(),
        customers_with_orders: sales
            .iter()
            .filter_map(|s| s.customer_key)
            .collect::<HashSet<_>>()
            .len(),
    }
}

/// A measure per group label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMeasure {
    pub group: Option<String>,
    pub value: i64,
}

/// Sum `value` per group, highest first; ties by group label.
fn grouped<I>(pairs: I) -> Vec<GroupMeasure>
where
    I: IntoIterator<Item = (Option<String>, i64)>,
{
    let mut totals: BTreeMap<Option<String>, i64> = BTreeMap::new();
    for (group, value) in pairs {
        let total = totals.entry(group).or_default();
        *total = total.saturating_add(value);
    }
    sort_descending(totals.into_iter())
}

fn sort_descending(totals: impl Iterator<Item = (Option<String>, i64)>) -> Vec<GroupMeasure> {
    let mut rows: Vec<GroupMeasure> = totals
        .map(|(group, value)| GroupMeasure { group, value })
        .collect();
    // Stable sort keeps the BTreeMap order among equal values
    rows.sort_by(|a, b| b.value.cmp(&a.value));
    rows
}

pub fn customers_by_country(star: &StarSchema<'_>) -> Vec<GroupMeasure> {
    grouped(star.customers.iter().map(|c| (c.country.clone(), 1)))
}

pub fn customers_by_gender(star: &StarSchema<'_>) -> Vec<GroupMeasure> {
    grouped(star.customers.iter().map(|c| (c.gender.clone(), 1)))
}

pub fn products_by_category(star: &StarSchema<'_>) -> Vec<GroupMeasure> {
    grouped(star.products.iter().map(|p| (p.category.clone(), 1)))
}

/// Integer average product cost per category; null costs are skipped.
pub fn average_cost_by_category(star: &StarSchema<'_>) -> Vec<GroupMeasure> {
    let mut costs: BTreeMap<Option<String>, Vec<Option<i64>>> = BTreeMap::new();
    for product in star.products {
        costs
            .entry(product.category.clone())
            .or_default()
            .push(product.cost);
    }
    sort_descending(
        costs
            .into_iter()
            .map(|(group, values)| (group, integer_average(values).unwrap_or(0))),
    )
}

/// Revenue per product category over all fact rows.
pub fn revenue_by_category(star: &StarSchema<'_>) -> Vec<GroupMeasure> {
    grouped(
        star.joined()
            .map(|j| (j.category().map(str::to_owned), j.line.sales())),
    )
}

/// Units sold per customer country.
pub fn items_sold_by_country(star: &StarSchema<'_>) -> Vec<GroupMeasure> {
    grouped(
        star.joined()
            .map(|j| (j.country().map(str::to_owned), j.line.units())),
    )
}

/// Revenue of one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRevenue {
    pub customer_key: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub total_revenue: i64,
}

/// Revenue per customer key, highest first.
pub fn revenue_by_customer(star: &StarSchema<'_>) -> Vec<CustomerRevenue> {
    let mut totals: HashMap<Option<i64>, i64> = HashMap::new();
    for line in star.sales {
        let total = totals.entry(line.customer_key).or_default();
        *total = total.saturating_add(line.sales());
    }

    let mut rows: Vec<CustomerRevenue> = totals
        .into_iter()
        .map(|(customer_key, total_revenue)| {
            let customer = star.customer(customer_key);
            CustomerRevenue {
                customer_key,
                first_name: customer.and_then(|c| c.first_name.clone()),
                last_name: customer.and_then(|c| c.last_name.clone()),
                total_revenue,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_revenue
            .cmp(&a.total_revenue)
            .then(a.customer_key.cmp(&b.customer_key))
    });
    rows
}
