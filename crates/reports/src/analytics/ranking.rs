//! Rank-based top-N / bottom-N views.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::measures::{revenue_by_customer, CustomerRevenue};
use crate::star::StarSchema;
use crate::window::{bottom_n_by_rank, top_n_by_rank, Ranked};

/// Revenue of one product name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRevenue {
    pub product_name: Option<String>,
    pub total_revenue: i64,
}

fn revenue_by_product(star: &StarSchema<'_>) -> Vec<ProductRevenue> {
    let mut totals: BTreeMap<Option<String>, i64> = BTreeMap::new();
    for joined in star.joined() {
        let total = totals
            .entry(joined.product_name().map(str::to_owned))
            .or_default();
        *total = total.saturating_add(joined.line.sales());
    }
    totals
        .into_iter()
        .map(|(product_name, total_revenue)| ProductRevenue {
            product_name,
            total_revenue,
        })
        .collect()
}

pub fn top_products(star: &StarSchema<'_>, n: usize) -> Vec<Ranked<ProductRevenue>> {
    top_n_by_rank(revenue_by_product(star), n, |p| p.total_revenue)
}

pub fn bottom_products(star: &StarSchema<'_>, n: usize) -> Vec<Ranked<ProductRevenue>> {
    bottom_n_by_rank(revenue_by_product(star), n, |p| p.total_revenue)
}

pub fn top_customers(star: &StarSchema<'_>, n: usize) -> Vec<Ranked<CustomerRevenue>> {
    top_n_by_rank(revenue_by_customer(star), n, |c| c.total_revenue)
}

/// Distinct orders placed by one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerOrders {
    pub customer_key: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub total_orders: i64,
}

/// Customers with the fewest distinct orders.
pub fn fewest_orders_customers(star: &StarSchema<'_>, n: usize) -> Vec<Ranked<CustomerOrders>> {
    let mut orders: BTreeMap<Option<i64>, HashSet<&str>> = BTreeMap::new();
    for line in star.sales {
        orders
            .entry(line.customer_key)
            .or_default()
            .insert(line.order_number.as_str());
    }

    let rows: Vec<CustomerOrders> = orders
        .into_iter()
        .map(|(customer_key, set)| {
            let customer = star.customer(customer_key);
            CustomerOrders {
                customer_key,
                first_name: customer.and_then(|c| c.first_name.clone()),
                last_name: customer.and_then(|c| c.last_name.clone()),
                total_orders: set.len() as i64,
            }
        })
        .collect();

    bottom_n_by_rank(rows, n, |c| c.total_orders)
}
