//! `report_customers`: one row per customer key seen in dated sales.

use chrono::NaiveDate;
use loader::ReportRow;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use warehouse_core::calendar::{age_in_years, months_between};
use warehouse_core::kpi::{average_monthly_spend, average_order_value};
use warehouse_core::{AgeGroup, Customer, CustomerSegment};

use crate::star::StarSchema;

/// A row of `report_customers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerReport {
    /// Null when sales rows carry no customer key
    pub customer_key: Option<i64>,
    pub customer_number: Option<String>,
    pub customer_name: Option<String>,
    pub age: Option<u32>,
    pub age_group: AgeGroup,
    pub customer_segment: CustomerSegment,
    pub last_order_date: NaiveDate,
    pub recency_months: i64,
    pub total_orders: i64,
    pub total_sales: i64,
    pub total_quantity: i64,
    pub total_products: i64,
    pub lifespan_months: i64,
    pub avg_order_value: i64,
    pub avg_monthly_spend: i64,
}

impl ReportRow for CustomerReport {
    const COLUMNS: &'static [&'static str] = &[
        "customer_key",
        "customer_number",
        "customer_name",
        "age",
        "age_group",
        "customer_segment",
        "last_order_date",
        "recency_months",
        "total_orders",
        "total_sales",
        "total_quantity",
        "total_products",
        "lifespan_months",
        "avg_order_value",
        "avg_monthly_spend",
    ];
}

#[derive(Default)]
struct CustomerTotals<'a> {
    customer: Option<&'a Customer>,
    orders: HashSet<&'a str>,
    products: HashSet<i64>,
    total_sales: i64,
    total_quantity: i64,
    first_order: Option<NaiveDate>,
    last_order: Option<NaiveDate>,
}

impl<'a> CustomerTotals<'a> {
    fn add(
        &mut self,
        date: NaiveDate,
        order_number: &'a str,
        product_key: Option<i64>,
        sales: i64,
        quantity: i64,
    ) {
        self.orders.insert(order_number);
        if let Some(key) = product_key {
            self.products.insert(key);
        }
        self.total_sales = self.total_sales.saturating_add(sales);
        self.total_quantity = self.total_quantity.saturating_add(quantity);
        self.first_order = Some(self.first_order.map_or(date, |d| d.min(date)));
        self.last_order = Some(self.last_order.map_or(date, |d| d.max(date)));
    }
}

/// Build `report_customers` as of the given date.
///
/// Rows are ordered by customer key, with the null-key group first.
pub fn build_customer_report(star: &StarSchema<'_>, as_of: NaiveDate) -> Vec<CustomerReport> {
    let mut groups: BTreeMap<Option<i64>, CustomerTotals<'_>> = BTreeMap::new();

    for (date, joined) in star.dated() {
        let line = joined.line;
        let totals = groups.entry(line.customer_key).or_default();
        totals.customer = joined.customer;
        totals.add(
            date,
            &line.order_number,
            line.product_key,
            line.sales(),
            line.units(),
        );
    }

    groups
        .into_iter()
        .filter_map(|(customer_key, totals)| {
            let first_order = totals.first_order?;
            let last_order = totals.last_order?;
            Some(customer_row(customer_key, totals, first_order, last_order, as_of))
        })
        .collect()
}

fn customer_row(
    customer_key: Option<i64>,
    totals: CustomerTotals<'_>,
    first_order: NaiveDate,
    last_order: NaiveDate,
    as_of: NaiveDate,
) -> CustomerReport {
    let lifespan_months = months_between(first_order, last_order);
    let total_orders = totals.orders.len() as i64;
    let age = totals
        .customer
        .and_then(|c| c.birthdate)
        .and_then(|birthdate| age_in_years(birthdate, as_of));

    CustomerReport {
        customer_key,
        customer_number: totals.customer.map(|c| c.customer_number.clone()),
        customer_name: totals.customer.and_then(Customer::full_name),
        age,
        age_group: AgeGroup::from_age(age),
        customer_segment: CustomerSegment::classify(lifespan_months, totals.total_sales),
        last_order_date: last_order,
        recency_months: months_between(last_order, as_of),
        total_orders,
        total_sales: totals.total_sales,
        total_quantity: totals.total_quantity,
        total_products: totals.products.len() as i64,
        lifespan_months,
        avg_order_value: average_order_value(totals.total_sales, total_orders),
        avg_monthly_spend: average_monthly_spend(totals.total_sales, lifespan_months),
    }
}
