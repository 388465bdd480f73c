//! Star join over the fact table.
//!
//! Fact rows are left-joined to both dimensions: an unmatched or null key
//! yields `None` for that dimension rather than dropping the row. When a
//! dimension holds duplicate keys the last row wins.

use chrono::NaiveDate;
use loader::WarehouseSnapshot;
use std::collections::HashMap;
use warehouse_core::{Customer, Product, SalesLine};

/// One fact row with its (optional) dimension rows.
#[derive(Debug, Clone, Copy)]
pub struct JoinedLine<'a> {
    pub line: &'a SalesLine,
    pub customer: Option<&'a Customer>,
    pub product: Option<&'a Product>,
}

impl<'a> JoinedLine<'a> {
    pub fn order_date(&self) -> Option<NaiveDate> {
        self.line.order_date
    }

    pub fn product_name(&self) -> Option<&'a str> {
        self.product.and_then(|p| p.product_name.as_deref())
    }

    pub fn category(&self) -> Option<&'a str> {
        self.product.and_then(|p| p.category.as_deref())
    }

    pub fn country(&self) -> Option<&'a str> {
        self.customer.and_then(|c| c.country.as_deref())
    }
}

/// The three tables plus key indexes for the dimension lookups.
pub struct StarSchema<'a> {
    pub customers: &'a [Customer],
    pub products: &'a [Product],
    pub sales: &'a [SalesLine],
    customer_index: HashMap<i64, &'a Customer>,
    product_index: HashMap<i64, &'a Product>,
}

impl<'a> StarSchema<'a> {
    pub fn new(customers: &'a [Customer], products: &'a [Product], sales: &'a [SalesLine]) -> Self {
        let customer_index = customers.iter().map(|c| (c.customer_key, c)).collect();
        let product_index = products.iter().map(|p| (p.product_key, p)).collect();

        Self {
            customers,
            products,
            sales,
            customer_index,
            product_index,
        }
    }

    pub fn from_snapshot(snapshot: &'a WarehouseSnapshot) -> Self {
        Self::new(&snapshot.customers, &snapshot.products, &snapshot.sales)
    }

    pub fn customer(&self, key: Option<i64>) -> Option<&'a Customer> {
        key.and_then(|k| self.customer_index.get(&k).copied())
    }

    pub fn product(&self, key: Option<i64>) -> Option<&'a Product> {
        key.and_then(|k| self.product_index.get(&k).copied())
    }

    /// Every fact row, left-joined.
    pub fn joined(&self) -> impl Iterator<Item = JoinedLine<'a>> + '_ {
        self.sales.iter().map(move |line| JoinedLine {
            line,
            customer: self.customer(line.customer_key),
            product: self.product(line.product_key),
        })
    }

    /// Fact rows with an order date, paired with that date.
    pub fn dated(&self) -> impl Iterator<Item = (NaiveDate, JoinedLine<'a>)> + '_ {
        self.joined()
            .filter_map(|joined| joined.order_date().map(|date| (date, joined)))
    }
}
