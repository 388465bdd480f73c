//! Data quality checks run by `validate`.
//!
//! Checks only count problems; the reports still run over the rows as loaded.

use serde::Serialize;
use std::collections::HashSet;

use crate::star::StarSchema;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub sales_rows: usize,
    /// Rows with a negative sales amount, quantity, or price
    pub negative_measures: usize,
    pub null_order_dates: usize,
    /// Order date after the shipping or due date
    pub invalid_date_order: usize,
    /// `sales_amount != quantity * price`, including products that overflow
    pub inconsistent_sales: usize,
    /// Non-null keys with no matching dimension row
    pub orphan_customer_keys: usize,
    pub orphan_product_keys: usize,
    pub duplicate_customer_keys: usize,
    pub duplicate_product_keys: usize,
}

impl QualityReport {
    pub fn check(star: &StarSchema<'_>) -> Self {
        let mut report = Self {
            sales_rows: star.sales.len(),
            duplicate_customer_keys: duplicates(star.customers.iter().map(|c| c.customer_key)),
            duplicate_product_keys: duplicates(star.products.iter().map(|p| p.product_key)),
            ..Self::default()
        };

        for joined in star.joined() {
            let line = joined.line;

            if [line.sales_amount, line.quantity, line.price]
                .iter()
                .any(|v| v.is_some_and(|v| v < 0))
            {
                report.negative_measures += 1;
            }

            match line.order_date {
                None => report.null_order_dates += 1,
                Some(ordered) => {
                    let late = |d: Option<chrono::NaiveDate>| d.is_some_and(|d| ordered > d);
                    if late(line.shipping_date) || late(line.due_date) {
                        report.invalid_date_order += 1;
                    }
                }
            }

            if let (Some(sales), Some(qty), Some(price)) =
                (line.sales_amount, line.quantity, line.price)
            {
                if qty.checked_mul(price) != Some(sales) {
                    report.inconsistent_sales += 1;
                }
            }

            if line.customer_key.is_some() && joined.customer.is_none() {
                report.orphan_customer_keys += 1;
            }
            if line.product_key.is_some() && joined.product.is_none() {
                report.orphan_product_keys += 1;
            }
        }

        report
    }

    pub fn issue_count(&self) -> usize {
        self.negative_measures
            + self.null_order_dates
            + self.invalid_date_order
            + self.inconsistent_sales
            + self.orphan_customer_keys
            + self.orphan_product_keys
            + self.duplicate_customer_keys
            + self.duplicate_product_keys
    }

    pub fn is_clean(&self) -> bool {
        self.issue_count() == 0
    }
}

fn duplicates(keys: impl Iterator<Item = i64>) -> usize {
    let mut seen = HashSet::new();
    keys.filter(|k| !seen.insert(*k)).count()
}
