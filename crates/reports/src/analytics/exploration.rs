//! Database, dimension, and date exploration.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use warehouse_core::calendar::{age_in_years, months_between};
use warehouse_core::Table;

use crate::star::StarSchema;

/// One table's shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableInventory {
    pub table: Table,
    pub columns: Vec<&'static str>,
    pub rows: usize,
}

pub fn table_inventory(star: &StarSchema<'_>) -> Vec<TableInventory> {
    Table::ALL
        .into_iter()
        .map(|table| TableInventory {
            table,
            columns: table.columns().to_vec(),
            rows: match table {
                Table::DimCustomers => star.customers.len(),
                Table::DimProducts => star.products.len(),
                Table::FactSales => star.sales.len(),
            },
        })
        .collect()
}

/// Distinct customer countries, sorted. Null countries are skipped.
pub fn countries(star: &StarSchema<'_>) -> Vec<String> {
    star.customers
        .iter()
        .filter_map(|c| c.country.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// A distinct category / subcategory / product combination.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ProductHierarchy {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub product_name: Option<String>,
}

pub fn product_hierarchy(star: &StarSchema<'_>) -> Vec<ProductHierarchy> {
    star.products
        .iter()
        .map(|p| ProductHierarchy {
            category: p.category.clone(),
            subcategory: p.subcategory.clone(),
            product_name: p.product_name.clone(),
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Order date span and customer birthdate extremes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DateRange {
    pub first_order_date: Option<NaiveDate>,
    pub last_order_date: Option<NaiveDate>,
    pub order_range_months: Option<i64>,
    pub oldest_birthdate: Option<NaiveDate>,
    pub oldest_age: Option<u32>,
    pub youngest_birthdate: Option<NaiveDate>,
    pub youngest_age: Option<u32>,
}

pub fn date_range(star: &StarSchema<'_>, as_of: NaiveDate) -> DateRange {
    let order_dates = || star.sales.iter().filter_map(|s| s.order_date);
    let birthdates = || star.customers.iter().filter_map(|c| c.birthdate);

    let first_order_date = order_dates().min();
    let last_order_date = order_dates().max();
    let oldest_birthdate = birthdates().min();
    let youngest_birthdate = birthdates().max();

    DateRange {
        first_order_date,
        last_order_date,
        order_range_months: first_order_date
            .zip(last_order_date)
            .map(|(first, last)| months_between(first, last)),
        oldest_birthdate,
        oldest_age: oldest_birthdate.and_then(|b| age_in_years(b, as_of)),
        youngest_birthdate,
        youngest_age: youngest_birthdate.and_then(|b| age_in_years(b, as_of)),
    }
}
