//! CSV extract builders.
//!
//! Rows follow the gold-layer extract layout: header row first, empty fields
//! for nulls, dates as YYYY-MM-DD.

use warehouse_core::schema::{CUSTOMER_COLUMNS, PRODUCT_COLUMNS, SALES_COLUMNS};

/// Join a header and rows into one CSV document.
pub fn csv(columns: &[&str], rows: &[String]) -> String {
    let mut out = columns.join(",");
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out
}

pub fn customers_csv(rows: &[String]) -> String {
    csv(&CUSTOMER_COLUMNS, rows)
}

pub fn products_csv(rows: &[String]) -> String {
    csv(&PRODUCT_COLUMNS, rows)
}

pub fn sales_csv(rows: &[String]) -> String {
    csv(&SALES_COLUMNS, rows)
}

/// A `dim_customers` row. Pass "" for a null birthdate.
pub fn customer_row(key: i64, first: &str, last: &str, country: &str, gender: &str, birthdate: &str) -> String {
    format!(
        "{key},{id},AW{id:08},{first},{last},{country},Married,{gender},{birthdate},2025-10-06",
        id = 11000 + key - 1,
    )
}

/// A `dim_products` row. Pass "" for a null cost.
pub fn product_row(key: i64, name: &str, category: &str, subcategory: &str, cost: &str) -> String {
    format!(
        "{key},{id},PN-{key},{name},CAT_{key},{category},{subcategory},No,{cost},Road,2011-07-01",
        id = 200 + key,
    )
}

/// A `fact_sales` line; price is `sales / quantity`. Pass "" for a null date.
pub fn sales_row(order: &str, product: i64, customer: i64, order_date: &str, sales: i64, quantity: i64) -> String {
    let price = if quantity == 0 { 0 } else { sales / quantity };
    format!("{order},{product},{customer},{order_date},{order_date},{order_date},{sales},{quantity},{price}")
}

/// Three customers across two countries.
pub fn sample_customers() -> String {
    customers_csv(&[
        customer_row(1, "Jon", "Yang", "Australia", "Male", "1971-10-06"),
        customer_row(2, "Eugene", "Huang", "Australia", "Male", "1976-05-10"),
        customer_row(3, "Ruben", "Torres", "Canada", "Female", "2000-02-29"),
    ])
}

/// Four products, one with no cost.
pub fn sample_products() -> String {
    products_csv(&[
        product_row(1, "Road-150 Red- 62", "Bikes", "Road Bikes", "2171"),
        product_row(2, "Mountain-100 Black- 44", "Bikes", "Mountain Bikes", "1898"),
        product_row(3, "Sport-100 Helmet- Red", "Accessories", "Helmets", "13"),
        product_row(4, "Water Bottle - 30 oz.", "Accessories", "Bottles and Cages", ""),
    ])
}

/// Sales spanning 2011 to 2013.
///
/// Customer 1: long-lived big spender (VIP). Customer 2: long-lived, small
/// totals (LOYAL). Customer 3: a single multi-line order (NEW). One line has
/// no order date and is ignored by the reports.
pub fn sample_sales() -> String {
    sales_csv(&[
        sales_row("SO43697", 1, 1, "2011-01-10", 3578, 1),
        sales_row("SO51000", 2, 1, "2012-06-15", 3400, 1),
        sales_row("SO60000", 1, 1, "2013-03-02", 7156, 2),
        sales_row("SO45000", 3, 2, "2011-05-01", 35, 1),
        sales_row("SO58000", 3, 2, "2012-08-19", 70, 2),
        sales_row("SO70000", 3, 3, "2013-11-20", 35, 1),
        sales_row("SO70000", 4, 3, "2013-11-20", 5, 1),
        sales_row("SO70000", 2, 3, "2013-11-20", 3400, 1),
        sales_row("SO99999", 4, 2, "", 10, 2),
    ])
}
