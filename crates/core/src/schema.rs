//! Star-schema entities and table definitions.
//!
//! Column names and order match the gold-layer views the extractor exports,
//! so CSV headers deserialize straight into these structs. Empty fields are
//! nulls, and integer columns accept integral floats (`20.0`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::serde_date;
use crate::number::serde_int;

/// Tables of the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    DimCustomers,
    DimProducts,
    FactSales,
}

impl Table {
    /// All tables in load order.
    pub const ALL: [Table; 3] = [Table::DimCustomers, Table::DimProducts, Table::FactSales];

    /// Table name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DimCustomers => "dim_customers",
            Self::DimProducts => "dim_products",
            Self::FactSales => "fact_sales",
        }
    }

    /// Column names in schema order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::DimCustomers => &CUSTOMER_COLUMNS,
            Self::DimProducts => &PRODUCT_COLUMNS,
            Self::FactSales => &SALES_COLUMNS,
        }
    }

    /// File name written by the extractor (`<schema>.<view>.csv`).
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Self::DimCustomers => "gold.dim_customers.csv",
            Self::DimProducts => "gold.dim_products.csv",
            Self::FactSales => "gold.fact_sales.csv",
        }
    }

}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub const CUSTOMER_COLUMNS: [&str; 10] = [
    "customer_key",
    "customer_id",
    "customer_number",
    "first_name",
    "last_name",
    "country",
    "marital_status",
    "gender",
    "birthdate",
    "create_date",
];

pub const PRODUCT_COLUMNS: [&str; 11] = [
    "product_key",
    "product_id",
    "product_number",
    "product_name",
    "category_id",
    "category",
    "subcategory",
    "maintenance",
    "cost",
    "product_line",
    "start_date",
];

pub const SALES_COLUMNS: [&str; 9] = [
    "order_number",
    "product_key",
    "customer_key",
    "order_date",
    "shipping_date",
    "due_date",
    "sales_amount",
    "quantity",
    "price",
];

/// A row of `dim_customers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(deserialize_with = "serde_int::required")]
    pub customer_key: i64,
    #[serde(deserialize_with = "serde_int::required")]
    pub customer_id: i64,
    pub customer_number: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub marital_status: Option<String>,
    pub gender: Option<String>,
    /// Unparsable birthdates load as null; the age group reports them as unknown.
    #[serde(default, deserialize_with = "serde_date::lenient")]
    pub birthdate: Option<NaiveDate>,
    #[serde(default, deserialize_with = "serde_date::optional")]
    pub create_date: Option<NaiveDate>,
}

impl Customer {
    /// First and last name joined by a space, skipping missing parts.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// A row of `dim_products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "serde_int::required")]
    pub product_key: i64,
    #[serde(deserialize_with = "serde_int::required")]
    pub product_id: i64,
    pub product_number: String,
    pub product_name: Option<String>,
    pub category_id: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub maintenance: Option<String>,
    #[serde(default, deserialize_with = "serde_int::optional")]
    pub cost: Option<i64>,
    pub product_line: Option<String>,
    #[serde(default, deserialize_with = "serde_date::optional")]
    pub start_date: Option<NaiveDate>,
}

/// A row of `fact_sales`: one order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesLine {
    pub order_number: String,
    #[serde(default, deserialize_with = "serde_int::optional")]
    pub product_key: Option<i64>,
    #[serde(default, deserialize_with = "serde_int::optional")]
    pub customer_key: Option<i64>,
    #[serde(default, deserialize_with = "serde_date::optional")]
    pub order_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "serde_date::optional")]
    pub shipping_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "serde_date::optional")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "serde_int::optional")]
    pub sales_amount: Option<i64>,
    #[serde(default, deserialize_with = "serde_int::optional")]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "serde_int::optional")]
    pub price: Option<i64>,
}

impl SalesLine {
    /// Sales amount with null treated as zero, the way SUM skips nulls.
    pub fn sales(&self) -> i64 {
        self.sales_amount.unwrap_or(0)
    }

    /// Quantity with null treated as zero.
    pub fn units(&self) -> i64 {
        self.quantity.unwrap_or(0)
    }

    /// Per-line unit price (`sales_amount / quantity`), null when quantity is
    /// zero or either side is missing.
    pub fn unit_price(&self) -> Option<f64> {
        match (self.sales_amount, self.quantity) {
            (Some(sales), Some(qty)) if qty != 0 => Some(sales as f64 / qty as f64),
            _ => None,
        }
    }
}
