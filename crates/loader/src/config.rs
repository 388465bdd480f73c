//! Load and export configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use warehouse_core::Table;

/// Where the bulk load reads its CSV extracts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Directory holding the extracted CSV files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// File name of the `dim_customers` extract
    #[serde(default = "default_customers_file")]
    pub customers_file: String,
    /// File name of the `dim_products` extract
    #[serde(default = "default_products_file")]
    pub products_file: String,
    /// File name of the `fact_sales` extract
    #[serde(default = "default_sales_file")]
    pub sales_file: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/gold_tables")
}

fn default_customers_file() -> String {
    Table::DimCustomers.default_file_name().to_string()
}

fn default_products_file() -> String {
    Table::DimProducts.default_file_name().to_string()
}

fn default_sales_file() -> String {
    Table::FactSales.default_file_name().to_string()
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            customers_file: default_customers_file(),
            products_file: default_products_file(),
            sales_file: default_sales_file(),
        }
    }
}

impl LoadConfig {
    /// Default file names under `data_dir`.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Full path of a table's CSV file.
    pub fn path_for(&self, table: Table) -> PathBuf {
        let file = match table {
            Table::DimCustomers => &self.customers_file,
            Table::DimProducts => &self.products_file,
            Table::FactSales => &self.sales_file,
        };
        self.data_dir.join(file)
    }
}

/// Output encoding for exported reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{}', expected csv or json", other)),
        }
    }
}

/// Where and how reports are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the report files are written to (created if missing)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Report file encoding
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/reports")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            format: OutputFormat::default(),
        }
    }
}
