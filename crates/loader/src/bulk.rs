//! CSV bulk load helpers.
//!
//! Files carry a header row (first data row is line 2), comma-delimited.
//! Every schema column must be present in the header; extra columns are
//! ignored. Any bad record fails the whole table.

use csv::{ErrorKind, ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use warehouse_core::error::LoadErrorCode;
use warehouse_core::{Customer, Error, Product, Result, SalesLine, Table};

/// Rows of one table, ready to replace the table's contents.
#[derive(Debug, Clone)]
pub enum TableRows {
    Customers(Vec<Customer>),
    Products(Vec<Product>),
    Sales(Vec<SalesLine>),
}

impl TableRows {
    /// An empty batch: loading it truncates the table.
    pub fn empty(table: Table) -> Self {
        match table {
            Table::DimCustomers => Self::Customers(Vec::new()),
            Table::DimProducts => Self::Products(Vec::new()),
            Table::FactSales => Self::Sales(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Customers(rows) => rows.len(),
            Self::Products(rows) => rows.len(),
            Self::Sales(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse a table's CSV from any reader.
pub fn read_table<T, R>(table: Table, reader: R) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| classify_csv_error(table, e))?
        .clone();
    check_headers(table, &headers)?;

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        let row: T = result.map_err(|e| classify_csv_error(table, e))?;
        rows.push(row);
    }

    debug!(table = table.name(), rows = rows.len(), "Parsed table");
    Ok(rows)
}

/// Parse a table's CSV file into typed rows.
pub fn read_table_file(table: Table, path: &Path) -> Result<TableRows> {
    let file = File::open(path).map_err(|e| {
        Error::load(
            LoadErrorCode::MissingFile,
            table.name(),
            None,
            format!("cannot open {}: {}", path.display(), e),
        )
    })?;

    let rows = match table {
        Table::DimCustomers => TableRows::Customers(read_table(table, file)?),
        Table::DimProducts => TableRows::Products(read_table(table, file)?),
        Table::FactSales => TableRows::Sales(read_table(table, file)?),
    };
    Ok(rows)
}

fn check_headers(table: Table, headers: &StringRecord) -> Result<()> {
    let missing: Vec<&str> = table
        .columns()
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::load(
            LoadErrorCode::MalformedCsv,
            table.name(),
            Some(1),
            format!("header is missing columns: {}", missing.join(", ")),
        ))
    }
}

fn classify_csv_error(table: Table, err: csv::Error) -> Error {
    let line = err.position().map(|p| p.line());
    let code = match err.kind() {
        ErrorKind::Deserialize { .. } => LoadErrorCode::TypeMismatch,
        _ => LoadErrorCode::MalformedCsv,
    };
    Error::load(code, table.name(), line, err.to_string())
}
