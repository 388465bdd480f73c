//! CSV bulk load, in-memory warehouse, and report export.

pub mod bulk;
pub mod config;
pub mod export;
pub mod warehouse;

pub use bulk::{read_table, read_table_file, TableRows};
pub use config::*;
pub use export::{export_rows, write_csv, write_json, ReportRow};
pub use warehouse::*;
