//! In-memory star-schema warehouse.
//!
//! Readers take an `Arc` snapshot of all three tables, so a report never
//! sees a half-applied load. Loads replace whole tables (truncate-then-load)
//! and bump the version once per batch.

use parking_lot::RwLock;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use telemetry::metrics;
use tracing::{error, info, info_span};
use warehouse_core::{Customer, Product, SalesLine, Table};

use crate::bulk::{read_table_file, TableRows};
use crate::config::LoadConfig;

/// Immutable view of the warehouse at one version.
#[derive(Debug, Clone, Default)]
pub struct WarehouseSnapshot {
    pub version: u64,
    pub customers: Arc<Vec<Customer>>,
    pub products: Arc<Vec<Product>>,
    pub sales: Arc<Vec<SalesLine>>,
}

/// A table that loaded.
#[derive(Debug, Clone, Serialize)]
pub struct TableLoadSummary {
    pub table: Table,
    pub path: PathBuf,
    pub rows: usize,
}

/// A table that failed to load and was left empty.
#[derive(Debug, Clone, Serialize)]
pub struct TableLoadFailure {
    pub table: Table,
    pub path: PathBuf,
    pub code: Option<&'static str>,
    pub error: String,
}

/// Result of loading all tables from CSV.
#[derive(Debug, Clone, Serialize)]
pub struct LoadOutcome {
    /// Warehouse version after the load
    pub version: u64,
    pub loaded: Vec<TableLoadSummary>,
    pub failed: Vec<TableLoadFailure>,
}

impl LoadOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Every table failed.
    pub fn is_total_failure(&self) -> bool {
        self.loaded.is_empty() && !self.failed.is_empty()
    }

    pub fn rows_loaded(&self) -> usize {
        self.loaded.iter().map(|t| t.rows).sum()
    }
}

/// The warehouse: three tables behind one lock.
#[derive(Debug, Default)]
pub struct Warehouse {
    current: RwLock<Arc<WarehouseSnapshot>>,
}

impl Warehouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<WarehouseSnapshot> {
        self.current.read().clone()
    }

    pub fn version(&self) -> u64 {
        self.current.read().version
    }

    /// Replace the given tables in one step. Tables not in `batches` keep
    /// their rows. Returns the new version.
    pub fn replace(&self, batches: Vec<TableRows>) -> u64 {
        let mut guard = self.current.write();
        let mut next = WarehouseSnapshot::clone(&guard);

        for batch in batches {
            match batch {
                TableRows::Customers(rows) => next.customers = Arc::new(rows),
                TableRows::Products(rows) => next.products = Arc::new(rows),
                TableRows::Sales(rows) => next.sales = Arc::new(rows),
            }
        }

        next.version += 1;
        let version = next.version;
        *guard = Arc::new(next);

        metrics().warehouse_version.set(version);
        version
    }

    /// Load all tables from their CSV files.
    ///
    /// A table that fails is reported and left empty; the others still load.
    /// All three replacements land under a single version.
    pub fn load_from_csv(&self, config: &LoadConfig) -> LoadOutcome {
        let span = info_span!("load", data_dir = %config.data_dir.display());
        let _enter = span.enter();
        let start = Instant::now();

        let mut batches = Vec::with_capacity(Table::ALL.len());
        let mut loaded = Vec::new();
        let mut failed = Vec::new();

        for table in Table::ALL {
            let path = config.path_for(table);
            match read_table_file(table, &path) {
                Ok(rows) => {
                    info!(table = table.name(), rows = rows.len(), "Loaded table");
                    metrics().tables_loaded.inc();
                    metrics().rows_loaded.inc_by(rows.len() as u64);
                    loaded.push(TableLoadSummary {
                        table,
                        path,
                        rows: rows.len(),
                    });
                    batches.push(rows);
                }
                Err(e) => {
                    error!(table = table.name(), error = %e, "Table load failed, table truncated");
                    metrics().table_load_failures.inc();
                    failed.push(TableLoadFailure {
                        table,
                        path,
                        code: e.error_code(),
                        error: e.to_string(),
                    });
                    batches.push(TableRows::empty(table));
                }
            }
        }

        let version = self.replace(batches);
        metrics()
            .load_latency_ms
            .observe(start.elapsed().as_millis() as u64);

        info!(
            version,
            loaded = loaded.len(),
            failed = failed.len(),
            "Warehouse load complete"
        );

        LoadOutcome {
            version,
            loaded,
            failed,
        }
    }
}
