//! Common test setup functions.

use chrono::NaiveDate;
use loader::{ExportConfig, LoadConfig, LoadOutcome, OutputFormat, Warehouse};
use reports::{ReportSet, ReportViews};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use warehouse_core::Table;

use crate::fixtures;

/// Temporary data and output directories plus a fresh warehouse.
///
/// The directories are removed when the context is dropped.
pub struct TestContext {
    pub dir: TempDir,
    pub load: LoadConfig,
    pub export: ExportConfig,
    pub warehouse: Arc<Warehouse>,
    pub views: Arc<ReportViews>,
}

impl TestContext {
    /// Create a context with empty extract and output directories.
    pub fn new() -> Self {
        telemetry::init_test_tracing();

        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_dir = dir.path().join("gold_tables");
        fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        Self {
            load: LoadConfig::with_data_dir(&data_dir),
            export: ExportConfig {
                output_dir: dir.path().join("reports"),
                format: OutputFormat::Csv,
            },
            dir,
            warehouse: Arc::new(Warehouse::new()),
            views: Arc::new(ReportViews::new()),
        }
    }

    /// Create a context with the sample extract already written.
    pub fn with_sample_data() -> Self {
        let ctx = Self::new();
        ctx.write_table(Table::DimCustomers, &fixtures::sample_customers());
        ctx.write_table(Table::DimProducts, &fixtures::sample_products());
        ctx.write_table(Table::FactSales, &fixtures::sample_sales());
        ctx
    }

    /// Overwrite one table's extract file.
    pub fn write_table(&self, table: Table, contents: &str) {
        fs::write(self.load.path_for(table), contents).expect("Failed to write extract");
    }

    /// Remove one table's extract file.
    pub fn remove_table(&self, table: Table) {
        fs::remove_file(self.load.path_for(table)).expect("Failed to remove extract");
    }

    pub fn load(&self) -> LoadOutcome {
        self.warehouse.load_from_csv(&self.load)
    }

    pub fn reports(&self, as_of: NaiveDate) -> Arc<ReportSet> {
        self.views.get(&self.warehouse, as_of)
    }

    pub fn output_dir(&self) -> &Path {
        &self.export.output_dir
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.export.output_dir.join(file_name)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
