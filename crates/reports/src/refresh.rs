//! One load, report, and export cycle.

use chrono::NaiveDate;
use loader::{export_rows, ExportConfig, LoadConfig, LoadOutcome, Warehouse};
use serde::Serialize;
use std::path::PathBuf;
use telemetry::{log_metrics_snapshot, metrics};
use tracing::{error, info, info_span, warn};
use uuid::Uuid;
use warehouse_core::Result;

use crate::views::ReportViews;

pub const CUSTOMER_REPORT_NAME: &str = "report_customers";
pub const PRODUCT_REPORT_NAME: &str = "report_products";

/// What a refresh did.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshSummary {
    pub run_id: Uuid,
    pub as_of: NaiveDate,
    pub load: LoadOutcome,
    pub customer_rows: usize,
    pub product_rows: usize,
    pub exported: Vec<PathBuf>,
}

impl RefreshSummary {
    /// Nothing loaded, so no reports were written.
    pub fn is_failed(&self) -> bool {
        self.load.is_total_failure()
    }
}

/// Reload every table, rebuild both views, and overwrite the report files.
///
/// When every table fails to load the reports are not rebuilt and the
/// previous files are left in place. Export errors are returned.
pub fn refresh_once(
    warehouse: &Warehouse,
    views: &ReportViews,
    load: &LoadConfig,
    export: &ExportConfig,
    as_of: NaiveDate,
) -> Result<RefreshSummary> {
    let run_id = Uuid::new_v4();
    let span = info_span!("refresh", %run_id, %as_of);
    let _enter = span.enter();

    metrics().refreshes.inc();
    let outcome = warehouse.load_from_csv(load);

    let mut summary = RefreshSummary {
        run_id,
        as_of,
        load: outcome,
        customer_rows: 0,
        product_rows: 0,
        exported: Vec::new(),
    };

    if summary.is_failed() {
        metrics().refresh_failures.inc();
        error!(failed = summary.load.failed.len(), "Every table failed to load, reports skipped");
        log_metrics_snapshot();
        return Ok(summary);
    }
    for failure in &summary.load.failed {
        warn!(table = failure.table.name(), code = failure.code, "Reporting over an empty table");
    }

    let reports = views.get(warehouse, as_of);
    summary.customer_rows = reports.customers.len();
    summary.product_rows = reports.products.len();

    let exported = export_rows(export, CUSTOMER_REPORT_NAME, &reports.customers).and_then(|c| {
        export_rows(export, PRODUCT_REPORT_NAME, &reports.products).map(|p| vec![c, p])
    });

    match exported {
        Ok(paths) => summary.exported = paths,
        Err(e) => {
            metrics().refresh_failures.inc();
            log_metrics_snapshot();
            return Err(e);
        }
    }

    info!(
        version = reports.version,
        customers = summary.customer_rows,
        products = summary.product_rows,
        "Refresh complete"
    );
    log_metrics_snapshot();
    Ok(summary)
}
