//! Tests for per-table load failures.
//!
//! A failing table is reported with its code and left empty; the other tables
//! still load and the reports run over what loaded.

use integration_tests::fixtures::{sales_csv, sales_row};
use integration_tests::setup::{date, TestContext};
use reports::refresh_once;
use warehouse_core::Table;

/// Test a malformed fact table is truncated while both dimensions load
#[test]
fn test_malformed_sales_truncates_only_sales() {
    let ctx = TestContext::with_sample_data();
    ctx.load();
    assert_eq!(ctx.warehouse.snapshot().sales.len(), 9);

    ctx.write_table(
        Table::FactSales,
        "order_number,product_key,customer_key,order_date\nSO1,1,1,2013-01-01\n",
    );
    let outcome = ctx.load();

    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].table, Table::FactSales);
    assert_eq!(outcome.failed[0].code, Some("LOAD_002"));
    assert_eq!(outcome.loaded.len(), 2);

    let snapshot = ctx.warehouse.snapshot();
    assert!(snapshot.sales.is_empty());
    assert_eq!(snapshot.customers.len(), 3);
    assert_eq!(snapshot.products.len(), 4);

    let reports = ctx.reports(date(2014, 1, 28));
    assert!(reports.customers.is_empty());
    assert!(reports.products.is_empty());
}

/// Test empty reports are still exported with their header row
#[test]
fn test_failed_sales_exports_header_only_reports() {
    let ctx = TestContext::with_sample_data();
    ctx.write_table(Table::FactSales, "order_number\nSO1\n");

    let summary = refresh_once(
        &ctx.warehouse,
        &ctx.views,
        &ctx.load,
        &ctx.export,
        date(2014, 1, 28),
    )
    .unwrap();
    assert!(!summary.is_failed());
    assert_eq!(summary.customer_rows, 0);

    let mut reader = csv::Reader::from_path(ctx.output_path("report_customers.csv")).unwrap();
    assert_eq!(reader.headers().unwrap().len(), 15);
    assert_eq!(reader.records().count(), 0);

    let mut reader = csv::Reader::from_path(ctx.output_path("report_products.csv")).unwrap();
    assert_eq!(&reader.headers().unwrap()[0], "product_key");
    assert_eq!(reader.records().count(), 0);
}

/// Test a type mismatch reports LOAD_003 with the CSV line number
#[test]
fn test_type_mismatch_names_table_and_line() {
    let ctx = TestContext::with_sample_data();
    let mut rows = vec![
        sales_row("SO1", 1, 1, "2013-01-01", 10, 1),
        sales_row("SO2", 1, 1, "2013-01-02", 10, 1),
    ];
    rows.push("SO3,1,1,2013-01-03,,,12.5x,1,10".to_string());
    ctx.write_table(Table::FactSales, &sales_csv(&rows));

    let outcome = ctx.load();
    let failure = &outcome.failed[0];

    assert_eq!(failure.code, Some("LOAD_003"));
    assert!(failure.error.contains("fact_sales"), "{}", failure.error);
    assert!(failure.error.contains("line 4"), "{}", failure.error);
}

/// Test a missing extract file is LOAD_001
#[test]
fn test_missing_file() {
    let ctx = TestContext::with_sample_data();
    ctx.remove_table(Table::DimProducts);

    let outcome = ctx.load();

    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].table, Table::DimProducts);
    assert_eq!(outcome.failed[0].code, Some("LOAD_001"));
    assert!(!outcome.is_total_failure());

    // Products fall back to nulls through the left join
    let reports = ctx.reports(date(2014, 1, 28));
    assert_eq!(reports.products.len(), 4);
    assert!(reports.products.iter().all(|p| p.product_name.is_none()));
}

/// Test that an empty extract directory fails every table and skips export
#[test]
fn test_total_failure_skips_reports() {
    let ctx = TestContext::new();

    let summary = refresh_once(
        &ctx.warehouse,
        &ctx.views,
        &ctx.load,
        &ctx.export,
        date(2014, 1, 28),
    )
    .unwrap();

    assert!(summary.is_failed());
    assert_eq!(summary.load.failed.len(), 3);
    assert!(!ctx.output_path("report_customers.csv").exists());
}

/// Test the report cache recomputes after a table load
#[test]
fn test_reload_invalidates_cached_reports() {
    let ctx = TestContext::with_sample_data();
    ctx.load();
    let as_of = date(2014, 1, 28);

    let before = ctx.reports(as_of);
    assert_eq!(before.customers[0].total_sales, 14134);

    ctx.write_table(
        Table::FactSales,
        &sales_csv(&[sales_row("SO1", 1, 1, "2013-01-03", 500, 1)]),
    );
    let outcome = ctx.load();
    assert!(outcome.is_complete());

    let after = ctx.reports(as_of);
    assert!(after.version > before.version);
    assert_eq!(after.customers.len(), 1);
    assert_eq!(after.customers[0].total_sales, 500);
}
