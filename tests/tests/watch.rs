//! Watch-mode tests: the scheduler reloads the extract and rewrites the
//! reports on every tick until it is shut down.

use integration_tests::fixtures::{sales_csv, sales_row};
use integration_tests::setup::{date, TestContext};
use reports::{RefreshConfig, RefreshScheduler};
use std::sync::Arc;
use std::time::Duration;
use warehouse_core::Table;

fn scheduler(ctx: &TestContext) -> Arc<RefreshScheduler> {
    let config = RefreshConfig {
        load: ctx.load.clone(),
        export: ctx.export.clone(),
        interval: Duration::from_millis(20),
        as_of: Some(date(2014, 1, 28)),
    };
    Arc::new(RefreshScheduler::new(
        config,
        ctx.warehouse.clone(),
        ctx.views.clone(),
    ))
}

async fn wait_for_version(ctx: &TestContext, version: u64) {
    let mut waited = Duration::ZERO;
    while ctx.warehouse.version() < version && waited < Duration::from_secs(5) {
        tokio::time::sleep(Duration::from_millis(10)).await;
        waited += Duration::from_millis(10);
    }
}

/// Test the loop picks up a changed extract on a later tick
#[tokio::test]
async fn test_watch_picks_up_new_extract() {
    let ctx = TestContext::with_sample_data();
    let scheduler = scheduler(&ctx);
    let handle = scheduler.clone().start();

    let exported = ctx.output_path("report_customers.csv");
    let mut waited = Duration::ZERO;
    while !exported.exists() && waited < Duration::from_secs(5) {
        tokio::time::sleep(Duration::from_millis(10)).await;
        waited += Duration::from_millis(10);
    }
    assert!(exported.exists());

    ctx.write_table(
        Table::FactSales,
        &sales_csv(&[sales_row("SO1", 1, 2, "2013-06-01", 250, 1)]),
    );
    let seen = ctx.warehouse.version();
    wait_for_version(&ctx, seen + 2).await;

    scheduler.shutdown();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("scheduler did not stop")
        .unwrap();

    let reports = ctx.reports(date(2014, 1, 28));
    assert_eq!(reports.customers.len(), 1);
    assert_eq!(reports.customers[0].customer_key, Some(2));
    assert_eq!(reports.customers[0].total_sales, 250);
}

/// Test a failing extract does not stop the loop
#[tokio::test]
async fn test_watch_survives_failed_refresh() {
    let ctx = TestContext::new();
    let scheduler = scheduler(&ctx);
    let handle = scheduler.clone().start();

    // Every table fails; each refresh still bumps the version
    wait_for_version(&ctx, 2).await;
    assert!(ctx.warehouse.version() >= 2);
    assert!(!ctx.output_path("report_customers.csv").exists());
    assert!(!handle.is_finished());

    scheduler.shutdown();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("scheduler did not stop")
        .unwrap();
}
