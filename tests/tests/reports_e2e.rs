//! End-to-end tests: CSV extract → warehouse → report views → exported files.

use integration_tests::fixtures::{self, customer_row, customers_csv, sales_csv, sales_row};
use integration_tests::setup::{date, TestContext};
use reports::refresh_once;
use std::fs;
use warehouse_core::{AgeGroup, CustomerSegment, PerformanceSegment, QuantitySegment, Table};

/// Test the customer view over the sample extract
#[test]
fn test_customer_report_over_sample() {
    let ctx = TestContext::with_sample_data();
    let outcome = ctx.load();
    assert!(outcome.is_complete(), "load failed: {:?}", outcome.failed);

    let reports = ctx.reports(date(2014, 1, 28));
    assert_eq!(reports.customers.len(), 3);

    let vip = &reports.customers[0];
    assert_eq!(vip.customer_key, Some(1));
    assert_eq!(vip.customer_number.as_deref(), Some("AW00011000"));
    assert_eq!(vip.customer_name.as_deref(), Some("Jon Yang"));
    assert_eq!(vip.age, Some(42));
    assert_eq!(vip.age_group, AgeGroup::Above40);
    assert_eq!(vip.total_sales, 14134);
    assert_eq!(vip.total_orders, 3);
    assert_eq!(vip.total_products, 2);
    assert_eq!(vip.total_quantity, 4);
    assert_eq!(vip.lifespan_months, 26);
    assert_eq!(vip.recency_months, 10);
    assert_eq!(vip.customer_segment, CustomerSegment::Vip);
    assert_eq!(vip.avg_order_value, 4711);
    assert_eq!(vip.avg_monthly_spend, 543);

    // The null-dated line is not counted
    let loyal = &reports.customers[1];
    assert_eq!(loyal.total_sales, 105);
    assert_eq!(loyal.total_orders, 2);
    assert_eq!(loyal.lifespan_months, 15);
    assert_eq!(loyal.customer_segment, CustomerSegment::Loyal);
    assert_eq!(loyal.age_group, AgeGroup::Between20And40);
    assert_eq!(loyal.recency_months, 17);

    let new = &reports.customers[2];
    assert_eq!(new.total_orders, 1);
    assert_eq!(new.total_products, 3);
    assert_eq!(new.lifespan_months, 0);
    assert_eq!(new.avg_monthly_spend, 0);
    assert_eq!(new.avg_order_value, 3440);
    assert_eq!(new.customer_segment, CustomerSegment::New);
    assert_eq!(new.age, Some(13));
    assert_eq!(new.age_group, AgeGroup::Below20);
}

/// Test the product view over the sample extract
#[test]
fn test_product_report_over_sample() {
    let ctx = TestContext::with_sample_data();
    ctx.load();

    let reports = ctx.reports(date(2014, 1, 28));
    let products = &reports.products;
    assert_eq!(products.len(), 4);

    let road = &products[0];
    assert_eq!(road.product_name.as_deref(), Some("Road-150 Red- 62"));
    assert_eq!(road.total_sales, 10734);
    assert_eq!(road.total_orders, 2);
    assert_eq!(road.total_customers, 1);
    assert_eq!(road.lifespan_months, 26);
    assert_eq!(road.recency_months, 10);
    assert_eq!(road.avg_selling_price, Some(3578.0));
    assert_eq!(road.avg_order_revenue, 5367);
    assert_eq!(road.avg_monthly_revenue, 412);
    assert_eq!(road.performance_segment, PerformanceSegment::LowPerformer);
    assert_eq!(road.quantity_segment, QuantitySegment::AboveAverage);

    let mountain = &products[1];
    assert_eq!(mountain.total_sales, 6800);
    assert_eq!(mountain.performance_segment, PerformanceSegment::MidRange);
    assert_eq!(mountain.quantity_segment, QuantitySegment::BelowAverage);
    assert_eq!(mountain.avg_monthly_revenue, 400);

    let helmet = &products[2];
    assert_eq!(helmet.total_orders, 3);
    assert_eq!(helmet.total_customers, 2);
    assert_eq!(helmet.avg_selling_price, Some(35.0));

    let bottle = &products[3];
    assert_eq!(bottle.cost, None);
    assert_eq!(bottle.total_sales, 5);
    assert_eq!(bottle.lifespan_months, 0);
    assert_eq!(bottle.avg_monthly_revenue, 5);
}

/// Test the single-customer scenario: 100 and 150 in month 1, 200 in month 3
#[test]
fn test_single_customer_kpis() {
    let ctx = TestContext::new();
    ctx.write_table(
        Table::DimCustomers,
        &customers_csv(&[customer_row(1, "Ada", "Byron", "United Kingdom", "Female", "")]),
    );
    ctx.write_table(Table::DimProducts, &fixtures::products_csv(&[]));
    ctx.write_table(
        Table::FactSales,
        &sales_csv(&[
            sales_row("SO1", 1, 1, "2013-01-03", 100, 1),
            sales_row("SO2", 1, 1, "2013-01-25", 150, 1),
            sales_row("SO3", 2, 1, "2013-03-14", 200, 1),
        ]),
    );
    ctx.load();

    let as_of = date(2013, 12, 1);
    let reports = ctx.reports(as_of);
    let row = &reports.customers[0];

    assert_eq!(row.lifespan_months, 2);
    assert_eq!(row.total_sales, 450);
    assert_eq!(row.total_orders, 3);
    assert_eq!(row.avg_order_value, 150);
    assert_eq!(row.avg_monthly_spend, 225);
    assert_eq!(row.recency_months, 9);
    assert_eq!(row.age_group, AgeGroup::Unknown);
}

/// Test that a refresh writes both report files as CSV with headers
#[test]
fn test_refresh_exports_csv() {
    let ctx = TestContext::with_sample_data();

    let summary = refresh_once(
        &ctx.warehouse,
        &ctx.views,
        &ctx.load,
        &ctx.export,
        date(2014, 1, 28),
    )
    .expect("refresh failed");

    assert_eq!(summary.exported.len(), 2);
    assert_eq!(summary.customer_rows, 3);

    let mut reader = csv::Reader::from_path(ctx.output_path("report_customers.csv")).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "customer_key");
    assert_eq!(&headers[5], "customer_segment");
    assert_eq!(headers.len(), 15);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][5], "VIP");
    assert_eq!(&rows[0][4], "above-40");

    let products = fs::read_to_string(ctx.output_path("report_products.csv")).unwrap();
    assert!(products.contains("Mid-Range"));
    assert!(products.contains("above_average_quantity_sold"));
}

/// Test that a second refresh overwrites the previous files
#[test]
fn test_refresh_overwrites_reports() {
    let mut ctx = TestContext::with_sample_data();
    ctx.export.format = loader::OutputFormat::Json;

    refresh_once(&ctx.warehouse, &ctx.views, &ctx.load, &ctx.export, date(2014, 1, 28)).unwrap();

    ctx.write_table(
        Table::FactSales,
        &sales_csv(&[sales_row("SO1", 1, 1, "2013-01-03", 100, 1)]),
    );
    let summary =
        refresh_once(&ctx.warehouse, &ctx.views, &ctx.load, &ctx.export, date(2014, 1, 28)).unwrap();
    assert_eq!(summary.load.version, 2);

    let text = fs::read_to_string(ctx.output_path("report_customers.json")).unwrap();
    let rows: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["total_sales"], 100);
    assert_eq!(rows[0]["customer_segment"], "NEW");
    assert!(ctx.output_dir().read_dir().unwrap().all(|e| {
        e.unwrap().path().extension().is_some_and(|ext| ext == "json")
    }));
}
