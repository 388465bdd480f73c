//! Analytics and data-quality checks over the sample extract.

use integration_tests::setup::{date, TestContext};
use loader::write_json;
use reports::analytics::{AnalyticsOptions, AnalyticsReport};
use reports::{trend_over_period, Metric, QualityReport, StarSchema, TimeGrain};
use warehouse_core::{CostRange, CustomerSegment, Trend};

fn build(ctx: &TestContext, options: AnalyticsOptions) -> AnalyticsReport {
    let snapshot = ctx.warehouse.snapshot();
    let star = StarSchema::from_snapshot(&snapshot);
    AnalyticsReport::build(&star, date(2014, 1, 28), &options)
}

/// Test exploration and measures sections
#[test]
fn test_exploration_and_measures() {
    let ctx = TestContext::with_sample_data();
    ctx.load();
    let report = build(&ctx, AnalyticsOptions::default());

    assert_eq!(report.tables.len(), 3);
    assert_eq!(report.tables[2].rows, 9);
    assert_eq!(report.countries, vec!["Australia", "Canada"]);
    assert_eq!(report.product_hierarchy.len(), 4);
    assert_eq!(report.date_range.first_order_date, Some(date(2011, 1, 10)));
    assert_eq!(report.date_range.last_order_date, Some(date(2013, 11, 20)));
    assert_eq!(report.date_range.order_range_months, Some(34));

    assert_eq!(report.measures.total_sales, 17689);
    assert_eq!(report.measures.total_orders, 7);
    assert_eq!(report.measures.total_customers, 3);
    assert_eq!(report.measures.customers_with_orders, 3);

    assert_eq!(
        report.magnitude.revenue_by_category[0].group.as_deref(),
        Some("Bikes")
    );
    assert_eq!(report.magnitude.revenue_by_category[0].value, 17534);
}

/// Test rankings keep ties and honor the configured N
#[test]
fn test_rankings() {
    let ctx = TestContext::with_sample_data();
    ctx.load();
    let report = build(
        &ctx,
        AnalyticsOptions {
            grain: TimeGrain::Year,
            top_n: 1,
        },
    );

    let top = &report.rankings.top_products;
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].item.product_name.as_deref(), Some("Road-150 Red- 62"));

    let bottom = &report.rankings.bottom_products;
    assert_eq!(bottom[0].item.product_name.as_deref(), Some("Water Bottle - 30 oz."));

    assert_eq!(report.rankings.top_customers[0].item.customer_key, Some(1));
    // Customer 3 placed a single order
    assert_eq!(report.rankings.fewest_orders_customers.len(), 1);
    assert_eq!(
        report.rankings.fewest_orders_customers[0].item.customer_key,
        Some(3)
    );
}

/// Test the time series sections with yearly buckets
#[test]
fn test_yearly_time_series() {
    let ctx = TestContext::with_sample_data();
    ctx.load();
    let report = build(
        &ctx,
        AnalyticsOptions {
            grain: TimeGrain::Year,
            top_n: 5,
        },
    );

    let years: Vec<_> = report.change_over_time.iter().map(|p| p.period).collect();
    assert_eq!(years, vec![date(2011, 1, 1), date(2012, 1, 1), date(2013, 1, 1)]);

    let running: Vec<_> = report
        .cumulative
        .iter()
        .map(|p| p.running_total_sales)
        .collect();
    assert_eq!(running, vec![3613, 7083, 17679]);
    assert!(running.windows(2).all(|w| w[0] <= w[1]));

    let helmet: Vec<_> = report
        .product_performance
        .iter()
        .filter(|r| r.product_name.as_deref() == Some("Sport-100 Helmet- Red"))
        .collect();
    assert_eq!(helmet.len(), 3);
    assert_eq!(helmet[1].previous_year_change, Trend::Increase);
    assert_eq!(helmet[2].previous_year_change, Trend::Decrease);
}

/// Test segmentation and part-to-whole sections
#[test]
fn test_segmentation() {
    let ctx = TestContext::with_sample_data();
    ctx.load();
    let report = build(&ctx, AnalyticsOptions::default());

    let bikes = &report.category_contribution[0];
    assert_eq!(bikes.category.as_deref(), Some("Bikes"));
    assert_eq!(bikes.percentage_of_total, 99.12);

    let above_1000 = report
        .cost_ranges
        .iter()
        .find(|r| r.cost_range == CostRange::Above1000)
        .unwrap();
    assert_eq!(above_1000.total_products, 2);

    let segments: Vec<_> = report
        .customer_segments
        .iter()
        .map(|s| (s.customer_segment, s.total_customers))
        .collect();
    assert_eq!(segments.len(), 3);
    assert!(segments.contains(&(CustomerSegment::Vip, 1)));
    assert!(segments.contains(&(CustomerSegment::Loyal, 1)));
    assert!(segments.contains(&(CustomerSegment::New, 1)));
}

/// Test the generic trend function by customer country and quantity
#[test]
fn test_trend_by_country() {
    let ctx = TestContext::with_sample_data();
    ctx.load();
    let snapshot = ctx.warehouse.snapshot();
    let star = StarSchema::from_snapshot(&snapshot);

    let trends = trend_over_period(
        &star,
        TimeGrain::Year,
        |j| j.country().map(str::to_owned),
        Metric::Quantity,
    );

    assert_eq!(trends.len(), 2);
    let canada = &trends[1];
    assert_eq!(canada.entity.as_deref(), Some("Canada"));
    assert_eq!(canada.points.len(), 1);
    assert_eq!(canada.points[0].value, 3);
    assert_eq!(canada.points[0].previous, None);
}

/// Test the analytics document is written as JSON
#[test]
fn test_analytics_json_written() {
    let ctx = TestContext::with_sample_data();
    ctx.load();
    let report = build(&ctx, AnalyticsOptions::default());

    let path = ctx.output_path("analytics.json");
    write_json(&path, &report).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["grain"], "month");
    assert_eq!(value["measures"]["total_sales"], 17689);
    assert_eq!(value["cost_ranges"].as_array().unwrap().len(), 2);
}

/// Test data quality over the sample extract
#[test]
fn test_quality_over_sample() {
    let ctx = TestContext::with_sample_data();
    ctx.load();
    let snapshot = ctx.warehouse.snapshot();
    let quality = QualityReport::check(&StarSchema::from_snapshot(&snapshot));

    assert_eq!(quality.sales_rows, 9);
    assert_eq!(quality.null_order_dates, 1);
    assert_eq!(quality.orphan_customer_keys, 0);
    assert_eq!(quality.orphan_product_keys, 0);
    assert_eq!(quality.inconsistent_sales, 0);
    assert_eq!(quality.issue_count(), 1);
}
