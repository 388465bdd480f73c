//! Change-over-time, cumulative, and yearly performance analyses.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use warehouse_core::kpi::integer_average;
use warehouse_core::{AverageComparison, Trend};

use crate::star::StarSchema;
use crate::trends::{trend_over_period, Metric, TimeGrain};
use crate::window::{deviation_from_average, moving_average, running_total};

/// Totals for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub period: NaiveDate,
    pub total_sales: i64,
    pub total_customers: usize,
    pub total_quantity: i64,
}

pub fn change_over_time(star: &StarSchema<'_>, grain: TimeGrain) -> Vec<PeriodSummary> {
    #[derive(Default)]
    struct Bucket {
        sales: i64,
        quantity: i64,
        customers: HashSet<i64>,
    }

    let mut buckets: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();
    for (date, joined) in star.dated() {
        let bucket = buckets.entry(grain.bucket(date)).or_default();
        bucket.sales = bucket.sales.saturating_add(joined.line.sales());
        bucket.quantity = bucket.quantity.saturating_add(joined.line.units());
        if let Some(key) = joined.line.customer_key {
            bucket.customers.insert(key);
        }
    }

    buckets
        .into_iter()
        .map(|(period, b)| PeriodSummary {
            period,
            total_sales: b.sales,
            total_customers: b.customers.len(),
            total_quantity: b.quantity,
        })
        .collect()
}

/// Per-period sales with running totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativePoint {
    pub period: NaiveDate,
    pub total_sales: i64,
    pub running_total_sales: i64,
    pub average_price: i64,
    pub moving_average_price: f64,
}

pub fn cumulative_analysis(star: &StarSchema<'_>, grain: TimeGrain) -> Vec<CumulativePoint> {
    let mut buckets: BTreeMap<NaiveDate, (i64, Vec<Option<i64>>)> = BTreeMap::new();
    for (date, joined) in star.dated() {
        let (sales, prices) = buckets.entry(grain.bucket(date)).or_default();
        *sales = sales.saturating_add(joined.line.sales());
        prices.push(joined.line.price);
    }

    let periods: Vec<(NaiveDate, i64, i64)> = buckets
        .into_iter()
        .map(|(period, (sales, prices))| (period, sales, integer_average(prices).unwrap_or(0)))
        .collect();

    let sales: Vec<i64> = periods.iter().map(|p| p.1).collect();
    let prices: Vec<f64> = periods.iter().map(|p| p.2 as f64).collect();
    let running = running_total(&sales);
    let moving = moving_average(&prices);

    periods
        .into_iter()
        .zip(running.into_iter().zip(moving))
        .map(
            |((period, total_sales, average_price), (running_total_sales, moving_average_price))| {
                CumulativePoint {
                    period,
                    total_sales,
                    running_total_sales,
                    average_price,
                    moving_average_price,
                }
            },
        )
        .collect()
}

/// One product's sales in one year against its own history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductYearPerformance {
    pub order_year: i32,
    pub product_name: Option<String>,
    pub current_sales: i64,
    pub avg_sales: i64,
    pub diff_avg: i64,
    pub avg_change: AverageComparison,
    pub previous_year_sales: Option<i64>,
    pub diff_previous: Option<i64>,
    pub previous_year_change: Trend,
}

/// Yearly sales per product name with deviation from that product's mean
/// and year-over-year change.
pub fn yearly_product_performance(star: &StarSchema<'_>) -> Vec<ProductYearPerformance> {
    let trends = trend_over_period(
        star,
        TimeGrain::Year,
        |j| j.product_name().map(str::to_owned),
        Metric::SalesAmount,
    );

    let mut rows = Vec::new();
    for trend in trends {
        let series: Vec<(NaiveDate, i64)> =
            trend.points.iter().map(|p| (p.period, p.value)).collect();
        let deviations = deviation_from_average(&series);

        for (lag, deviation) in trend.points.into_iter().zip(deviations) {
            rows.push(ProductYearPerformance {
                order_year: lag.period.year(),
                product_name: trend.entity.clone(),
                current_sales: lag.value,
                avg_sales: deviation.average,
                diff_avg: deviation.difference,
                avg_change: deviation.comparison,
                previous_year_sales: lag.previous,
                diff_previous: lag.delta,
                previous_year_change: lag.trend,
            });
        }
    }
    rows
}
