//! Period-over-period trends for any entity and metric.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use warehouse_core::calendar::{month_start, year_start};

use crate::star::{JoinedLine, StarSchema};
use crate::window::{lag_delta, LagPoint};

/// Bucket size for time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeGrain {
    #[default]
    Month,
    Year,
}

impl TimeGrain {
    /// First day of the period containing `date`.
    pub fn bucket(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Month => month_start(date),
            Self::Year => year_start(date),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl FromStr for TimeGrain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "month" | "monthly" => Ok(Self::Month),
            "year" | "yearly" => Ok(Self::Year),
            other => Err(format!("unknown time grain: {}", other)),
        }
    }
}

impl fmt::Display for TimeGrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measure tracked over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SalesAmount,
    Quantity,
    /// Product unit cost times quantity
    Cost,
    /// Integer average of the line price
    Price,
}

impl Metric {
    fn line_value(&self, joined: &JoinedLine<'_>) -> Option<i64> {
        let line = joined.line;
        match self {
            Self::SalesAmount => line.sales_amount,
            Self::Quantity => line.quantity,
            Self::Cost => joined
                .product
                .and_then(|p| p.cost)
                .zip(line.quantity)
                .map(|(cost, qty)| cost.saturating_mul(qty)),
            Self::Price => line.price,
        }
    }

    fn is_average(&self) -> bool {
        matches!(self, Self::Price)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: i64,
    count: i64,
}

impl Accumulator {
    fn add(&mut self, value: Option<i64>) {
        if let Some(v) = value {
            self.sum = self.sum.saturating_add(v);
            self.count += 1;
        }
    }

    fn value(&self, metric: Metric) -> i64 {
        if metric.is_average() {
            if self.count == 0 {
                0
            } else {
                self.sum / self.count
            }
        } else {
            self.sum
        }
    }
}

/// One entity's series, oldest period first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityTrend<K> {
    pub entity: K,
    pub points: Vec<LagPoint<NaiveDate>>,
}

/// Aggregate `metric` per entity and period, then attach the previous
/// period's value and the change label.
///
/// Lines without an order date are skipped. Entities come out in key order.
pub fn trend_over_period<'a, K, F>(
    star: &StarSchema<'a>,
    grain: TimeGrain,
    entity: F,
    metric: Metric,
) -> Vec<EntityTrend<K>>
where
    K: Ord + Clone,
    F: Fn(&JoinedLine<'a>) -> K,
{
    let mut partitions: BTreeMap<K, BTreeMap<NaiveDate, Accumulator>> = BTreeMap::new();

    for (date, joined) in star.dated() {
        partitions
            .entry(entity(&joined))
            .or_default()
            .entry(grain.bucket(date))
            .or_default()
            .add(metric.line_value(&joined));
    }

    partitions
        .into_iter()
        .map(|(entity, periods)| {
            let series: Vec<(NaiveDate, i64)> = periods
                .into_iter()
                .map(|(period, acc)| (period, acc.value(metric)))
                .collect();
            EntityTrend {
                entity,
                points: lag_delta(&series),
            }
        })
        .collect()
}
