//! Window-function patterns over one ordered partition.
//!
//! Callers partition and order the input; each helper then behaves like the
//! matching SQL window (`LAG`, `AVG() OVER`, running `SUM`, `RANK`).

use serde::Serialize;
use std::cmp::Reverse;
use warehouse_core::kpi::integer_average;
use warehouse_core::{AverageComparison, Trend};

/// A period value with its predecessor in the partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LagPoint<P> {
    pub period: P,
    pub value: i64,
    pub previous: Option<i64>,
    pub delta: Option<i64>,
    pub trend: Trend,
}

/// Previous value and signed delta for each period. The first period has no
/// predecessor and is labelled "no change".
pub fn lag_delta<P: Clone>(series: &[(P, i64)]) -> Vec<LagPoint<P>> {
    let mut previous = None;
    series
        .iter()
        .map(|(period, value)| {
            let delta = previous.map(|p: i64| value.saturating_sub(p));
            let point = LagPoint {
                period: period.clone(),
                value: *value,
                previous,
                delta,
                trend: Trend::from_delta(delta),
            };
            previous = Some(*value);
            point
        })
        .collect()
}

/// A period value compared against the partition's integer average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviationPoint<P> {
    pub period: P,
    pub value: i64,
    pub average: i64,
    pub difference: i64,
    pub comparison: AverageComparison,
}

pub fn deviation_from_average<P: Clone>(series: &[(P, i64)]) -> Vec<DeviationPoint<P>> {
    let average = integer_average(series.iter().map(|(_, v)| Some(*v))).unwrap_or(0);
    series
        .iter()
        .map(|(period, value)| {
            let difference = value.saturating_sub(average);
            DeviationPoint {
                period: period.clone(),
                value: *value,
                average,
                difference,
                comparison: AverageComparison::from_difference(difference),
            }
        })
        .collect()
}

/// Cumulative sum in input order.
pub fn running_total(values: &[i64]) -> Vec<i64> {
    values
        .iter()
        .scan(0i64, |acc, v| {
            *acc = acc.saturating_add(*v);
            Some(*acc)
        })
        .collect()
}

/// Cumulative mean in input order.
pub fn moving_average(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .scan(0.0, |acc, (i, v)| {
            *acc += v;
            Some(*acc / (i + 1) as f64)
        })
        .collect()
}

/// An item with its `RANK()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T> {
    pub rank: usize,
    #[serde(flatten)]
    pub item: T,
}

/// Rank by `key`, highest first. Ties share a rank and the next rank skips
/// ahead by the size of the tie. Tied items keep their input order.
pub fn rank_descending<T, F>(items: Vec<T>, key: F) -> Vec<Ranked<T>>
where
    F: Fn(&T) -> i64,
{
    rank_by(items, |item| Reverse(key(item)))
}

/// Rank by `key`, lowest first.
pub fn rank_ascending<T, F>(items: Vec<T>, key: F) -> Vec<Ranked<T>>
where
    F: Fn(&T) -> i64,
{
    rank_by(items, key)
}

fn rank_by<T, K, F>(items: Vec<T>, key: F) -> Vec<Ranked<T>>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut keyed: Vec<(K, T)> = items.into_iter().map(|item| (key(&item), item)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut ranked: Vec<Ranked<T>> = Vec::with_capacity(keyed.len());
    let mut last_key: Option<K> = None;
    let mut rank = 0;

    for (position, (k, item)) in keyed.into_iter().enumerate() {
        if last_key.as_ref() != Some(&k) {
            rank = position + 1;
        }
        last_key = Some(k);
        ranked.push(Ranked { rank, item });
    }
    ranked
}

/// Items ranked `<= n` by descending key; ties at the cutoff are all kept.
pub fn top_n_by_rank<T, F>(items: Vec<T>, n: usize, key: F) -> Vec<Ranked<T>>
where
    F: Fn(&T) -> i64,
{
    rank_descending(items, key)
        .into_iter()
        .take_while(|r| r.rank <= n)
        .collect()
}

/// Items ranked `<= n` by ascending key.
pub fn bottom_n_by_rank<T, F>(items: Vec<T>, n: usize, key: F) -> Vec<Ranked<T>>
where
    F: Fn(&T) -> i64,
{
    rank_ascending(items, key)
        .into_iter()
        .take_while(|r| r.rank <= n)
        .collect()
}
