//! Classification rules for the reporting views and analytics.
//!
//! Labels serialize exactly as the reports publish them. Product performance
//! labels are kept as published even though "Mid-Range" covers the lowest
//! sales band.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Minimum lifespan (months) for a customer to leave the NEW segment.
pub const LOYALTY_MIN_LIFESPAN_MONTHS: i64 = 12;

/// Total sales a long-lived customer must exceed to be VIP.
pub const VIP_SALES_THRESHOLD: i64 = 10_000;

/// Total sales a product must exceed to be a high performer.
pub const HIGH_PERFORMER_THRESHOLD: i64 = 50_000;

/// Total sales at or below which a product is labelled Mid-Range.
pub const MID_RANGE_CEILING: i64 = 10_000;

/// Customer age bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "below-20")]
    Below20,
    #[serde(rename = "between-20-40")]
    Between20And40,
    #[serde(rename = "above-40")]
    Above40,
    #[serde(rename = "unknown")]
    Unknown,
}

impl AgeGroup {
    /// Bucket an age; a missing age is unknown.
    pub fn from_age(age: Option<u32>) -> Self {
        match age {
            Some(a) if a < 20 => Self::Below20,
            Some(a) if a <= 40 => Self::Between20And40,
            Some(_) => Self::Above40,
            None => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Below20 => "below-20",
            Self::Between20And40 => "between-20-40",
            Self::Above40 => "above-40",
            Self::Unknown => "unknown",
        }
    }
}

/// Customer value/tenure segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CustomerSegment {
    Vip,
    Loyal,
    New,
}

impl CustomerSegment {
    /// VIP needs strictly more than the threshold; exactly 10000 is LOYAL.
    pub fn classify(lifespan_months: i64, total_sales: i64) -> Self {
        if lifespan_months >= LOYALTY_MIN_LIFESPAN_MONTHS {
            if total_sales > VIP_SALES_THRESHOLD {
                Self::Vip
            } else {
                Self::Loyal
            }
        } else {
            Self::New
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vip => "VIP",
            Self::Loyal => "LOYAL",
            Self::New => "NEW",
        }
    }
}

/// Product revenue tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformanceSegment {
    #[serde(rename = "high_performer")]
    HighPerformer,
    #[serde(rename = "Mid-Range")]
    MidRange,
    #[serde(rename = "low_performer")]
    LowPerformer,
}

impl PerformanceSegment {
    pub fn classify(total_sales: i64) -> Self {
        if total_sales > HIGH_PERFORMER_THRESHOLD {
            Self::HighPerformer
        } else if total_sales <= MID_RANGE_CEILING {
            Self::MidRange
        } else {
            Self::LowPerformer
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighPerformer => "high_performer",
            Self::MidRange => "Mid-Range",
            Self::LowPerformer => "low_performer",
        }
    }
}

/// Product quantity tier relative to the mean across all products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantitySegment {
    #[serde(rename = "above_average_quantity_sold")]
    AboveAverage,
    #[serde(rename = "below_average_quantity_sold")]
    BelowAverage,
}

impl QuantitySegment {
    /// Equal to the mean counts as below.
    pub fn classify(total_quantity: i64, mean_quantity: f64) -> Self {
        if total_quantity as f64 > mean_quantity {
            Self::AboveAverage
        } else {
            Self::BelowAverage
        }
    }
}

/// Period-over-period direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    #[serde(rename = "increase")]
    Increase,
    #[serde(rename = "decrease")]
    Decrease,
    #[serde(rename = "no change")]
    NoChange,
}

impl Trend {
    /// A missing delta (first period) is no change.
    pub fn from_delta(delta: Option<i64>) -> Self {
        match delta {
            Some(d) if d > 0 => Self::Increase,
            Some(d) if d < 0 => Self::Decrease,
            _ => Self::NoChange,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::NoChange => "no change",
        }
    }
}

/// Value compared with its partition average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AverageComparison {
    #[serde(rename = "above avg")]
    Above,
    #[serde(rename = "below avg")]
    Below,
    #[serde(rename = "avg")]
    Average,
}

impl AverageComparison {
    pub fn from_difference(difference: i64) -> Self {
        match difference.cmp(&0) {
            Ordering::Greater => Self::Above,
            Ordering::Less => Self::Below,
            Ordering::Equal => Self::Average,
        }
    }
}

/// Product unit-cost band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CostRange {
    #[serde(rename = "Below 100")]
    Below100,
    #[serde(rename = "100-500")]
    From100To500,
    #[serde(rename = "500-1000")]
    From500To1000,
    #[serde(rename = "Above 1000")]
    Above1000,
}

impl CostRange {
    /// Bands are inclusive at both ends, first match wins. Null cost is 0.
    pub fn classify(cost: Option<i64>) -> Self {
        match cost.unwrap_or(0) {
            c if c < 100 => Self::Below100,
            c if c <= 500 => Self::From100To500,
            c if c <= 1000 => Self::From500To1000,
            _ => Self::Above1000,
        }
    }
}
