//! KPI helpers with the reports' division guards.
//!
//! Monetary averages are integer-valued: the fraction is discarded. Sums
//! saturate at the `i64` bounds instead of overflowing.

/// Average order value; 0 when there are no orders.
pub fn average_order_value(total_sales: i64, total_orders: i64) -> i64 {
    if total_orders == 0 {
        0
    } else {
        total_sales / total_orders
    }
}

/// Average monthly spend of a customer; 0 when the lifespan is zero.
pub fn average_monthly_spend(total_sales: i64, lifespan_months: i64) -> i64 {
    if lifespan_months == 0 {
        0
    } else {
        total_sales / lifespan_months
    }
}

/// Average monthly revenue of a product; the full total when the lifespan is zero.
pub fn average_monthly_revenue(total_sales: i64, lifespan_months: i64) -> i64 {
    if lifespan_months == 0 {
        total_sales
    } else {
        total_sales / lifespan_months
    }
}

/// Sum that saturates instead of overflowing.
pub fn saturating_sum(values: impl IntoIterator<Item = i64>) -> i64 {
    values.into_iter().fold(0, i64::saturating_add)
}

/// Integer average of the non-null values, as AVG over an integer column.
pub fn integer_average(values: impl IntoIterator<Item = Option<i64>>) -> Option<i64> {
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0i64, 0i64), |(sum, count), v| (sum.saturating_add(v), count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count)
    }
}

/// Mean of the values; `None` for an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Share of `part` in `whole` as a percentage; 0 when the whole is zero.
pub fn percentage_of(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round_to(part as f64 / whole as f64 * 100.0, 2)
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
