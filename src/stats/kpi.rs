//! KPI Aggregator Module
//! Scalar summary metrics for the two dashboard views.

use polars::prelude::*;
use serde::Serialize;

/// Sum of a numeric column as f64. An empty (or fully filtered-out) table
/// sums to 0.
pub fn column_sum(df: &DataFrame, name: &str) -> PolarsResult<f64> {
    let col = df.column(name)?.cast(&DataType::Float64)?;
    Ok(col.f64()?.sum().unwrap_or(0.0))
}

/// KPI block for the website performance view.
#[derive(Debug, Clone, Serialize)]
pub struct WebsiteKpis {
    pub total_users: i64,
    pub total_new_users: i64,
    pub total_sessions: i64,
    pub total_pageviews: i64,
}

impl WebsiteKpis {
    pub fn compute(sessions: &DataFrame) -> PolarsResult<Self> {
        Ok(Self {
            total_users: column_sum(sessions, "users")? as i64,
            total_new_users: column_sum(sessions, "new_users")? as i64,
            total_sessions: column_sum(sessions, "sessions")? as i64,
            total_pageviews: column_sum(sessions, "pageviews")? as i64,
        })
    }
}

/// KPI block for the store performance view.
///
/// `sales` must be period+brand filtered; the category selection does not
/// affect KPIs. `sessions` is the period-filtered sessions table, which is
/// where total_sessions (the conversion denominator) comes from.
#[derive(Debug, Clone, Serialize)]
pub struct StoreKpis {
    pub total_revenue: i64,
    pub number_purchase: i64,
    pub total_sessions: i64,
    /// Purchases per session; `None` when there are no sessions.
    pub conversion_rate: Option<f64>,
}

impl StoreKpis {
    pub fn compute(sales: &DataFrame, sessions: &DataFrame) -> PolarsResult<Self> {
        let total_sessions = column_sum(sessions, "sessions")? as i64;
        let number_purchase = column_sum(sales, "quantity")? as i64;
        let conversion_rate = if total_sessions > 0 {
            Some(number_purchase as f64 / total_sessions as f64)
        } else {
            None
        };
        Ok(Self {
            total_revenue: column_sum(sales, "item_revenue_in_usd")? as i64,
            number_purchase,
            total_sessions,
            conversion_rate,
        })
    }

    /// Conversion rate as a percentage with two decimals, or "n/a" when the
    /// filtered sessions table is empty.
    pub fn conversion_rate_label(&self) -> String {
        match self.conversion_rate {
            Some(rate) => format!("{:.2}%", rate * 100.0),
            None => "n/a".to_string(),
        }
    }
}

/// Format a count with thousands separators for the KPI blocks.
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        format!("-{out}")
    } else {
        out
    }
}
