//! Typed column accessors shared by the filter, KPI and chart layers.

use chrono::NaiveDate;
use polars::prelude::*;

/// Materialize a column as strings. Nulls become empty strings.
pub fn str_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
    let col = df.column(name)?;
    let mut out = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let value = col.get(i)?;
        if value.is_null() {
            out.push(String::new());
        } else {
            out.push(value.to_string().trim_matches('"').to_string());
        }
    }
    Ok(out)
}

/// Materialize a numeric column as f64. Nulls become 0.0.
pub fn f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<f64>> {
    let col = df.column(name)?.cast(&DataType::Float64)?;
    let ca = col.f64()?;
    Ok(ca.into_iter().map(|v| v.unwrap_or(0.0)).collect())
}

/// Materialize a Date column as `NaiveDate`s.
pub fn date_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<NaiveDate>> {
    let col = df.column(name)?;
    let series = col.as_materialized_series();
    let dates = series.date()?;
    Ok(dates.as_date_iter().map(|d| d.unwrap_or_default()).collect())
}

/// Distinct non-null values of a column, sorted.
pub fn distinct_strings(df: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
    let unique = df.column(name)?.unique()?;
    let series = unique.as_materialized_series();
    let mut values: Vec<String> = series
        .iter()
        .filter_map(|v| {
            if v.is_null() {
                None
            } else {
                Some(v.to_string().trim_matches('"').to_string())
            }
        })
        .collect();
    values.sort();
    Ok(values)
}
