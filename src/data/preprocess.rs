//! Preprocessing of the raw CSV extracts.
//!
//! Every table carries an `event_date` column exported as an 8-digit
//! YYYYMMDD value. Preprocessing turns it into a proper Date column and
//! derives `year`, `month` and `month_name` from it; those three are never
//! stored independently.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("invalid event_date value `{0}`: expected 8-digit YYYYMMDD")]
    InvalidDate(String),
}

fn parse_event_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y%m%d").ok()
}

/// Parse `event_date` and append the derived `year` (4-digit string),
/// `month` (1-2 digit string, no leading zero) and `month_name` (3-letter
/// abbreviation) columns. Any value that is not a valid 8-digit date is a
/// hard error; the caller aborts startup on it.
pub fn derive_date_parts(df: &DataFrame) -> Result<DataFrame, PreprocessError> {
    let raw = df.column("event_date")?;

    let mut dates = Vec::with_capacity(df.height());
    let mut years = Vec::with_capacity(df.height());
    let mut months = Vec::with_capacity(df.height());
    let mut month_names = Vec::with_capacity(df.height());

    for i in 0..df.height() {
        let value = raw.get(i)?;
        let text = if value.is_null() {
            String::new()
        } else {
            value.to_string().trim_matches('"').to_string()
        };
        let date =
            parse_event_date(&text).ok_or_else(|| PreprocessError::InvalidDate(text.clone()))?;

        years.push(date.format("%Y").to_string());
        months.push(date.month().to_string());
        month_names.push(date.format("%b").to_string());
        dates.push(date);
    }

    let mut out = df.drop("event_date")?;
    out.insert_column(0, Column::new("event_date".into(), dates))?;
    out.with_column(Column::new("year".into(), years))?;
    out.with_column(Column::new("month".into(), months))?;
    out.with_column(Column::new("month_name".into(), month_names))?;
    Ok(out)
}

/// Normalize the traffic `medium` column: nulls and the GA4 placeholder
/// "(none)" both count as direct traffic.
pub fn fill_missing_medium(df: &DataFrame) -> Result<DataFrame, PreprocessError> {
    let raw = df.column("medium")?;

    let mut mediums = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let value = raw.get(i)?;
        let text = if value.is_null() {
            String::new()
        } else {
            value.to_string().trim_matches('"').to_string()
        };
        if text.is_empty() || text == "(none)" {
            mediums.push("direct".to_string());
        } else {
            mediums.push(text);
        }
    }

    let mut out = df.clone();
    out.with_column(Column::new("medium".into(), mediums))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::columns::str_values;

    #[test]
    fn derives_year_month_and_month_name() {
        let df = df!(
            "event_date" => &[20230105i64, 20221231],
            "users" => &[10i64, 20],
        )
        .unwrap();

        let out = derive_date_parts(&df).unwrap();

        assert_eq!(str_values(&out, "year").unwrap(), vec!["2023", "2022"]);
        assert_eq!(str_values(&out, "month").unwrap(), vec!["1", "12"]);
        assert_eq!(str_values(&out, "month_name").unwrap(), vec!["Jan", "Dec"]);

        let dates = crate::data::columns::date_values(&out, "event_date").unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2022, 12, 31).unwrap());
    }

    #[test]
    fn string_encoded_dates_parse_too() {
        let df = df!("event_date" => &["20230214"]).unwrap();
        let out = derive_date_parts(&df).unwrap();
        assert_eq!(str_values(&out, "month_name").unwrap(), vec!["Feb"]);
    }

    #[test]
    fn rejects_malformed_dates() {
        let df = df!("event_date" => &["2023-01-05"]).unwrap();
        let err = derive_date_parts(&df).unwrap_err();
        assert!(matches!(err, PreprocessError::InvalidDate(v) if v == "2023-01-05"));

        let df = df!("event_date" => &[20231399i64]).unwrap();
        assert!(derive_date_parts(&df).is_err());
    }

    #[test]
    fn medium_defaults_to_direct() {
        let df = df!(
            "event_date" => &[20230101i64, 20230102, 20230103],
            "medium" => &[Some("organic"), None, Some("(none)")],
        )
        .unwrap();

        let out = fill_missing_medium(&df).unwrap();
        assert_eq!(
            str_values(&out, "medium").unwrap(),
            vec!["organic", "direct", "direct"]
        );
    }
}
