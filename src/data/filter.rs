//! Filter engine.
//!
//! All filters are pure: they take a table and a selection and return a new
//! table. Source tables are never mutated.

use polars::prelude::*;

use super::columns::distinct_strings;

/// Sentinel offered at the top of the category multi-select. When present in
/// the selection it stands for every category observed in the period-filtered
/// sales table.
pub const SELECT_ALL: &str = "Select all";

/// 3-letter month abbreviations in calendar order.
pub const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Keep rows whose `year` is in `years` AND `month_name` is in `months`.
/// An empty selection on either axis yields an empty table.
pub fn filter_by_period(
    df: &DataFrame,
    years: &[String],
    months: &[String],
) -> PolarsResult<DataFrame> {
    if years.is_empty() || months.is_empty() {
        return Ok(df.clear());
    }
    let years = Series::new("years".into(), years.to_vec());
    let months = Series::new("months".into(), months.to_vec());
    df.clone()
        .lazy()
        .filter(
            col("year")
                .is_in(lit(years))
                .and(col("month_name").is_in(lit(months))),
        )
        .collect()
}

/// Keep sale rows with an exact `item_brand` match.
pub fn filter_brand(df: &DataFrame, brand: &str) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .filter(col("item_brand").eq(lit(brand)))
        .collect()
}

/// Keep sale rows whose `item_category` is in `categories`. The selection
/// must already be expanded; an empty one yields an empty table.
pub fn filter_categories(df: &DataFrame, categories: &[String]) -> PolarsResult<DataFrame> {
    if categories.is_empty() {
        return Ok(df.clear());
    }
    let categories = Series::new("categories".into(), categories.to_vec());
    df.clone()
        .lazy()
        .filter(col("item_category").is_in(lit(categories)))
        .collect()
}

/// Expand the [`SELECT_ALL`] sentinel to the full observed category set.
pub fn expand_category_selection(selection: &[String], observed: &[String]) -> Vec<String> {
    if selection.iter().any(|c| c == SELECT_ALL) {
        observed.to_vec()
    } else {
        selection.to_vec()
    }
}

/// The store-view sales filter: brand match plus category membership, with
/// the sentinel expanded against the categories observed in `df` (the
/// period-filtered sales table).
pub fn filter_sales(
    df: &DataFrame,
    brand: &str,
    selection: &[String],
) -> PolarsResult<DataFrame> {
    let observed = distinct_strings(df, "item_category")?;
    let categories = expand_category_selection(selection, &observed);
    filter_categories(&filter_brand(df, brand)?, &categories)
}

/// Years observed in a table, sorted ascending.
pub fn observed_years(df: &DataFrame) -> PolarsResult<Vec<String>> {
    distinct_strings(df, "year")
}

/// Month names observed in a table, in calendar order.
pub fn observed_months(df: &DataFrame) -> PolarsResult<Vec<String>> {
    let present = distinct_strings(df, "month_name")?;
    Ok(MONTH_ABBREV
        .iter()
        .filter(|m| present.iter().any(|p| p == *m))
        .map(|m| m.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::preprocess::derive_date_parts;

    fn sales_table() -> DataFrame {
        let df = df!(
            "event_date" => &[20230110i64, 20230215, 20230310, 20230412],
            "item_brand" => &["Acme", "Acme", "Globex", "Acme"],
            "item_category" => &["Tops", "Mugs", "Tops", "Tops"],
            "item_name" => &["Tee", "Mug", "Hoodie", "Cap"],
            "item_revenue_in_usd" => &[40.0, 15.0, 60.0, 25.0],
            "quantity" => &[2i64, 1, 3, 1],
        )
        .unwrap();
        derive_date_parts(&df).unwrap()
    }

    #[test]
    fn full_selection_is_identity() {
        let df = sales_table();
        let years = observed_years(&df).unwrap();
        let months = observed_months(&df).unwrap();
        let filtered = filter_by_period(&df, &years, &months).unwrap();
        assert_eq!(filtered.height(), df.height());
    }

    #[test]
    fn empty_selection_yields_empty_table() {
        let df = sales_table();
        let years = observed_years(&df).unwrap();

        let no_years = filter_by_period(&df, &[], &["Jan".to_string()]).unwrap();
        assert_eq!(no_years.height(), 0);

        let no_months = filter_by_period(&df, &years, &[]).unwrap();
        assert_eq!(no_months.height(), 0);
    }

    #[test]
    fn period_filter_matches_both_axes() {
        let df = sales_table();
        let filtered = filter_by_period(
            &df,
            &["2023".to_string()],
            &["Jan".to_string(), "Mar".to_string()],
        )
        .unwrap();
        assert_eq!(filtered.height(), 2);
    }

    #[test]
    fn select_all_matches_unfiltered_categories() {
        let df = sales_table();
        let by_brand = filter_brand(&df, "Acme").unwrap();
        let expanded =
            filter_sales(&df, "Acme", &[SELECT_ALL.to_string()]).unwrap();
        assert_eq!(expanded.height(), by_brand.height());
    }

    #[test]
    fn category_selection_narrows_sales() {
        let df = sales_table();
        let filtered = filter_sales(&df, "Acme", &["Mugs".to_string()]).unwrap();
        assert_eq!(filtered.height(), 1);

        let unmatched = filter_sales(&df, "Acme", &["Posters".to_string()]).unwrap();
        assert_eq!(unmatched.height(), 0);
    }

    #[test]
    fn months_come_back_in_calendar_order() {
        let df = sales_table();
        assert_eq!(
            observed_months(&df).unwrap(),
            vec!["Jan", "Feb", "Mar", "Apr"]
        );
    }
}
