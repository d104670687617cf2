//! Chart Builder Module
//! Pure functions from filtered tables to chart specifications.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use polars::prelude::*;

use crate::data::{date_values, f64_values, str_values};

use super::spec::{
    BarChartSpec, BarSeries, LineChartSpec, LineSeries, PieChartSpec, PieSlice, TimePoint,
};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const TOP_N: usize = 10;

// Axis headroom above the largest value, per chart.
const MONTHLY_USERS_HEADROOM: f64 = 10_000.0;
const TOP_PAGES_HEADROOM: f64 = 30_000.0;
const ITEM_REVENUE_HEADROOM: f64 = 2_000.0;
const ITEM_QUANTITY_HEADROOM: f64 = 100.0;

/// Group rows by `key`, summing `value`. The output is in first-occurrence
/// order of the sorted key space (BTreeMap), which also fixes the tie-break
/// order for the top-10 charts.
fn grouped_totals(df: &DataFrame, key: &str, value: &str) -> PolarsResult<Vec<(String, f64)>> {
    let keys = str_values(df, key)?;
    let values = f64_values(df, value)?;
    let mut grouped: BTreeMap<String, f64> = BTreeMap::new();
    for (key, value) in keys.into_iter().zip(values) {
        *grouped.entry(key).or_insert(0.0) += value;
    }
    Ok(grouped.into_iter().collect())
}

/// Top `n` entries by value, re-sorted ascending so a horizontal bar layout
/// puts the largest bar at the top. The descending selection sort is stable,
/// so ties keep their grouped-output order.
fn top_n_ascending(mut entries: Vec<(String, f64)>, n: usize) -> Vec<(String, f64)> {
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    entries.truncate(n);
    entries.reverse();
    entries
}

/// Monthly total users and new users, ordered by calendar month.
pub fn monthly_users_chart(sessions: &DataFrame) -> PolarsResult<BarChartSpec> {
    let months = str_values(sessions, "month")?;
    let users = f64_values(sessions, "users")?;
    let new_users = f64_values(sessions, "new_users")?;

    let mut by_month: BTreeMap<u32, (f64, f64)> = BTreeMap::new();
    for ((month, users), new_users) in months.iter().zip(&users).zip(&new_users) {
        if let Ok(number) = month.parse::<u32>() {
            let entry = by_month.entry(number).or_insert((0.0, 0.0));
            entry.0 += users;
            entry.1 += new_users;
        }
    }

    let mut labels = Vec::with_capacity(by_month.len());
    let mut user_totals = Vec::with_capacity(by_month.len());
    let mut new_user_totals = Vec::with_capacity(by_month.len());
    let mut max = 0.0f64;
    for (number, (users, new_users)) in &by_month {
        let name = MONTH_NAMES
            .get((*number as usize).saturating_sub(1))
            .copied()
            .unwrap_or("Unknown");
        labels.push(name.to_string());
        user_totals.push(*users);
        new_user_totals.push(*new_users);
        max = max.max(users.max(*new_users));
    }

    Ok(BarChartSpec {
        title: "Monthly Total Users and New Users".to_string(),
        x_label: "Month".to_string(),
        y_label: "Total Users".to_string(),
        labels,
        series: vec![
            BarSeries {
                name: "Total Users".to_string(),
                values: user_totals,
            },
            BarSeries {
                name: "New Users".to_string(),
                values: new_user_totals,
            },
        ],
        horizontal: false,
        color_scaled: false,
        axis_max: Some(max + MONTHLY_USERS_HEADROOM),
    })
}

/// Sessions summed per (medium, day), one line series per medium.
pub fn traffic_chart(traffic: &DataFrame) -> PolarsResult<LineChartSpec> {
    let mediums = str_values(traffic, "medium")?;
    let dates = date_values(traffic, "event_date")?;
    let sessions = f64_values(traffic, "sessions")?;

    let mut grouped: BTreeMap<String, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    for ((medium, date), sessions) in mediums.into_iter().zip(dates).zip(sessions) {
        *grouped.entry(medium).or_default().entry(date).or_insert(0.0) += sessions;
    }

    let series = grouped
        .into_iter()
        .map(|(name, points)| LineSeries {
            name,
            points: points
                .into_iter()
                .map(|(date, value)| TimePoint { date, value })
                .collect(),
        })
        .collect();

    Ok(LineChartSpec {
        title: "Traffic by Medium".to_string(),
        x_label: "Date".to_string(),
        y_label: "Traffic".to_string(),
        series,
    })
}

/// Events summed per device category, rendered as a donut.
pub fn device_chart(devices: &DataFrame) -> PolarsResult<PieChartSpec> {
    let slices = grouped_totals(devices, "category", "events")?
        .into_iter()
        .map(|(label, value)| PieSlice { label, value })
        .collect();

    Ok(PieChartSpec {
        title: "Devices used".to_string(),
        slices,
        hole: 0.7,
    })
}

/// Top 10 pages by summed visit count, horizontal with the largest on top.
pub fn top_pages_chart(pages: &DataFrame) -> PolarsResult<BarChartSpec> {
    let top = top_n_ascending(grouped_totals(pages, "title", "n")?, TOP_N);
    let max = top.iter().map(|(_, v)| *v).fold(0.0, f64::max);

    Ok(BarChartSpec {
        title: "Most Visited Pages".to_string(),
        x_label: "Number of Visits".to_string(),
        y_label: "Page Title".to_string(),
        labels: top.iter().map(|(label, _)| label.clone()).collect(),
        series: vec![BarSeries {
            name: "Visits".to_string(),
            values: top.iter().map(|(_, value)| *value).collect(),
        }],
        horizontal: true,
        color_scaled: false,
        axis_max: Some(max + TOP_PAGES_HEADROOM),
    })
}

/// Revenue summed per day for the brand/category-filtered sales.
pub fn revenue_chart(sales: &DataFrame) -> PolarsResult<LineChartSpec> {
    let dates = date_values(sales, "event_date")?;
    let revenue = f64_values(sales, "item_revenue_in_usd")?;

    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, revenue) in dates.into_iter().zip(revenue) {
        *by_date.entry(date).or_insert(0.0) += revenue;
    }

    Ok(LineChartSpec {
        title: "Revenue Over Time".to_string(),
        x_label: "Date".to_string(),
        y_label: "Revenue (USD)".to_string(),
        series: vec![LineSeries {
            name: "Revenue".to_string(),
            points: by_date
                .into_iter()
                .map(|(date, value)| TimePoint { date, value })
                .collect(),
        }],
    })
}

fn top_items_chart(
    sales: &DataFrame,
    value_column: &str,
    title: &str,
    x_label: &str,
    headroom: f64,
) -> PolarsResult<BarChartSpec> {
    let top = top_n_ascending(grouped_totals(sales, "item_name", value_column)?, TOP_N);
    let max = top.iter().map(|(_, v)| *v).fold(0.0, f64::max);

    Ok(BarChartSpec {
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: "Item".to_string(),
        labels: top.iter().map(|(label, _)| label.clone()).collect(),
        series: vec![BarSeries {
            name: x_label.to_string(),
            values: top.iter().map(|(_, value)| *value).collect(),
        }],
        horizontal: true,
        color_scaled: true,
        axis_max: Some(max + headroom),
    })
}

/// Top 10 items by summed revenue, color-scaled by value.
pub fn top_items_by_revenue(sales: &DataFrame) -> PolarsResult<BarChartSpec> {
    top_items_chart(
        sales,
        "item_revenue_in_usd",
        "Top 10 Items by Revenue",
        "Revenue (USD)",
        ITEM_REVENUE_HEADROOM,
    )
}

/// Top 10 items by summed quantity, color-scaled by value.
pub fn top_items_by_quantity(sales: &DataFrame) -> PolarsResult<BarChartSpec> {
    top_items_chart(
        sales,
        "quantity",
        "Top 10 Items by Quantity",
        "Quantity",
        ITEM_QUANTITY_HEADROOM,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::derive_date_parts;

    #[test]
    fn monthly_chart_orders_by_calendar_month() {
        let df = df!(
            "event_date" => &[20230301i64, 20230105, 20230210, 20230120],
            "users" => &[30i64, 10, 20, 5],
            "new_users" => &[3i64, 1, 2, 1],
        )
        .unwrap();
        let sessions = derive_date_parts(&df).unwrap();

        let spec = monthly_users_chart(&sessions).unwrap();
        assert_eq!(spec.labels, vec!["January", "February", "March"]);
        assert_eq!(spec.series[0].values, vec![15.0, 20.0, 30.0]);
        assert_eq!(spec.series[1].values, vec![2.0, 2.0, 3.0]);
        assert_eq!(spec.axis_max, Some(30.0 + 10_000.0));
    }

    #[test]
    fn traffic_chart_groups_by_medium_and_day() {
        let df = df!(
            "event_date" => &[20230101i64, 20230101, 20230102],
            "medium" => &["organic", "organic", "direct"],
            "sessions" => &[5i64, 7, 3],
        )
        .unwrap();
        let traffic = derive_date_parts(&df).unwrap();

        let spec = traffic_chart(&traffic).unwrap();
        assert_eq!(spec.series.len(), 2);
        assert_eq!(spec.series[0].name, "direct");
        assert_eq!(spec.series[1].name, "organic");
        assert_eq!(spec.series[1].points.len(), 1);
        assert_eq!(spec.series[1].points[0].value, 12.0);
    }

    #[test]
    fn device_chart_sums_events_per_category() {
        let df = df!(
            "category" => &["desktop", "mobile", "desktop"],
            "events" => &[10i64, 30, 5],
        )
        .unwrap();

        let spec = device_chart(&df).unwrap();
        assert_eq!(spec.hole, 0.7);
        assert_eq!(spec.slices.len(), 2);
        assert_eq!(spec.slices[0].label, "desktop");
        assert_eq!(spec.slices[0].value, 15.0);
        assert_eq!(spec.total(), 45.0);
    }

    #[test]
    fn top_pages_keeps_ten_largest_ascending() {
        // Eleven pages: 100, 90, ..., 10 and a trailing 5.
        let titles: Vec<String> = (0..11).map(|i| format!("page-{i:02}")).collect();
        let mut counts: Vec<i64> = (1..=10).map(|i| i * 10).rev().collect();
        counts.push(5);
        let df = df!(
            "title" => &titles,
            "n" => &counts,
        )
        .unwrap();

        let spec = top_pages_chart(&df).unwrap();
        let values = &spec.series[0].values;
        assert_eq!(values.len(), 10);
        assert!(!values.contains(&5.0), "the 11th item must be excluded");
        // Ascending for display: smallest at the bottom, largest on top.
        assert_eq!(values.first(), Some(&10.0));
        assert_eq!(values.last(), Some(&100.0));
        assert_eq!(spec.axis_max, Some(100.0 + 30_000.0));
        assert!(spec.horizontal);
    }

    #[test]
    fn top_ten_ties_keep_grouped_order() {
        let entries = vec![
            ("alpha".to_string(), 50.0),
            ("bravo".to_string(), 50.0),
            ("charlie".to_string(), 80.0),
        ];
        let top = top_n_ascending(entries, 2);
        // charlie wins outright; the 50.0 tie resolves to alpha (first in
        // grouped order).
        assert_eq!(top[0].0, "alpha");
        assert_eq!(top[1].0, "charlie");
    }

    #[test]
    fn item_charts_scale_colors_and_cap_axis() {
        let df = df!(
            "item_name" => &["Tee", "Mug"],
            "item_revenue_in_usd" => &[120.0, 80.0],
            "quantity" => &[6i64, 4],
        )
        .unwrap();

        let by_revenue = top_items_by_revenue(&df).unwrap();
        assert!(by_revenue.color_scaled);
        assert_eq!(by_revenue.axis_max, Some(120.0 + 2_000.0));
        assert_eq!(by_revenue.labels, vec!["Mug", "Tee"]);

        let by_quantity = top_items_by_quantity(&df).unwrap();
        assert_eq!(by_quantity.axis_max, Some(6.0 + 100.0));
        assert_eq!(by_quantity.series[0].values, vec![4.0, 6.0]);
    }
}
