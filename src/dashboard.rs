//! Dashboard pipeline.
//!
//! The interactive shell owns a [`FilterState`] and re-runs
//! [`DashboardContent::compute`] on every change. The pipeline is a pure
//! function of the loaded tables and the filter state; nothing mutable is
//! retained between runs.

use polars::prelude::*;
use serde::Serialize;

use crate::charts::{self, BarChartSpec, LineChartSpec, PieChartSpec};
use crate::data::{self, AnalyticsTables};
use crate::stats::{StoreKpis, WebsiteKpis};

/// The two mutually exclusive dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardView {
    #[default]
    Website,
    Store,
}

impl DashboardView {
    pub fn label(&self) -> &'static str {
        match self {
            DashboardView::Website => "Website performance",
            DashboardView::Store => "Store performance",
        }
    }
}

/// Everything the user has selected in the sidebar, threaded explicitly
/// through the pipeline.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterState {
    pub view: DashboardView,
    pub years: Vec<String>,
    pub months: Vec<String>,
    pub brand: String,
    pub categories: Vec<String>,
}

impl FilterState {
    /// Startup defaults: every observed year and month selected, the first
    /// observed brand, and the whole category range.
    pub fn initial(tables: &AnalyticsTables) -> PolarsResult<Self> {
        let mut state = Self {
            view: DashboardView::Website,
            years: data::observed_years(&tables.sessions)?,
            months: data::observed_months(&tables.sessions)?,
            brand: String::new(),
            categories: vec![data::SELECT_ALL.to_string()],
        };
        let options = FilterOptions::from_tables(tables, &state)?;
        if let Some(first) = options.brands.first() {
            state.brand = first.clone();
        }
        Ok(state)
    }
}

/// Option lists offered by the sidebar. Brand and category options come from
/// the period-filtered sales table, so they narrow with the year/month
/// selection exactly like the original widgets did.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub years: Vec<String>,
    pub months: Vec<String>,
    pub brands: Vec<String>,
    pub categories: Vec<String>,
}

impl FilterOptions {
    pub fn from_tables(tables: &AnalyticsTables, filters: &FilterState) -> PolarsResult<Self> {
        let sales = data::filter_by_period(&tables.sales, &filters.years, &filters.months)?;
        Ok(Self {
            years: data::observed_years(&tables.sessions)?,
            months: data::observed_months(&tables.sessions)?,
            brands: data::distinct_strings(&sales, "item_brand")?,
            categories: data::distinct_strings(&sales, "item_category")?,
        })
    }
}

/// KPIs and chart specs for the active view. One variant per view: the
/// inactive view's aggregations are never computed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DashboardContent {
    Website {
        kpis: WebsiteKpis,
        monthly_users: BarChartSpec,
        traffic: LineChartSpec,
        devices: PieChartSpec,
        top_pages: BarChartSpec,
    },
    Store {
        kpis: StoreKpis,
        revenue: LineChartSpec,
        top_by_revenue: BarChartSpec,
        top_by_quantity: BarChartSpec,
    },
}

impl DashboardContent {
    /// One full pipeline pass: filter, aggregate, build chart specs.
    pub fn compute(tables: &AnalyticsTables, filters: &FilterState) -> PolarsResult<Self> {
        let sessions = data::filter_by_period(&tables.sessions, &filters.years, &filters.months)?;

        match filters.view {
            DashboardView::Website => {
                let traffic =
                    data::filter_by_period(&tables.traffic, &filters.years, &filters.months)?;
                let devices =
                    data::filter_by_period(&tables.devices, &filters.years, &filters.months)?;
                let pages = data::filter_by_period(&tables.pages, &filters.years, &filters.months)?;

                Ok(DashboardContent::Website {
                    kpis: WebsiteKpis::compute(&sessions)?,
                    monthly_users: charts::monthly_users_chart(&sessions)?,
                    traffic: charts::traffic_chart(&traffic)?,
                    devices: charts::device_chart(&devices)?,
                    top_pages: charts::top_pages_chart(&pages)?,
                })
            }
            DashboardView::Store => {
                let sales = data::filter_by_period(&tables.sales, &filters.years, &filters.months)?;
                // KPIs follow the brand selection only; the charts also
                // honor the category selection.
                let branded = data::filter_brand(&sales, &filters.brand)?;
                let store_sales = data::filter_sales(&sales, &filters.brand, &filters.categories)?;

                Ok(DashboardContent::Store {
                    kpis: StoreKpis::compute(&branded, &sessions)?,
                    revenue: charts::revenue_chart(&store_sales)?,
                    top_by_revenue: charts::top_items_by_revenue(&store_sales)?,
                    top_by_quantity: charts::top_items_by_quantity(&store_sales)?,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{derive_date_parts, fill_missing_medium, SELECT_ALL};

    fn tables() -> AnalyticsTables {
        let sessions = df!(
            "event_date" => &[20230110i64, 20230211],
            "users" => &[100i64, 200],
            "new_users" => &[40i64, 80],
            "sessions" => &[120i64, 240],
            "pageviews" => &[500i64, 900],
        )
        .unwrap();
        let sales = df!(
            "event_date" => &[20230110i64, 20230211],
            "item_brand" => &["A", "B"],
            "item_category" => &["Tops", "Mugs"],
            "item_name" => &["Shirt", "Mug"],
            "item_revenue_in_usd" => &[50.0, 150.0],
            "quantity" => &[2i64, 6],
        )
        .unwrap();
        let traffic = df!(
            "event_date" => &[20230110i64, 20230211],
            "medium" => &[Some("organic"), None],
            "sessions" => &[60i64, 70],
        )
        .unwrap();
        let devices = df!(
            "event_date" => &[20230110i64, 20230211],
            "category" => &["desktop", "mobile"],
            "events" => &[10i64, 30],
        )
        .unwrap();
        let pages = df!(
            "event_date" => &[20230110i64, 20230211],
            "title" => &["Home", "Shop"],
            "n" => &[1000i64, 600],
        )
        .unwrap();

        AnalyticsTables {
            sessions: derive_date_parts(&sessions).unwrap(),
            sales: derive_date_parts(&sales).unwrap(),
            traffic: fill_missing_medium(&derive_date_parts(&traffic).unwrap()).unwrap(),
            devices: derive_date_parts(&devices).unwrap(),
            pages: derive_date_parts(&pages).unwrap(),
        }
    }

    #[test]
    fn initial_state_selects_everything() {
        let tables = tables();
        let state = FilterState::initial(&tables).unwrap();
        assert_eq!(state.view, DashboardView::Website);
        assert_eq!(state.years, vec!["2023"]);
        assert_eq!(state.months, vec!["Jan", "Feb"]);
        assert_eq!(state.brand, "A");
        assert_eq!(state.categories, vec![SELECT_ALL]);
    }

    #[test]
    fn website_kpis_respect_the_period_filter() {
        let tables = tables();
        let filters = FilterState {
            view: DashboardView::Website,
            years: vec!["2023".to_string()],
            months: vec!["Jan".to_string()],
            ..Default::default()
        };

        let content = DashboardContent::compute(&tables, &filters).unwrap();
        let DashboardContent::Website { kpis, monthly_users, .. } = content else {
            panic!("expected website content");
        };
        assert_eq!(kpis.total_users, 100);
        assert_eq!(kpis.total_sessions, 120);
        assert_eq!(monthly_users.labels, vec!["January"]);
    }

    #[test]
    fn store_revenue_follows_brand_not_category() {
        let tables = tables();
        let mut filters = FilterState {
            view: DashboardView::Store,
            years: vec!["2023".to_string()],
            months: vec!["Jan".to_string(), "Feb".to_string()],
            brand: "A".to_string(),
            categories: vec![SELECT_ALL.to_string()],
        };

        let content = DashboardContent::compute(&tables, &filters).unwrap();
        let DashboardContent::Store { kpis, .. } = content else {
            panic!("expected store content");
        };
        assert_eq!(kpis.total_revenue, 50);

        // A category selection that excludes everything brand A sells still
        // leaves the KPI untouched; only the charts go empty.
        filters.categories = vec!["Mugs".to_string()];
        let content = DashboardContent::compute(&tables, &filters).unwrap();
        let DashboardContent::Store { kpis, top_by_revenue, .. } = content else {
            panic!("expected store content");
        };
        assert_eq!(kpis.total_revenue, 50);
        assert!(top_by_revenue.labels.is_empty());
    }

    #[test]
    fn empty_period_selection_zeroes_kpis_and_guards_conversion() {
        let tables = tables();
        let filters = FilterState {
            view: DashboardView::Store,
            years: vec![],
            months: vec![],
            brand: "A".to_string(),
            categories: vec![SELECT_ALL.to_string()],
        };

        let content = DashboardContent::compute(&tables, &filters).unwrap();
        let DashboardContent::Store { kpis, revenue, .. } = content else {
            panic!("expected store content");
        };
        assert_eq!(kpis.total_revenue, 0);
        assert_eq!(kpis.number_purchase, 0);
        assert_eq!(kpis.total_sessions, 0);
        assert!(kpis.conversion_rate.is_none());
        assert!(revenue.is_empty());
    }

    #[test]
    fn store_conversion_rate_uses_session_denominator() {
        let tables = tables();
        let filters = FilterState {
            view: DashboardView::Store,
            years: vec!["2023".to_string()],
            months: vec!["Jan".to_string(), "Feb".to_string()],
            brand: "B".to_string(),
            categories: vec![SELECT_ALL.to_string()],
        };

        let content = DashboardContent::compute(&tables, &filters).unwrap();
        let DashboardContent::Store { kpis, .. } = content else {
            panic!("expected store content");
        };
        // 6 purchases over 360 sessions.
        assert_eq!(kpis.number_purchase, 6);
        assert_eq!(kpis.total_sessions, 360);
        assert_eq!(kpis.conversion_rate_label(), "1.67%");
    }

    #[test]
    fn brand_options_narrow_with_the_period() {
        let tables = tables();
        let mut state = FilterState::initial(&tables).unwrap();
        state.months = vec!["Feb".to_string()];
        let options = FilterOptions::from_tables(&tables, &state).unwrap();
        assert_eq!(options.brands, vec!["B"]);
        assert_eq!(options.categories, vec!["Mugs"]);
    }
}
