//! Statistics module - KPI aggregation

mod kpi;

pub use kpi::{column_sum, format_count, StoreKpis, WebsiteKpis};
