//! Charts module - chart specifications, interactive plotting and static rendering

mod builder;
mod plotter;
mod renderer;
mod spec;

pub use builder::{
    device_chart, monthly_users_chart, revenue_chart, top_items_by_quantity,
    top_items_by_revenue, top_pages_chart, traffic_chart,
};
pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};
pub use spec::{
    BarChartSpec, BarSeries, LineChartSpec, LineSeries, PieChartSpec, PieSlice, TimePoint,
};
