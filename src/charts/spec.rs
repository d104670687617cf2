//! Chart specifications.
//!
//! The builder produces these as plain data; both the interactive plotter
//! and the static report renderer consume them unchanged.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// One bar series across the category labels of a [`BarChartSpec`].
#[derive(Debug, Clone, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Category labels in display order. For horizontal charts the order is
    /// bottom-to-top, so the last label renders closest to the top.
    pub labels: Vec<String>,
    pub series: Vec<BarSeries>,
    pub horizontal: bool,
    /// Scale bar colors by value instead of using one color per series.
    pub color_scaled: bool,
    /// Fixed upper bound for the value axis.
    pub axis_max: Option<f64>,
}

impl BarChartSpec {
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter())
            .copied()
            .fold(0.0, f64::max)
    }

    /// Upper bound of the value axis: the fixed bound when set, otherwise a
    /// 10% headroom over the data.
    pub fn value_axis_max(&self) -> f64 {
        self.axis_max
            .unwrap_or_else(|| self.max_value() * 1.1)
            .max(1.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl TimePoint {
    /// X coordinate on a day-granular axis.
    pub fn x(&self) -> f64 {
        self.date.num_days_from_ce() as f64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<TimePoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<LineSeries>,
}

impl LineChartSpec {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PieChartSpec {
    pub title: String,
    pub slices: Vec<PieSlice>,
    /// Donut hole radius as a fraction of the pie radius.
    pub hole: f32,
}

impl PieChartSpec {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }
}
