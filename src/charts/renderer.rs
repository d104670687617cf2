//! Static Chart Renderer
//! Draws chart specifications into RGB pixel buffers for the report export.
//! The same specs drive the interactive plotter, so exported images match
//! what is on screen.

use chrono::NaiveDate;
use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use super::spec::{BarChartSpec, LineChartSpec, PieChartSpec};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("chart drawing failed: {0}")]
    Draw(String),
}

fn draw_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Draw(err.to_string())
}

/// Mirrors the interactive palette in `plotter.rs`.
const SERIES_COLORS: [RGBColor; 10] = [
    RGBColor(231, 76, 60),
    RGBColor(46, 204, 113),
    RGBColor(155, 89, 182),
    RGBColor(243, 156, 18),
    RGBColor(26, 188, 156),
    RGBColor(233, 30, 99),
    RGBColor(0, 188, 212),
    RGBColor(255, 87, 34),
    RGBColor(121, 85, 72),
    RGBColor(96, 125, 139),
];

const BAR_COLOR: RGBColor = RGBColor(0, 128, 128);
const SCALE_LOW: RGBColor = RGBColor(209, 238, 234);
const SCALE_HIGH: RGBColor = RGBColor(0, 95, 95);

fn series_color(index: usize) -> RGBColor {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

fn scale_color(fraction: f64) -> RGBColor {
    let f = fraction.clamp(0.0, 1.0);
    let channel = |low: u8, high: u8| (low as f64 + (high as f64 - low as f64) * f) as u8;
    RGBColor(
        channel(SCALE_LOW.0, SCALE_HIGH.0),
        channel(SCALE_LOW.1, SCALE_HIGH.1),
        channel(SCALE_LOW.2, SCALE_HIGH.2),
    )
}

fn format_day(days: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(days.round() as i32)
        .map(|d| d.format("%b %d").to_string())
        .unwrap_or_default()
}

/// Renders chart specs into `width * height * 3` RGB8 buffers.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    pub fn render_bar_chart(
        spec: &BarChartSpec,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![255u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;
            if spec.horizontal {
                Self::draw_horizontal_bars(&root, spec)?;
            } else {
                Self::draw_vertical_bars(&root, spec)?;
            }
            root.present().map_err(draw_err)?;
        }
        Ok(buffer)
    }

    fn draw_vertical_bars(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        spec: &BarChartSpec,
    ) -> Result<(), RenderError> {
        let count = spec.labels.len().max(1);
        let axis_max = spec.value_axis_max();

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(44)
            .y_label_area_size(72)
            .build_cartesian_2d(-0.5f64..count as f64 - 0.5, 0f64..axis_max)
            .map_err(draw_err)?;

        let labels = spec.labels.clone();
        let label_fmt = |x: &f64| {
            let idx = x.round();
            if (x - idx).abs() < 0.05 && idx >= 0.0 {
                labels.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(count)
            .x_label_formatter(&label_fmt)
            .x_desc(spec.x_label.clone())
            .y_desc(spec.y_label.clone())
            .draw()
            .map_err(draw_err)?;

        let series_count = spec.series.len().max(1);
        let slot = 0.8 / series_count as f64;
        for (s_idx, series) in spec.series.iter().enumerate() {
            let color = if series_count > 1 {
                series_color(s_idx)
            } else {
                BAR_COLOR
            };
            let offset = -0.4 + slot * s_idx as f64;
            chart
                .draw_series(series.values.iter().enumerate().map(|(i, &value)| {
                    let x0 = i as f64 + offset + slot * 0.05;
                    Rectangle::new([(x0, 0.0), (x0 + slot * 0.9, value)], color.filled())
                }))
                .map_err(draw_err)?
                .label(series.name.clone())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }

        if spec.series.len() > 1 {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_horizontal_bars(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        spec: &BarChartSpec,
    ) -> Result<(), RenderError> {
        let count = spec.labels.len().max(1);
        let axis_max = spec.value_axis_max();
        let max_value = spec.max_value().max(1.0);

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(44)
            .y_label_area_size(220)
            .build_cartesian_2d(0f64..axis_max, -0.5f64..count as f64 - 0.5)
            .map_err(draw_err)?;

        let labels = spec.labels.clone();
        let label_fmt = |y: &f64| {
            let idx = y.round();
            if (y - idx).abs() < 0.05 && idx >= 0.0 {
                labels.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        };
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(count)
            .y_label_formatter(&label_fmt)
            .x_desc(spec.x_label.clone())
            .draw()
            .map_err(draw_err)?;

        if let Some(series) = spec.series.first() {
            chart
                .draw_series(series.values.iter().enumerate().map(|(i, &value)| {
                    let color = if spec.color_scaled {
                        scale_color(value / max_value)
                    } else {
                        BAR_COLOR
                    };
                    let y = i as f64;
                    Rectangle::new([(0.0, y - 0.35), (value, y + 0.35)], color.filled())
                }))
                .map_err(draw_err)?;
        }
        Ok(())
    }

    pub fn render_line_chart(
        spec: &LineChartSpec,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![255u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;
            Self::draw_lines(&root, spec)?;
            root.present().map_err(draw_err)?;
        }
        Ok(buffer)
    }

    fn draw_lines(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        spec: &LineChartSpec,
    ) -> Result<(), RenderError> {
        if spec.is_empty() {
            root.titled(&spec.title, ("sans-serif", 24)).map_err(draw_err)?;
            return Ok(());
        }

        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_max = 0.0f64;
        for series in &spec.series {
            for point in &series.points {
                x_min = x_min.min(point.x());
                x_max = x_max.max(point.x());
                y_max = y_max.max(point.value);
            }
        }
        if x_max <= x_min {
            x_max = x_min + 1.0;
        }

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(44)
            .y_label_area_size(72)
            .build_cartesian_2d(x_min..x_max, 0f64..(y_max * 1.05).max(1.0))
            .map_err(draw_err)?;

        let day_fmt = |x: &f64| format_day(*x);
        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&day_fmt)
            .x_desc(spec.x_label.clone())
            .y_desc(spec.y_label.clone())
            .draw()
            .map_err(draw_err)?;

        for (i, series) in spec.series.iter().enumerate() {
            let color = series_color(i);
            chart
                .draw_series(LineSeries::new(
                    series.points.iter().map(|p| (p.x(), p.value)),
                    color.stroke_width(2),
                ))
                .map_err(draw_err)?
                .label(series.name.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 14, y)], color));
        }

        if spec.series.len() > 1 {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(draw_err)?;
        }
        Ok(())
    }

    pub fn render_pie_chart(
        spec: &PieChartSpec,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![255u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;
            Self::draw_pie(&root, spec, width, height)?;
            root.present().map_err(draw_err)?;
        }
        Ok(buffer)
    }

    fn draw_pie(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        spec: &PieChartSpec,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let title_style = ("sans-serif", 24).into_font();
        root.draw(&Text::new(
            spec.title.clone(),
            (width as i32 / 2 - 60, 12),
            title_style,
        ))
        .map_err(draw_err)?;

        let total = spec.total();
        if total <= 0.0 {
            return Ok(());
        }

        let center = (width as i32 * 2 / 5, height as i32 / 2 + 12);
        let radius = (height as f64 * 0.35).min(width as f64 * 0.25);

        let mut start = -std::f64::consts::FRAC_PI_2;
        for (i, slice) in spec.slices.iter().enumerate() {
            let sweep = slice.value / total * std::f64::consts::TAU;
            Self::fill_pie_sector(root, center, radius, start, start + sweep, series_color(i))?;
            start += sweep;
        }

        // Donut hole.
        root.draw(&Circle::new(
            center,
            (radius * spec.hole as f64) as i32,
            WHITE.filled(),
        ))
        .map_err(draw_err)?;

        // Legend column on the right.
        let legend_x = width as i32 * 7 / 10;
        let mut legend_y = height as i32 / 3;
        for (i, slice) in spec.slices.iter().enumerate() {
            root.draw(&Rectangle::new(
                [(legend_x, legend_y - 6), (legend_x + 12, legend_y + 6)],
                series_color(i).filled(),
            ))
            .map_err(draw_err)?;
            let share = slice.value / total * 100.0;
            root.draw(&Text::new(
                format!("{} ({share:.1}%)", slice.label),
                (legend_x + 20, legend_y - 7),
                ("sans-serif", 16).into_font(),
            ))
            .map_err(draw_err)?;
            legend_y += 24;
        }
        Ok(())
    }

    /// Fill a circle sector as convex sub-wedges, like the interactive donut.
    fn fill_pie_sector(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        center: (i32, i32),
        radius: f64,
        start: f64,
        end: f64,
        color: RGBColor,
    ) -> Result<(), RenderError> {
        let mut from = start;
        while from < end - 1e-9 {
            let to = (from + std::f64::consts::FRAC_PI_2).min(end);
            let steps = (((to - from) / 0.02).ceil() as usize).max(1);
            let mut points = Vec::with_capacity(steps + 2);
            points.push(center);
            for s in 0..=steps {
                let angle = from + (to - from) * s as f64 / steps as f64;
                points.push((
                    center.0 + (radius * angle.cos()) as i32,
                    center.1 + (radius * angle.sin()) as i32,
                ));
            }
            root.draw(&Polygon::new(points, color.filled()))
                .map_err(draw_err)?;
            from = to;
        }
        Ok(())
    }
}
