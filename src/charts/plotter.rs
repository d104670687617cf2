//! Chart Plotter Module
//! Interactive rendering of chart specifications with egui_plot.

use chrono::NaiveDate;
use egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke, Vec2};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use super::spec::{BarChartSpec, LineChartSpec, PieChartSpec};

/// Color palette for series
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Default fill for single-series bar charts.
const BAR_COLOR: Color32 = Color32::from_rgb(0, 128, 128);

/// Endpoints of the value-based color scale used by the top-10 item charts.
const SCALE_LOW: Color32 = Color32::from_rgb(209, 238, 234);
const SCALE_HIGH: Color32 = Color32::from_rgb(0, 95, 95);

/// Renders chart specifications into egui widgets.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    fn scale_color(fraction: f64) -> Color32 {
        let f = fraction.clamp(0.0, 1.0) as f32;
        let channel = |low: u8, high: u8| (low as f32 + (high as f32 - low as f32) * f) as u8;
        Color32::from_rgb(
            channel(SCALE_LOW.r(), SCALE_HIGH.r()),
            channel(SCALE_LOW.g(), SCALE_HIGH.g()),
            channel(SCALE_LOW.b(), SCALE_HIGH.b()),
        )
    }

    fn format_day(value: f64) -> String {
        NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
            .map(|d| d.format("%b %d, %Y").to_string())
            .unwrap_or_default()
    }

    /// Draw a bar chart spec. Vertical charts support multiple grouped
    /// series; horizontal charts render their first series bottom-to-top.
    pub fn draw_bar_chart(ui: &mut egui::Ui, id: &str, spec: &BarChartSpec, height: f32) {
        ui.label(RichText::new(&spec.title).size(14.0).strong());

        let labels = spec.labels.clone();
        let axis_max = spec.value_axis_max();
        let count = spec.labels.len();

        let mut plot = Plot::new(id.to_string())
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .allow_drag(false)
            .x_axis_label(spec.x_label.clone());

        if spec.horizontal {
            plot = plot
                .include_x(0.0)
                .include_x(axis_max)
                .include_y(-0.5)
                .include_y(count as f64 - 0.5)
                .y_axis_formatter(move |mark, _range| {
                    let idx = mark.value.round();
                    if (mark.value - idx).abs() < 0.05 && idx >= 0.0 {
                        labels.get(idx as usize).cloned().unwrap_or_default()
                    } else {
                        String::new()
                    }
                });
        } else {
            plot = plot
                .include_y(0.0)
                .include_y(axis_max)
                .y_axis_label(spec.y_label.clone())
                .x_axis_formatter(move |mark, _range| {
                    let idx = mark.value.round();
                    if (mark.value - idx).abs() < 0.05 && idx >= 0.0 {
                        labels.get(idx as usize).cloned().unwrap_or_default()
                    } else {
                        String::new()
                    }
                });
        }

        let max_value = spec.max_value().max(1.0);

        plot.show(ui, |plot_ui| {
            if spec.horizontal {
                let Some(series) = spec.series.first() else {
                    return;
                };
                let bars: Vec<Bar> = series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &value)| {
                        let fill = if spec.color_scaled {
                            Self::scale_color(value / max_value)
                        } else {
                            BAR_COLOR
                        };
                        Bar::new(i as f64, value).width(0.6).fill(fill)
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).horizontal().name(&series.name));
            } else {
                let series_count = spec.series.len().max(1);
                let slot = 0.8 / series_count as f64;
                for (s_idx, series) in spec.series.iter().enumerate() {
                    let color = if series_count > 1 {
                        Self::series_color(s_idx)
                    } else {
                        BAR_COLOR
                    };
                    let offset = -0.4 + slot * (s_idx as f64 + 0.5);
                    let bars: Vec<Bar> = series
                        .values
                        .iter()
                        .enumerate()
                        .map(|(i, &value)| {
                            Bar::new(i as f64 + offset, value)
                                .width(slot * 0.9)
                                .fill(color)
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).name(&series.name));
                }
            }
        });
    }

    /// Draw a line chart spec with one colored line per series.
    pub fn draw_line_chart(ui: &mut egui::Ui, id: &str, spec: &LineChartSpec, height: f32) {
        ui.label(RichText::new(&spec.title).size(14.0).strong());

        Plot::new(id.to_string())
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .allow_drag(false)
            .x_axis_label(spec.x_label.clone())
            .y_axis_label(spec.y_label.clone())
            .x_axis_formatter(|mark, _range| Self::format_day(mark.value))
            .show(ui, |plot_ui| {
                for (i, series) in spec.series.iter().enumerate() {
                    let points: PlotPoints = series
                        .points
                        .iter()
                        .map(|point| [point.x(), point.value])
                        .collect();
                    plot_ui.line(
                        Line::new(points)
                            .color(Self::series_color(i))
                            .width(1.5)
                            .name(&series.name),
                    );
                }
            });
    }

    /// Draw a donut chart. egui_plot has no pie primitive, so the slices are
    /// painted directly as wedge fans with a panel-colored hole on top.
    pub fn draw_pie_chart(ui: &mut egui::Ui, spec: &PieChartSpec, height: f32) {
        ui.label(RichText::new(&spec.title).size(14.0).strong());

        let desired = Vec2::new(ui.available_width(), height);
        let (response, painter) = ui.allocate_painter(desired, Sense::hover());
        let rect = response.rect;

        let total = spec.total();
        if total <= 0.0 {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No data",
                FontId::proportional(14.0),
                ui.visuals().weak_text_color(),
            );
            return;
        }

        let radius = (rect.height().min(rect.width() * 0.6) * 0.5) - 10.0;
        let center = Pos2::new(rect.left() + rect.width() * 0.32, rect.center().y);

        let mut start = -std::f64::consts::FRAC_PI_2;
        for (i, slice) in spec.slices.iter().enumerate() {
            let sweep = slice.value / total * std::f64::consts::TAU;
            Self::fill_sector(
                &painter,
                center,
                radius,
                start,
                start + sweep,
                Self::series_color(i),
            );
            start += sweep;
        }

        // Donut hole.
        painter.circle_filled(center, radius * spec.hole, ui.visuals().panel_fill);

        // Legend with percentage shares.
        let legend_x = rect.left() + rect.width() * 0.66;
        let mut legend_y = rect.top() + 16.0;
        for (i, slice) in spec.slices.iter().enumerate() {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(legend_x, legend_y - 5.0), Vec2::splat(10.0)),
                2.0,
                Self::series_color(i),
            );
            let share = slice.value / total * 100.0;
            painter.text(
                Pos2::new(legend_x + 16.0, legend_y),
                Align2::LEFT_CENTER,
                format!("{} ({share:.1}%)", slice.label),
                FontId::proportional(12.0),
                ui.visuals().text_color(),
            );
            legend_y += 18.0;
        }
    }

    /// Fill a circle sector. Wide sectors are split into sub-wedges of at
    /// most a quarter turn so each painted fan stays convex.
    fn fill_sector(
        painter: &egui::Painter,
        center: Pos2,
        radius: f32,
        start: f64,
        end: f64,
        color: Color32,
    ) {
        let mut from = start;
        while from < end - 1e-9 {
            let to = (from + std::f64::consts::FRAC_PI_2).min(end);
            Self::fill_wedge(painter, center, radius, from, to, color);
            from = to;
        }
    }

    fn fill_wedge(
        painter: &egui::Painter,
        center: Pos2,
        radius: f32,
        start: f64,
        end: f64,
        color: Color32,
    ) {
        let steps = (((end - start) / 0.05).ceil() as usize).max(1);
        let mut points = Vec::with_capacity(steps + 2);
        points.push(center);
        for s in 0..=steps {
            let angle = start + (end - start) * s as f64 / steps as f64;
            points.push(Pos2::new(
                center.x + radius * angle.cos() as f32,
                center.y + radius * angle.sin() as f32,
            ));
        }
        painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
    }
}
