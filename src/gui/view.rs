//! Dashboard Panel
//! Central panel with the KPI row and the chart grid of the active view.

use egui::RichText;

use crate::charts::ChartPlotter;
use crate::dashboard::DashboardContent;
use crate::stats::format_count;

const CHART_HEIGHT: f32 = 300.0;

pub struct DashboardPanel;

impl DashboardPanel {
    pub fn show(ui: &mut egui::Ui, content: &DashboardContent) {
        match content {
            DashboardContent::Website {
                kpis,
                monthly_users,
                traffic,
                devices,
                top_pages,
            } => {
                Self::kpi_row(
                    ui,
                    &[
                        ("Total users", format_count(kpis.total_users)),
                        ("Total new users", format_count(kpis.total_new_users)),
                        ("Total sessions", format_count(kpis.total_sessions)),
                        ("Total pageviews", format_count(kpis.total_pageviews)),
                    ],
                );
                ui.separator();

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.columns(2, |cols| {
                            ChartPlotter::draw_bar_chart(
                                &mut cols[0],
                                "monthly_users",
                                monthly_users,
                                CHART_HEIGHT,
                            );
                            ChartPlotter::draw_line_chart(
                                &mut cols[1],
                                "traffic",
                                traffic,
                                CHART_HEIGHT,
                            );
                        });
                        ui.add_space(15.0);
                        ui.columns(2, |cols| {
                            ChartPlotter::draw_pie_chart(&mut cols[0], devices, CHART_HEIGHT);
                            ChartPlotter::draw_bar_chart(
                                &mut cols[1],
                                "top_pages",
                                top_pages,
                                CHART_HEIGHT,
                            );
                        });
                    });
            }
            DashboardContent::Store {
                kpis,
                revenue,
                top_by_revenue,
                top_by_quantity,
            } => {
                Self::kpi_row(
                    ui,
                    &[
                        ("Total revenue", format_count(kpis.total_revenue)),
                        ("Number of purchases", format_count(kpis.number_purchase)),
                        ("Total sessions", format_count(kpis.total_sessions)),
                        ("Conversion rate", kpis.conversion_rate_label()),
                    ],
                );
                ui.separator();

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.columns(3, |cols| {
                            ChartPlotter::draw_line_chart(
                                &mut cols[0],
                                "revenue",
                                revenue,
                                CHART_HEIGHT,
                            );
                            ChartPlotter::draw_bar_chart(
                                &mut cols[1],
                                "top_items_revenue",
                                top_by_revenue,
                                CHART_HEIGHT,
                            );
                            ChartPlotter::draw_bar_chart(
                                &mut cols[2],
                                "top_items_quantity",
                                top_by_quantity,
                                CHART_HEIGHT,
                            );
                        });
                    });
            }
        }
    }

    fn kpi_row(ui: &mut egui::Ui, blocks: &[(&str, String)]) {
        ui.add_space(5.0);
        ui.columns(blocks.len(), |cols| {
            for (col, (label, value)) in cols.iter_mut().zip(blocks) {
                col.vertical_centered(|ui| {
                    ui.label(RichText::new(*label).size(14.0));
                    ui.label(RichText::new(value).size(24.0).strong());
                });
            }
        });
        ui.add_space(5.0);
    }
}
