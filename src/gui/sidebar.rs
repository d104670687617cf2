//! Sidebar Widget
//! View selector, year/month filters, store brand/category filters, export
//! button and status line.

use egui::{Color32, ComboBox, RichText};

use crate::dashboard::{DashboardView, FilterOptions, FilterState};
use crate::data::SELECT_ALL;

/// Actions triggered by the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarAction {
    None,
    FiltersChanged,
    Export,
}

pub struct Sidebar {
    pub status: String,
}

impl Default for Sidebar {
    fn default() -> Self {
        Self {
            status: "Ready".to_string(),
        }
    }
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Draw the sidebar. Any widget interaction that changes the filter
    /// state reports `FiltersChanged` so the app re-runs the pipeline.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        filters: &mut FilterState,
        options: &FilterOptions,
    ) -> SidebarAction {
        let mut action = SidebarAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(RichText::new("GA4 dashboard").size(20.0).strong());
            ui.label(
                RichText::new("Switch between Website and\nStore performance dashboards")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(8.0);
        ui.separator();
        ui.add_space(5.0);

        for view in [DashboardView::Website, DashboardView::Store] {
            if ui.selectable_label(filters.view == view, view.label()).clicked()
                && filters.view != view
            {
                filters.view = view;
                action = SidebarAction::FiltersChanged;
            }
        }

        ui.add_space(8.0);
        ui.separator();
        ui.label(RichText::new("Filters:").size(14.0).strong());
        ui.add_space(5.0);

        ui.label("Select year:");
        if Self::multi_select(ui, &options.years, &mut filters.years) {
            action = SidebarAction::FiltersChanged;
        }

        ui.add_space(5.0);
        ui.label("Select month:");
        if Self::multi_select(ui, &options.months, &mut filters.months) {
            action = SidebarAction::FiltersChanged;
        }

        if filters.view == DashboardView::Store {
            ui.add_space(8.0);
            ui.separator();

            ui.label("Select brand:");
            ComboBox::from_id_salt("brand")
                .width(180.0)
                .selected_text(filters.brand.clone())
                .show_ui(ui, |ui| {
                    for brand in &options.brands {
                        if ui.selectable_label(filters.brand == *brand, brand).clicked()
                            && filters.brand != *brand
                        {
                            filters.brand = brand.clone();
                            action = SidebarAction::FiltersChanged;
                        }
                    }
                });

            ui.add_space(5.0);
            ui.label("Select item category:");
            let mut category_options = vec![SELECT_ALL.to_string()];
            category_options.extend(options.categories.iter().cloned());
            if Self::multi_select(ui, &category_options, &mut filters.categories) {
                action = SidebarAction::FiltersChanged;
            }
        }

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        ui.vertical_centered(|ui| {
            if ui.button("Export report").clicked() {
                action = SidebarAction::Export;
            }
        });

        ui.add_space(8.0);
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Checkbox list over `available`; returns true when `selected` changed.
    fn multi_select(ui: &mut egui::Ui, available: &[String], selected: &mut Vec<String>) -> bool {
        let mut changed = false;
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                for value in available {
                    let mut checked = selected.iter().any(|s| s == value);
                    if ui.checkbox(&mut checked, value).changed() {
                        if checked {
                            selected.push(value.clone());
                        } else {
                            selected.retain(|s| s != value);
                        }
                        changed = true;
                    }
                }
            });
        changed
    }
}
