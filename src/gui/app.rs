//! GA4 Dashboard Main Application
//! Main window with sidebar filters and the dashboard panel.

use std::path::Path;
use std::time::Instant;

use egui::{RichText, SidePanel};
use tracing::{debug, error};

use crate::dashboard::{DashboardContent, FilterOptions, FilterState};
use crate::data::AnalyticsTables;
use crate::gui::{DashboardPanel, Sidebar, SidebarAction};
use crate::report::ReportExporter;

const EXPORT_DIR: &str = "exports";

/// Main application window. Holds the immutable tables, the explicit filter
/// state and the last computed content; every interaction re-runs the full
/// pipeline synchronously.
pub struct DashboardApp {
    tables: AnalyticsTables,
    filters: FilterState,
    options: FilterOptions,
    content: Option<DashboardContent>,
    sidebar: Sidebar,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, tables: AnalyticsTables) -> Self {
        let mut app = Self {
            filters: FilterState::default(),
            options: FilterOptions::default(),
            content: None,
            sidebar: Sidebar::new(),
            tables,
        };
        match FilterState::initial(&app.tables) {
            Ok(filters) => app.filters = filters,
            Err(err) => app.sidebar.set_status(format!("Error: {err}")),
        }
        app.recompute();
        app
    }

    /// One full pass from the preprocessed tables to displayable content.
    /// Dashboard extracts are small, so this stays well within a frame.
    fn recompute(&mut self) {
        let started = Instant::now();

        match FilterOptions::from_tables(&self.tables, &self.filters) {
            Ok(options) => {
                // Keep the brand selection valid under the new period.
                if !options.brands.is_empty() && !options.brands.contains(&self.filters.brand) {
                    self.filters.brand = options.brands[0].clone();
                }
                self.options = options;
            }
            Err(err) => {
                error!("filter options failed: {err}");
                self.sidebar.set_status(format!("Error: {err}"));
                return;
            }
        }

        match DashboardContent::compute(&self.tables, &self.filters) {
            Ok(content) => {
                debug!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    view = self.filters.view.label(),
                    "dashboard recomputed"
                );
                self.content = Some(content);
                self.sidebar.set_status("Ready");
            }
            Err(err) => {
                error!("pipeline failed: {err}");
                self.sidebar.set_status(format!("Error: {err}"));
            }
        }
    }

    fn handle_export(&mut self) {
        let Some(content) = &self.content else {
            self.sidebar.set_status("Nothing to export");
            return;
        };
        let dir = Path::new(EXPORT_DIR);
        match ReportExporter::export(content, dir) {
            Ok(written) => {
                self.sidebar
                    .set_status(format!("Exported {} files", written.len()));
                ReportExporter::reveal(dir);
            }
            Err(err) => self.sidebar.set_status(format!("Export error: {err}")),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut action = SidebarAction::None;

        SidePanel::left("sidebar")
            .min_width(240.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    action = self.sidebar.show(ui, &mut self.filters, &self.options);
                });
            });

        match action {
            SidebarAction::FiltersChanged => self.recompute(),
            SidebarAction::Export => self.handle_export(),
            SidebarAction::None => {}
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(content) = &self.content {
                DashboardPanel::show(ui, content);
            } else {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No data").size(20.0));
                });
            }
        });
    }
}
