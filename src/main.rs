//! GA4 Dashboard - Website & Store performance over exported analytics CSVs.
//!
//! Loads the five CSV extracts once at startup, then re-runs the pure
//! filter/aggregate/chart pipeline on every sidebar interaction.

mod charts;
mod dashboard;
mod data;
mod gui;
mod report;
mod stats;

use std::path::Path;

use anyhow::Context;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use data::AnalyticsTables;
use gui::DashboardApp;

/// Relative directory holding the five exported CSV extracts.
const DATA_DIR: &str = "data";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let tables =
        AnalyticsTables::load(Path::new(DATA_DIR)).context("loading analytics extracts")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("GA4 Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "GA4 Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, tables)))),
    )
    .map_err(|err| anyhow::anyhow!("ui error: {err}"))
}
