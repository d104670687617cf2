//! Report Export Module
//! Writes the active view's charts as PNG files plus a JSON snapshot of the
//! computed KPIs and chart specifications.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::charts::{RenderError, StaticChartRenderer};
use crate::dashboard::DashboardContent;

pub const CHART_WIDTH: u32 = 1200;
pub const CHART_HEIGHT: u32 = 800;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to serialize snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub struct ReportExporter;

impl ReportExporter {
    /// Render every chart of `content` into `dir` and write
    /// `dashboard.json` next to them. Returns the written paths.
    pub fn export(content: &DashboardContent, dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
        fs::create_dir_all(dir)?;

        let charts: Vec<(&str, Vec<u8>)> = match content {
            DashboardContent::Website {
                monthly_users,
                traffic,
                devices,
                top_pages,
                ..
            } => vec![
                (
                    "monthly_users.png",
                    StaticChartRenderer::render_bar_chart(
                        monthly_users,
                        CHART_WIDTH,
                        CHART_HEIGHT,
                    )?,
                ),
                (
                    "traffic_by_medium.png",
                    StaticChartRenderer::render_line_chart(traffic, CHART_WIDTH, CHART_HEIGHT)?,
                ),
                (
                    "devices.png",
                    StaticChartRenderer::render_pie_chart(devices, CHART_WIDTH, CHART_HEIGHT)?,
                ),
                (
                    "top_pages.png",
                    StaticChartRenderer::render_bar_chart(top_pages, CHART_WIDTH, CHART_HEIGHT)?,
                ),
            ],
            DashboardContent::Store {
                revenue,
                top_by_revenue,
                top_by_quantity,
                ..
            } => vec![
                (
                    "revenue.png",
                    StaticChartRenderer::render_line_chart(revenue, CHART_WIDTH, CHART_HEIGHT)?,
                ),
                (
                    "top_items_by_revenue.png",
                    StaticChartRenderer::render_bar_chart(
                        top_by_revenue,
                        CHART_WIDTH,
                        CHART_HEIGHT,
                    )?,
                ),
                (
                    "top_items_by_quantity.png",
                    StaticChartRenderer::render_bar_chart(
                        top_by_quantity,
                        CHART_WIDTH,
                        CHART_HEIGHT,
                    )?,
                ),
            ],
        };

        let mut written = Vec::with_capacity(charts.len() + 1);
        for (name, buffer) in charts {
            let path = dir.join(name);
            image::save_buffer(
                &path,
                &buffer,
                CHART_WIDTH,
                CHART_HEIGHT,
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|source| ReportError::Encode {
                path: path.clone(),
                source,
            })?;
            written.push(path);
        }

        let snapshot = dir.join("dashboard.json");
        fs::write(&snapshot, serde_json::to_vec_pretty(content)?)?;
        written.push(snapshot);

        info!(files = written.len(), dir = %dir.display(), "report exported");
        Ok(written)
    }

    /// Reveal the export directory with the system file browser.
    pub fn reveal(dir: &Path) {
        if let Err(err) = open::that(dir) {
            warn!("could not open {}: {err}", dir.display());
        }
    }
}
