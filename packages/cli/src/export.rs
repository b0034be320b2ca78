//! Static export of every chart's default view.

use std::path::{Path, PathBuf};

use road_safety_chart_models::{ChartId, ChartSpec};
use road_safety_dashboard::config::DashboardConfig;
use road_safety_dashboard::render::RenderLog;
use road_safety_dashboard::session::Dashboard;

/// File name a chart spec is exported under: its target without the `#`.
fn file_name(spec: &ChartSpec) -> String {
    format!("{}.vl.json", spec.target.trim_start_matches('#'))
}

/// Writes each spec in `log` to `out`. Returns the written paths.
fn write_specs(log: &RenderLog, out: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(out)?;

    let mut written = Vec::with_capacity(log.charts.len());
    for spec in &log.charts {
        let path = out.join(file_name(spec));
        std::fs::write(&path, serde_json::to_vec_pretty(&spec.spec)?)?;
        log::info!("Wrote {} to {}", spec.chart, path.display());
        written.push(path);
    }

    Ok(written)
}

/// Renders every chart with the configured defaults and writes the specs
/// to `out`. Charts that fail to render are logged and skipped.
///
/// # Errors
///
/// Returns an error if the region dataset cannot be loaded or a file
/// cannot be written.
pub async fn run(config: &DashboardConfig, out: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut dashboard = Dashboard::from_config(config);
    dashboard.initialize().await?;

    let mut log = RenderLog::new();
    let rendered = dashboard.render_all(&mut log).await;
    write_specs(&log, out)?;

    let total = ChartId::all().len();
    if rendered < total {
        log::warn!("Exported {rendered} of {total} charts");
    } else {
        log::info!("Exported {rendered} charts to {}", out.display());
    }

    Ok(())
}
