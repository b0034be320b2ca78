//! HTTP handler functions for the dashboard API.

use actix_web::{HttpResponse, web};
use road_safety_chart_models::ChartId;
use road_safety_dashboard::render::RenderLog;
use road_safety_dashboard::session::Dashboard;
use road_safety_server_models::{
    ApiHealth, ClickRequest, MetricModeRequest, RenderBatch, ScatterYearsRequest,
    SelectionRequest, YearRequest,
};

use crate::AppState;

/// Packs everything a mutating request rendered into the response body.
fn batch(log: RenderLog, dashboard: &Dashboard) -> HttpResponse {
    HttpResponse::Ok().json(RenderBatch {
        readouts: log.readouts,
        charts: log.charts,
        selection: dashboard.selection().region().map(str::to_string),
    })
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let dashboard = state.dashboard.lock().await;
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        initialized: dashboard.is_initialized(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/controls`
///
/// Returns the current state of every dashboard control.
pub async fn controls(state: web::Data<AppState>) -> HttpResponse {
    let dashboard = state.dashboard.lock().await;
    HttpResponse::Ok().json(dashboard.controls())
}

/// `GET /api/charts`
///
/// Renders every chart in initialization order. Charts that fail to build
/// are left out.
pub async fn charts(state: web::Data<AppState>) -> HttpResponse {
    let dashboard = state.dashboard.lock().await;
    let mut log = RenderLog::new();
    dashboard.render_all(&mut log).await;
    HttpResponse::Ok().json(log.charts)
}

/// `GET /api/charts/{chart}`
///
/// Renders one chart by its kebab-case id.
pub async fn chart(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let Ok(chart) = path.parse::<ChartId>() else {
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Unknown chart: {path}")
        }));
    };

    let dashboard = state.dashboard.lock().await;
    match dashboard.build(chart).await {
        Ok(spec) => HttpResponse::Ok().json(spec),
        Err(e) => {
            log::error!("Error rendering {chart}: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to render {chart}")
            }))
        }
    }
}

/// `POST /api/selection`
///
/// Toggles the selected region.
pub async fn toggle_selection(
    state: web::Data<AppState>,
    body: web::Json<SelectionRequest>,
) -> HttpResponse {
    let mut dashboard = state.dashboard.lock().await;
    let mut log = RenderLog::new();
    dashboard.toggle_selection(&body.region, &mut log).await;
    batch(log, &dashboard)
}

/// `POST /api/click`
///
/// Feeds a chart click into the selection.
pub async fn click(state: web::Data<AppState>, body: web::Json<ClickRequest>) -> HttpResponse {
    let mut dashboard = state.dashboard.lock().await;
    let mut log = RenderLog::new();
    dashboard
        .handle_click(body.chart, &body.datum, &mut log)
        .await;
    batch(log, &dashboard)
}

/// `PUT /api/params/map-year`
pub async fn set_map_year(
    state: web::Data<AppState>,
    body: web::Json<YearRequest>,
) -> HttpResponse {
    let mut dashboard = state.dashboard.lock().await;
    let mut log = RenderLog::new();
    dashboard.set_map_year(body.year, &mut log).await;
    batch(log, &dashboard)
}

/// `PUT /api/params/country-year`
pub async fn set_country_year(
    state: web::Data<AppState>,
    body: web::Json<YearRequest>,
) -> HttpResponse {
    let mut dashboard = state.dashboard.lock().await;
    let mut log = RenderLog::new();
    dashboard.set_country_year(body.year, &mut log).await;
    batch(log, &dashboard)
}

/// `PUT /api/params/scatter-years`
pub async fn set_scatter_years(
    state: web::Data<AppState>,
    body: web::Json<ScatterYearsRequest>,
) -> HttpResponse {
    let mut dashboard = state.dashboard.lock().await;
    let mut log = RenderLog::new();
    let current = *dashboard.params();
    let year_a = body.year_a.unwrap_or(current.scatter_year_a);
    let year_b = body.year_b.unwrap_or(current.scatter_year_b);
    dashboard.set_scatter_years(year_a, year_b, &mut log).await;
    batch(log, &dashboard)
}

/// `PUT /api/params/metric-mode`
pub async fn set_metric_mode(
    state: web::Data<AppState>,
    body: web::Json<MetricModeRequest>,
) -> HttpResponse {
    let mut dashboard = state.dashboard.lock().await;
    let mut log = RenderLog::new();
    dashboard.set_metric_mode(body.mode(), &mut log).await;
    batch(log, &dashboard)
}
