#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the road safety dashboard.
//!
//! Serves the REST API that drives a dashboard session and the static
//! dataset and frontend files. The browser embeds the chart specs it gets
//! back and posts control changes and chart clicks to the API. The session
//! sits behind a single async mutex, so each event and every re-render it
//! triggers completes before the next event is handled.

mod handlers;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use road_safety_dashboard::config::DashboardConfig;
use road_safety_dashboard::session::Dashboard;
use tokio::sync::Mutex;

/// Shared application state.
pub struct AppState {
    /// The dashboard session.
    pub dashboard: Mutex<Dashboard>,
}

impl AppState {
    /// Wraps `dashboard` for sharing across workers.
    #[must_use]
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Mutex::new(dashboard),
        }
    }
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/controls", web::get().to(handlers::controls))
            .route("/charts", web::get().to(handlers::charts))
            .route("/charts/{chart}", web::get().to(handlers::chart))
            .route("/selection", web::post().to(handlers::toggle_selection))
            .route("/click", web::post().to(handlers::click))
            .route("/params/map-year", web::put().to(handlers::set_map_year))
            .route(
                "/params/country-year",
                web::put().to(handlers::set_country_year),
            )
            .route(
                "/params/scatter-years",
                web::put().to(handlers::set_scatter_years),
            )
            .route(
                "/params/metric-mode",
                web::put().to(handlers::set_metric_mode),
            ),
    );
}

/// Starts the dashboard API server.
///
/// Loads the region dataset and starts the Actix-Web HTTP server. If the
/// region dataset cannot be loaded the server still starts; charts built
/// from it are reported as unavailable until a restart. This is a regular
/// async function; the caller is responsible for providing the async
/// runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: DashboardConfig) -> std::io::Result<()> {
    let mut dashboard = Dashboard::from_config(&config);

    log::info!("Loading region dataset...");
    if dashboard.initialize().await.is_err() {
        log::warn!("Serving without region data");
    }

    let state = web::Data::new(AppState::new(dashboard));
    let data_dir = config.data.dir.clone();
    let frontend_dir = config.server.frontend_dir.clone();
    let bind_addr = config.server.bind_addr.clone();
    let port = config.server.port;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        let app = App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve the dataset directory
            .service(Files::new("/data", &data_dir));

        // Serve frontend static files (production)
        match &frontend_dir {
            Some(dir) => app.service(Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
