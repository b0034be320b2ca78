#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the road safety dashboard.
//!
//! `serve` starts the API server; `export` renders the default view of
//! every chart to Vega-Lite files for embedding in a static page.

mod export;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use road_safety_dashboard::config::DashboardConfig;

#[derive(Parser)]
#[command(name = "road_safety", about = "Road safety dashboard")]
struct Cli {
    /// Dataset directory, overriding the configured one.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard API server
    Serve {
        /// Port to listen on, overriding the configured one.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Render every chart's default view to `<out>/<target>.vl.json`
    Export {
        /// Output directory.
        #[arg(long)]
        out: PathBuf,
    },
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut config = DashboardConfig::load()?;
    if let Some(dir) = cli.data_dir {
        config.data.dir = dir;
    }

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            road_safety_server::run_server(config).await?;
        }
        Commands::Export { out } => export::run(&config, &out).await?,
    }

    Ok(())
}
