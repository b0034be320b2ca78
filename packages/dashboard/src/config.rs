//! Dashboard configuration.
//!
//! The default configuration is embedded from `config/default.toml`. A
//! replacement file can be named with `DASHBOARD_CONFIG`, and individual
//! keys can be overridden with environment variables:
//!
//! | Variable             | Key                    |
//! |----------------------|------------------------|
//! | `DASHBOARD_DATA_DIR` | `data.dir`             |
//! | `DASHBOARD_DATA_URL` | `data.base_url`        |
//! | `BIND_ADDR`          | `server.bind_addr`     |
//! | `PORT`               | `server.port`          |
//! | `FRONTEND_DIR`       | `server.frontend_dir`  |

use std::path::PathBuf;
use std::sync::Arc;

use road_safety_chart_models::{MetricMode, ViewParams};
use road_safety_charts::ChartSettings;
use road_safety_dataset::fetcher::{DatasetFetcher, DirectoryFetcher, HttpFetcher};
use road_safety_dataset::loader::DatasetPaths;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Embedded default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Environment variable naming a configuration file to load instead of the
/// embedded default.
pub const CONFIG_PATH_ENV: &str = "DASHBOARD_CONFIG";

/// Where datasets are fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DataConfig {
    /// Local dataset directory.
    pub dir: PathBuf,
    /// Remote base URL. Takes precedence over `dir` when set.
    pub base_url: Option<String>,
    /// Document names relative to the dataset root.
    pub paths: DatasetPaths,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            base_url: None,
            paths: DatasetPaths::default(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Frontend static files served at `/`, if any.
    pub frontend_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            frontend_dir: None,
        }
    }
}

/// Initial control values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ViewDefaults {
    /// Initial map year.
    pub map_year: i32,
    /// Initial country-rate year.
    pub country_year: i32,
    /// Initially selected first scatter year.
    pub scatter_year_a: i32,
    /// Initially selected second scatter year.
    pub scatter_year_b: i32,
    /// Initial state of the "show absolute" checkbox.
    pub show_absolute: bool,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self::from(ViewParams::default())
    }
}

impl From<ViewParams> for ViewDefaults {
    fn from(params: ViewParams) -> Self {
        Self {
            map_year: params.map_year,
            country_year: params.country_year,
            scatter_year_a: params.scatter_year_a,
            scatter_year_b: params.scatter_year_b,
            show_absolute: params.metric_mode.shows_absolute(),
        }
    }
}

impl From<ViewDefaults> for ViewParams {
    fn from(defaults: ViewDefaults) -> Self {
        Self {
            map_year: defaults.map_year,
            country_year: defaults.country_year,
            scatter_year_a: defaults.scatter_year_a,
            scatter_year_b: defaults.scatter_year_b,
            metric_mode: MetricMode::from_show_absolute(defaults.show_absolute),
        }
    }
}

/// Complete dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DashboardConfig {
    /// Dataset location.
    pub data: DataConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Static chart settings.
    pub charts: ChartSettings,
    /// Initial control values.
    pub defaults: ViewDefaults,
}

impl DashboardConfig {
    /// Parses a TOML configuration document. Missing keys take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid TOML for
    /// this configuration.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parses the embedded default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the embedded document is invalid.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Loads the configuration from `DASHBOARD_CONFIG` (or the embedded
    /// default) and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration file cannot be read or
    /// parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                log::info!("Loading dashboard configuration from {path}");
                let content =
                    std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                        path: PathBuf::from(&path),
                        source,
                    })?;
                Self::from_toml(&content)?
            }
            Err(_) => Self::embedded()?,
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Applies overrides from `lookup`, which maps an environment variable
    /// name to its value.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("DASHBOARD_DATA_DIR") {
            self.data.dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("DASHBOARD_DATA_URL") {
            self.data.base_url = Some(url);
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(e) => log::warn!("Ignoring invalid PORT '{port}': {e}"),
            }
        }
        if let Some(dir) = lookup("FRONTEND_DIR") {
            self.server.frontend_dir = Some(PathBuf::from(dir));
        }
    }

    /// Builds the fetcher for the configured dataset location.
    #[must_use]
    pub fn fetcher(&self) -> Arc<dyn DatasetFetcher> {
        match &self.data.base_url {
            Some(url) => Arc::new(HttpFetcher::new(url)),
            None => Arc::new(DirectoryFetcher::new(&self.data.dir)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn embedded_config_matches_defaults() {
        let config = DashboardConfig::embedded().unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = DashboardConfig::from_toml(
            r#"
            [defaults]
            map_year = 2010
            show_absolute = true

            [charts]
            highlight_country = "Thailand"
            "#,
        )
        .unwrap();

        let params = ViewParams::from(config.defaults);
        assert_eq!(params.map_year, 2010);
        assert_eq!(params.scatter_year_a, 2003);
        assert_eq!(params.metric_mode, MetricMode::Absolute);
        assert_eq!(config.charts.highlight_country, "Thailand");
        assert_eq!(config.charts.boundary_name_property, "Name");
        assert_eq!(config.data.paths, DatasetPaths::default());
    }

    #[test]
    fn env_overrides_replace_keys() {
        let env: BTreeMap<&str, &str> = [
            ("DASHBOARD_DATA_URL", "https://example.org/data/"),
            ("PORT", "9090"),
            ("FRONTEND_DIR", "app/dist"),
        ]
        .into_iter()
        .collect();

        let mut config = DashboardConfig::default();
        config.apply_env_overrides(|name| env.get(name).map(ToString::to_string));

        assert_eq!(config.data.base_url.as_deref(), Some("https://example.org/data/"));
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.bind_addr, "127.0.0.1");
        assert_eq!(config.server.frontend_dir, Some(PathBuf::from("app/dist")));
        assert!(config.fetcher().describe().contains("example.org"));
    }

    #[test]
    fn invalid_port_is_ignored() {
        let mut config = DashboardConfig::default();
        config.apply_env_overrides(|name| (name == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn malformed_document_is_rejected() {
        let err = DashboardConfig::from_toml("[server]\nport = \"eighty\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
