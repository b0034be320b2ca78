//! The dashboard session: shared state, control bindings, and the render
//! pipeline.

use std::sync::Arc;

use road_safety_chart_models::{
    ChartId, ChartSpec, DatasetKind, MetricMode, Readout, Selection, ViewParams,
};
use road_safety_charts::{ChartData, ChartSettings, ViewContext, build_chart};
use road_safety_dataset::fetcher::DatasetFetcher;
use road_safety_dataset::loader::{
    DatasetPaths, load_boundaries, load_country_rates, load_exposure_series, load_regions,
    load_severity_series,
};
use road_safety_dataset_models::RegionObservation;
use serde_json::Value;

use crate::DashboardError;
use crate::config::DashboardConfig;
use crate::controls::Controls;
use crate::render::RenderTarget;

/// Readouts showing the country-rate year.
pub const COUNTRY_YEAR_READOUTS: &[&str] = &["sea-year-display", "sea-year-text"];

/// Readouts showing the map year.
pub const MAP_YEAR_READOUTS: &[&str] = &[
    "map-year-display",
    "map-year-text",
    "bar-year-text",
    "deviation-year-text",
];

/// Charts re-rendered when the map year changes.
pub const MAP_YEAR_CHARTS: &[ChartId] = &[
    ChartId::Choropleth,
    ChartId::GroupedBar,
    ChartId::DeviationBar,
];

/// One dashboard session.
pub struct Dashboard {
    fetcher: Arc<dyn DatasetFetcher>,
    paths: DatasetPaths,
    settings: ChartSettings,
    regions: Option<Vec<RegionObservation>>,
    params: ViewParams,
    selection: Selection,
}

impl Dashboard {
    /// Creates an uninitialized session reading datasets through `fetcher`.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn DatasetFetcher>,
        paths: DatasetPaths,
        settings: ChartSettings,
        params: ViewParams,
    ) -> Self {
        Self {
            fetcher,
            paths,
            settings,
            regions: None,
            params,
            selection: Selection::default(),
        }
    }

    /// Creates an uninitialized session from `config`.
    #[must_use]
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(
            config.fetcher(),
            config.data.paths.clone(),
            config.charts.clone(),
            config.defaults.into(),
        )
    }

    /// Loads the region dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Dataset`] if the region dataset cannot be
    /// fetched or parsed. The session stays uninitialized.
    pub async fn initialize(&mut self) -> Result<(), DashboardError> {
        match load_regions(self.fetcher.as_ref(), &self.paths).await {
            Ok(regions) => {
                self.regions = Some(regions);
                log::info!("Dashboard initialized");
                Ok(())
            }
            Err(e) => {
                log::error!("Error loading state data: {e}");
                Err(e.into())
            }
        }
    }

    /// Whether the region dataset has been loaded.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.regions.is_some()
    }

    /// The loaded region dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotInitialized`] before [`Self::initialize`]
    /// has succeeded.
    pub fn regions(&self) -> Result<&[RegionObservation], DashboardError> {
        self.regions.as_deref().ok_or(DashboardError::NotInitialized)
    }

    /// Current view parameters.
    #[must_use]
    pub const fn params(&self) -> &ViewParams {
        &self.params
    }

    /// Current selection.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Describes the control surface in the current state.
    #[must_use]
    pub fn controls(&self) -> Controls {
        Controls::describe(
            self.regions.as_deref().unwrap_or_default(),
            &self.params,
            &self.selection,
        )
    }

    /// Builds the spec for `chart` from the current state, fetching any
    /// per-render dataset it reads.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if a dataset fetch fails, the region
    /// dataset is not loaded, or the builder fails.
    pub async fn build(&self, chart: ChartId) -> Result<ChartSpec, DashboardError> {
        let ctx = ViewContext {
            params: &self.params,
            selection: &self.selection,
            settings: &self.settings,
        };
        let fetcher = self.fetcher.as_ref();

        let spec = match chart.definition().dataset {
            DatasetKind::Regions => build_chart(chart, ChartData::Regions(self.regions()?), &ctx)?,
            DatasetKind::CountryRates => {
                let rates = load_country_rates(fetcher, &self.paths).await?;
                build_chart(chart, ChartData::CountryRates(&rates), &ctx)?
            }
            DatasetKind::Severity => {
                let series = load_severity_series(fetcher, &self.paths).await?;
                build_chart(chart, ChartData::Severity(&series), &ctx)?
            }
            DatasetKind::Exposure => {
                let series = load_exposure_series(fetcher, &self.paths).await?;
                build_chart(chart, ChartData::Exposure(&series), &ctx)?
            }
            DatasetKind::RegionsWithBoundaries => {
                let regions = self.regions()?;
                let boundaries = load_boundaries(fetcher, &self.paths).await?;
                build_chart(
                    chart,
                    ChartData::RegionsWithBoundaries {
                        regions,
                        boundaries: &boundaries,
                    },
                    &ctx,
                )?
            }
        };

        Ok(spec)
    }

    /// Builds `chart` and hands it to `target`. A failure is logged and the
    /// chart is left as it was. Returns whether the chart was rendered.
    pub async fn render(&self, chart: ChartId, target: &mut dyn RenderTarget) -> bool {
        match self.build(chart).await {
            Ok(spec) => {
                target.render(spec);
                true
            }
            Err(e) => {
                log::error!("Error rendering {chart}: {e}");
                false
            }
        }
    }

    /// Renders `charts` in order. Returns how many were rendered.
    pub async fn render_charts(&self, charts: &[ChartId], target: &mut dyn RenderTarget) -> usize {
        let mut rendered = 0;
        for &chart in charts {
            if self.render(chart, target).await {
                rendered += 1;
            }
        }
        rendered
    }

    /// Renders every chart in initialization order.
    pub async fn render_all(&self, target: &mut dyn RenderTarget) -> usize {
        self.render_charts(ChartId::all(), target).await
    }

    /// Selects `region`, or clears the selection if it is already selected,
    /// then re-renders every selection-aware chart.
    pub async fn toggle_selection(&mut self, region: &str, target: &mut dyn RenderTarget) {
        self.selection.toggle(region);
        match self.selection.region() {
            Some(selected) => log::info!("Selected region: {selected}"),
            None => log::info!("Deselected region"),
        }
        self.render_charts(ChartId::selection_aware(), target).await;
    }

    /// Feeds a click on `chart` into the selection.
    ///
    /// The chart's click field is read from `datum`. Clicks on charts
    /// without a click field, or whose datum lacks a non-empty region name,
    /// are ignored. Returns whether the selection was toggled.
    pub async fn handle_click(
        &mut self,
        chart: ChartId,
        datum: &Value,
        target: &mut dyn RenderTarget,
    ) -> bool {
        let Some(field) = chart.definition().click_field else {
            log::debug!("Ignoring click on {chart}");
            return false;
        };

        match datum.get(field).and_then(Value::as_str) {
            Some(region) if !region.is_empty() => {
                self.toggle_selection(region, target).await;
                true
            }
            _ => {
                log::debug!("Click on {chart} carried no {field}");
                false
            }
        }
    }

    /// Binds the country-rate year slider.
    pub async fn set_country_year(&mut self, year: i32, target: &mut dyn RenderTarget) {
        self.params.country_year = year;
        for id in COUNTRY_YEAR_READOUTS {
            target.readout(Readout::year(id, year));
        }
        self.render(ChartId::CountryRate, target).await;
    }

    /// Binds the map year slider.
    pub async fn set_map_year(&mut self, year: i32, target: &mut dyn RenderTarget) {
        self.params.map_year = year;
        for id in MAP_YEAR_READOUTS {
            target.readout(Readout::year(id, year));
        }
        self.render_charts(MAP_YEAR_CHARTS, target).await;
    }

    /// Binds the first scatter year dropdown.
    pub async fn set_scatter_year_a(&mut self, year: i32, target: &mut dyn RenderTarget) {
        self.params.scatter_year_a = year;
        self.render(ChartId::Scatter, target).await;
    }

    /// Binds the second scatter year dropdown.
    pub async fn set_scatter_year_b(&mut self, year: i32, target: &mut dyn RenderTarget) {
        self.params.scatter_year_b = year;
        self.render(ChartId::Scatter, target).await;
    }

    /// Sets both scatter years and renders the scatter once.
    pub async fn set_scatter_years(
        &mut self,
        year_a: i32,
        year_b: i32,
        target: &mut dyn RenderTarget,
    ) {
        self.params.scatter_year_a = year_a;
        self.params.scatter_year_b = year_b;
        self.render(ChartId::Scatter, target).await;
    }

    /// Binds the "show absolute" checkbox.
    pub async fn set_metric_mode(&mut self, mode: MetricMode, target: &mut dyn RenderTarget) {
        self.params.metric_mode = mode;
        self.render(ChartId::GroupedBar, target).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderLog;
    use road_safety_dataset::fetcher::StaticFetcher;
    use serde_json::json;

    const REGIONS: &str = r#"[
        {"year": 2003, "state_title": "Johor", "deaths": 800, "population": 3000.0, "death_rate": 26.7},
        {"year": 2003, "state_title": "Pulau Pinang", "deaths": 300, "population": 1400.0, "death_rate": 21.4},
        {"year": 2003, "state_title": "Perlis", "deaths": 60, "population": 220.0, "death_rate": 27.3},
        {"year": 2019, "state_title": "Johor", "deaths": 1000, "population": 3800.0, "death_rate": 26.3},
        {"year": 2019, "state_title": "Pulau Pinang", "deaths": 330, "population": 1770.0, "death_rate": 18.6},
        {"year": 2019, "state_title": "Perlis", "deaths": 45, "population": 255.0, "death_rate": 17.6}
    ]"#;

    const COUNTRY_RATES: &str = r#"[
        {"country": "Malaysia", "year": 2019, "rate": 23.6},
        {"country": "Thailand", "year": 2019, "rate": 32.7},
        {"country": "Malaysia", "year": 2010, "rate": 25.0}
    ]"#;

    const SEVERITY: &str = r#"[
        {"year": 2003, "severity": "Deaths", "count": 6286},
        {"year": 2003, "severity": "Serious", "count": 9040}
    ]"#;

    const EXPOSURE: &str = r#"[
        {"year": 2003, "vehicles": 11300000, "crashes": 298653, "deaths": 6286}
    ]"#;

    const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": null, "properties": {"Name": "Johor"}},
            {"type": "Feature", "geometry": null, "properties": {"Name": "Penang"}},
            {"type": "Feature", "geometry": null, "properties": {"Name": "Perlis"}}
        ]
    }"#;

    const TOPOLOGY: &str = r#"{
        "type": "Topology",
        "objects": {"states": {"type": "GeometryCollection", "geometries": [
            {"type": "Polygon", "arcs": [[0]], "properties": {"Name": "Johor"}}
        ]}},
        "arcs": [[[103.0, 1.5], [104.0, 1.5], [104.0, 2.5], [103.0, 1.5]]]
    }"#;

    fn fetcher() -> StaticFetcher {
        let paths = DatasetPaths::default();
        StaticFetcher::new()
            .with_document(&paths.regions, REGIONS)
            .with_document(&paths.country_rates, COUNTRY_RATES)
            .with_document(&paths.severity, SEVERITY)
            .with_document(&paths.exposure, EXPOSURE)
            .with_document(&paths.boundaries, BOUNDARIES)
    }

    fn dashboard(fetcher: StaticFetcher) -> Dashboard {
        Dashboard::new(
            Arc::new(fetcher),
            DatasetPaths::default(),
            ChartSettings::default(),
            ViewParams::default(),
        )
    }

    async fn initialized() -> Dashboard {
        let mut dashboard = dashboard(fetcher());
        dashboard.initialize().await.unwrap();
        dashboard
    }

    fn readout_ids(log: &RenderLog) -> Vec<&str> {
        log.readouts.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn initialize_failure_leaves_session_uninitialized() {
        let mut dashboard = dashboard(StaticFetcher::new());

        let err = dashboard.initialize().await.unwrap_err();

        assert!(matches!(err, DashboardError::Dataset(_)));
        assert!(!dashboard.is_initialized());
        assert!(dashboard.controls().map_year.is_none());
    }

    #[tokio::test]
    async fn render_all_dispatches_in_initialization_order() {
        let dashboard = initialized().await;
        let mut log = RenderLog::new();

        let rendered = dashboard.render_all(&mut log).await;

        assert_eq!(rendered, 8);
        assert_eq!(log.rendered(), ChartId::all());
        let map = log.latest(ChartId::Choropleth).unwrap();
        assert_eq!(map.target, "#chart4-choropleth");
        assert_eq!(
            map.spec["layer"][0]["data"]["values"]["features"][1]["state_title"],
            "Pulau Pinang"
        );
    }

    #[tokio::test]
    async fn failed_fetch_skips_only_that_chart() {
        let paths = DatasetPaths::default();
        let fetcher = StaticFetcher::new()
            .with_document(&paths.regions, REGIONS)
            .with_document(&paths.severity, SEVERITY)
            .with_document(&paths.exposure, EXPOSURE)
            .with_document(&paths.boundaries, BOUNDARIES);
        let mut dashboard = dashboard(fetcher);
        dashboard.initialize().await.unwrap();
        let mut log = RenderLog::new();

        let rendered = dashboard.render_all(&mut log).await;

        assert_eq!(rendered, 7);
        assert!(log.latest(ChartId::CountryRate).is_none());
        assert_eq!(log.rendered()[0], ChartId::SeverityArea);
    }

    #[tokio::test]
    async fn region_charts_need_initialization() {
        let dashboard = dashboard(fetcher());
        let err = dashboard.build(ChartId::Trellis).await.unwrap_err();
        assert!(matches!(err, DashboardError::NotInitialized));

        let spec = dashboard.build(ChartId::SeverityArea).await.unwrap();
        assert_eq!(spec.target, "#chart2-stacked-area");
    }

    #[tokio::test]
    async fn toggle_rerenders_selection_aware_charts_in_order() {
        let mut dashboard = initialized().await;
        let mut log = RenderLog::new();

        dashboard.toggle_selection("Johor", &mut log).await;

        assert_eq!(log.rendered(), ChartId::selection_aware());
        assert_eq!(dashboard.selection().region(), Some("Johor"));
        let trellis = log.latest(ChartId::Trellis).unwrap();
        assert_eq!(
            trellis.spec["spec"]["encoding"]["opacity"]["condition"]["test"],
            "datum.state_title == 'Johor'"
        );

        dashboard.toggle_selection("Johor", &mut log).await;
        assert!(dashboard.selection().is_empty());
        assert_eq!(log.charts.len(), 10);
        let trellis = log.latest(ChartId::Trellis).unwrap();
        assert_eq!(
            trellis.spec["spec"]["encoding"]["opacity"]["condition"]["test"],
            "true"
        );
    }

    #[tokio::test]
    async fn clicks_toggle_by_chart_click_field() {
        let mut dashboard = initialized().await;
        let mut log = RenderLog::new();

        let toggled = dashboard
            .handle_click(ChartId::Scatter, &json!({"state": "Perlis"}), &mut log)
            .await;
        assert!(toggled);
        assert_eq!(dashboard.selection().region(), Some("Perlis"));

        let toggled = dashboard
            .handle_click(ChartId::GroupedBar, &json!({"state_title": "Johor"}), &mut log)
            .await;
        assert!(toggled);
        assert_eq!(dashboard.selection().region(), Some("Johor"));
    }

    #[tokio::test]
    async fn clicks_without_region_are_ignored() {
        let mut dashboard = initialized().await;
        let mut log = RenderLog::new();

        assert!(
            !dashboard
                .handle_click(ChartId::CountryRate, &json!({"country": "Malaysia"}), &mut log)
                .await
        );
        assert!(
            !dashboard
                .handle_click(ChartId::Scatter, &json!({"state_title": "Johor"}), &mut log)
                .await
        );
        assert!(
            !dashboard
                .handle_click(ChartId::Trellis, &json!({"state_title": ""}), &mut log)
                .await
        );
        assert!(dashboard.selection().is_empty());
        assert!(log.charts.is_empty());
    }

    #[tokio::test]
    async fn map_year_updates_readouts_and_linked_charts() {
        let mut dashboard = initialized().await;
        let mut log = RenderLog::new();

        dashboard.set_map_year(2003, &mut log).await;

        assert_eq!(readout_ids(&log), MAP_YEAR_READOUTS);
        assert!(log.readouts.iter().all(|r| r.text == "2003"));
        assert_eq!(log.rendered(), MAP_YEAR_CHARTS);
        assert_eq!(dashboard.controls().map_year.unwrap().value, 2003);
    }

    #[tokio::test]
    async fn map_year_without_data_renders_nothing() {
        let mut dashboard = initialized().await;
        let mut log = RenderLog::new();

        dashboard.set_map_year(1990, &mut log).await;

        assert_eq!(log.readouts.len(), 4);
        assert!(log.charts.is_empty());
    }

    #[tokio::test]
    async fn country_year_filters_country_bar() {
        let mut dashboard = initialized().await;
        let mut log = RenderLog::new();

        dashboard.set_country_year(2010, &mut log).await;

        assert_eq!(readout_ids(&log), COUNTRY_YEAR_READOUTS);
        let spec = log.latest(ChartId::CountryRate).unwrap();
        assert_eq!(spec.spec["data"]["values"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn metric_mode_rerenders_grouped_bar_only() {
        let mut dashboard = initialized().await;
        let mut log = RenderLog::new();

        dashboard.set_metric_mode(MetricMode::Absolute, &mut log).await;

        assert_eq!(log.rendered(), [ChartId::GroupedBar]);
        let spec = log.latest(ChartId::GroupedBar).unwrap();
        assert_eq!(spec.spec["layer"][0]["encoding"]["x"]["field"], "deaths");
        assert!(dashboard.controls().show_absolute);
    }

    #[tokio::test]
    async fn metric_mode_survives_selection_rerender() {
        let mut dashboard = initialized().await;
        let mut log = RenderLog::new();

        dashboard.set_metric_mode(MetricMode::Absolute, &mut log).await;
        dashboard.toggle_selection("Perlis", &mut log).await;

        let spec = log.latest(ChartId::GroupedBar).unwrap();
        assert_eq!(spec.spec["layer"][0]["encoding"]["x"]["field"], "deaths");
    }

    #[tokio::test]
    async fn scatter_years_rerender_scatter() {
        let mut dashboard = initialized().await;
        let mut log = RenderLog::new();

        dashboard.set_scatter_year_a(2019, &mut log).await;
        dashboard.set_scatter_year_b(2003, &mut log).await;
        dashboard.set_scatter_years(2003, 2019, &mut log).await;

        assert_eq!(log.rendered(), [ChartId::Scatter; 3]);
        let spec = log.latest(ChartId::Scatter).unwrap();
        assert_eq!(spec.spec["layer"][1]["encoding"]["x"]["title"], "Deaths (2003)");
        assert!(log.readouts.is_empty());
    }

    #[tokio::test]
    async fn choropleth_renders_from_topology() {
        let paths = DatasetPaths::default();
        let fetcher = StaticFetcher::new()
            .with_document(&paths.regions, REGIONS)
            .with_document(&paths.boundaries, TOPOLOGY);
        let mut dashboard = dashboard(fetcher);
        dashboard.initialize().await.unwrap();
        let mut log = RenderLog::new();

        assert!(dashboard.render(ChartId::Choropleth, &mut log).await);

        let map = log.latest(ChartId::Choropleth).unwrap();
        let layer = &map.spec["layer"][0];
        assert_eq!(layer["data"]["format"]["feature"], "states");
        assert_eq!(layer["transform"][0]["lookup"], "properties.Name");
        let rows = layer["transform"][0]["from"]["data"]["values"]
            .as_array()
            .unwrap();
        assert!(rows.iter().any(|r| r["geo_name"] == "Penang"));
    }

    #[tokio::test]
    async fn map_year_charts_share_one_national_rate() {
        let mut dashboard = initialized().await;
        let mut log = RenderLog::new();

        dashboard.set_map_year(2003, &mut log).await;

        let map = log.latest(ChartId::Choropleth).unwrap();
        let caption = map.spec["layer"][1]["data"]["values"][0]["text"]
            .as_str()
            .unwrap();
        let from_caption: f64 = caption
            .trim_start_matches("National: ")
            .trim_end_matches(" per 100k")
            .parse()
            .unwrap();

        let bar = log.latest(ChartId::GroupedBar).unwrap();
        let from_rule = bar.spec["layer"][1]["encoding"]["x"]["datum"]
            .as_f64()
            .unwrap();

        let deviation = log.latest(ChartId::DeviationBar).unwrap();
        let baselines: Vec<f64> = deviation.spec["data"]["values"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["national_rate"].as_f64().unwrap())
            .collect();

        // 1160 deaths over 4620 thousand people.
        assert!((from_rule - 25.108_225).abs() < 1e-6);
        assert!((from_caption - from_rule).abs() < 0.05);
        assert_eq!(baselines.len(), 3);
        assert!(baselines.iter().all(|rate| (rate - from_rule).abs() < 1e-12));
    }
}
