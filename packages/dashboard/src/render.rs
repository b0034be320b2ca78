//! Where rendered chart specs and readouts are delivered.

use road_safety_chart_models::{ChartId, ChartSpec, Readout};
use serde::{Deserialize, Serialize};

/// Receives chart specs and readout updates in dispatch order.
pub trait RenderTarget: Send {
    /// Embeds `spec` at its target, replacing whatever was there.
    fn render(&mut self, spec: ChartSpec);

    /// Updates a text readout.
    fn readout(&mut self, readout: Readout);
}

/// Collects everything dispatched to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderLog {
    /// Readout updates, in dispatch order.
    pub readouts: Vec<Readout>,
    /// Rendered chart specs, in dispatch order.
    pub charts: Vec<ChartSpec>,
}

impl RenderLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of the rendered charts, in dispatch order.
    #[must_use]
    pub fn rendered(&self) -> Vec<ChartId> {
        self.charts.iter().map(|spec| spec.chart).collect()
    }

    /// Most recent spec rendered for `chart`.
    #[must_use]
    pub fn latest(&self, chart: ChartId) -> Option<&ChartSpec> {
        self.charts.iter().rev().find(|spec| spec.chart == chart)
    }
}

impl RenderTarget for RenderLog {
    fn render(&mut self, spec: ChartSpec) {
        log::debug!("Rendered {} into {}", spec.chart, spec.target);
        self.charts.push(spec);
    }

    fn readout(&mut self, readout: Readout) {
        self.readouts.push(readout);
    }
}
