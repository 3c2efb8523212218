// File: crates/dashboard-core/src/dashboard.rs
// Summary: Chart-definition payloads and the page-load render pass that decodes and draws every chart.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::actions::{dispatch, ExportAction, ExportOptions};
use crate::decode::decode_trace_arrays;
use crate::engine::{OptionsEngine, PlotEngine, RenderedChart};
use crate::format::NumberFormat;
use crate::host::ExportHost;
use crate::rows::SectorShareRows;
use crate::series::Trace;
use crate::types::SessionConfig;

/// Row layout a chart's data export uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowShape {
    /// One row per point per trace (`trace, x, y, text, customdata`).
    #[default]
    Traces,
    /// Sector label plus women/men percentages and total employed.
    SectorShare,
}

/// Export settings as written in the payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub base_name: Option<String>,
    pub data_name: Option<String>,
    pub rows: RowShape,
}

impl ExportSettings {
    pub fn to_options(&self) -> ExportOptions {
        let mut options = ExportOptions::default();
        if let Some(name) = &self.base_name {
            options = options.with_base_name(name.clone());
        }
        if let Some(name) = &self.data_name {
            options = options.with_data_name(name.clone());
        }
        match self.rows {
            RowShape::Traces => options,
            RowShape::SectorShare => options.with_rows(SectorShareRows),
        }
    }
}

/// A trace-engine chart: series, layout and engine config for one target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDefinition {
    pub target_id: String,
    #[serde(default)]
    pub data: Vec<Trace>,
    #[serde(default)]
    pub layout: Value,
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub export: Option<ExportSettings>,
}

/// An options-engine chart with an optional number-format override.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsDefinition {
    pub target_id: String,
    #[serde(default)]
    pub options: Value,
    #[serde(default, deserialize_with = "crate::format::optional_preset_or_inline")]
    pub number_format: Option<NumberFormat>,
    #[serde(default)]
    pub export: Option<ExportSettings>,
}

/// Everything the page renders at load time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartPayload {
    pub plotly: Vec<ChartDefinition>,
    pub highcharts: Vec<OptionsDefinition>,
}

impl ChartPayload {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing chart payload")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }
}

/// Decoded copies of the traces of `target_id`; empty when there is no such chart.
pub fn decoded_traces_for(definitions: &[ChartDefinition], target_id: &str) -> Vec<Trace> {
    definitions
        .iter()
        .find(|d| d.target_id == target_id)
        .map(|d| decode_traces(&d.data))
        .unwrap_or_default()
}

fn decode_traces(traces: &[Trace]) -> Vec<Trace> {
    traces
        .iter()
        .map(|t| {
            let mut copy = t.clone();
            decode_trace_arrays(&mut copy);
            copy
        })
        .collect()
}

/// Rendered charts of one page, with their export settings.
pub struct Dashboard {
    pub config: SessionConfig,
    charts: Vec<Box<dyn RenderedChart>>,
    exports: HashMap<String, ExportOptions>,
}

impl Dashboard {
    pub fn new(config: SessionConfig) -> Self {
        Self { config, charts: Vec::new(), exports: HashMap::new() }
    }

    /// Decode and draw every chart of `payload`. A chart the engine rejects
    /// is logged and skipped; the rest still render.
    pub fn render(
        &mut self,
        payload: &ChartPayload,
        plots: &mut dyn PlotEngine,
        options_engine: &mut dyn OptionsEngine,
    ) -> usize {
        let mut drawn = 0;
        for def in &payload.plotly {
            let traces = decode_traces(&def.data);
            let format = &self.config.number_format;
            match plots.draw(&def.target_id, traces, &def.layout, &def.config, format) {
                Ok(chart) => {
                    self.register(chart, def.export.as_ref());
                    drawn += 1;
                }
                Err(e) => tracing::warn!(target_id = %def.target_id, error = %e, "chart not drawn"),
            }
        }
        for def in &payload.highcharts {
            let format = def.number_format.as_ref().unwrap_or(&self.config.number_format);
            match options_engine.chart(&def.target_id, &def.options, format) {
                Ok(chart) => {
                    self.register(chart, def.export.as_ref());
                    drawn += 1;
                }
                Err(e) => tracing::warn!(target_id = %def.target_id, error = %e, "chart not drawn"),
            }
        }
        tracing::info!(drawn, total = payload.plotly.len() + payload.highcharts.len(), "dashboard rendered");
        drawn
    }

    fn register(&mut self, chart: Box<dyn RenderedChart>, export: Option<&ExportSettings>) {
        let target = chart.target_id().to_string();
        if let Some(settings) = export {
            self.exports.insert(target.clone(), settings.to_options());
        }
        self.charts.retain(|c| c.target_id() != target);
        self.charts.push(chart);
    }

    /// Replace the export settings of `target_id`.
    pub fn set_export_options(&mut self, target_id: impl Into<String>, options: ExportOptions) {
        self.exports.insert(target_id.into(), options);
    }

    pub fn chart(&self, target_id: &str) -> Option<&dyn RenderedChart> {
        self.charts.iter().find(|c| c.target_id() == target_id).map(|c| &**c)
    }

    pub fn target_ids(&self) -> impl Iterator<Item = &str> {
        self.charts.iter().map(|c| c.target_id())
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Run a menu action on `target_id`. Unknown targets are ignored.
    pub fn export(&self, target_id: &str, action: ExportAction, host: &mut dyn ExportHost) {
        let Some(chart) = self.chart(target_id) else {
            tracing::debug!(%target_id, "export on missing chart");
            return;
        };
        let default_options;
        let options = match self.exports.get(target_id) {
            Some(o) => o,
            None => {
                default_options = ExportOptions::default();
                &default_options
            }
        };
        dispatch(action, chart, host, options, &self.config);
    }
}
