// File: crates/dashboard-core/src/rows.rs
// Summary: Row model and row sources (default zip-by-index, per-chart overrides).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::decode::to_array;
use crate::series::{trace_name, Trace};
use crate::text::{cell_text, clean_html_breaks, json_text};
use crate::types::DEFAULT_HEADER;

/// One exported record. Keys keep insertion order; the first row's keys are
/// the table header.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display text for `key`; missing keys and nulls are empty.
    pub fn cell(&self, key: &str) -> String {
        self.0.get(key).map(cell_text).unwrap_or_default()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Column names for `rows`: the first row's keys, or the default header.
pub fn header(rows: &[Row]) -> Vec<String> {
    match rows.first() {
        Some(first) => first.keys().map(str::to_string).collect(),
        None => DEFAULT_HEADER.iter().map(|h| h.to_string()).collect(),
    }
}

/// One row per data point per trace, zipping `x`, `y`, `text` and
/// `customdata` by index.
///
/// Each trace yields as many rows as its longest field (at least one); missing
/// positions are empty strings. Composite customdata entries become JSON text.
pub fn collect_rows(traces: &[Trace]) -> Vec<Row> {
    let mut rows = Vec::new();
    for (idx, trace) in traces.iter().enumerate() {
        let name = trace_name(trace, idx);
        let field = |key: &str| trace.get(key).map(to_array).unwrap_or_default();
        let (x, y, text, custom) = (field("x"), field("y"), field("text"), field("customdata"));
        let n = x.len().max(y.len()).max(text.len()).max(custom.len()).max(1);

        for i in 0..n {
            let customdata = match custom.get(i) {
                None | Some(Value::Null) => Value::from(""),
                Some(v @ (Value::Array(_) | Value::Object(_))) => Value::String(json_text(v)),
                Some(v) => v.clone(),
            };
            rows.push(
                Row::new()
                    .with("trace", name.clone())
                    .with("x", at(&x, i))
                    .with("y", at(&y, i))
                    .with("text", at(&text, i))
                    .with("customdata", customdata),
            );
        }
    }
    rows
}

// Element `i`, or "" when missing or null.
fn at(items: &[Value], i: usize) -> Value {
    match items.get(i) {
        None | Some(Value::Null) => Value::from(""),
        Some(v) => v.clone(),
    }
}

/// Produces the rows exported for a chart.
pub trait RowSource {
    fn rows(&self, traces: &[Trace]) -> Vec<Row>;
}

/// Adapts a closure into a [`RowSource`].
pub struct RowsFn<F>(pub F);

impl<F> RowSource for RowsFn<F>
where
    F: Fn(&[Trace]) -> Vec<Row>,
{
    fn rows(&self, traces: &[Trace]) -> Vec<Row> {
        (self.0)(traces)
    }
}

/// Default row source: [`collect_rows`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceRows;

impl RowSource for TraceRows {
    fn rows(&self, traces: &[Trace]) -> Vec<Row> {
        collect_rows(traces)
    }
}

/// Rows for a horizontal bar chart of women's share per sector.
///
/// Reads the first trace only: `y` holds sector labels (may contain `<br>`),
/// `x` the women's percentage, and each `customdata` entry is
/// `[men_pct, total_employed]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SectorShareRows;

impl RowSource for SectorShareRows {
    fn rows(&self, traces: &[Trace]) -> Vec<Row> {
        let Some(trace) = traces.first() else {
            return Vec::new();
        };
        let field = |key: &str| trace.get(key).map(to_array).unwrap_or_default();
        let sectors: Vec<Value> = field("y")
            .into_iter()
            .map(|v| match v {
                Value::String(s) => Value::String(clean_html_breaks(&s)),
                other => other,
            })
            .collect();
        let women = field("x");
        let custom = field("customdata");

        let n = sectors.len().max(women.len()).max(custom.len());
        (0..n)
            .map(|i| {
                let pair = custom.get(i).and_then(Value::as_array);
                let pick = |j: usize| pair.map(|p| at(p, j)).unwrap_or_else(|| Value::from(""));
                Row::new()
                    .with("sector_laboral", at(&sectors, i))
                    .with("participacion_mujeres_pct", at(&women, i))
                    .with("participacion_hombres_pct", pick(0))
                    .with("total_empleados", pick(1))
            })
            .collect()
    }
}
