// File: crates/dashboard-core/src/series.rs
// Summary: Trace (series) records as the chart engines consume them.
// Notes:
// - Traces stay loosely typed JSON objects; only the array-valued fields the
//   exporter reads are interpreted here. Everything else (marker, line,
//   hovertemplate...) is handed to the engine untouched.

use serde_json::{Map, Value};

use crate::decode::is_truthy;
use crate::text::number_text;

/// One named data series within a chart.
pub type Trace = Map<String, Value>;

/// Fields that may carry encoded arrays.
pub const ARRAY_FIELDS: [&str; 5] = ["x", "y", "z", "text", "customdata"];

/// Display name of the trace at position `idx`, falling back to `serie_<idx+1>`
/// when the name is missing or falsy (`""`, `0`).
pub fn trace_name(trace: &Trace, idx: usize) -> String {
    match trace.get("name") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(v @ Value::Number(n)) if is_truthy(v) => number_text(n),
        _ => format!("serie_{}", idx + 1),
    }
}

/// Build a trace from `(field, value)` pairs.
pub fn trace_from<I, K>(fields: I) -> Trace
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    fields.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
