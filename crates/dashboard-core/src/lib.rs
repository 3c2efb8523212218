// File: crates/dashboard-core/src/lib.rs
// Summary: Core library entry point; decoding of encoded chart arrays, row export and render pass.

pub mod dtype;
pub mod shape;
pub mod decode;
pub mod series;
pub mod text;
pub mod rows;
pub mod export;
pub mod engine;
pub mod host;
pub mod actions;
pub mod format;
pub mod types;
pub mod dashboard;

pub use dtype::Dtype;
pub use shape::{Shape, ShapeSpec};
pub use decode::{decode_fields, decode_trace_arrays, decode_value, to_array, Decoded, Degraded, EncodedArray, FallbackReason};
pub use series::Trace;
pub use rows::{collect_rows, Row, RowSource, RowsFn, SectorShareRows, TraceRows};
pub use export::{data_table_html, rows_to_csv, rows_to_xls, ExportError};
pub use engine::{CapturedImage, EngineError, ImageFormat, ImageRequest, OptionsEngine, PlotEngine, RenderedChart};
pub use host::{trigger_download, Blob, Download, ExportHost, HostTask, ObjectUrl, WindowRequest};
pub use actions::{dispatch, plan_export, Artifact, ExportAction, ExportOptions};
pub use format::NumberFormat;
pub use types::SessionConfig;
pub use dashboard::{decoded_traces_for, ChartDefinition, ChartPayload, Dashboard, OptionsDefinition};
