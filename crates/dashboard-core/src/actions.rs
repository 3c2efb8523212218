// File: crates/dashboard-core/src/actions.rs
// Summary: Export menu actions: pure planning of data artifacts plus thin host-facing delegations.
// Notes:
// - `plan_export` is the testable core (traces + row source -> artifact).
// - `dispatch` only routes a menu action to the planner or to the engine's
//   image capture, then hands results to the host. Every failure is a quiet
//   no-op logged at debug level.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

use crate::engine::{ImageFormat, ImageRequest, RenderedChart};
use crate::export::{data_table_html, print_page_html, rows_to_csv, rows_to_xls};
use crate::host::{trigger_download, Download, ExportHost, HostTask, WindowRequest};
use crate::rows::{Row, RowSource, TraceRows};
use crate::series::Trace;
use crate::types::{SessionConfig, DEFAULT_DATA_NAME, DEFAULT_IMAGE_PREFIX};

/// Window features for the on-screen data table.
pub const TABLE_WINDOW_FEATURES: &str = "noopener,noreferrer,width=900,height=600";

pub const CSV_MIME: &str = "text/csv";
pub const XLS_MIME: &str = "application/vnd.ms-excel";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportAction {
    Fullscreen,
    Print,
    Png,
    Jpeg,
    Svg,
    Csv,
    Xls,
    Table,
}

impl ExportAction {
    pub const ALL: [ExportAction; 8] = [
        ExportAction::Fullscreen,
        ExportAction::Print,
        ExportAction::Png,
        ExportAction::Jpeg,
        ExportAction::Svg,
        ExportAction::Csv,
        ExportAction::Xls,
        ExportAction::Table,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExportAction::Fullscreen => "fullscreen",
            ExportAction::Print => "print",
            ExportAction::Png => "png",
            ExportAction::Jpeg => "jpeg",
            ExportAction::Svg => "svg",
            ExportAction::Csv => "csv",
            ExportAction::Xls => "xls",
            ExportAction::Table => "table",
        }
    }

    /// Actions built from rows rather than from an image capture.
    pub fn is_data(self) -> bool {
        matches!(self, ExportAction::Csv | ExportAction::Xls | ExportAction::Table)
    }
}

impl fmt::Display for ExportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown export action '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for ExportAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportAction::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// Per-chart export settings: file base names and an optional row override.
pub struct ExportOptions {
    pub base_name: String,
    pub data_name: String,
    pub rows: Option<Box<dyn RowSource>>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            base_name: DEFAULT_IMAGE_PREFIX.to_string(),
            data_name: DEFAULT_DATA_NAME.to_string(),
            rows: None,
        }
    }
}

impl fmt::Debug for ExportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportOptions")
            .field("base_name", &self.base_name)
            .field("data_name", &self.data_name)
            .field("custom_rows", &self.rows.is_some())
            .finish()
    }
}

impl ExportOptions {
    pub fn with_base_name(mut self, name: impl Into<String>) -> Self {
        self.base_name = name.into();
        self
    }

    pub fn with_data_name(mut self, name: impl Into<String>) -> Self {
        self.data_name = name.into();
        self
    }

    pub fn with_rows(mut self, source: impl RowSource + 'static) -> Self {
        self.rows = Some(Box::new(source));
        self
    }

    /// Rows from the override, or the default zip-by-index rows.
    pub fn rows_for(&self, traces: &[Trace]) -> Vec<Row> {
        match &self.rows {
            Some(source) => source.rows(traces),
            None => TraceRows.rows(traces),
        }
    }
}

/// What a data action produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Artifact {
    Download(Download),
    Window(WindowRequest),
}

/// Build the artifact for a data action from the chart's current traces.
///
/// `None` for image actions and whenever the row source yields no rows.
pub fn plan_export(action: ExportAction, traces: &[Trace], options: &ExportOptions) -> Option<Artifact> {
    if !action.is_data() {
        return None;
    }
    let rows = options.rows_for(traces);
    if rows.is_empty() {
        return None;
    }
    match action {
        ExportAction::Csv => match rows_to_csv(&rows) {
            Ok(csv) => Some(Artifact::Download(Download::new(csv, CSV_MIME, format!("{}.csv", options.data_name)))),
            Err(e) => {
                tracing::debug!(error = %e, "csv export skipped");
                None
            }
        },
        ExportAction::Xls => Some(Artifact::Download(Download::new(
            rows_to_xls(&rows),
            XLS_MIME,
            format!("{}.xls", options.data_name),
        ))),
        ExportAction::Table => Some(Artifact::Window(WindowRequest {
            features: TABLE_WINDOW_FEATURES.to_string(),
            html: data_table_html(&rows),
        })),
        _ => None,
    }
}

/// Run a menu action against a rendered chart.
pub fn dispatch(
    action: ExportAction,
    chart: &dyn RenderedChart,
    host: &mut dyn ExportHost,
    options: &ExportOptions,
    config: &SessionConfig,
) {
    tracing::debug!(target_id = chart.target_id(), %action, "export action");
    match action {
        ExportAction::Fullscreen => open_fullscreen(chart, host, config),
        ExportAction::Print => print_chart(chart, host, config),
        ExportAction::Png => download_image(chart, host, config, ImageFormat::Png, Some(options.base_name.as_str())),
        ExportAction::Jpeg => download_image(chart, host, config, ImageFormat::Jpeg, Some(options.base_name.as_str())),
        ExportAction::Svg => download_svg(chart, host, config, Some(options.base_name.as_str())),
        ExportAction::Csv | ExportAction::Xls | ExportAction::Table => {
            match plan_export(action, chart.traces(), options) {
                Some(artifact) => apply(host, artifact, config),
                None => tracing::debug!(%action, "nothing to export"),
            }
        }
    }
}

/// Hand an artifact to the host.
pub fn apply(host: &mut dyn ExportHost, artifact: Artifact, config: &SessionConfig) {
    match artifact {
        Artifact::Download(download) => trigger_download(host, download, config.revoke_delay()),
        Artifact::Window(request) => {
            if !host.open_window(request) {
                tracing::debug!("window blocked; table not shown");
            }
        }
    }
}

/// `grafico_<unix millis>`.
pub fn default_image_name() -> String {
    format!("{}_{}", DEFAULT_IMAGE_PREFIX, chrono::Utc::now().timestamp_millis())
}

fn capture_request(format: ImageFormat, config: &SessionConfig) -> ImageRequest {
    ImageRequest { format, width: config.image_width, height: config.image_height }
}

/// Capture the chart as PNG or JPEG and download it as `<filename>.<ext>`.
pub fn download_image(
    chart: &dyn RenderedChart,
    host: &mut dyn ExportHost,
    config: &SessionConfig,
    format: ImageFormat,
    filename: Option<&str>,
) {
    let name = filename.map(str::to_string).unwrap_or_else(default_image_name);
    match chart.to_image(&capture_request(format, config)) {
        Ok(image) => {
            let file = format!("{}.{}", name, format.extension());
            trigger_download(host, Download::new(image.bytes, format.mime(), file), config.revoke_delay());
        }
        Err(e) => tracing::debug!(target_id = chart.target_id(), error = %e, "image capture failed"),
    }
}

/// Capture the chart as SVG and download it as `<filename>.svg`.
pub fn download_svg(
    chart: &dyn RenderedChart,
    host: &mut dyn ExportHost,
    config: &SessionConfig,
    filename: Option<&str>,
) {
    download_image(chart, host, config, ImageFormat::Svg, filename)
}

/// Open a print-ready window holding a PNG capture of the chart.
pub fn print_chart(chart: &dyn RenderedChart, host: &mut dyn ExportHost, config: &SessionConfig) {
    let image = match chart.to_image(&capture_request(ImageFormat::Png, config)) {
        Ok(image) => image,
        Err(e) => {
            tracing::debug!(target_id = chart.target_id(), error = %e, "print capture failed");
            return;
        }
    };
    let data_url = format!("data:{};base64,{}", image.format.mime(), STANDARD.encode(&image.bytes));
    let opened = host.open_window(WindowRequest { features: String::new(), html: print_page_html(&data_url) });
    if !opened {
        tracing::debug!("print window blocked");
    }
}

/// Ask the host for fullscreen, then resize the chart once it has settled.
pub fn open_fullscreen(chart: &dyn RenderedChart, host: &mut dyn ExportHost, config: &SessionConfig) {
    if host.request_fullscreen(chart.target_id()) {
        host.schedule(config.resize_delay(), HostTask::ResizeChart(chart.target_id().to_string()));
    } else {
        tracing::debug!(target_id = chart.target_id(), "fullscreen denied");
    }
}
