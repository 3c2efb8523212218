// File: crates/dashboard-core/tests/support/mod.rs
// Purpose: Recording host and in-memory engine shared by the integration tests.

#![allow(dead_code)]

use std::time::Duration;

use dashboard_core::engine::with_lang;
use dashboard_core::{
    Blob, CapturedImage, EngineError, ExportHost, HostTask, ImageFormat, ImageRequest, NumberFormat, ObjectUrl,
    OptionsEngine, PlotEngine, RenderedChart, Trace, WindowRequest,
};
use serde_json::Value;

#[derive(Default)]
pub struct RecordingHost {
    pub blobs: Vec<(ObjectUrl, Blob)>,
    pub clicks: Vec<(ObjectUrl, String)>,
    pub scheduled: Vec<(Duration, HostTask)>,
    pub windows: Vec<WindowRequest>,
    pub fullscreen: Vec<String>,
    pub block_windows: bool,
    pub deny_fullscreen: bool,
}

impl RecordingHost {
    /// (filename, mime, content) of every clicked download.
    pub fn downloads(&self) -> Vec<(String, String, Vec<u8>)> {
        self.clicks
            .iter()
            .filter_map(|(url, name)| {
                let blob = self.blobs.iter().find(|(u, _)| u == url).map(|(_, b)| b)?;
                Some((name.clone(), blob.mime.clone(), blob.content.clone()))
            })
            .collect()
    }
}

impl ExportHost for RecordingHost {
    fn create_object_url(&mut self, blob: Blob) -> ObjectUrl {
        let url = ObjectUrl(format!("blob:test/{}", self.blobs.len()));
        self.blobs.push((url.clone(), blob));
        url
    }

    fn click_download(&mut self, url: &ObjectUrl, filename: &str) {
        self.clicks.push((url.clone(), filename.to_string()));
    }

    fn schedule(&mut self, delay: Duration, task: HostTask) {
        self.scheduled.push((delay, task));
    }

    fn open_window(&mut self, request: WindowRequest) -> bool {
        if self.block_windows {
            return false;
        }
        self.windows.push(request);
        true
    }

    fn request_fullscreen(&mut self, target_id: &str) -> bool {
        if self.deny_fullscreen {
            return false;
        }
        self.fullscreen.push(target_id.to_string());
        true
    }
}

/// Chart that remembers what it was drawn with; captures return tagged bytes.
pub struct MemoryChart {
    pub target_id: String,
    pub traces: Vec<Trace>,
    pub options: Value,
    pub format: NumberFormat,
    pub fail_capture: bool,
}

impl MemoryChart {
    pub fn new(target_id: &str, traces: Vec<Trace>) -> Self {
        Self {
            target_id: target_id.to_string(),
            traces,
            options: Value::Null,
            format: NumberFormat::default(),
            fail_capture: false,
        }
    }
}

impl RenderedChart for MemoryChart {
    fn target_id(&self) -> &str {
        &self.target_id
    }

    fn traces(&self) -> &[Trace] {
        &self.traces
    }

    fn to_image(&self, request: &ImageRequest) -> Result<CapturedImage, EngineError> {
        if self.fail_capture {
            return Err(EngineError::Capture("offscreen".into()));
        }
        let bytes = match request.format {
            ImageFormat::Svg => format!("<svg width=\"{}\" height=\"{}\"/>", request.width, request.height).into_bytes(),
            other => format!("{}:{}x{}", other.extension(), request.width, request.height).into_bytes(),
        };
        Ok(CapturedImage { format: request.format, bytes })
    }
}

/// Engine keeping a log of every draw; targets listed in `reject` fail.
#[derive(Default)]
pub struct MemoryEngine {
    pub drawn: Vec<(String, Vec<Trace>, NumberFormat)>,
    pub options: Vec<(String, Value)>,
    pub reject: Vec<String>,
}

impl PlotEngine for MemoryEngine {
    fn draw(
        &mut self,
        target_id: &str,
        traces: Vec<Trace>,
        _layout: &Value,
        _config: &Value,
        format: &NumberFormat,
    ) -> Result<Box<dyn RenderedChart>, EngineError> {
        if self.reject.iter().any(|r| r == target_id) {
            return Err(EngineError::MissingTarget(target_id.to_string()));
        }
        self.drawn.push((target_id.to_string(), traces.clone(), format.clone()));
        let mut chart = MemoryChart::new(target_id, traces);
        chart.format = format.clone();
        Ok(Box::new(chart))
    }
}

impl OptionsEngine for MemoryEngine {
    fn chart(
        &mut self,
        target_id: &str,
        options: &Value,
        format: &NumberFormat,
    ) -> Result<Box<dyn RenderedChart>, EngineError> {
        if self.reject.iter().any(|r| r == target_id) {
            return Err(EngineError::MissingTarget(target_id.to_string()));
        }
        let merged = with_lang(options, format);
        self.options.push((target_id.to_string(), merged.clone()));
        let mut chart = MemoryChart::new(target_id, Vec::new());
        chart.options = merged;
        chart.format = format.clone();
        Ok(Box::new(chart))
    }
}

pub fn trace(value: Value) -> Trace {
    match value {
        Value::Object(map) => map,
        other => panic!("trace must be a JSON object, got {other}"),
    }
}
