// File: crates/dashboard-core/src/engine.rs
// Summary: Contracts of the external chart engines (trace-based and options-based) and their rendered handles.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::format::NumberFormat;
use crate::series::Trace;
use crate::types::{IMAGE_HEIGHT, IMAGE_WIDTH};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("render target '{0}' not found")]
    MissingTarget(String),
    #[error("draw failed: {0}")]
    Draw(String),
    #[error("image capture failed: {0}")]
    Capture(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Svg => "svg",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Svg => "image/svg+xml",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageRequest {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ImageRequest {
    pub fn new(format: ImageFormat) -> Self {
        Self { format, width: IMAGE_WIDTH, height: IMAGE_HEIGHT }
    }
}

/// Encoded image produced by an engine capture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedImage {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

/// A chart as drawn by an engine.
pub trait RenderedChart {
    fn target_id(&self) -> &str;
    /// Series as currently held by the engine.
    fn traces(&self) -> &[Trace];
    /// Rasterize (or serialize, for SVG) the current chart state.
    fn to_image(&self, request: &ImageRequest) -> Result<CapturedImage, EngineError>;
}

/// Trace-based engine: `draw(target, traces, layout, config)`.
pub trait PlotEngine {
    fn draw(
        &mut self,
        target_id: &str,
        traces: Vec<Trace>,
        layout: &Value,
        config: &Value,
        format: &NumberFormat,
    ) -> Result<Box<dyn RenderedChart>, EngineError>;
}

/// Options-based engine: `chart(target, options)`.
pub trait OptionsEngine {
    fn chart(
        &mut self,
        target_id: &str,
        options: &Value,
        format: &NumberFormat,
    ) -> Result<Box<dyn RenderedChart>, EngineError>;
}

/// Copy of `options` with `format` merged into its `lang` block.
/// Keys already present in `lang` win.
pub fn with_lang(options: &Value, format: &NumberFormat) -> Value {
    let mut out = match options {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    let mut lang = match format.lang_options() {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    if let Some(Value::Object(own)) = out.get("lang") {
        for (k, v) in own {
            lang.insert(k.clone(), v.clone());
        }
    }
    out.insert("lang".into(), Value::Object(lang));
    Value::Object(out)
}
