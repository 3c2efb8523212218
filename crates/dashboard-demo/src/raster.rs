// File: crates/dashboard-demo/src/raster.rs
// Summary: Headless chart engine: line/point rendering into PNG/JPEG via `image`, SVG as plain markup.

use std::io::Cursor;

use dashboard_core::engine::with_lang;
use dashboard_core::series::trace_from;
use dashboard_core::{
    to_array, CapturedImage, EngineError, ImageFormat, ImageRequest, NumberFormat, OptionsEngine, PlotEngine,
    RenderedChart, Trace,
};
use image::{Rgb, RgbImage};
use serde_json::Value;

const MARGIN: f64 = 48.0;
const PALETTE: [[u8; 3]; 6] = [
    [31, 119, 180],
    [214, 39, 40],
    [44, 160, 44],
    [255, 127, 14],
    [148, 103, 189],
    [23, 190, 207],
];

/// Draws every chart it is given; the target id only has to be non-empty.
#[derive(Default)]
pub struct RasterEngine {
    pub drawn: usize,
}

impl PlotEngine for RasterEngine {
    fn draw(
        &mut self,
        target_id: &str,
        traces: Vec<Trace>,
        layout: &Value,
        _config: &Value,
        format: &NumberFormat,
    ) -> Result<Box<dyn RenderedChart>, EngineError> {
        if target_id.is_empty() {
            return Err(EngineError::MissingTarget(String::new()));
        }
        self.drawn += 1;
        Ok(Box::new(RasterChart {
            target_id: target_id.to_string(),
            title: title_of(layout),
            traces,
            format: format.clone(),
        }))
    }
}

impl OptionsEngine for RasterEngine {
    fn chart(
        &mut self,
        target_id: &str,
        options: &Value,
        format: &NumberFormat,
    ) -> Result<Box<dyn RenderedChart>, EngineError> {
        if target_id.is_empty() {
            return Err(EngineError::MissingTarget(String::new()));
        }
        let options = with_lang(options, format);
        tracing::debug!(%target_id, lang = %options["lang"], "options chart");
        self.drawn += 1;
        Ok(Box::new(RasterChart {
            target_id: target_id.to_string(),
            title: title_of(&options),
            traces: series_traces(&options),
            format: format.clone(),
        }))
    }
}

fn title_of(layout: &Value) -> String {
    match layout.get("title") {
        Some(Value::String(s)) => s.clone(),
        Some(t) => t.get("text").and_then(Value::as_str).unwrap_or_default().to_string(),
        None => String::new(),
    }
}

/// Options-style `series[].data` as x/y traces. Bare values take their
/// category (or index) as x; `[x, y]` pairs and `{x, y}` points are split.
pub fn series_traces(options: &Value) -> Vec<Trace> {
    let Some(series) = options.get("series").and_then(Value::as_array) else {
        return Vec::new();
    };
    let categories = options.pointer("/xAxis/categories").and_then(Value::as_array);
    series
        .iter()
        .map(|s| {
            let data = s.get("data").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();
            let mut xs = Vec::with_capacity(data.len());
            let mut ys = Vec::with_capacity(data.len());
            for (i, point) in data.iter().enumerate() {
                let index = || categories.and_then(|c| c.get(i)).cloned().unwrap_or_else(|| Value::from(i));
                match point {
                    Value::Array(pair) if pair.len() >= 2 => {
                        xs.push(pair[0].clone());
                        ys.push(pair[1].clone());
                    }
                    Value::Object(p) => {
                        xs.push(p.get("x").cloned().unwrap_or_else(index));
                        ys.push(p.get("y").cloned().unwrap_or(Value::Null));
                    }
                    other => {
                        xs.push(index());
                        ys.push(other.clone());
                    }
                }
            }
            let name = s.get("name").cloned().map(|n| ("name", n));
            trace_from(name.into_iter().chain([("x", Value::Array(xs)), ("y", Value::Array(ys))]))
        })
        .collect()
}

pub struct RasterChart {
    target_id: String,
    title: String,
    traces: Vec<Trace>,
    format: NumberFormat,
}

impl RenderedChart for RasterChart {
    fn target_id(&self) -> &str {
        &self.target_id
    }

    fn traces(&self) -> &[Trace] {
        &self.traces
    }

    fn to_image(&self, request: &ImageRequest) -> Result<CapturedImage, EngineError> {
        if request.width == 0 || request.height == 0 {
            return Err(EngineError::Capture(format!("empty canvas {}x{}", request.width, request.height)));
        }
        let series: Vec<Vec<(f64, f64)>> = self.traces.iter().map(points).collect();
        let frame = Frame::fit(&series, request.width, request.height);
        let bytes = match request.format {
            ImageFormat::Svg => self.svg(&series, &frame).into_bytes(),
            ImageFormat::Png => encode(raster(&series, &frame), image::ImageFormat::Png)?,
            ImageFormat::Jpeg => encode(raster(&series, &frame), image::ImageFormat::Jpeg)?,
        };
        Ok(CapturedImage { format: request.format, bytes })
    }
}

impl RasterChart {
    fn svg(&self, series: &[Vec<(f64, f64)>], frame: &Frame) -> String {
        let (w, h) = (frame.width, frame.height);
        let mut out = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\
             <rect width=\"100%\" height=\"100%\" fill=\"white\"/>"
        );
        if !self.title.is_empty() {
            out.push_str(&format!(
                "<text x=\"{}\" y=\"24\" text-anchor=\"middle\" font-family=\"sans-serif\">{}</text>",
                w / 2,
                dashboard_core::text::escape_html(&self.title)
            ));
        }
        for (i, pts) in series.iter().enumerate() {
            let [r, g, b] = PALETTE[i % PALETTE.len()];
            let coords: Vec<String> = pts
                .iter()
                .map(|&p| {
                    let (x, y) = frame.project(p);
                    format!("{x:.1},{y:.1}")
                })
                .collect();
            out.push_str(&format!(
                "<polyline fill=\"none\" stroke=\"rgb({r},{g},{b})\" stroke-width=\"2\" points=\"{}\"/>",
                coords.join(" ")
            ));
        }
        // y-axis extent labels in the session's number format
        out.push_str(&format!(
            "<text x=\"4\" y=\"{:.0}\" font-size=\"11\">{}</text><text x=\"4\" y=\"{:.0}\" font-size=\"11\">{}</text>",
            MARGIN,
            self.format.format(frame.max_y, 1),
            f64::from(h) - MARGIN,
            self.format.format(frame.min_y, 1),
        ));
        out.push_str("</svg>");
        out
    }
}

fn number(v: &Value) -> Option<f64> {
    v.as_f64().or_else(|| v.as_str()?.trim().parse().ok())
}

/// Plottable points of a trace. When `y` holds labels (horizontal bars) the
/// values come from `x` against their index.
fn points(trace: &Trace) -> Vec<(f64, f64)> {
    let xs = trace.get("x").map(to_array).unwrap_or_default();
    let ys = trace.get("y").map(to_array).unwrap_or_default();
    let numeric_y = ys.iter().any(Value::is_number);
    let values = if numeric_y { &ys } else { &xs };
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| {
            let y = number(v)?;
            let x = if numeric_y { xs.get(i).and_then(number).unwrap_or(i as f64) } else { i as f64 };
            Some((x, y))
        })
        .collect()
}

struct Frame {
    width: u32,
    height: u32,
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Frame {
    fn fit(series: &[Vec<(f64, f64)>], width: u32, height: u32) -> Self {
        let mut f = Frame {
            width,
            height,
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for &(x, y) in series.iter().flatten() {
            f.min_x = f.min_x.min(x);
            f.max_x = f.max_x.max(x);
            f.min_y = f.min_y.min(y);
            f.max_y = f.max_y.max(y);
        }
        if !f.min_x.is_finite() {
            (f.min_x, f.max_x, f.min_y, f.max_y) = (0.0, 1.0, 0.0, 1.0);
        }
        if f.max_x - f.min_x == 0.0 {
            f.max_x += 1.0;
        }
        if f.max_y - f.min_y == 0.0 {
            f.max_y += 1.0;
        }
        f
    }

    fn project(&self, (x, y): (f64, f64)) -> (f64, f64) {
        let w = (f64::from(self.width) - 2.0 * MARGIN).max(1.0);
        let h = (f64::from(self.height) - 2.0 * MARGIN).max(1.0);
        let px = MARGIN + (x - self.min_x) / (self.max_x - self.min_x) * w;
        let py = MARGIN + (1.0 - (y - self.min_y) / (self.max_y - self.min_y)) * h;
        (px, py)
    }
}

fn raster(series: &[Vec<(f64, f64)>], frame: &Frame) -> RgbImage {
    let mut img = RgbImage::from_pixel(frame.width, frame.height, Rgb([255, 255, 255]));
    let axis = Rgb([160, 160, 160]);
    let bottom = f64::from(frame.height) - MARGIN;
    line(&mut img, (MARGIN, MARGIN), (MARGIN, bottom), axis);
    line(&mut img, (MARGIN, bottom), (f64::from(frame.width) - MARGIN, bottom), axis);

    for (i, pts) in series.iter().enumerate() {
        let color = Rgb(PALETTE[i % PALETTE.len()]);
        let projected: Vec<(f64, f64)> = pts.iter().map(|&p| frame.project(p)).collect();
        for pair in projected.windows(2) {
            line(&mut img, pair[0], pair[1], color);
        }
        for &(x, y) in &projected {
            for dx in -2..=2 {
                for dy in -2..=2 {
                    put(&mut img, x as i64 + dx, y as i64 + dy, color);
                }
            }
        }
    }
    img
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u64) < u64::from(img.width()) && (y as u64) < u64::from(img.height()) {
        img.put_pixel(x as u32, y as u32, color);
    }
}

// Bresenham
fn line(img: &mut RgbImage, from: (f64, f64), to: (f64, f64), color: Rgb<u8>) {
    let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
    let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put(img, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn encode(img: RgbImage, format: image::ImageFormat) -> Result<Vec<u8>, EngineError> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).map_err(|e| EngineError::Capture(e.to_string()))?;
    Ok(out.into_inner())
}
