// File: crates/dashboard-core/src/decode.rs
// Summary: Encoded-array decoding (base64 + dtype + optional shape) with explicit fallback reasons.
// Notes:
// - `EncodedArray::try_decode` reports why a payload was not decoded as declared.
//   Everything else in the crate goes through the non-failing wrappers
//   (`decode`, `decode_value`, `to_array`), which always hand back a usable value.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::dtype::Dtype;
use crate::series::{Trace, ARRAY_FIELDS};
use crate::shape::{Shape, ShapeSpec};
use crate::text::number_value;

/// Standard alphabet; padding optional on decode.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Compact array representation: `{ bdata, dtype, shape? }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedArray {
    pub bdata: String,
    pub dtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeSpec>,
}

/// A decoded array: flat, or row-major rows for 2-D shapes.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
    Flat(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

/// Why a payload was not decoded exactly as declared.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FallbackReason {
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
    #[error("unknown dtype '{0}', read as unsigned bytes")]
    UnknownDtype(String),
    #[error("{extra} trailing byte(s) do not fill a '{dtype}' element")]
    TrailingBytes { dtype: String, extra: usize },
    #[error("shape {rows}x{cols} exceeds {len} decoded element(s)")]
    ShapeExceedsData { rows: usize, cols: usize, len: usize },
    #[error("{0}-dimensional shapes are not reshaped")]
    UnsupportedRank(usize),
}

/// Decoding fell back to a best-effort value.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("encoded array degraded: {reason}")]
pub struct Degraded {
    pub reason: FallbackReason,
    pub best_effort: Decoded,
}

impl Decoded {
    pub fn len(&self) -> usize {
        match self {
            Decoded::Flat(v) => v.len(),
            Decoded::Matrix(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat view in row-major order.
    pub fn flatten(&self) -> Vec<f64> {
        match self {
            Decoded::Flat(v) => v.clone(),
            Decoded::Matrix(rows) => rows.iter().flatten().copied().collect(),
        }
    }

    /// Top-level elements as JSON (numbers, or arrays of numbers for matrices).
    pub fn into_elements(self) -> Vec<Value> {
        match self {
            Decoded::Flat(v) => v.into_iter().map(number_value).collect(),
            Decoded::Matrix(rows) => rows
                .into_iter()
                .map(|r| Value::Array(r.into_iter().map(number_value).collect()))
                .collect(),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Array(self.into_elements())
    }
}

impl EncodedArray {
    pub fn new(bdata: impl Into<String>, dtype: impl Into<String>) -> Self {
        Self { bdata: bdata.into(), dtype: dtype.into(), shape: None }
    }

    pub fn with_shape(mut self, shape: ShapeSpec) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Encode `values` as `dtype` (the payload generator's side).
    pub fn encode(values: &[f64], dtype: &Dtype) -> Self {
        Self::new(BASE64.encode(dtype.write(values)), dtype.to_string())
    }

    /// Recognize an encoded array inside an arbitrary JSON value.
    /// Requires an object with non-empty string `bdata` and `dtype`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let bdata = non_empty_str(obj, "bdata")?;
        let dtype = non_empty_str(obj, "dtype")?;
        let shape = obj
            .get("shape")
            .filter(|v| is_truthy(v))
            .and_then(|v| serde_json::from_value::<ShapeSpec>(v.clone()).ok());
        Some(Self { bdata: bdata.to_string(), dtype: dtype.to_string(), shape })
    }

    pub fn dtype(&self) -> Dtype {
        Dtype::parse(&self.dtype)
    }

    /// Decode, reporting the first deviation from the declared layout.
    pub fn try_decode(&self) -> Result<Decoded, Degraded> {
        let raw: String = self.bdata.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = BASE64.decode(raw.as_bytes()).map_err(|e| Degraded {
            reason: FallbackReason::InvalidBase64(e.to_string()),
            best_effort: Decoded::Flat(Vec::new()),
        })?;

        let dtype = self.dtype();
        let flat = dtype.read(&bytes);
        let mut reason = match &dtype {
            Dtype::Unknown(tag) => Some(FallbackReason::UnknownDtype(tag.clone())),
            known if bytes.len() % known.width() != 0 => Some(FallbackReason::TrailingBytes {
                dtype: known.to_string(),
                extra: bytes.len() % known.width(),
            }),
            _ => None,
        };

        let decoded = match self.shape.as_ref().map(ShapeSpec::classify) {
            None | Some(Shape::Scalar) | Some(Shape::Vector(_)) => Decoded::Flat(flat),
            Some(Shape::Matrix { rows, cols }) => match reshape(&flat, rows, cols) {
                Some(m) => Decoded::Matrix(m),
                None => {
                    reason.get_or_insert(FallbackReason::ShapeExceedsData { rows, cols, len: flat.len() });
                    Decoded::Flat(flat)
                }
            },
            Some(shape @ Shape::Unsupported(_)) => {
                reason.get_or_insert(FallbackReason::UnsupportedRank(shape.rank()));
                Decoded::Flat(flat)
            }
        };

        match reason {
            None => Ok(decoded),
            Some(reason) => Err(Degraded { reason, best_effort: decoded }),
        }
    }

    /// Decode, never failing: degraded payloads yield their best-effort value.
    pub fn decode(&self) -> Decoded {
        self.try_decode().unwrap_or_else(|d| {
            tracing::debug!(dtype = %self.dtype, reason = %d.reason, "encoded array fallback");
            d.best_effort
        })
    }
}

/// Split `flat` into `rows` contiguous slices of `cols`; `None` when the data is short.
fn reshape(flat: &[f64], rows: usize, cols: usize) -> Option<Vec<Vec<f64>>> {
    if rows == 0 || cols == 0 {
        return None;
    }
    let needed = rows.checked_mul(cols)?;
    if needed > flat.len() {
        return None;
    }
    Some(flat[..needed].chunks_exact(cols).map(<[f64]>::to_vec).collect())
}

fn non_empty_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// JS-style truthiness: null, false, 0, NaN and "" are falsy.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Decode an encoded array.
///
/// Falsy values (`null`, `false`, `0`, `""`) yield an empty array. Other
/// values that are not encoded arrays (plain arrays, truthy scalars, objects
/// missing `bdata`/`dtype`) pass through. An undecodable base64 payload also
/// returns the original value.
pub fn decode_value(value: &Value) -> Value {
    if !is_truthy(value) {
        return Value::Array(Vec::new());
    }
    decode_element(value)
}

// Decode `value` when it is an encoded array; anything else is returned as-is.
fn decode_element(value: &Value) -> Value {
    let Some(encoded) = EncodedArray::from_value(value) else {
        return value.clone();
    };
    match encoded.try_decode() {
        Ok(decoded) => decoded.into_value(),
        Err(Degraded { reason: reason @ FallbackReason::InvalidBase64(_), .. }) => {
            tracing::debug!(%reason, "leaving encoded array as-is");
            value.clone()
        }
        Err(degraded) => {
            tracing::debug!(dtype = %encoded.dtype, reason = %degraded.reason, "encoded array fallback");
            degraded.best_effort.into_value()
        }
    }
}

/// Elements of a trace field as a sequence.
///
/// Falsy values and anything that is neither an array nor an encoded array
/// yield an empty sequence.
pub fn to_array(value: &Value) -> Vec<Value> {
    if !is_truthy(value) {
        return Vec::new();
    }
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(_) if EncodedArray::from_value(value).is_some() => match decode_element(value) {
            Value::Array(items) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Decode the named fields of `trace` in place.
///
/// A field holding an array has each encoded element decoded on its own,
/// other elements (including falsy ones such as `0`) are kept. Any other
/// field value goes through [`decode_value`] as a whole.
pub fn decode_fields(trace: &mut Trace, fields: &[&str]) {
    for field in fields {
        if let Some(slot) = trace.get_mut(*field) {
            let decoded = match &*slot {
                Value::Array(items) => Value::Array(items.iter().map(decode_element).collect()),
                other => decode_value(other),
            };
            *slot = decoded;
        }
    }
}

/// [`decode_fields`] over `x`, `y`, `z`, `text` and `customdata`.
pub fn decode_trace_arrays(trace: &mut Trace) {
    decode_fields(trace, &ARRAY_FIELDS);
}
