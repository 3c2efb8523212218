// File: crates/dashboard-core/src/shape.rs
// Summary: Shape classification for encoded arrays ("6, 2" strings or numeric lists).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shape as it appears in the payload: either a free-form text like `"6, 2"`
/// or a sequence of numbers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShapeSpec {
    Text(String),
    Dims(Vec<Value>),
    /// A bare number or anything else the generator might emit.
    Other(Value),
}

impl ShapeSpec {
    /// Positive integer dimensions, invalid entries discarded.
    pub fn dims(&self) -> Vec<usize> {
        match self {
            // split on any run of non-digits
            ShapeSpec::Text(s) => s
                .split(|c: char| !c.is_ascii_digit())
                .filter(|part| !part.is_empty())
                .filter_map(|part| part.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .collect(),
            ShapeSpec::Dims(items) => items.iter().filter_map(positive_dim).collect(),
            ShapeSpec::Other(v) => positive_dim(v).into_iter().collect(),
        }
    }

    pub fn classify(&self) -> Shape {
        Shape::from_dims(self.dims())
    }
}

fn positive_dim(v: &Value) -> Option<usize> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if n.is_finite() && n > 0.0 && n.fract() == 0.0 && n <= usize::MAX as f64 {
        Some(n as usize)
    } else {
        None
    }
}

/// Dimensional class of a parsed shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    /// A shape was given but no usable dimension survived parsing.
    Scalar,
    Vector(usize),
    Matrix { rows: usize, cols: usize },
    /// Three or more dimensions; never reshaped.
    Unsupported(Vec<usize>),
}

impl Shape {
    pub fn from_dims(dims: Vec<usize>) -> Self {
        match dims.as_slice() {
            [] => Shape::Scalar,
            [n] => Shape::Vector(*n),
            [rows, cols] => Shape::Matrix { rows: *rows, cols: *cols },
            _ => Shape::Unsupported(dims),
        }
    }

    pub fn rank(&self) -> usize {
        match self {
            Shape::Scalar => 0,
            Shape::Vector(_) => 1,
            Shape::Matrix { .. } => 2,
            Shape::Unsupported(d) => d.len(),
        }
    }
}
