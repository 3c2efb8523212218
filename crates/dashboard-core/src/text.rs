// File: crates/dashboard-core/src/text.rs
// Summary: Cell stringification matching the dashboard's number printing, plus HTML helpers.

use serde_json::{Map, Number, Value};

/// Largest magnitude printed as a plain integer (below 2^53 every whole f64 is exact).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_991.0;

/// JSON number for a decoded element. Whole values become JSON integers so
/// that `10.0` prints as `10`; non-finite values become `null`.
pub fn number_value(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() <= MAX_EXACT_INT {
        // -0.0 prints as 0
        return Value::from(v as i64);
    }
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

/// Print a JSON number without a trailing `.0` on whole values.
pub fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INT => (f as i64).to_string(),
        _ => n.to_string(),
    }
}

/// Text shown in a table cell or CSV field.
///
/// Strings verbatim, null empty, arrays joined with commas (nested arrays
/// flatten), objects as compact JSON.
pub fn cell_text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => json_text(v),
    }
}

/// Compact JSON text with whole numbers printed as integers.
pub fn json_text(v: &Value) -> String {
    normalize_numbers(v).to_string()
}

fn normalize_numbers(v: &Value) -> Value {
    match v {
        Value::Number(n) => match n.as_f64() {
            Some(f) if !n.is_i64() && !n.is_u64() => number_value(f),
            _ => v.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), normalize_numbers(v)))
                .collect::<Map<String, Value>>(),
        ),
        _ => v.clone(),
    }
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Replace `<br>`, `<br/>` and `<br />` (any case) with a space and trim.
pub fn clean_html_breaks(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match match_br(tail) {
            Some(len) => {
                out.push(' ');
                rest = &tail[len..];
            }
            None => {
                out.push('<');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

// Length of a `<br\s*/?\s*>` tag at the start of `s`.
fn match_br(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.len() < 4 || !bytes[1..3].eq_ignore_ascii_case(b"br") {
        return None;
    }
    let mut i = 3;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() { i += 1; }
    if i < bytes.len() && bytes[i] == b'/' { i += 1; }
    while i < bytes.len() && bytes[i].is_ascii_whitespace() { i += 1; }
    (i < bytes.len() && bytes[i] == b'>').then_some(i + 1)
}
