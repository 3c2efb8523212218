// File: crates/dashboard-core/src/format.rs
// Summary: Number/locale formatting shared by every chart in a session, with named presets.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

/// Numeric formatting handed to the chart engines on each render call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberFormat {
    pub name: String,
    pub thousands_sep: String,
    pub decimal_point: String,
    /// Magnitude suffixes (k, M, ...). `None` prints full numbers.
    pub numeric_symbols: Option<Vec<String>>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::es()
    }
}

impl NumberFormat {
    /// Spanish grouping: `1.234.567,8`, no magnitude suffixes.
    pub fn es() -> Self {
        Self {
            name: "es".into(),
            thousands_sep: ".".into(),
            decimal_point: ",".into(),
            numeric_symbols: None,
        }
    }

    pub fn en() -> Self {
        Self {
            name: "en".into(),
            thousands_sep: ",".into(),
            decimal_point: ".".into(),
            numeric_symbols: Some(["k", "M", "G", "T", "P", "E"].map(String::from).to_vec()),
        }
    }

    /// `lang` block for Highcharts-style engines.
    pub fn lang_options(&self) -> Value {
        json!({
            "thousandsSep": self.thousands_sep,
            "decimalPoint": self.decimal_point,
            "numericSymbols": self.numeric_symbols,
        })
    }

    /// Format `value` with `decimals` fraction digits and grouped thousands.
    pub fn format(&self, value: f64, decimals: usize) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let fixed = format!("{:.*}", decimals, value.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };

        let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push_str(&self.thousands_sep);
            }
            grouped.push(ch);
        }
        if let Some(frac) = frac_part {
            grouped.push_str(&self.decimal_point);
            grouped.push_str(frac);
        }
        let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
        if value.is_sign_negative() && !is_zero {
            grouped.insert(0, '-');
        }
        grouped
    }
}

/// Built-in presets.
pub fn presets() -> Vec<NumberFormat> {
    vec![NumberFormat::es(), NumberFormat::en()]
}

/// Find a preset by `name`, falling back to the Spanish default.
pub fn find(name: &str) -> NumberFormat {
    presets()
        .into_iter()
        .find(|f| f.name.eq_ignore_ascii_case(name))
        .unwrap_or_default()
}

/// A format as written in payloads and config files: a preset name
/// (`"es"`, `"en"`) or the full object.
#[derive(Deserialize)]
#[serde(untagged)]
enum FormatRepr {
    Preset(String),
    Inline(NumberFormat),
}

impl From<FormatRepr> for NumberFormat {
    fn from(repr: FormatRepr) -> Self {
        match repr {
            FormatRepr::Preset(name) => find(&name),
            FormatRepr::Inline(format) => format,
        }
    }
}

/// `deserialize_with` helper accepting a preset name or an inline format.
pub fn preset_or_inline<'de, D: Deserializer<'de>>(d: D) -> Result<NumberFormat, D::Error> {
    FormatRepr::deserialize(d).map(Into::into)
}

/// [`preset_or_inline`] for optional fields.
pub fn optional_preset_or_inline<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NumberFormat>, D::Error> {
    Option::<FormatRepr>::deserialize(d).map(|r| r.map(Into::into))
}
