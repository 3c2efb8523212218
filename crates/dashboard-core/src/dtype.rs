// File: crates/dashboard-core/src/dtype.rs
// Summary: Typed-array element tags (f8, i4, u1, ...) and little-endian byte reinterpretation.

use std::fmt;

/// Element type of an encoded array.
///
/// Every tag the payload generator emits has its own variant; anything else is
/// kept as `Unknown` and read as raw unsigned bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dtype {
    F8,
    F4,
    I4,
    I2,
    I1,
    U4,
    U2,
    U1,
    Unknown(String),
}

impl Dtype {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "f8" => Dtype::F8,
            "f4" => Dtype::F4,
            "i4" => Dtype::I4,
            "i2" => Dtype::I2,
            "i1" => Dtype::I1,
            "u4" => Dtype::U4,
            "u2" => Dtype::U2,
            "u1" => Dtype::U1,
            other => Dtype::Unknown(other.to_string()),
        }
    }

    /// Element width in bytes. Unknown tags read one byte per element.
    pub fn width(&self) -> usize {
        match self {
            Dtype::F8 => 8,
            Dtype::F4 | Dtype::I4 | Dtype::U4 => 4,
            Dtype::I2 | Dtype::U2 => 2,
            Dtype::I1 | Dtype::U1 | Dtype::Unknown(_) => 1,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Dtype::Unknown(_))
    }

    /// Reinterpret `bytes` as a sequence of elements (little-endian).
    /// Trailing bytes that do not fill a whole element are ignored.
    pub fn read(&self, bytes: &[u8]) -> Vec<f64> {
        let chunks = bytes.chunks_exact(self.width());
        match self {
            Dtype::F8 => chunks.map(|c| f64::from_le_bytes(arr(c))).collect(),
            Dtype::F4 => chunks.map(|c| f32::from_le_bytes(arr(c)) as f64).collect(),
            Dtype::I4 => chunks.map(|c| i32::from_le_bytes(arr(c)) as f64).collect(),
            Dtype::I2 => chunks.map(|c| i16::from_le_bytes(arr(c)) as f64).collect(),
            Dtype::I1 => chunks.map(|c| c[0] as i8 as f64).collect(),
            Dtype::U4 => chunks.map(|c| u32::from_le_bytes(arr(c)) as f64).collect(),
            Dtype::U2 => chunks.map(|c| u16::from_le_bytes(arr(c)) as f64).collect(),
            Dtype::U1 | Dtype::Unknown(_) => chunks.map(|c| c[0] as f64).collect(),
        }
    }

    /// Inverse of [`Dtype::read`], used by payload generators and tests.
    pub fn write(&self, values: &[f64]) -> Vec<u8> {
        let mut out = Vec::with_capacity(values.len() * self.width());
        for &v in values {
            match self {
                Dtype::F8 => out.extend_from_slice(&v.to_le_bytes()),
                Dtype::F4 => out.extend_from_slice(&(v as f32).to_le_bytes()),
                Dtype::I4 => out.extend_from_slice(&(v as i32).to_le_bytes()),
                Dtype::I2 => out.extend_from_slice(&(v as i16).to_le_bytes()),
                Dtype::I1 => out.push(v as i8 as u8),
                Dtype::U4 => out.extend_from_slice(&(v as u32).to_le_bytes()),
                Dtype::U2 => out.extend_from_slice(&(v as u16).to_le_bytes()),
                Dtype::U1 | Dtype::Unknown(_) => out.push(v as u8),
            }
        }
        out
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Dtype::F8 => "f8",
            Dtype::F4 => "f4",
            Dtype::I4 => "i4",
            Dtype::I2 => "i2",
            Dtype::I1 => "i1",
            Dtype::U4 => "u4",
            Dtype::U2 => "u2",
            Dtype::U1 => "u1",
            Dtype::Unknown(tag) => tag.as_str(),
        };
        f.write_str(tag)
    }
}

// chunks_exact guarantees the slice length matches N.
fn arr<const N: usize>(c: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(c);
    out
}
