//! Scalar coercions applied at the gateway boundary.

use std::fmt;

use platform_backend::RecordId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// A numeric input that may arrive as text (form fields, CLI JSON).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// Leading-float parse; anything unparseable or non-finite becomes 0.
    pub fn to_number(&self) -> f64 {
        let value = match self {
            Amount::Number(n) => *n,
            Amount::Text(text) => parse_leading_float(text).unwrap_or(0.0),
        };
        if value.is_finite() { value } else { 0.0 }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Number(value)
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

/// Numeric prefix of `text` after leading whitespace: `"42.5k"` is 42.5.
fn parse_leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    text[..end].parse().ok()
}

/// Opaque reference to a record in another table (`employeeId`,
/// `managerId`, `approvedBy`). Passed through in whatever shape it came.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalRef {
    Number(Number),
    Text(String),
    Other(Value),
}

impl fmt::Display for ExternalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalRef::Number(n) => n.fmt(f),
            ExternalRef::Text(text) => f.write_str(text),
            ExternalRef::Other(value) => value.fmt(f),
        }
    }
}

impl From<i64> for ExternalRef {
    fn from(value: i64) -> Self {
        ExternalRef::Number(value.into())
    }
}

impl From<RecordId> for ExternalRef {
    fn from(value: RecordId) -> Self {
        ExternalRef::Number(value.get().into())
    }
}

impl From<&str> for ExternalRef {
    fn from(value: &str) -> Self {
        ExternalRef::Text(value.to_string())
    }
}

impl From<String> for ExternalRef {
    fn from(value: String) -> Self {
        ExternalRef::Text(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LooseNumber {
    fn as_f64(&self) -> Option<f64> {
        match self {
            LooseNumber::Int(n) => Some(*n as f64),
            LooseNumber::Float(n) => Some(*n),
            LooseNumber::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Reads a number that the backend may deliver as a numeric string.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(LooseNumber::as_f64))
}

pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(|number| match number {
        LooseNumber::Int(n) => Some(n),
        other => other.as_f64().map(|f| f.trunc() as i64),
    }))
}

/// `None` for absent or empty text; whitespace counts as content.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}
