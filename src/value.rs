//! Dynamically-typed cell values and the coercions the engines apply to them.
//!
//! Rows are schema-less: each row maps a field name to a [`Value`]. A field that is
//! absent from a row is distinct from one that is present but `Null`, so every lookup
//! returns `Option<&Value>` and the coercions below take that option directly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of a table: field name to value, in insertion order.
pub type Row = IndexMap<String, Value>;

/// A cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Array(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Falsy in the lenient UI sense: null, false, 0, NaN and the empty string.
    pub fn is_falsy(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => *n == 0.0 || n.is_nan(),
            Value::Text(s) => s.is_empty(),
            Value::Array(_) => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Display string: integral numbers without a fractional part, arrays joined by `,`.
    pub fn display_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|v| match v {
                    Value::Null => String::new(),
                    other => other.display_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Hashable projection for distinct-value sets.
    pub fn key(&self) -> ValueKey {
        match self {
            Value::Null => ValueKey::Null,
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Number(n) => {
                let n = if *n == 0.0 { 0.0 } else { *n };
                ValueKey::Number(n.to_bits())
            }
            Value::Text(s) => ValueKey::Text(s.clone()),
            Value::Array(items) => ValueKey::Array(items.iter().map(Value::key).collect()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// `Eq + Hash` identity of a [`Value`]; `1` and `"1"` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Null,
    Bool(bool),
    Number(u64),
    Text(String),
    Array(Vec<ValueKey>),
}

/// Format a number the way the UI prints it: `3` rather than `3.0`, `1.5` as is.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == n.trunc() && n.abs() < 1e21 {
        format!("{}", n as i128)
    } else {
        format!("{}", n)
    }
}

/// Whole-value numeric coercion.
///
/// Missing -> NaN, `Null` -> 0, booleans -> 1/0, text must be a complete numeric literal
/// after trimming (empty -> 0), arrays go through their display string.
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => *n,
        Some(Value::Text(s)) => parse_numeric_literal(s),
        Some(v @ Value::Array(_)) => parse_numeric_literal(&v.display_string()),
    }
}

/// Numeric coercion of a free-text string (a condition value, for example).
pub fn parse_numeric_literal(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return f64::NAN;
        }
        return digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * radix as f64 + d as f64);
    }
    if decimal_prefix_len(s) == s.len() {
        s.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Leading-prefix numeric parse: `"12.5kg"` -> 12.5, `"abc"` -> NaN.
///
/// Non-text values are parsed from their display string, so `Null` and booleans give NaN.
pub fn parse_float_prefix(value: Option<&Value>) -> f64 {
    let text = match value {
        None | Some(Value::Null) => return f64::NAN,
        Some(Value::Number(n)) => return *n,
        Some(Value::Text(s)) => s.clone(),
        Some(other) => other.display_string(),
    };
    let s = text.trim_start();
    for (literal, n) in [
        ("Infinity", f64::INFINITY),
        ("+Infinity", f64::INFINITY),
        ("-Infinity", f64::NEG_INFINITY),
    ] {
        if s.starts_with(literal) {
            return n;
        }
    }
    let len = decimal_prefix_len(s);
    if len == 0 {
        return f64::NAN;
    }
    s[..len].parse::<f64>().unwrap_or(f64::NAN)
}

/// Prefix coercion with the chart renderer's fallback: anything non-numeric becomes 0.
pub fn numeric_or_zero(value: Option<&Value>) -> f64 {
    let n = parse_float_prefix(value);
    if n.is_nan() {
        0.0
    } else {
        n
    }
}

/// Length of the longest prefix of `s` forming a decimal literal
/// (`[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`), 0 if none.
fn decimal_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;
    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = j - i - 1;
        if int_digits > 0 || frac_digits > 0 {
            i = j;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_coercion_of_text() {
        assert_eq!(to_number(Some(&Value::from("12"))), 12.0);
        assert_eq!(to_number(Some(&Value::from("  3.5 "))), 3.5);
        assert_eq!(to_number(Some(&Value::from(""))), 0.0);
        assert_eq!(to_number(Some(&Value::from("1e3"))), 1000.0);
        assert_eq!(to_number(Some(&Value::from("0x1A"))), 26.0);
        assert_eq!(to_number(Some(&Value::from(".5"))), 0.5);
        assert!(to_number(Some(&Value::from("12px"))).is_nan());
        assert!(to_number(Some(&Value::from("abc"))).is_nan());
        assert!(to_number(Some(&Value::from("inf"))).is_nan());
        assert!(to_number(Some(&Value::from("NaN"))).is_nan());
        assert_eq!(to_number(Some(&Value::from("-Infinity"))), f64::NEG_INFINITY);
    }

    #[test]
    fn numeric_coercion_of_non_text() {
        assert!(to_number(None).is_nan());
        assert_eq!(to_number(Some(&Value::Null)), 0.0);
        assert_eq!(to_number(Some(&Value::Bool(true))), 1.0);
        assert_eq!(to_number(Some(&Value::Array(vec![]))), 0.0);
        assert_eq!(to_number(Some(&Value::Array(vec![Value::from(5.0)]))), 5.0);
        assert!(to_number(Some(&Value::Array(vec![1.0.into(), 2.0.into()]))).is_nan());
    }

    #[test]
    fn prefix_parse() {
        assert_eq!(parse_float_prefix(Some(&Value::from("12.5kg"))), 12.5);
        assert_eq!(parse_float_prefix(Some(&Value::from("  -3e2x"))), -300.0);
        assert_eq!(parse_float_prefix(Some(&Value::from("7e"))), 7.0);
        assert!(parse_float_prefix(Some(&Value::from("kg12"))).is_nan());
        assert!(parse_float_prefix(Some(&Value::Null)).is_nan());
        assert!(parse_float_prefix(Some(&Value::Bool(true))).is_nan());
        assert_eq!(numeric_or_zero(Some(&Value::from("n/a"))), 0.0);
        assert_eq!(numeric_or_zero(None), 0.0);
    }

    #[test]
    fn display_strings() {
        assert_eq!(Value::from(3.0).display_string(), "3");
        assert_eq!(Value::from(1.5).display_string(), "1.5");
        assert_eq!(Value::from(-0.25).display_string(), "-0.25");
        assert_eq!(
            Value::Array(vec![1.0.into(), Value::Null, "a".into()]).display_string(),
            "1,,a"
        );
    }

    #[test]
    fn keys_distinguish_types() {
        assert_ne!(Value::from(1.0).key(), Value::from("1").key());
        assert_eq!(Value::from(0.0).key(), Value::from(-0.0).key());
    }

    #[test]
    fn untagged_deserialization() {
        let row: Row = serde_json::from_str(r#"{"a": 1, "b": "x", "c": null, "d": [true]}"#)
            .unwrap();
        assert_eq!(row.get("a"), Some(&Value::Number(1.0)));
        assert_eq!(row.get("b"), Some(&Value::from("x")));
        assert_eq!(row.get("c"), Some(&Value::Null));
        assert_eq!(row.get("d"), Some(&Value::Array(vec![Value::Bool(true)])));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
    }
}
