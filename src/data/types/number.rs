use super::ValueType;
use crate::data::value::CellValue;
use std::cmp::Ordering;
use std::fmt;

/// Numeric columns, stored as 64-bit floats.
///
/// The type carries no parameters, so every `NumberType` equals every other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberType;

const NAN_LITERAL: &str = "NaN";
const INFINITY_LITERAL: &str = "Infinity";

/// Parses decimal text. Non-finite values are only accepted as the exact
/// `NaN` / `Infinity` literals or as overflowing decimals, so words such as
/// `nan` or `inf` stay text.
fn parse_number(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    let value = text.parse::<f64>().ok()?;
    if value.is_finite() {
        return Some(value);
    }
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let literal = unsigned == NAN_LITERAL || unsigned == INFINITY_LITERAL;
    let overflow = !unsigned.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E');
    (literal || overflow).then_some(value)
}

impl NumberType {
    pub fn check_and_get_type(value: &str) -> Option<Self> {
        parse_number(value).map(|_| NumberType)
    }
}

impl ValueType for NumberType {
    type Value = f64;

    fn parse(&self, text: &str) -> Option<f64> {
        parse_number(text)
    }

    fn format(&self, value: &f64) -> String {
        if value.is_nan() {
            return NAN_LITERAL.to_string();
        }
        if value.is_infinite() {
            let sign = if value.is_sign_negative() { "-" } else { "" };
            return format!("{}{}", sign, INFINITY_LITERAL);
        }
        // integral values print without a fractional part
        if value.fract() == 0.0
            && *value >= i64::MIN as f64
            && *value < i64::MAX as f64
        {
            format!("{}", *value as i64)
        } else {
            format!("{}", value)
        }
    }

    fn compare_values(&self, a: &f64, b: &f64) -> Ordering {
        a.total_cmp(b)
    }

    fn to_cell(value: &f64) -> CellValue {
        CellValue::Number(*value)
    }

    fn from_cell(value: &CellValue) -> Option<f64> {
        value.as_f64()
    }
}

impl fmt::Display for NumberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(super::NUMBER_TYPE)
    }
}
