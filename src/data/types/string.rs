use super::ValueType;
use crate::data::value::CellValue;
use std::cmp::Ordering;
use std::fmt;

/// Plain text columns; the fallback for anything no other type accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringType;

impl ValueType for StringType {
    type Value = String;

    fn parse(&self, text: &str) -> Option<String> {
        Some(text.to_string())
    }

    fn format(&self, value: &String) -> String {
        value.clone()
    }

    fn compare_values(&self, a: &String, b: &String) -> Ordering {
        a.cmp(b)
    }

    fn to_cell(value: &String) -> CellValue {
        CellValue::String(value.clone())
    }

    fn from_cell(value: &CellValue) -> Option<String> {
        value.as_str().map(str::to_string)
    }
}

impl fmt::Display for StringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(super::STRING_TYPE)
    }
}
