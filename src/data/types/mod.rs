//! Column type system.
//!
//! Every column has exactly one type. The closed [`ColumnType`] enum covers the
//! supported variants, while [`ValueType`] is the shared contract each variant
//! implements over its own Rust value type.

pub mod boolean;
pub mod number;
pub mod pattern;
pub mod string;
pub mod temporal;

pub use boolean::{BooleanCategory, BooleanType};
pub use number::NumberType;
pub use string::StringType;
pub use temporal::{DateTimeType, DateType, TimeType, ZonedDateTimeType};

use crate::data::value::CellValue;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::trace;

pub const NUMBER_TYPE: &str = "number";
pub const BOOLEAN_TYPE: &str = "boolean";
pub const DATE_TYPE: &str = "date";
pub const TIME_TYPE: &str = "time";
pub const DATETIME_TYPE: &str = "datetime";
pub const ZONEDDATETIME_TYPE: &str = "zoneddatetime";
pub const STRING_TYPE: &str = "string";

/// `name` or `name(arg[,arg...])`, surrounding whitespace allowed.
static TYPE_DESCRIPTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\w+)\s*(?:\(\s*([^()]*?)\s*\)\s*)?$").expect("valid descriptor regex")
});

static ARGUMENT_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,\s*").expect("valid separator regex"));

/// Parse/format/compare contract shared by all column types.
///
/// `parse` never fails loudly: malformed text yields `None`, the missing-value
/// sentinel. The type's `Display` output is its canonical descriptor.
pub trait ValueType: Clone + fmt::Debug + fmt::Display + PartialEq {
    type Value: Clone + fmt::Debug;

    fn parse(&self, text: &str) -> Option<Self::Value>;

    fn format(&self, value: &Self::Value) -> String;

    fn compare_values(&self, a: &Self::Value, b: &Self::Value) -> Ordering;

    fn to_cell(value: &Self::Value) -> CellValue;

    fn from_cell(value: &CellValue) -> Option<Self::Value>;

    /// Formats a possibly missing value; missing values format as empty text.
    fn format_opt(&self, value: Option<&Self::Value>) -> String {
        value.map(|v| self.format(v)).unwrap_or_default()
    }

    /// Orders possibly missing values with missing values first.
    fn compare(&self, a: Option<&Self::Value>, b: Option<&Self::Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => self.compare_values(a, b),
        }
    }
}

/// The closed set of column types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Number(NumberType),
    Boolean(BooleanType),
    Date(DateType),
    Time(TimeType),
    DateTime(DateTimeType),
    ZonedDateTime(ZonedDateTimeType),
    String(StringType),
}

macro_rules! with_value_type {
    ($column_type:expr, $ty:ident => $body:expr) => {
        match $column_type {
            ColumnType::Number($ty) => $body,
            ColumnType::Boolean($ty) => $body,
            ColumnType::Date($ty) => $body,
            ColumnType::Time($ty) => $body,
            ColumnType::DateTime($ty) => $body,
            ColumnType::ZonedDateTime($ty) => $body,
            ColumnType::String($ty) => $body,
        }
    };
}

impl ColumnType {
    pub fn number() -> Self {
        ColumnType::Number(NumberType)
    }

    pub fn string() -> Self {
        ColumnType::String(StringType)
    }

    pub fn boolean(category: BooleanCategory) -> Self {
        ColumnType::Boolean(BooleanType::new(category))
    }

    /// Detects the type of a single value.
    ///
    /// Variants are tried in fixed priority: number, boolean, date, time,
    /// date-time, zoned date-time, and finally string. Empty text has no type.
    pub fn find_type(value: &str) -> Option<Self> {
        if value.is_empty() {
            return None;
        }

        let found = NumberType::check_and_get_type(value)
            .map(ColumnType::Number)
            .or_else(|| BooleanType::check_and_get_type(value).map(ColumnType::Boolean))
            .or_else(|| DateType::check_and_get_type(value).map(ColumnType::Date))
            .or_else(|| TimeType::check_and_get_type(value).map(ColumnType::Time))
            .or_else(|| DateTimeType::check_and_get_type(value).map(ColumnType::DateTime))
            .or_else(|| {
                ZonedDateTimeType::check_and_get_type(value).map(ColumnType::ZonedDateTime)
            })
            .unwrap_or_else(ColumnType::string);

        trace!("Detected type {} for value '{}'", found, value);
        Some(found)
    }

    /// Resolves two conflicting guesses. Mixed columns always become text.
    pub fn preferred_type(_a: &ColumnType, _b: &ColumnType) -> ColumnType {
        ColumnType::string()
    }

    /// Resolves a type descriptor such as `number`, `boolean(yes_no)` or
    /// `date(y/M/d)`. Names are case-insensitive; temporal types require a
    /// pattern argument. Unknown or malformed descriptors have no type.
    pub fn from_descriptor(descriptor: &str) -> Option<Self> {
        let captures = TYPE_DESCRIPTOR.captures(descriptor)?;
        let name = captures.get(1)?.as_str().to_lowercase();
        let args: Vec<&str> = captures
            .get(2)
            .map(|args| ARGUMENT_SEPARATOR.split(args.as_str()).collect())
            .unwrap_or_default();
        let first = args.first().copied().filter(|arg| !arg.is_empty());

        match name.as_str() {
            NUMBER_TYPE => Some(ColumnType::number()),
            STRING_TYPE => Some(ColumnType::string()),
            BOOLEAN_TYPE => BooleanType::get_type(first).map(ColumnType::Boolean),
            DATE_TYPE => DateType::get_type(first?).map(ColumnType::Date),
            TIME_TYPE => TimeType::get_type(first?).map(ColumnType::Time),
            DATETIME_TYPE => DateTimeType::get_type(first?).map(ColumnType::DateTime),
            ZONEDDATETIME_TYPE => {
                ZonedDateTimeType::get_type(first?).map(ColumnType::ZonedDateTime)
            }
            _ => None,
        }
    }

    /// Canonical descriptor, e.g. `date(y-M-d)`.
    pub fn descriptor(&self) -> String {
        self.to_string()
    }

    /// Parses text into a raw cell; failures become [`CellValue::Null`].
    pub fn parse(&self, text: &str) -> CellValue {
        with_value_type!(self, ty => match ty.parse(text) {
            Some(value) => to_cell(ty, &value),
            None => CellValue::Null,
        })
    }

    /// Formats a raw cell. Nulls and cells of another type format as empty text.
    pub fn format(&self, value: &CellValue) -> String {
        with_value_type!(self, ty => ty.format_opt(from_cell(ty, value).as_ref()))
    }

    /// Null-first comparison of two raw cells of this type.
    pub fn compare(&self, a: &CellValue, b: &CellValue) -> Ordering {
        with_value_type!(self, ty => ty.compare(from_cell(ty, a).as_ref(), from_cell(ty, b).as_ref()))
    }
}

fn to_cell<T: ValueType>(_ty: &T, value: &T::Value) -> CellValue {
    T::to_cell(value)
}

fn from_cell<T: ValueType>(_ty: &T, value: &CellValue) -> Option<T::Value> {
    T::from_cell(value)
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        with_value_type!(self, ty => fmt::Display::fmt(ty, f))
    }
}

impl FromStr for ColumnType {
    type Err = crate::error::TableError;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        ColumnType::from_descriptor(descriptor)
            .ok_or_else(|| crate::error::TableError::InvalidType(descriptor.to_string()))
    }
}
