//! Date and time column types.
//!
//! Each type wraps a single compiled pattern. Detection walks a fixed list of
//! default patterns and keeps the first that parses, so list order is the
//! priority for ambiguous literals (`y-M-d` wins over `d-M-y`).

use super::pattern::{DatePattern, PatternDomain};
use super::ValueType;
use crate::data::value::CellValue;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

const DEFAULT_DATE_FORMATS: &[&str] = &["y-M-d", "y/M/d", "M/d/y", "d-M-y"];

const DEFAULT_TIME_FORMATS: &[&str] = &["hh:mm:ss a", "HH:mm:ss", "hh:mm a", "HH:mm"];

const DEFAULT_DATETIME_FORMATS: &[&str] = &[
    "y-M-d hh:mm:ss a",
    "y-M-d HH:mm:ss",
    "y-M-d hh:mm a",
    "y-M-d HH:mm",
    "y/M/d hh:mm:ss a",
    "y/M/d HH:mm:ss",
    "y/M/d hh:mm a",
    "y/M/d HH:mm",
    "M/d/y hh:mm:ss a",
    "M/d/y HH:mm:ss",
    "M/d/y hh:mm a",
    "M/d/y HH:mm",
    "d-M-y hh:mm:ss a",
    "d-M-y HH:mm:ss",
    "d-M-y hh:mm a",
    "d-M-y HH:mm",
    "d-MMM-y hh.mm.ss.SSS a",
    "d-MMM-y hh.mm.ss.SSSSSSSSS a",
];

const DEFAULT_ZONEDDATETIME_FORMATS: &[&str] = &[
    "y-M-d'T'HH:mm:ssXXX",
    "y-M-d'T'HH:mm:ssZZZ",
    "EEE MMM d HH:mm:ss zzz y",
];

fn compile_defaults(formats: &[&str]) -> Vec<DatePattern> {
    formats
        .iter()
        .filter_map(|format| DatePattern::compile(format))
        .collect()
}

static DATE_PATTERNS: LazyLock<Vec<DatePattern>> =
    LazyLock::new(|| compile_defaults(DEFAULT_DATE_FORMATS));
static TIME_PATTERNS: LazyLock<Vec<DatePattern>> =
    LazyLock::new(|| compile_defaults(DEFAULT_TIME_FORMATS));
static DATETIME_PATTERNS: LazyLock<Vec<DatePattern>> =
    LazyLock::new(|| compile_defaults(DEFAULT_DATETIME_FORMATS));
static ZONEDDATETIME_PATTERNS: LazyLock<Vec<DatePattern>> =
    LazyLock::new(|| compile_defaults(DEFAULT_ZONEDDATETIME_FORMATS));

macro_rules! temporal_type {
    (
        $(#[$meta:meta])*
        $name:ident {
            value: $value:ty,
            cell: $cell:ident,
            domain: $domain:expr,
            label: $label:expr,
            defaults: $defaults:expr,
            separators: $separators:expr,
            parse: $parse:ident,
            format: $format:ident $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pattern: DatePattern,
        }

        impl $name {
            pub fn pattern(&self) -> &str {
                self.pattern.as_str()
            }

            /// Returns a type using the first default pattern that parses `value`.
            pub fn check_and_get_type(value: &str) -> Option<Self> {
                if value.is_empty() || !value.contains($separators) {
                    return None;
                }
                $defaults
                    .iter()
                    .find(|pattern| pattern.$parse(value).is_some())
                    .map(|pattern| Self {
                        pattern: pattern.clone(),
                    })
            }

            /// Builds a type for an explicit pattern, rejecting patterns with
            /// letters outside this type's domain.
            pub fn get_type(pattern: &str) -> Option<Self> {
                DatePattern::compile_for($domain, pattern).map(|pattern| Self { pattern })
            }
        }

        impl ValueType for $name {
            type Value = $value;

            fn parse(&self, text: &str) -> Option<$value> {
                self.pattern.$parse(text)
            }

            fn format(&self, value: &$value) -> String {
                self.pattern.$format(value)
            }

            fn compare_values(&self, a: &$value, b: &$value) -> Ordering {
                a.cmp(b)
            }

            fn to_cell(value: &$value) -> CellValue {
                CellValue::$cell(value.clone())
            }

            fn from_cell(value: &CellValue) -> Option<$value> {
                match value {
                    CellValue::$cell(inner) => Some(inner.clone()),
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $label, self.pattern)
            }
        }
    };
}

temporal_type! {
    /// Calendar dates without a time of day.
    DateType {
        value: NaiveDate,
        cell: Date,
        domain: PatternDomain::Date,
        label: super::DATE_TYPE,
        defaults: DATE_PATTERNS,
        separators: ['/', '-'],
        parse: parse_date,
        format: format_date,
    }
}

temporal_type! {
    /// Times of day.
    TimeType {
        value: NaiveTime,
        cell: Time,
        domain: PatternDomain::Time,
        label: super::TIME_TYPE,
        defaults: TIME_PATTERNS,
        separators: [':', '.'],
        parse: parse_time,
        format: format_time,
    }
}

temporal_type! {
    /// Local date-times without a zone.
    DateTimeType {
        value: NaiveDateTime,
        cell: DateTime,
        domain: PatternDomain::DateTime,
        label: super::DATETIME_TYPE,
        defaults: DATETIME_PATTERNS,
        separators: ['/', '-', ':', '.'],
        parse: parse_datetime,
        format: format_datetime,
    }
}

temporal_type! {
    /// Date-times carrying a UTC offset. Values order by instant, so
    /// `10:00+02:00` sorts before `09:00+00:00`.
    ZonedDateTimeType {
        value: DateTime<FixedOffset>,
        cell: ZonedDateTime,
        domain: PatternDomain::ZonedDateTime,
        label: super::ZONEDDATETIME_TYPE,
        defaults: ZONEDDATETIME_PATTERNS,
        separators: ['/', '-', ':', '.'],
        parse: parse_zoned,
        format: format_zoned,
    }
}
