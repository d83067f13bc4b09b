//! Date/time pattern compilation.
//!
//! Column descriptors carry patterns written with the conventional pattern
//! letters (`y-M-d`, `hh:mm:ss a`, `y-M-d'T'HH:mm:ssXXX`, ...). They are
//! compiled once into `chrono` format items, which drive both parsing and
//! formatting so that `format(parse(text))` reproduces well-formed input.

use chrono::format::{self, Fixed, Item, Numeric, Pad, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// Time-of-day letters, rejected in date-only patterns.
const TIME_LETTERS: &str = "aAhHKkmsSnN";
/// Calendar letters, rejected in time-only patterns.
const DATE_LETTERS: &str = "GuyYDdMLQqWwEecF";
/// Zone letters, rejected in every non-zoned pattern.
const ZONE_LETTERS: &str = "VzZXxO";

const UTC_ZONE_NAME: &str = "UTC";

/// Which temporal family a pattern is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternDomain {
    Date,
    Time,
    DateTime,
    ZonedDateTime,
}

impl PatternDomain {
    fn forbidden_letters(self) -> Vec<&'static str> {
        match self {
            PatternDomain::Date => vec![TIME_LETTERS, ZONE_LETTERS],
            PatternDomain::Time => vec![DATE_LETTERS, ZONE_LETTERS],
            PatternDomain::DateTime => vec![ZONE_LETTERS],
            PatternDomain::ZonedDateTime => vec![],
        }
    }

    /// Checks the pattern letters (ignoring quoted literals) against the domain.
    pub fn admits(self, pattern: &str) -> bool {
        let unquoted = strip_quoted(pattern);
        self.forbidden_letters()
            .iter()
            .all(|letters| !unquoted.chars().any(|c| letters.contains(c)))
    }
}

/// A compiled date/time pattern.
///
/// Equality is textual: `y-M-d` and `yyyy-M-d` are different patterns even
/// when they accept the same input.
#[derive(Clone)]
pub struct DatePattern {
    pattern: String,
    format_items: Vec<Item<'static>>,
    /// Format items for zero offsets, printing zone names as `UTC`.
    utc_format_items: Vec<Item<'static>>,
    parse_items: Vec<Item<'static>>,
    has_zone_name: bool,
    /// Whitespace characters a well-formed input contains.
    space_count: usize,
}

impl DatePattern {
    /// Compiles `pattern`, returning `None` for empty patterns, unterminated
    /// quotes or letters without a `chrono` counterpart.
    pub fn compile(pattern: &str) -> Option<Self> {
        if pattern.is_empty() {
            return None;
        }

        let format_items = compile_items(pattern)?;
        let has_zone_name = format_items
            .iter()
            .any(|item| matches!(item, Item::Fixed(Fixed::TimezoneName)));

        // Zone names cannot be resolved to an offset by the parser, so the
        // parse side reads a (normalised) numeric offset in their place.
        let parse_items =
            replace_zone_name(&format_items, Item::Fixed(Fixed::TimezoneOffsetColonZ));
        let utc_format_items = replace_zone_name(&format_items, Item::Literal(UTC_ZONE_NAME));
        let space_count = format_items
            .iter()
            .map(|item| match item {
                Item::OwnedLiteral(literal) => literal.chars().filter(|c| c.is_whitespace()).count(),
                _ => 0,
            })
            .sum();

        Some(Self {
            pattern: pattern.to_string(),
            format_items,
            utc_format_items,
            parse_items,
            has_zone_name,
            space_count,
        })
    }

    /// Compiles `pattern` only if its letters fit `domain`.
    pub fn compile_for(domain: PatternDomain, pattern: &str) -> Option<Self> {
        if !domain.admits(pattern) {
            return None;
        }
        Self::compile(pattern)
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    fn parse_fields(&self, text: &str) -> Option<Parsed> {
        if text.is_empty() {
            return None;
        }
        // chrono skips whitespace before numbers and offsets
        if text.chars().filter(|c| c.is_whitespace()).count() != self.space_count {
            return None;
        }

        // tolerate lower-case meridiem markers
        let mut input = text.replace("am", "AM").replace("pm", "PM");
        if self.has_zone_name {
            input = normalize_zone_names(&input);
        }

        let mut parsed = Parsed::new();
        format::parse(&mut parsed, &input, self.parse_items.iter()).ok()?;
        Some(parsed)
    }

    pub fn parse_date(&self, text: &str) -> Option<NaiveDate> {
        self.parse_fields(text)?.to_naive_date().ok()
    }

    pub fn parse_time(&self, text: &str) -> Option<NaiveTime> {
        self.parse_fields(text)?.to_naive_time().ok()
    }

    pub fn parse_datetime(&self, text: &str) -> Option<NaiveDateTime> {
        self.parse_fields(text)?
            .to_naive_datetime_with_offset(0)
            .ok()
    }

    pub fn parse_zoned(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        self.parse_fields(text)?.to_datetime().ok()
    }

    pub fn format_date(&self, value: &NaiveDate) -> String {
        value.format_with_items(self.format_items.iter()).to_string()
    }

    pub fn format_time(&self, value: &NaiveTime) -> String {
        value.format_with_items(self.format_items.iter()).to_string()
    }

    pub fn format_datetime(&self, value: &NaiveDateTime) -> String {
        value.format_with_items(self.format_items.iter()).to_string()
    }

    /// Zone names print as `UTC` for zero offsets and as the offset
    /// otherwise.
    pub fn format_zoned(&self, value: &DateTime<FixedOffset>) -> String {
        let items = if self.has_zone_name && value.offset().local_minus_utc() == 0 {
            &self.utc_format_items
        } else {
            &self.format_items
        };
        value.format_with_items(items.iter()).to_string()
    }
}

impl PartialEq for DatePattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for DatePattern {}

impl fmt::Debug for DatePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DatePattern").field(&self.pattern).finish()
    }
}

impl fmt::Display for DatePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Removes `'quoted'` literal sections so only pattern letters remain.
fn strip_quoted(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut in_quote = false;
    for c in pattern.chars() {
        if c == '\'' {
            in_quote = !in_quote;
        } else if !in_quote {
            out.push(c);
        }
    }
    out
}

fn replace_zone_name(items: &[Item<'static>], replacement: Item<'static>) -> Vec<Item<'static>> {
    items
        .iter()
        .map(|item| match item {
            Item::Fixed(Fixed::TimezoneName) => replacement.clone(),
            other => other.clone(),
        })
        .collect()
}

fn normalize_zone_names(text: &str) -> String {
    text.split(' ')
        .map(|token| match token {
            "UTC" | "GMT" | "Z" => "+00:00",
            other => other,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn compile_items(pattern: &str) -> Option<Vec<Item<'static>>> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut items = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // quoted literal, '' is an escaped quote
            let mut literal = String::new();
            i += 1;
            if i < chars.len() && chars[i] == '\'' {
                items.push(Item::OwnedLiteral("'".into()));
                i += 1;
                continue;
            }
            loop {
                if i >= chars.len() {
                    return None;
                }
                if chars[i] == '\'' {
                    if i + 1 < chars.len() && chars[i + 1] == '\'' {
                        literal.push('\'');
                        i += 2;
                        continue;
                    }
                    i += 1;
                    break;
                }
                literal.push(chars[i]);
                i += 1;
            }
            items.push(Item::OwnedLiteral(literal.into_boxed_str()));
            continue;
        }

        if c.is_ascii_alphabetic() {
            let mut count = 1;
            while i + count < chars.len() && chars[i + count] == c {
                count += 1;
            }
            items.push(letter_item(c, count)?);
            i += count;
            continue;
        }

        if matches!(c, '[' | ']' | '{' | '}' | '#') {
            return None;
        }

        // spaces are literals too; chrono's space items match any run of whitespace
        items.push(Item::OwnedLiteral(c.to_string().into_boxed_str()));
        i += 1;
    }

    Some(items)
}

fn numeric(field: Numeric, count: usize) -> Item<'static> {
    let pad = if count >= 2 { Pad::Zero } else { Pad::None };
    Item::Numeric(field, pad)
}

fn strftime_item(directive: &'static str) -> Option<Item<'static>> {
    StrftimeItems::new(directive)
        .next()
        .filter(|item| !matches!(item, Item::Error))
}

fn letter_item(letter: char, count: usize) -> Option<Item<'static>> {
    let item = match (letter, count) {
        ('y' | 'u', 2) => Item::Numeric(Numeric::YearMod100, Pad::Zero),
        ('y' | 'u', 1 | 3) => Item::Numeric(Numeric::Year, Pad::None),
        ('y' | 'u', _) => Item::Numeric(Numeric::Year, Pad::Zero),
        ('M' | 'L', 1 | 2) => numeric(Numeric::Month, count),
        ('M' | 'L', 3) => Item::Fixed(Fixed::ShortMonthName),
        ('M' | 'L', 4) => Item::Fixed(Fixed::LongMonthName),
        ('d', 1 | 2) => numeric(Numeric::Day, count),
        ('D', 1..=3) => numeric(Numeric::Ordinal, count),
        ('E', 1..=3) => Item::Fixed(Fixed::ShortWeekdayName),
        ('E', 4) => Item::Fixed(Fixed::LongWeekdayName),
        ('a', 1) => Item::Fixed(Fixed::UpperAmPm),
        ('H', 1 | 2) => numeric(Numeric::Hour, count),
        ('h', 1 | 2) => numeric(Numeric::Hour12, count),
        ('m', 1 | 2) => numeric(Numeric::Minute, count),
        ('s', 1 | 2) => numeric(Numeric::Second, count),
        ('S', 1..=3) => strftime_item("%3f")?,
        ('S', 4..=6) => strftime_item("%6f")?,
        ('S', 7..=9) => strftime_item("%9f")?,
        ('z', 1..=4) => Item::Fixed(Fixed::TimezoneName),
        ('Z', 1..=3) => Item::Fixed(Fixed::TimezoneOffset),
        ('Z', 5) => Item::Fixed(Fixed::TimezoneOffsetColonZ),
        ('X', 1 | 2) => Item::Fixed(Fixed::TimezoneOffsetZ),
        ('X', 3..=5) => Item::Fixed(Fixed::TimezoneOffsetColonZ),
        ('x', 1 | 2) => Item::Fixed(Fixed::TimezoneOffset),
        ('x', 3..=5) => Item::Fixed(Fixed::TimezoneOffsetColon),
        _ => return None,
    };
    Some(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_round_trip_without_padding() {
        let pattern = DatePattern::compile("y-M-d").unwrap();
        let date = pattern.parse_date("2014-4-21").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2014, 4, 21).unwrap());
        assert_eq!(pattern.format_date(&date), "2014-4-21");
        // padded input is accepted, output follows the pattern
        let padded = pattern.parse_date("2014-04-02").unwrap();
        assert_eq!(pattern.format_date(&padded), "2014-4-2");
    }

    #[test]
    fn test_quoted_literals() {
        let pattern = DatePattern::compile("y-M-d'T'HH:mm:ssXXX").unwrap();
        let value = pattern.parse_zoned("2014-04-2T12:13:14+05:00").unwrap();
        assert_eq!(pattern.format_zoned(&value), "2014-4-2T12:13:14+05:00");

        assert!(DatePattern::compile("y-M-d'T").is_none());
        let escaped = DatePattern::compile("HH''mm").unwrap();
        let time = escaped.parse_time("10'30").unwrap();
        assert_eq!(escaped.format_time(&time), "10'30");
    }

    #[test]
    fn test_meridiem_normalisation() {
        let pattern = DatePattern::compile("hh:mm a").unwrap();
        let time = pattern.parse_time("01:15 pm").unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(13, 15, 0).unwrap());
        assert_eq!(pattern.format_time(&time), "01:15 PM");
    }

    #[test]
    fn test_zone_names() {
        let pattern = DatePattern::compile("y-M-d HH:mm zzz").unwrap();
        let value = pattern.parse_zoned("2015-4-21 10:00 UTC").unwrap();
        assert_eq!(value.offset().local_minus_utc(), 0);
        assert!(pattern.parse_zoned("2015-4-21 10:00 Asia/Calcutta").is_none());
        assert_eq!(pattern.format_zoned(&value), "2015-4-21 10:00 UTC");

        let gmt = pattern.parse_zoned("2015-4-21 10:00 GMT").unwrap();
        assert_eq!(gmt, value);
    }

    #[test]
    fn test_zone_name_keeps_offset_when_not_utc() {
        let pattern = DatePattern::compile("y-M-d HH:mm zzz").unwrap();
        let value = DateTime::parse_from_rfc3339("2015-04-21T10:00:00+05:30").unwrap();
        assert_eq!(pattern.format_zoned(&value), "2015-4-21 10:00 +05:30");
    }

    #[test]
    fn test_whitespace_is_strict() {
        let pattern = DatePattern::compile("y-M-d HH:mm").unwrap();
        assert!(pattern.parse_datetime("2014-1-1 10:30").is_some());
        assert!(pattern.parse_datetime("2014-1-110:30").is_none());
        assert!(pattern.parse_datetime("2014-1-1  10:30").is_none());
        assert!(pattern.parse_datetime("2014-1-1\t10:30").is_none());

        let date = DatePattern::compile("y-M-d").unwrap();
        assert!(date.parse_date(" 2014-1-1").is_none());
        assert!(date.parse_date("2014- 1-1").is_none());
        assert!(date.parse_date("2014-1-1 ").is_none());

        let quoted = DatePattern::compile("y-M-d' at 'HH:mm").unwrap();
        let value = quoted.parse_datetime("2014-1-1 at 10:30").unwrap();
        assert_eq!(quoted.format_datetime(&value), "2014-1-1 at 10:30");
    }

    #[test]
    fn test_domain_checks() {
        assert!(PatternDomain::Date.admits("y-M-d"));
        assert!(!PatternDomain::Date.admits("y-M-d HH:mm"));
        assert!(PatternDomain::Date.admits("y-M-d'h'"));
        assert!(!PatternDomain::Time.admits("y HH:mm"));
        assert!(!PatternDomain::DateTime.admits("y-M-d HH:mm XXX"));
        assert!(PatternDomain::ZonedDateTime.admits("y-M-d HH:mm XXX"));
    }

    #[test]
    fn test_unsupported_letters() {
        assert!(DatePattern::compile("y-M-d G").is_none());
        assert!(DatePattern::compile("[y-M-d]").is_none());
        assert!(DatePattern::compile("").is_none());
    }

    #[test]
    fn test_textual_equality() {
        let a = DatePattern::compile("y-M-d").unwrap();
        let b = DatePattern::compile("y-M-d").unwrap();
        let c = DatePattern::compile("yyyy-M-d").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
