//! Delimited text ingestion.
//!
//! [`PlainReader`] turns lines of delimited text into a [`DataTable`]. Per
//! column it can carry a predefined type, a predefined header, a validator
//! and a formatter, all keyed by zero-based column position.
//!
//! For every line:
//! 1. lines starting with the comment string are skipped
//! 2. the first remaining line is the header when one is expected; predefined
//!    names win over the file's names
//! 3. each data line is split on the delimiter; if any validator rejects its
//!    field the whole line is dropped
//! 4. formatters rewrite fields, then fields of columns without a predefined
//!    type feed the running type guess
//!
//! Headers still missing at the end are named after their position.

use crate::config::ReaderConfig;
use crate::data::datatable::DataTable;
use crate::data::type_inference::ColumnTypeGuesser;
use crate::data::types::ColumnType;
use anyhow::{bail, Context, Result};
use regex::Regex;
use std::cell::Cell;
use std::fs::File;
use std::io::{BufRead, BufReader};
use tracing::{debug, info, trace};

pub const DEFAULT_COMMENT_STRING: &str = "#";
pub const DEFAULT_DELIMITER: &str = ",";
pub const TAB_DELIMITER: &str = "\t";

/// Rewrites a raw field before it is typed.
pub trait InputFormatter {
    fn format(&self, value: &str) -> String;
}

impl<F> InputFormatter for F
where
    F: Fn(&str) -> String,
{
    fn format(&self, value: &str) -> String {
        self(value)
    }
}

/// Accepts or rejects a raw field; a rejected field drops its whole row.
pub trait InputValidator {
    fn validate(&self, value: &str) -> bool;
}

impl<F> InputValidator for F
where
    F: Fn(&str) -> bool,
{
    fn validate(&self, value: &str) -> bool {
        self(value)
    }
}

/// Replaces every match of a regex. The replacement may refer to capture
/// groups as `$1` or `${name}`.
#[derive(Debug, Clone)]
pub struct RegexFormatter {
    regex: Regex,
    replacement: String,
}

impl RegexFormatter {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let regex =
            Regex::new(pattern).with_context(|| format!("Invalid formatter regex: {}", pattern))?;
        Ok(Self {
            regex,
            replacement: replacement.into(),
        })
    }
}

impl InputFormatter for RegexFormatter {
    fn format(&self, value: &str) -> String {
        self.regex
            .replace_all(value, self.replacement.as_str())
            .into_owned()
    }
}

/// Line counts from the most recent read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    /// Lines read from the source, comments and header included.
    pub lines: usize,
    pub comments: usize,
    /// Data rows kept in the table.
    pub rows: usize,
    /// Data rows rejected by a validator.
    pub dropped: usize,
}

/// Whether `path` is an `http` or `https` URL.
pub fn is_url(path: &str) -> bool {
    reqwest::Url::parse(path)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Opens a local file or fetches a URL.
pub fn open_source(path: &str) -> Result<Box<dyn BufRead>> {
    if is_url(path) {
        debug!("Fetching {}", path);
        let response =
            reqwest::blocking::get(path).with_context(|| format!("Failed to fetch {}", path))?;
        let status = response.status();
        if !status.is_success() {
            bail!("Failed to fetch {}: HTTP {}", path, status);
        }
        Ok(Box::new(BufReader::new(response)))
    } else {
        let file = File::open(path).with_context(|| format!("Failed to open file: {}", path))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Splits on the literal delimiter. Trailing empty fields are dropped, but a
/// line always yields at least one field.
fn split_fields(line: &str, delimiter: &str) -> Vec<String> {
    if delimiter.is_empty() {
        return vec![line.to_string()];
    }
    let mut fields: Vec<String> = line.split(delimiter).map(str::to_string).collect();
    while fields.len() > 1 && fields.last().is_some_and(|field| field.is_empty()) {
        fields.pop();
    }
    fields
}

fn set_at<T>(list: &mut Vec<Option<T>>, position: usize, value: Option<T>) {
    if list.len() <= position {
        list.resize_with(position + 1, || None);
    }
    list[position] = value;
}

/// Reads delimited text into a [`DataTable`].
pub struct PlainReader {
    predefined_types: Vec<Option<ColumnType>>,
    predefined_names: Vec<Option<String>>,
    formatters: Vec<Option<Box<dyn InputFormatter>>>,
    validators: Vec<Option<Box<dyn InputValidator>>>,
    comment_string: Option<String>,
    last_stats: Cell<ReadStats>,
}

impl Default for PlainReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PlainReader {
    pub fn new() -> Self {
        Self {
            predefined_types: Vec::new(),
            predefined_names: Vec::new(),
            formatters: Vec::new(),
            validators: Vec::new(),
            comment_string: Some(DEFAULT_COMMENT_STRING.to_string()),
            last_stats: Cell::new(ReadStats::default()),
        }
    }

    pub fn with_types(types: &[&str]) -> Self {
        let mut reader = Self::new();
        reader.set_types(types);
        reader
    }

    pub fn with_types_and_names(types: &[&str], names: &[&str]) -> Self {
        let mut reader = Self::with_types(types);
        reader.set_names(names);
        reader
    }

    /// Builds a reader from configuration. Empty type or name entries leave
    /// that position undefined.
    pub fn from_config(config: &ReaderConfig) -> Self {
        let mut reader = Self::new();
        for (position, descriptor) in config.types.iter().enumerate() {
            if !descriptor.trim().is_empty() {
                reader.set_type(position, descriptor);
            }
        }
        for (position, name) in config.names.iter().enumerate() {
            if !name.is_empty() {
                reader.set_name(position, name);
            }
        }
        reader.set_comment_string(Some(&config.comment));
        reader
    }

    /// Predefines the type of one column. An unresolvable descriptor leaves
    /// the column to inference.
    pub fn set_type(&mut self, position: usize, descriptor: &str) -> &mut Self {
        let column_type = ColumnType::from_descriptor(descriptor);
        if column_type.is_none() {
            debug!(
                "Ignoring unresolvable type '{}' for column {}",
                descriptor, position
            );
        }
        set_at(&mut self.predefined_types, position, column_type);
        self
    }

    /// Replaces all predefined types.
    pub fn set_types(&mut self, descriptors: &[&str]) -> &mut Self {
        self.predefined_types = descriptors
            .iter()
            .map(|descriptor| ColumnType::from_descriptor(descriptor))
            .collect();
        self
    }

    pub fn set_name(&mut self, position: usize, name: &str) -> &mut Self {
        set_at(&mut self.predefined_names, position, Some(name.to_string()));
        self
    }

    /// Replaces all predefined names.
    pub fn set_names(&mut self, names: &[&str]) -> &mut Self {
        self.predefined_names = names.iter().map(|name| Some(name.to_string())).collect();
        self
    }

    pub fn set_formatter<F>(&mut self, position: usize, formatter: F) -> &mut Self
    where
        F: InputFormatter + 'static,
    {
        set_at(
            &mut self.formatters,
            position,
            Some(Box::new(formatter) as Box<dyn InputFormatter>),
        );
        self
    }

    /// Replaces all formatters; `None` entries leave a column unformatted.
    pub fn set_formatters<I>(&mut self, formatters: I) -> &mut Self
    where
        I: IntoIterator<Item = Option<Box<dyn InputFormatter>>>,
    {
        self.formatters = formatters.into_iter().collect();
        self
    }

    pub fn set_validator<V>(&mut self, position: usize, validator: V) -> &mut Self
    where
        V: InputValidator + 'static,
    {
        set_at(
            &mut self.validators,
            position,
            Some(Box::new(validator) as Box<dyn InputValidator>),
        );
        self
    }

    /// Replaces all validators; `None` entries accept anything.
    pub fn set_validators<I>(&mut self, validators: I) -> &mut Self
    where
        I: IntoIterator<Item = Option<Box<dyn InputValidator>>>,
    {
        self.validators = validators.into_iter().collect();
        self
    }

    /// Sets the comment prefix. `None` or a blank string disables comments.
    pub fn set_comment_string(&mut self, comment: Option<&str>) -> &mut Self {
        self.comment_string = comment
            .filter(|comment| !comment.trim().is_empty())
            .map(str::to_string);
        self
    }

    pub fn comment_string(&self) -> Option<&str> {
        self.comment_string.as_deref()
    }

    pub fn read_stats(&self) -> ReadStats {
        self.last_stats.get()
    }

    /// Reads comma-delimited text with a header line.
    pub fn read(&self, path: &str) -> Result<DataTable> {
        self.read_with(path, DEFAULT_DELIMITER, true)
    }

    pub fn read_csv(&self, path: &str, header: bool) -> Result<DataTable> {
        self.read_with(path, DEFAULT_DELIMITER, header)
    }

    pub fn read_tsv(&self, path: &str, header: bool) -> Result<DataTable> {
        self.read_with(path, TAB_DELIMITER, header)
    }

    /// Reads a local file or an `http(s)` URL.
    pub fn read_with(&self, path: &str, delimiter: &str, header: bool) -> Result<DataTable> {
        info!("Reading table from {}", path);
        let source = open_source(path)?;
        self.read_from(source, delimiter, header)
            .with_context(|| format!("Failed to read table from {}", path))
    }

    pub fn read_str(&self, text: &str, delimiter: &str, header: bool) -> Result<DataTable> {
        self.read_from(text.as_bytes(), delimiter, header)
    }

    pub fn read_from<R: BufRead>(
        &self,
        source: R,
        delimiter: &str,
        header: bool,
    ) -> Result<DataTable> {
        let mut stats = ReadStats::default();
        let mut names = self.predefined_names.clone();
        let mut guesser = ColumnTypeGuesser::new(self.predefined_types.clone());
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut width = 0;
        let mut header_pending = header;

        for line in source.lines() {
            let line = line.context("Failed to read line")?;
            stats.lines += 1;

            if let Some(comment) = &self.comment_string {
                if line.starts_with(comment.as_str()) {
                    stats.comments += 1;
                    continue;
                }
            }

            let mut fields = split_fields(&line, delimiter);
            width = width.max(fields.len());

            if header_pending {
                for (position, field) in fields.into_iter().enumerate() {
                    if names.get(position).is_some_and(Option::is_some) {
                        continue;
                    }
                    set_at(&mut names, position, Some(field));
                }
                debug!("Header resolved to {:?}", names);
                header_pending = false;
                continue;
            }

            if let Some(position) = self.rejected_field(&fields) {
                stats.dropped += 1;
                debug!(
                    "Dropping line {}: column {} failed validation",
                    stats.lines, position
                );
                continue;
            }

            self.apply_formatters(&mut fields);
            trace!("Row {}: {:?}", stats.rows, fields);
            guesser.observe_row(&fields);
            stats.rows += 1;
            rows.push(fields);
        }

        self.last_stats.set(stats);

        let columns = width.max(names.len());
        let types = guesser.finish(columns);
        let headers: Vec<String> = (0..columns)
            .map(|position| {
                names
                    .get(position)
                    .cloned()
                    .flatten()
                    .unwrap_or_else(|| position.to_string())
            })
            .collect();

        let table = DataTable::from_parts(&rows, types, headers, None)?;
        info!(
            "Read {} rows and {} columns ({} dropped, {} comments)",
            table.row_count(),
            table.column_count(),
            stats.dropped,
            stats.comments
        );
        Ok(table)
    }

    fn rejected_field(&self, fields: &[String]) -> Option<usize> {
        fields.iter().enumerate().find_map(|(position, field)| {
            match self.validators.get(position) {
                Some(Some(validator)) if !validator.validate(field) => Some(position),
                _ => None,
            }
        })
    }

    fn apply_formatters(&self, fields: &mut [String]) {
        for (position, field) in fields.iter_mut().enumerate() {
            if let Some(Some(formatter)) = self.formatters.get(position) {
                *field = formatter.format(field);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::column::SortOrder;

    const SALES: &str = "Date,Item,Sales\n2014-1-1,Printer,10\n2014-1-9,Printer,2\n";

    #[test]
    fn test_read_with_header() {
        let table = PlainReader::new().read_str(SALES, ",", true).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.type_descriptors(), vec!["date(y-M-d)", "string", "number"]);
        assert_eq!(table.headers(), vec!["Date", "Item", "Sales"]);
    }

    #[test]
    fn test_read_then_sort() {
        let mut table = PlainReader::new().read_str(SALES, ",", true).unwrap();
        table.sort("Sales", SortOrder::Asc).unwrap();
        assert_eq!(table.get_formatted_row(0).unwrap()[0], "2014-1-9");
    }

    #[test]
    fn test_read_without_header() {
        let table = PlainReader::new()
            .read_str("1,yes\n2,no\n", ",", false)
            .unwrap();
        assert_eq!(table.headers(), vec!["0", "1"]);
        assert_eq!(table.type_descriptors(), vec!["number", "boolean(YES_NO)"]);
    }

    #[test]
    fn test_comments_are_skipped() {
        let text = "# generated\nA,B\n#1,2\n3,4\n";
        let reader = PlainReader::new();
        let table = reader.read_str(text, ",", true).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.headers(), vec!["A", "B"]);
        assert_eq!(
            reader.read_stats(),
            ReadStats {
                lines: 4,
                comments: 2,
                rows: 1,
                dropped: 0
            }
        );
    }

    #[test]
    fn test_comment_string_can_be_changed_or_disabled() {
        let mut reader = PlainReader::new();
        reader.set_comment_string(Some("//"));
        let table = reader.read_str("// note\n#1,2\n", ",", false).unwrap();
        assert_eq!(table.get_formatted_column(0).unwrap(), vec!["#1"]);

        reader.set_comment_string(Some("  "));
        assert_eq!(reader.comment_string(), None);
        let table = reader.read_str("# a\n1\n", ",", false).unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_predefined_names_win() {
        let reader = PlainReader::with_types_and_names(&[], &["When"]);
        let table = reader.read_str(SALES, ",", true).unwrap();
        assert_eq!(table.headers(), vec!["When", "Item", "Sales"]);

        let mut reader = PlainReader::new();
        reader.set_name(1, "Product");
        let table = reader.read_str("1,2,3\n", ",", false).unwrap();
        assert_eq!(table.headers(), vec!["0", "Product", "2"]);
    }

    #[test]
    fn test_predefined_type_skips_inference() {
        let reader = PlainReader::with_types(&["", "", "string"]);
        let table = reader.read_str(SALES, ",", true).unwrap();
        assert_eq!(table.type_descriptors(), vec!["date(y-M-d)", "string", "string"]);

        let mut reader = PlainReader::new();
        reader.set_type(0, "date(y/M/d)");
        let table = reader.read_str("2014-1-1\n2014/1/2\n", ",", false).unwrap();
        assert_eq!(table.get_formatted_column(0).unwrap(), vec!["", "2014/1/2"]);
    }

    #[test]
    fn test_validator_drops_whole_row() {
        let mut reader = PlainReader::new();
        reader.set_validator(2, |value: &str| value.parse::<f64>().is_ok());
        let text = "Date,Item,Sales\n2014-1-1,Printer,10\n2014-1-2,Scanner,n/a\n2014-1-3,Ink,4\n";
        let table = reader.read_str(text, ",", true).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get_formatted_column(1).unwrap(), vec!["Printer", "Ink"]);
        assert_eq!(table.type_descriptors()[2], "number");
        assert_eq!(reader.read_stats().dropped, 1);
    }

    #[test]
    fn test_formatter_runs_before_typing() {
        let mut reader = PlainReader::new();
        reader.set_formatter(0, RegexFormatter::new(r"(\d+)\.(\d+)\.(\d+)", "$3-$2-$1").unwrap());
        reader.set_formatter(1, |value: &str| value.trim().to_uppercase());
        let table = reader.read_str("21.4.2014, yes\n", ",", false).unwrap();
        assert_eq!(table.type_descriptors(), vec!["date(y-M-d)", "boolean(YES_NO)"]);
        assert_eq!(table.get_formatted_row(0).unwrap(), vec!["2014-4-21", "yes"]);
    }

    #[test]
    fn test_formatters_and_validators_replace_lists() {
        let mut reader = PlainReader::new();
        reader.set_formatter(0, |_: &str| "x".to_string());
        reader.set_formatters(vec![None, Some(Box::new(|v: &str| format!("<{}>", v)) as Box<dyn InputFormatter>)]);
        reader.set_validators(vec![Some(Box::new(|v: &str| v != "skip") as Box<dyn InputValidator>)]);
        let table = reader.read_str("a,b\nskip,c\n", ",", false).unwrap();
        assert_eq!(table.get_formatted_row(0).unwrap(), vec!["a", "<b>"]);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_type_conflict_becomes_string() {
        let table = PlainReader::new().read_str("10\nabc\n", ",", false).unwrap();
        assert_eq!(table.type_descriptors(), vec!["string"]);
        assert_eq!(table.get_formatted_column(0).unwrap(), vec!["10", "abc"]);

        let table = PlainReader::new().read_str("falseeee\n", ",", false).unwrap();
        assert_eq!(table.type_descriptors(), vec!["string"]);
    }

    #[test]
    fn test_nan_and_inf_words_are_text() {
        let table = PlainReader::new().read_str("Name\nNan\nInf\n", ",", true).unwrap();
        assert_eq!(table.type_descriptors(), vec!["string"]);
        assert_eq!(table.get_formatted_column(0).unwrap(), vec!["Nan", "Inf"]);

        let table = PlainReader::new().read_str("NaN\n-Infinity\n2\n", ",", false).unwrap();
        assert_eq!(table.type_descriptors(), vec!["number"]);
        assert_eq!(table.get_formatted_column(0).unwrap(), vec!["NaN", "-Infinity", "2"]);
    }

    #[test]
    fn test_ragged_rows_and_padding() {
        let table = PlainReader::new()
            .read_str("A\n1,x\n2\n", ",", true)
            .unwrap();
        assert_eq!(table.headers(), vec!["A", "1"]);
        assert_eq!(table.get_formatted_row(1).unwrap(), vec!["2", ""]);
    }

    #[test]
    fn test_all_empty_column_is_string() {
        let table = PlainReader::new().read_str("1,\n2,\n", ";", false).unwrap();
        assert_eq!(table.column_count(), 1);
        let table = PlainReader::new().read_str(";1\n;2\n", ";", false).unwrap();
        assert_eq!(table.type_descriptors(), vec!["string", "number"]);
    }

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields("a,b,,", ","), vec!["a", "b"]);
        assert_eq!(split_fields("", ","), vec![""]);
        assert_eq!(split_fields(",a", ","), vec!["", "a"]);
        assert_eq!(split_fields("a\tb", "\t"), vec!["a", "b"]);
        assert_eq!(split_fields("a||b", "||"), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_source_is_an_error() {
        assert!(PlainReader::new().read_str("", ",", true).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = PlainReader::new()
            .read("/definitely/not/here.csv")
            .unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }

    #[test]
    fn test_from_config() {
        let config = ReaderConfig {
            delimiter: ";".to_string(),
            comment: "//".to_string(),
            header: false,
            types: vec!["".to_string(), "string".to_string()],
            names: vec!["Day".to_string()],
        };
        let reader = PlainReader::from_config(&config);
        assert_eq!(reader.comment_string(), Some("//"));

        let table = reader
            .read_str("// generated\n2014-1-1;12\n", &config.delimiter, config.header)
            .unwrap();
        assert_eq!(table.headers(), vec!["Day", "1"]);
        assert_eq!(table.type_descriptors(), vec!["date(y-M-d)", "string"]);
        assert_eq!(reader.read_stats().comments, 1);
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("http://example.com/data.csv"));
        assert!(is_url("https://example.com/data.csv"));
        assert!(!is_url("ftp://example.com/data.csv"));
        assert!(!is_url("data/sales.csv"));
        assert!(!is_url("C:\\data\\sales.csv"));
    }
}
