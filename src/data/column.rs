//! Single-type column storage.

use crate::data::types::{
    BooleanType, ColumnType, DateTimeType, DateType, NumberType, StringType, TimeType, ValueType,
    ZonedDateTimeType,
};
use crate::data::value::CellValue;
use crate::error::{Result, TableError};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::str::FromStr;

/// Sort direction for column and table sorts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `"desc"` (any case) is descending; anything else, including no order,
    /// is ascending.
    pub fn from_option(order: Option<&str>) -> Self {
        match order {
            Some(order) if order.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(format!("Unknown sort order '{}', expected asc or desc", s))
        }
    }
}

/// Append-only values of one type, indexed by storage position.
#[derive(Debug, Clone)]
pub struct TypedColumn<T: ValueType> {
    name: String,
    column_type: T,
    values: Vec<Option<T::Value>>,
}

impl<T: ValueType> TypedColumn<T> {
    pub fn new(name: impl Into<String>, column_type: T) -> Self {
        Self {
            name: name.into(),
            column_type,
            values: Vec::new(),
        }
    }

    pub fn add(&mut self, value: Option<T::Value>) {
        self.values.push(value);
    }

    /// Parses and appends; missing or unparsable text appends a missing value.
    pub fn parse_and_add(&mut self, text: Option<&str>) {
        let value = text.and_then(|text| self.column_type.parse(text));
        self.values.push(value);
    }

    pub fn get(&self, position: usize) -> Option<&T::Value> {
        self.values.get(position).and_then(Option::as_ref)
    }

    pub fn formatted_value(&self, position: usize) -> String {
        self.column_type.format_opt(self.get(position))
    }

    pub fn values(&self) -> &[Option<T::Value>] {
        &self.values
    }

    pub fn column_type(&self) -> &T {
        &self.column_type
    }

    /// Formatted values ordered by the type's comparison. Ties keep their
    /// storage order in both directions.
    pub fn sort(&self, order: SortOrder) -> Vec<String> {
        let mut sorted: Vec<Option<&T::Value>> = self.values.iter().map(Option::as_ref).collect();
        sorted.sort_by(|a, b| {
            let ordering = self.column_type.compare(*a, *b);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        sorted
            .into_iter()
            .map(|value| self.column_type.format_opt(value))
            .collect()
    }
}

/// A column of any supported type.
#[derive(Debug, Clone)]
pub enum Column {
    Number(TypedColumn<NumberType>),
    Boolean(TypedColumn<BooleanType>),
    Date(TypedColumn<DateType>),
    Time(TypedColumn<TimeType>),
    DateTime(TypedColumn<DateTimeType>),
    ZonedDateTime(TypedColumn<ZonedDateTimeType>),
    String(TypedColumn<StringType>),
}

macro_rules! with_typed_column {
    ($column:expr, $typed:ident => $body:expr) => {
        match $column {
            Column::Number($typed) => $body,
            Column::Boolean($typed) => $body,
            Column::Date($typed) => $body,
            Column::Time($typed) => $body,
            Column::DateTime($typed) => $body,
            Column::ZonedDateTime($typed) => $body,
            Column::String($typed) => $body,
        }
    };
}

impl Column {
    pub fn create(name: impl Into<String>, column_type: ColumnType) -> Self {
        let name = name.into();
        match column_type {
            ColumnType::Number(ty) => Column::Number(TypedColumn::new(name, ty)),
            ColumnType::Boolean(ty) => Column::Boolean(TypedColumn::new(name, ty)),
            ColumnType::Date(ty) => Column::Date(TypedColumn::new(name, ty)),
            ColumnType::Time(ty) => Column::Time(TypedColumn::new(name, ty)),
            ColumnType::DateTime(ty) => Column::DateTime(TypedColumn::new(name, ty)),
            ColumnType::ZonedDateTime(ty) => Column::ZonedDateTime(TypedColumn::new(name, ty)),
            ColumnType::String(ty) => Column::String(TypedColumn::new(name, ty)),
        }
    }

    pub fn name(&self) -> &str {
        with_typed_column!(self, c => &c.name)
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Number(c) => ColumnType::Number(c.column_type.clone()),
            Column::Boolean(c) => ColumnType::Boolean(c.column_type.clone()),
            Column::Date(c) => ColumnType::Date(c.column_type.clone()),
            Column::Time(c) => ColumnType::Time(c.column_type.clone()),
            Column::DateTime(c) => ColumnType::DateTime(c.column_type.clone()),
            Column::ZonedDateTime(c) => ColumnType::ZonedDateTime(c.column_type.clone()),
            Column::String(c) => ColumnType::String(c.column_type.clone()),
        }
    }

    pub fn len(&self) -> usize {
        with_typed_column!(self, c => c.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a raw value. `Null` appends a missing value; a value of another
    /// type is rejected.
    pub fn add(&mut self, value: CellValue) -> Result<()> {
        if value.is_null() {
            with_typed_column!(self, c => c.add(None));
            return Ok(());
        }
        let expected = self.column_type();
        with_typed_column!(self, c => match from_cell(c, &value) {
            Some(typed) => {
                c.add(Some(typed));
                Ok(())
            }
            None => Err(TableError::ValueTypeMismatch {
                column: c.name.clone(),
                expected: expected.descriptor(),
            }),
        })
    }

    pub fn parse_and_add(&mut self, text: Option<&str>) {
        with_typed_column!(self, c => c.parse_and_add(text))
    }

    /// Raw value at a storage position; out-of-range positions read as `Null`.
    pub fn value_at(&self, position: usize) -> CellValue {
        with_typed_column!(self, c => c.get(position).map(|v| to_cell(c, v)).unwrap_or(CellValue::Null))
    }

    pub fn formatted_value(&self, position: usize) -> String {
        with_typed_column!(self, c => c.formatted_value(position))
    }

    /// Raw values in storage order from `start`.
    pub fn values_from(&self, start: usize) -> ColumnValues<'_> {
        ColumnValues {
            column: self,
            position: start,
        }
    }

    /// Formatted values in storage order from `start`.
    pub fn formatted_values_from(&self, start: usize) -> FormattedColumnValues<'_> {
        FormattedColumnValues {
            column: self,
            position: start,
        }
    }

    pub fn sort(&self, order: SortOrder) -> Vec<String> {
        with_typed_column!(self, c => c.sort(order))
    }

    /// Distinct formatted values in sorted order, first occurrence kept.
    pub fn sorted_distinct(&self, order: SortOrder) -> Vec<String> {
        let mut seen = HashSet::new();
        self.sort(order)
            .into_iter()
            .filter(|value| seen.insert(value.clone()))
            .collect()
    }

    pub fn compare_positions(&self, a: usize, b: usize) -> Ordering {
        with_typed_column!(self, c => c.column_type.compare(c.get(a), c.get(b)))
    }
}

fn to_cell<T: ValueType>(_column: &TypedColumn<T>, value: &T::Value) -> CellValue {
    T::to_cell(value)
}

fn from_cell<T: ValueType>(_column: &TypedColumn<T>, value: &CellValue) -> Option<T::Value> {
    T::from_cell(value)
}

/// Raw values of a column from a start offset; single pass.
#[derive(Debug, Clone)]
pub struct ColumnValues<'a> {
    column: &'a Column,
    position: usize,
}

impl Iterator for ColumnValues<'_> {
    type Item = CellValue;

    fn next(&mut self) -> Option<CellValue> {
        if self.position >= self.column.len() {
            return None;
        }
        let value = self.column.value_at(self.position);
        self.position += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.column.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ColumnValues<'_> {}

/// Formatted values of a column from a start offset; single pass.
#[derive(Debug, Clone)]
pub struct FormattedColumnValues<'a> {
    column: &'a Column,
    position: usize,
}

impl Iterator for FormattedColumnValues<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.position >= self.column.len() {
            return None;
        }
        let value = self.column.formatted_value(self.position);
        self.position += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.column.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FormattedColumnValues<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_column(values: &[&str]) -> Column {
        let mut column = Column::create("Sales", ColumnType::number());
        for value in values {
            column.parse_and_add(Some(value));
        }
        column
    }

    #[test]
    fn test_parse_and_add_tolerates_failures() {
        let mut column = Column::create("Sales", ColumnType::number());
        column.parse_and_add(Some("10"));
        column.parse_and_add(Some("ten"));
        column.parse_and_add(None);
        assert_eq!(column.len(), 3);
        assert_eq!(column.value_at(0), CellValue::Number(10.0));
        assert_eq!(column.value_at(1), CellValue::Null);
        assert_eq!(column.formatted_value(2), "");
    }

    #[test]
    fn test_typed_add() {
        let mut column = Column::create("Flag", ColumnType::from_descriptor("boolean").unwrap());
        column.add(CellValue::Boolean(true)).unwrap();
        column.add(CellValue::Null).unwrap();
        let err = column.add(CellValue::Number(1.0)).unwrap_err();
        assert!(matches!(err, TableError::ValueTypeMismatch { .. }));
        assert_eq!(column.len(), 2);
        assert_eq!(column.formatted_value(0), "true");
    }

    #[test]
    fn test_sequences_from_offset() {
        let column = number_column(&["1", "2", "3"]);
        let formatted: Vec<String> = column.formatted_values_from(1).collect();
        assert_eq!(formatted, vec!["2", "3"]);
        let raw: Vec<CellValue> = column.values_from(2).collect();
        assert_eq!(raw, vec![CellValue::Number(3.0)]);
        assert_eq!(column.values_from(5).count(), 0);
    }

    #[test]
    fn test_sort_does_not_mutate() {
        let column = number_column(&["10", "2", "", "7"]);
        assert_eq!(column.sort(SortOrder::Asc), vec!["", "2", "7", "10"]);
        assert_eq!(column.sort(SortOrder::Desc), vec!["10", "7", "2", ""]);
        assert_eq!(column.formatted_value(0), "10");
    }

    #[test]
    fn test_sorted_distinct() {
        let column = number_column(&["3", "1", "3", "2", "1"]);
        assert_eq!(column.sorted_distinct(SortOrder::Asc), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!(SortOrder::from_option(None), SortOrder::Asc);
        assert_eq!(SortOrder::from_option(Some("DESC")), SortOrder::Desc);
        assert_eq!(SortOrder::from_option(Some("sideways")), SortOrder::Asc);
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert!("up".parse::<SortOrder>().is_err());
    }
}
