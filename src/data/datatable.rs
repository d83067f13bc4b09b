//! Column-oriented table with a grouping index and a display order.
//!
//! Rows live in columns at fixed *storage positions*. What callers see as row
//! `i` is `index_order[i]`, so sorting and re-indexing only ever rearrange the
//! index structures, never the column storage.

use crate::data::column::{Column, SortOrder};
use crate::data::type_inference::ColumnTypeGuesser;
use crate::data::types::ColumnType;
use crate::data::value::CellValue;
use crate::error::{Result, TableError};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Name of the synthetic row-ordinal index column.
pub const DEFAULT_INDEX_HEADER_NAME: &str = "###INDEX###";

/// Rows shown by the default preview.
pub const DEFAULT_PRINT_LIMIT: usize = 30;

/// Column currently used for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexColumn {
    /// Storage position rendered as text.
    Ordinal,
    Stored(usize),
}

/// Ordered multi-map from formatted index value to storage positions.
///
/// Keys iterate in bucket creation order; concatenating the buckets in that
/// order always reproduces the table's display order.
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    keys: Vec<String>,
    buckets: Vec<Vec<usize>>,
    lookup: HashMap<String, usize>,
}

impl GroupIndex {
    fn build(order: &[usize], key_of: impl Fn(usize) -> String) -> Self {
        let mut index = Self::default();
        for &position in order {
            index.insert(key_of(position), position);
        }
        index
    }

    /// Appends a position to its key's bucket and returns the bucket slot.
    fn insert(&mut self, key: String, position: usize) -> usize {
        let slot = match self.lookup.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.keys.len();
                self.lookup.insert(key.clone(), slot);
                self.keys.push(key);
                self.buckets.push(Vec::new());
                slot
            }
        };
        self.buckets[slot].push(position);
        slot
    }

    fn positions(&self) -> Vec<usize> {
        self.buckets.iter().flatten().copied().collect()
    }

    /// Re-emits whole buckets in the given key order. Keys missing from the
    /// list keep their relative order at the end.
    fn reordered(mut self, sorted_keys: &[String]) -> Self {
        let mut taken: Vec<Option<Vec<usize>>> = self.buckets.drain(..).map(Some).collect();
        let mut index = Self::default();
        for key in sorted_keys {
            if let Some(bucket) = self.lookup.get(key).and_then(|&slot| taken[slot].take()) {
                index.push_bucket(key.clone(), bucket);
            }
        }
        for (slot, bucket) in taken.into_iter().enumerate() {
            if let Some(bucket) = bucket {
                index.push_bucket(self.keys[slot].clone(), bucket);
            }
        }
        index
    }

    fn push_bucket(&mut self, key: String, bucket: Vec<usize>) {
        self.lookup.insert(key.clone(), self.keys.len());
        self.keys.push(key);
        self.buckets.push(bucket);
    }

    pub fn get(&self, key: &str) -> Option<&[usize]> {
        self.lookup
            .get(key)
            .map(|&slot| self.buckets[slot].as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.keys
            .iter()
            .zip(&self.buckets)
            .map(|(key, bucket)| (key.as_str(), bucket.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Total positions across all buckets.
    pub fn position_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

fn ordinal_key(position: usize) -> String {
    position.to_string()
}

/// An in-memory table of typed columns.
#[derive(Debug, Clone)]
pub struct DataTable {
    columns: Vec<Column>,
    column_index_map: HashMap<String, usize>,
    row_count: usize,
    index_column: IndexColumn,
    index_map: GroupIndex,
    index_order: Vec<usize>,
}

impl DataTable {
    fn empty() -> Self {
        Self {
            columns: Vec::new(),
            column_index_map: HashMap::new(),
            row_count: 0,
            index_column: IndexColumn::Ordinal,
            index_map: GroupIndex::default(),
            index_order: Vec::new(),
        }
    }

    /// Builds a table from rows of text, one type per header.
    ///
    /// Headers without a matching type become `string` columns; extra types
    /// are ignored. When `index_column` is given the table is indexed by it
    /// once all rows are in.
    pub fn from_parts<R, S>(
        data: &[R],
        types: Vec<ColumnType>,
        headers: Vec<String>,
        index_column: Option<&str>,
    ) -> Result<Self>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        if types.is_empty() || headers.is_empty() {
            return Err(TableError::EmptySchema);
        }

        let mut table = Self::empty();
        let mut types = types.into_iter();
        for header in headers {
            let column_type = types.next().unwrap_or_else(ColumnType::string);
            table.add_empty_column(Some(&header), column_type)?;
        }

        for row in data {
            let row: &[S] = row.as_ref();
            table.add_row(row);
        }

        if let Some(name) = index_column {
            table.index(name)?;
        }

        debug!(
            "Built table with {} rows and {} columns",
            table.row_count,
            table.columns.len()
        );
        Ok(table)
    }

    /// Builds a table from rows of text and positional type descriptors.
    ///
    /// Columns whose descriptor is missing or unresolvable are inferred from
    /// the data; headers are padded with positional names.
    pub fn from_type_strings<R, S>(
        data: &[R],
        type_strings: &[&str],
        headers: Vec<String>,
        index_column: Option<&str>,
    ) -> Result<Self>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let predefined: Vec<Option<ColumnType>> = type_strings
            .iter()
            .map(|descriptor| ColumnType::from_descriptor(descriptor))
            .collect();

        let mut guesser = ColumnTypeGuesser::new(predefined);
        for row in data {
            let row: &[S] = row.as_ref();
            guesser.observe_row(row);
        }

        let width = guesser.width();
        if width == 0 {
            return Err(TableError::TypeUndetermined);
        }
        let types = guesser.finish(width);

        let mut headers = headers;
        for position in headers.len()..types.len() {
            headers.push(position.to_string());
        }

        Self::from_parts(data, types, headers, index_column)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Headers in column order.
    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn types(&self) -> Vec<ColumnType> {
        self.columns.iter().map(Column::column_type).collect()
    }

    pub fn type_descriptors(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.column_type().descriptor())
            .collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, position: usize) -> Option<&Column> {
        self.columns.get(position)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_index_map.get(name).copied()
    }

    /// Name of the grouping column, [`DEFAULT_INDEX_HEADER_NAME`] for the
    /// row ordinal.
    pub fn index_column_name(&self) -> &str {
        match self.index_column {
            IndexColumn::Ordinal => DEFAULT_INDEX_HEADER_NAME,
            IndexColumn::Stored(position) => self.columns[position].name(),
        }
    }

    pub fn index_map(&self) -> &GroupIndex {
        &self.index_map
    }

    /// Storage positions in display order.
    pub fn index_order(&self) -> &[usize] {
        &self.index_order
    }

    fn index_key(&self, index_column: IndexColumn, position: usize) -> String {
        match index_column {
            IndexColumn::Ordinal => ordinal_key(position),
            IndexColumn::Stored(column) => self.columns[column].formatted_value(position),
        }
    }

    /// Regroups the current display order under `index_column`. Every index
    /// change goes through here.
    fn rebuild_index(&mut self, index_column: IndexColumn) {
        let index_map = GroupIndex::build(&self.index_order, |position| {
            self.index_key(index_column, position)
        });
        self.index_order = index_map.positions();
        self.index_map = index_map;
        self.index_column = index_column;
    }

    fn resolve_index_column(&self, name: &str) -> Result<IndexColumn> {
        if name == DEFAULT_INDEX_HEADER_NAME {
            return Ok(IndexColumn::Ordinal);
        }
        self.column_index(name)
            .map(IndexColumn::Stored)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    fn check_column(&self, position: usize) -> Result<&Column> {
        self.columns
            .get(position)
            .ok_or(TableError::ColumnOutOfRange {
                index: position,
                column_count: self.columns.len(),
            })
    }

    fn storage_position(&self, row: usize) -> Result<usize> {
        self.index_order
            .get(row)
            .copied()
            .ok_or(TableError::RowOutOfRange {
                index: row,
                row_count: self.row_count,
            })
    }

    /// Appends a row. Each column consumes the field at its position; short
    /// rows leave missing values and extra fields are ignored.
    pub fn add_row<S: AsRef<str>>(&mut self, row: &[S]) {
        let position = self.row_count;
        for (column_position, column) in self.columns.iter_mut().enumerate() {
            column.parse_and_add(row.get(column_position).map(AsRef::as_ref));
        }
        self.row_count += 1;

        let key = self.index_key(self.index_column, position);
        trace!("Row {} joins index bucket '{}'", position, key);
        let slot = self.index_map.insert(key, position);
        if slot + 1 == self.index_map.len() {
            self.index_order.push(position);
        } else {
            // Joined an earlier bucket; display order follows the buckets
            self.index_order = self.index_map.positions();
        }
    }

    /// Appends a column, parsing `data` against existing storage positions.
    /// Missing values fill positions beyond the supplied data. The header
    /// defaults to the current column count.
    pub fn add_column<S: AsRef<str>>(
        &mut self,
        header: Option<&str>,
        column_type: ColumnType,
        data: &[S],
    ) -> Result<()> {
        let header = match header {
            Some(header) => header.to_string(),
            None => self.columns.len().to_string(),
        };
        if header == DEFAULT_INDEX_HEADER_NAME {
            return Err(TableError::ReservedColumnName(header));
        }
        if self.column_index_map.contains_key(&header) {
            return Err(TableError::DuplicateColumn(header));
        }

        let mut column = Column::create(header.clone(), column_type);
        for position in 0..self.row_count {
            column.parse_and_add(data.get(position).map(AsRef::as_ref));
        }

        debug!("Added column '{}' of type {}", header, column.column_type());
        self.column_index_map.insert(header, self.columns.len());
        self.columns.push(column);
        Ok(())
    }

    pub fn add_empty_column(&mut self, header: Option<&str>, column_type: ColumnType) -> Result<()> {
        self.add_column::<&str>(header, column_type, &[])
    }

    /// Like [`add_column`](Self::add_column) with the type given as a
    /// descriptor such as `boolean(yes_no)`.
    pub fn add_column_with_descriptor<S: AsRef<str>>(
        &mut self,
        header: Option<&str>,
        descriptor: &str,
        data: &[S],
    ) -> Result<()> {
        let column_type: ColumnType = descriptor.parse()?;
        self.add_column(header, column_type, data)
    }

    /// Raw values of display row `row`, in column order.
    pub fn get_row(&self, row: usize) -> Result<Vec<CellValue>> {
        let position = self.storage_position(row)?;
        Ok(self.raw_row_at(position))
    }

    pub fn get_formatted_row(&self, row: usize) -> Result<Vec<String>> {
        let position = self.storage_position(row)?;
        Ok(self.formatted_row_at(position))
    }

    /// Raw values of a column in display order.
    pub fn get_column(&self, column: usize) -> Result<Vec<CellValue>> {
        let column = self.check_column(column)?;
        Ok(self
            .index_order
            .iter()
            .map(|&position| column.value_at(position))
            .collect())
    }

    pub fn get_formatted_column(&self, column: usize) -> Result<Vec<String>> {
        let column = self.check_column(column)?;
        Ok(self
            .index_order
            .iter()
            .map(|&position| column.formatted_value(position))
            .collect())
    }

    pub(crate) fn raw_row_at(&self, position: usize) -> Vec<CellValue> {
        self.columns.iter().map(|c| c.value_at(position)).collect()
    }

    pub(crate) fn formatted_row_at(&self, position: usize) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.formatted_value(position))
            .collect()
    }

    /// Switches the grouping column, keeping the current display order within
    /// each group. [`DEFAULT_INDEX_HEADER_NAME`] selects the row ordinal.
    pub fn index(&mut self, name: &str) -> Result<()> {
        let index_column = self.resolve_index_column(name)?;
        debug!("Indexing table by '{}'", name);
        self.rebuild_index(index_column);
        Ok(())
    }

    pub fn index_by_position(&mut self, column: usize) -> Result<()> {
        let name = self.check_column(column)?.name().to_string();
        self.index(&name)
    }

    /// Stable sort of the display order by a column.
    ///
    /// Rows are grouped by the column's formatted values, then whole groups
    /// are emitted in sorted key order, so rows sharing a key keep their
    /// relative order. The grouping column in effect before the call is
    /// restored afterwards.
    pub fn sort(&mut self, name: &str, order: SortOrder) -> Result<()> {
        let sort_column = self.resolve_index_column(name)?;
        let previous = self.index_column;
        if sort_column != previous {
            self.rebuild_index(sort_column);
        }

        let sorted_keys = match sort_column {
            IndexColumn::Ordinal => {
                let mut positions: Vec<usize> = (0..self.row_count).collect();
                if order == SortOrder::Desc {
                    positions.reverse();
                }
                positions.into_iter().map(ordinal_key).collect()
            }
            IndexColumn::Stored(column) => self.columns[column].sorted_distinct(order),
        };

        let index_map = std::mem::take(&mut self.index_map).reordered(&sorted_keys);
        self.index_order = index_map.positions();
        self.index_map = index_map;
        debug!("Sorted {} rows by '{}' ({:?})", self.row_count, name, order);

        if previous != sort_column {
            self.rebuild_index(previous);
        }
        Ok(())
    }

    pub fn sort_by_position(&mut self, column: usize, order: SortOrder) -> Result<()> {
        let name = self.check_column(column)?.name().to_string();
        self.sort(&name, order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales_table() -> DataTable {
        let data = vec![
            vec!["2014-1-1", "Printer", "10"],
            vec!["2014-1-9", "Printer", "2"],
        ];
        DataTable::from_type_strings(
            &data,
            &[],
            vec!["Date".to_string(), "Item".to_string(), "Sales".to_string()],
            None,
        )
        .unwrap()
    }

    fn tiebreak_table() -> DataTable {
        let data = vec![
            vec!["b", "1"],
            vec!["a", "2"],
            vec!["b", "3"],
            vec!["a", "4"],
        ];
        DataTable::from_type_strings(
            &data,
            &["string", "number"],
            vec!["Key".to_string(), "Seq".to_string()],
            None,
        )
        .unwrap()
    }

    fn assert_index_consistent(table: &DataTable) {
        assert_eq!(table.index_order().len(), table.row_count());
        assert_eq!(table.index_map().position_count(), table.row_count());
        let concatenated: Vec<usize> = table
            .index_map()
            .iter()
            .flat_map(|(_, bucket)| bucket.iter().copied())
            .collect();
        assert_eq!(concatenated, table.index_order());
    }

    #[test]
    fn test_factory_types_and_headers() {
        let table = sales_table();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.type_descriptors(), vec!["date(y-M-d)", "string", "number"]);
        assert_eq!(table.headers(), vec!["Date", "Item", "Sales"]);
        assert_eq!(table.index_column_name(), DEFAULT_INDEX_HEADER_NAME);
        assert_eq!(table.index_map().keys().collect::<Vec<_>>(), vec!["0", "1"]);
        assert_index_consistent(&table);
    }

    #[test]
    fn test_factory_rejects_empty_schema() {
        let data: Vec<Vec<&str>> = Vec::new();
        let err = DataTable::from_parts(&data, vec![], vec!["a".to_string()], None).unwrap_err();
        assert_eq!(err, TableError::EmptySchema);
        let err = DataTable::from_type_strings(&data, &[], vec![], None).unwrap_err();
        assert_eq!(err, TableError::TypeUndetermined);
    }

    #[test]
    fn test_factory_pads_headers_and_types() {
        let data = vec![vec!["1", "x", "yes"]];
        let table = DataTable::from_type_strings(&data, &["", "bogus"], vec!["A".to_string()], None)
            .unwrap();
        assert_eq!(table.headers(), vec!["A", "1", "2"]);
        assert_eq!(table.type_descriptors(), vec!["number", "string", "boolean(YES_NO)"]);

        let table = DataTable::from_parts(
            &data,
            vec![ColumnType::number()],
            vec!["A".to_string(), "B".to_string()],
            None,
        )
        .unwrap();
        assert_eq!(table.type_descriptors(), vec!["number", "string"]);
    }

    #[test]
    fn test_factory_with_index_column() {
        let data = vec![vec!["x", "1"], vec!["y", "2"], vec!["x", "3"]];
        let table = DataTable::from_type_strings(
            &data,
            &[],
            vec!["K".to_string(), "V".to_string()],
            Some("K"),
        )
        .unwrap();
        assert_eq!(table.index_column_name(), "K");
        assert_eq!(table.index_map().get("x"), Some(&[0, 2][..]));
        assert_eq!(table.index_order(), &[0, 2, 1]);
        assert_index_consistent(&table);

        let err = DataTable::from_type_strings(&data, &[], vec![], Some("nope")).unwrap_err();
        assert_eq!(err, TableError::UnknownColumn("nope".to_string()));
    }

    #[test]
    fn test_short_rows_fill_missing() {
        let mut table = sales_table();
        table.add_row(&["2014-2-1"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.get_formatted_row(2).unwrap(), vec!["2014-2-1", "", ""]);
        assert_eq!(table.get_row(2).unwrap()[2], CellValue::Null);
        assert_index_consistent(&table);
    }

    #[test]
    fn test_add_column() {
        let mut table = sales_table();
        table
            .add_column_with_descriptor(Some("Flag"), "boolean(yes_no)", &["yes", "no"])
            .unwrap();
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.get_formatted_column(3).unwrap(), vec!["yes", "no"]);

        table.add_column(None, ColumnType::number(), &["5"]).unwrap();
        assert_eq!(table.headers()[4], "4");
        assert_eq!(table.get_formatted_column(4).unwrap(), vec!["5", ""]);
    }

    #[test]
    fn test_add_column_errors_leave_table_untouched() {
        let mut table = sales_table();
        let err = table.add_empty_column(Some("Sales"), ColumnType::number()).unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("Sales".to_string()));
        let err = table
            .add_empty_column(Some(DEFAULT_INDEX_HEADER_NAME), ColumnType::number())
            .unwrap_err();
        assert_eq!(
            err,
            TableError::ReservedColumnName(DEFAULT_INDEX_HEADER_NAME.to_string())
        );
        let err = table
            .add_column_with_descriptor(Some("Bad"), "date(HH:mm)", &["x"])
            .unwrap_err();
        assert_eq!(err, TableError::InvalidType("date(HH:mm)".to_string()));
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn test_bounds_errors() {
        let table = sales_table();
        assert_eq!(
            table.get_row(2).unwrap_err(),
            TableError::RowOutOfRange {
                index: 2,
                row_count: 2
            }
        );
        assert_eq!(
            table.get_formatted_column(3).unwrap_err(),
            TableError::ColumnOutOfRange {
                index: 3,
                column_count: 3
            }
        );
    }

    #[test]
    fn test_sort_ascending_by_sales() {
        let mut table = sales_table();
        table.sort("Sales", SortOrder::Asc).unwrap();
        assert_eq!(table.get_formatted_row(0).unwrap(), vec!["2014-1-9", "Printer", "2"]);
        assert_eq!(table.get_formatted_column(2).unwrap(), vec!["2", "10"]);
        // Grouping column restored
        assert_eq!(table.index_column_name(), DEFAULT_INDEX_HEADER_NAME);
        assert_index_consistent(&table);

        table.sort("Sales", SortOrder::Desc).unwrap();
        assert_eq!(table.get_formatted_column(2).unwrap(), vec!["10", "2"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut table = tiebreak_table();
        table.sort("Key", SortOrder::Asc).unwrap();
        assert_eq!(table.get_formatted_column(1).unwrap(), vec!["2", "4", "1", "3"]);

        table.sort("Key", SortOrder::Desc).unwrap();
        assert_eq!(table.get_formatted_column(1).unwrap(), vec!["1", "3", "2", "4"]);
        assert_index_consistent(&table);
    }

    #[test]
    fn test_sort_by_ordinal_restores_storage_order() {
        let mut table = tiebreak_table();
        table.sort("Key", SortOrder::Asc).unwrap();
        table.sort(DEFAULT_INDEX_HEADER_NAME, SortOrder::Asc).unwrap();
        assert_eq!(table.index_order(), &[0, 1, 2, 3]);
        table.sort(DEFAULT_INDEX_HEADER_NAME, SortOrder::Desc).unwrap();
        assert_eq!(table.index_order(), &[3, 2, 1, 0]);
    }

    #[test]
    fn test_sort_keeps_other_index_column() {
        let mut table = tiebreak_table();
        table.index("Key").unwrap();
        table.sort("Seq", SortOrder::Desc).unwrap();
        assert_eq!(table.index_column_name(), "Key");
        // Regrouped by Key, keeping the Seq-descending order inside each group
        assert_eq!(table.get_formatted_column(1).unwrap(), vec!["4", "2", "3", "1"]);
        assert_index_consistent(&table);
    }

    #[test]
    fn test_index_groups_and_is_idempotent() {
        let mut table = tiebreak_table();
        table.index("Key").unwrap();
        assert_eq!(table.index_column_name(), "Key");
        assert_eq!(table.index_map().keys().collect::<Vec<_>>(), vec!["b", "a"]);
        let order = table.index_order().to_vec();
        table.index("Key").unwrap();
        assert_eq!(table.index_order(), order.as_slice());
        assert_index_consistent(&table);

        table.index(DEFAULT_INDEX_HEADER_NAME).unwrap();
        assert_eq!(table.index_map().len(), 4);
        assert_eq!(table.index_order(), order.as_slice());
    }

    #[test]
    fn test_unknown_column_errors() {
        let mut table = tiebreak_table();
        assert_eq!(
            table.index("Missing").unwrap_err(),
            TableError::UnknownColumn("Missing".to_string())
        );
        assert!(table.sort("Missing", SortOrder::Asc).is_err());
        assert!(table.sort_by_position(9, SortOrder::Asc).is_err());
        assert!(table.index_by_position(9).is_err());
        assert_eq!(table.index_order(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_positional_sort_and_index() {
        let mut table = tiebreak_table();
        table.sort_by_position(0, SortOrder::Asc).unwrap();
        assert_eq!(table.get_formatted_column(1).unwrap(), vec!["2", "4", "1", "3"]);
        table.index_by_position(1).unwrap();
        assert_eq!(table.index_column_name(), "Seq");
    }

    #[test]
    fn test_add_row_joins_existing_bucket() {
        let mut table = tiebreak_table();
        table.index("Key").unwrap();
        table.add_row(&["b", "5"]);
        assert_eq!(table.index_map().get("b"), Some(&[0, 2, 4][..]));
        assert_eq!(table.get_formatted_column(1).unwrap(), vec!["1", "3", "5", "2", "4"]);
        assert_index_consistent(&table);

        table.add_row(&["c", "6"]);
        assert_eq!(table.index_order().last(), Some(&5));
        assert_index_consistent(&table);
    }

    #[test]
    fn test_group_index_reorder_keeps_unlisted_keys() {
        let index = GroupIndex::build(&[0, 1, 2], |p| ["x", "y", "z"][p].to_string());
        let index = index.reordered(&["z".to_string(), "x".to_string()]);
        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["z", "x", "y"]);
        assert_eq!(index.positions(), vec![2, 0, 1]);
    }
}
