//! Windowed iteration over a table in display order.
//!
//! Every iterator is single pass and walks a fixed window of display rows,
//! `start..start + limit`, with the limit clamped to the rows remaining.

use crate::data::column::Column;
use crate::data::datatable::DataTable;
use crate::data::value::CellValue;
use crate::error::{Result, TableError};
use std::iter::FusedIterator;

/// Display rows still to visit.
#[derive(Debug, Clone)]
struct Window {
    next: usize,
    end: usize,
}

impl Window {
    fn new(row_count: usize, start: usize, limit: Option<usize>) -> Result<Self> {
        if start > row_count {
            return Err(TableError::StartOutOfRange { start, row_count });
        }
        let remaining = row_count - start;
        let end = start + limit.map_or(remaining, |limit| limit.min(remaining));
        Ok(Self { next: start, end })
    }

    fn advance(&mut self, order: &[usize]) -> Option<usize> {
        if self.next >= self.end {
            return None;
        }
        let position = order[self.next];
        self.next += 1;
        Some(position)
    }

    fn remaining(&self) -> usize {
        self.end.saturating_sub(self.next)
    }
}

macro_rules! window_iterator {
    (
        $(#[$meta:meta])*
        $name:ident { $($field:ident: $field_ty:ty),* } -> $item:ty,
        |$this:ident, $position:ident| $produce:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name<'a> {
            table: &'a DataTable,
            $($field: $field_ty,)*
            window: Window,
        }

        impl Iterator for $name<'_> {
            type Item = $item;

            fn next(&mut self) -> Option<Self::Item> {
                let $position = self.window.advance(self.table.index_order())?;
                let $this = &*self;
                Some($produce)
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                let remaining = self.window.remaining();
                (remaining, Some(remaining))
            }
        }

        impl ExactSizeIterator for $name<'_> {}

        impl FusedIterator for $name<'_> {}
    };
}

window_iterator!(
    /// Raw rows.
    RowIter {} -> Vec<CellValue>,
    |this, position| this.table.raw_row_at(position)
);

window_iterator!(
    /// Rows with every value formatted to text.
    FormattedRowIter {} -> Vec<String>,
    |this, position| this.table.formatted_row_at(position)
);

window_iterator!(
    /// Raw values of one column.
    ColumnIter { column: &'a Column } -> CellValue,
    |this, position| this.column.value_at(position)
);

window_iterator!(
    /// Formatted values of one column.
    FormattedColumnIter { column: &'a Column } -> String,
    |this, position| this.column.formatted_value(position)
);

impl DataTable {
    fn column_for_iter(&self, column: usize) -> Result<&Column> {
        self.column(column).ok_or(TableError::ColumnOutOfRange {
            index: column,
            column_count: self.column_count(),
        })
    }

    pub fn iter(&self) -> RowIter<'_> {
        RowIter {
            table: self,
            window: Window {
                next: 0,
                end: self.row_count(),
            },
        }
    }

    /// Raw rows from display row `start`, at most `limit` of them.
    /// A start past the last row is an error; a start equal to the row count
    /// yields nothing.
    pub fn iter_window(&self, start: usize, limit: Option<usize>) -> Result<RowIter<'_>> {
        Ok(RowIter {
            table: self,
            window: Window::new(self.row_count(), start, limit)?,
        })
    }

    pub fn formatted_iter(&self) -> FormattedRowIter<'_> {
        FormattedRowIter {
            table: self,
            window: Window {
                next: 0,
                end: self.row_count(),
            },
        }
    }

    pub fn formatted_iter_window(
        &self,
        start: usize,
        limit: Option<usize>,
    ) -> Result<FormattedRowIter<'_>> {
        Ok(FormattedRowIter {
            table: self,
            window: Window::new(self.row_count(), start, limit)?,
        })
    }

    pub fn column_iter(&self, column: usize) -> Result<ColumnIter<'_>> {
        self.column_iter_window(column, 0, None)
    }

    pub fn column_iter_window(
        &self,
        column: usize,
        start: usize,
        limit: Option<usize>,
    ) -> Result<ColumnIter<'_>> {
        Ok(ColumnIter {
            table: self,
            column: self.column_for_iter(column)?,
            window: Window::new(self.row_count(), start, limit)?,
        })
    }

    pub fn formatted_column_iter(&self, column: usize) -> Result<FormattedColumnIter<'_>> {
        self.formatted_column_iter_window(column, 0, None)
    }

    pub fn formatted_column_iter_window(
        &self,
        column: usize,
        start: usize,
        limit: Option<usize>,
    ) -> Result<FormattedColumnIter<'_>> {
        Ok(FormattedColumnIter {
            table: self,
            column: self.column_for_iter(column)?,
            window: Window::new(self.row_count(), start, limit)?,
        })
    }
}

impl<'a> IntoIterator for &'a DataTable {
    type Item = Vec<CellValue>;
    type IntoIter = RowIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
