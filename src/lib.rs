//! In-memory, column-oriented tables with per-column dynamic typing.
//!
//! Delimited text is read with [`PlainReader`], which infers a type per
//! column, and becomes a [`DataTable`] supporting grouping, stable sorting
//! and windowed iteration in display order.

pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod table_display;

pub use data::column::{Column, SortOrder};
pub use data::datatable::{DataTable, DEFAULT_INDEX_HEADER_NAME, DEFAULT_PRINT_LIMIT};
pub use data::plain_reader::{InputFormatter, InputValidator, PlainReader, ReadStats, RegexFormatter};
pub use data::types::{ColumnType, ValueType};
pub use data::value::CellValue;
pub use error::{Result, TableError};
