//! Data layer: column types, typed storage and the table engine
//!
//! Text flows one way at load time (lines -> typed columns -> table) and
//! the table then serves row and column access in its display order.

// Types and storage
pub mod column;
pub mod types;
pub mod value;

// Table engine
pub mod datatable;
pub mod iterators;
pub mod table_formatter;
pub mod type_inference;

// Ingestion
pub mod plain_reader;
