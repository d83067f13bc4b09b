//! Configuration module
//!
//! Reader defaults and display settings, loaded from a TOML file.

pub mod config;

pub use config::{Config, DisplayConfig, ReaderConfig};
