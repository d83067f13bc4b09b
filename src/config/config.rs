use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reader: ReaderConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Field delimiter, matched literally
    pub delimiter: String,

    /// Comment prefix; an empty string disables comments
    pub comment: String,

    /// Whether the first non-comment line holds the headers
    pub header: bool,

    /// Positional type descriptors, e.g. "date(y-M-d)"; "" leaves a column to inference
    pub types: Vec<String>,

    /// Positional header names; "" keeps the file's header
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows shown by default
    pub preview_rows: usize,

    /// Render with comfy-table instead of the plain preview
    pub use_comfy_table: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            comment: "#".to_string(),
            header: true,
            types: Vec::new(),
            names: Vec::new(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            preview_rows: 30,
            use_comfy_table: false,
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults when
    /// no file exists
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("typed-table").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn default_toml() -> String {
        r##"# typed-table configuration file
# Location: ~/.config/typed-table/config.toml (Linux)
#           ~/Library/Application Support/typed-table/config.toml (macOS)
#           %APPDATA%\typed-table\config.toml (Windows)

[reader]
# Field delimiter, matched literally ("\t" for tab separated files)
delimiter = ","

# Lines starting with this prefix are skipped; "" disables comments
comment = "#"

# Treat the first non-comment line as the header
header = true

# Per-column type descriptors by position, "" to infer
# types = ["date(y-M-d)", "", "number"]
types = []

# Per-column header names by position, "" to keep the file's header
# names = ["Date"]
names = []

[display]
# Rows shown when printing a table
preview_rows = 30

# Use a comfy-table rendering instead of the plain preview
use_comfy_table = false
"##
        .to_string()
    }
}
