//! Configuration management
//!
//! The config file is TOML, discovered from an explicit `--config` path, the
//! `EMX_CONFIG` environment variable, or `emx.toml` in the working directory.
//! Missing discovered files fall back to built-in defaults; an explicitly
//! named file must exist.

use crate::domain::DefaultAttributeTable;
use crate::error::{EmxError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Continue `$`-numbering across nested multiplication
    #[serde(default)]
    pub stacked_multiplication: bool,

    /// First jump-marker index; 1 is reserved for the host trigger
    #[serde(default = "default_jump_start")]
    pub jump_start: u32,

    /// Default attribute tables: family → tag name → attribute → value
    #[serde(default)]
    pub defaults: BTreeMap<String, DefaultAttributeTable>,
}

fn default_jump_start() -> u32 {
    2
}

impl Default for Config {
    fn default() -> Self {
        Config {
            stacked_multiplication: false,
            jump_start: default_jump_start(),
            defaults: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Resolve the config file location: explicit path, then `EMX_CONFIG`,
    /// then `emx.toml` in the working directory.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        if let Ok(path) = std::env::var("EMX_CONFIG") {
            return PathBuf::from(path);
        }
        PathBuf::from("emx.toml")
    }

    /// Load configuration, falling back to defaults when no file is found.
    /// An explicitly given path must exist.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None => Self::load_or_default(&Self::resolve_path(None)),
        }
    }

    /// Load config from the given TOML file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EmxError::Config(format!("Config file not found: {}", path.display()))
            } else {
                EmxError::Io(e)
            }
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load config from the given file, or defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the given TOML file
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Default attribute table for a tag family. A family configured in the
    /// file replaces the built-in table of the same name entirely.
    pub fn default_attribute_table(&self, family: &str) -> DefaultAttributeTable {
        if let Some(table) = self.defaults.get(family) {
            return table.clone();
        }
        Self::builtin_family(family).unwrap_or_default()
    }

    /// Built-in tables shipped with emx
    fn builtin_family(family: &str) -> Option<DefaultAttributeTable> {
        match family {
            "html" => {
                let mut table = DefaultAttributeTable::new();
                for (tag, attr) in [
                    ("a", "href"),
                    ("img", "src"),
                    ("img", "alt"),
                    ("input", "type"),
                ] {
                    table
                        .entry(tag.to_string())
                        .or_default()
                        .insert(attr.to_string(), String::new());
                }
                Some(table)
            }
            _ => None,
        }
    }
}
