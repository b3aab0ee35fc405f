//! Abbreviation expansion use case

use crate::domain::{parse, render, RenderOptions};
use crate::error::Result;
use crate::infrastructure::Config;

/// Per-invocation expansion options, layered over the configuration
#[derive(Clone, Debug)]
pub struct ExpandOptions {
    /// Tag family selecting the default-attribute table
    pub family: String,
    /// Emit numbered jump markers
    pub jump_mode: bool,
    /// Override the configured first marker index
    pub jump_start: Option<u32>,
    /// Force stacked multiplication on for this invocation
    pub stacked: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        ExpandOptions {
            family: "html".to_string(),
            jump_mode: false,
            jump_start: None,
            stacked: false,
        }
    }
}

/// Service expanding abbreviations into rendered markup
pub struct ExpandService {
    config: Config,
}

impl ExpandService {
    /// Create a new expand service
    pub fn new(config: Config) -> Self {
        ExpandService { config }
    }

    /// Expand one abbreviation: select the family's default attributes,
    /// parse, and render with the effective options.
    pub fn execute(&self, abbreviation: &str, options: &ExpandOptions) -> Result<String> {
        let defaults = self.config.default_attribute_table(&options.family);
        let doc = parse(abbreviation, &defaults)?;

        let render_options = RenderOptions {
            jump_mode: options.jump_mode,
            jump_start: options.jump_start.unwrap_or(self.config.jump_start),
            stacked_multiplication: options.stacked || self.config.stacked_multiplication,
        };
        Ok(render(&doc, &render_options))
    }
}
