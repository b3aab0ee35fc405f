//! Configuration management use case

use crate::error::{EmxError, Result};
use crate::infrastructure::Config;
use std::path::PathBuf;

/// Service for viewing and modifying the configuration file
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Create a config service operating on the given file
    pub fn new(path: PathBuf) -> Self {
        ConfigService { path }
    }

    /// Load the full configuration for listing
    pub fn list(&self) -> Result<Config> {
        Config::load_or_default(&self.path)
    }

    /// Get a single config value as a string
    pub fn get(&self, key: &str) -> Result<String> {
        let config = Config::load_or_default(&self.path)?;
        match key {
            "stacked_multiplication" => Ok(config.stacked_multiplication.to_string()),
            "jump_start" => Ok(config.jump_start.to_string()),
            _ => Err(EmxError::Config(format!("Unknown config key: {}", key))),
        }
    }

    /// Set a single config value, creating the file if needed
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = Config::load_or_default(&self.path)?;
        match key {
            "stacked_multiplication" => {
                config.stacked_multiplication = value.parse().map_err(|_| {
                    EmxError::Config(format!(
                        "Invalid value for stacked_multiplication: '{}' (expected true or false)",
                        value
                    ))
                })?;
            }
            "jump_start" => {
                let start: u32 = value.parse().map_err(|_| {
                    EmxError::Config(format!(
                        "Invalid value for jump_start: '{}' (expected a positive integer)",
                        value
                    ))
                })?;
                if start == 0 {
                    return Err(EmxError::Config(
                        "Invalid value for jump_start: '0' (expected a positive integer)"
                            .to_string(),
                    ));
                }
                config.jump_start = start;
            }
            _ => return Err(EmxError::Config(format!("Unknown config key: {}", key))),
        }
        config.save_to_path(&self.path)
    }
}
