//! Error types for emx

use thiserror::Error;

/// Main error type for the emx application
#[derive(Debug, Error)]
pub enum EmxError {
    #[error("Malformed multiplier '{literal}' for '*' at position {position}")]
    MalformedMultiplier { literal: String, position: usize },

    #[error("Operator '{operator}' at position {position} has no tag to apply to")]
    LeadingOperator { operator: char, position: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl EmxError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            EmxError::MalformedMultiplier { .. } => 2,
            EmxError::LeadingOperator { .. } => 3,
            _ => 1,
        }
    }

    /// Position of the offending operator inside the abbreviation, if any
    pub fn position(&self) -> Option<usize> {
        match self {
            EmxError::MalformedMultiplier { position, .. } => Some(*position),
            EmxError::LeadingOperator { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            EmxError::MalformedMultiplier { literal, .. } => {
                format!(
                    "Malformed multiplier: '{}'\n\n\
                    '*' must be followed by a positive integer.\n\
                    Examples:\n\
                    emx 'ul>li*3'\n\
                    emx 'ul>li.item$*5'",
                    literal
                )
            }
            EmxError::LeadingOperator { operator, position } => {
                format!(
                    "Operator '{}' at position {} has no tag to apply to\n\n\
                    Suggestions:\n\
                    • Attribute and text operators (#, ., [, {{, *) need a tag first\n\
                    • Start the abbreviation with a tag name (e.g. 'div#id', not '#id')",
                    operator, position
                )
            }
            EmxError::Config(msg) => {
                format!(
                    "{}\n\n\
                    Valid config keys: stacked_multiplication, jump_start\n\
                    Example: emx config jump_start 2",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using EmxError
pub type Result<T> = std::result::Result<T, EmxError>;
