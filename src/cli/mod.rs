//! CLI layer - command definitions and output formatting

pub mod commands;
pub mod output;

pub use commands::{Cli, Commands};
pub use output::{format_config, format_error_context};
