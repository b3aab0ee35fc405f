//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "emx")]
#[command(about = "Expand Emmet-style abbreviations into markup", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Abbreviation to expand (e.g. "ul>li.item$*3")
    #[arg(value_name = "ABBREVIATION")]
    pub abbreviation: Option<String>,

    /// Tag family selecting the default-attribute table
    #[arg(short, long, default_value = "html")]
    pub family: String,

    /// Emit numbered jump markers for editor tab stops
    #[arg(short, long)]
    pub jump: bool,

    /// First jump marker index (default from config, falling back to 2)
    #[arg(long, value_name = "N")]
    pub jump_start: Option<u32>,

    /// Continue $-numbering across nested multiplication
    #[arg(long)]
    pub stacked: bool,

    /// Path to the config file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },
}
