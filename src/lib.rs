//! emx - Emmet-style abbreviation expander
//!
//! A command-line tool that expands compact markup abbreviations
//! (e.g. `ul>li.item$*3`) into indented tag text, optionally annotated with
//! numbered insertion-point markers for editor tab stops.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::EmxError;
