//! Domain layer - tree model, abbreviation parser and renderer

pub mod attributes;
pub mod parser;
pub mod render;
pub mod tree;

pub use parser::parse;
pub use render::{render, RenderOptions};
pub use tree::{Attribute, DefaultAttributeTable, Document, NodeId, Tag};
