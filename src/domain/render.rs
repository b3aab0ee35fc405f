//! Tree renderer
//!
//! Serializes a parsed document as tab-indented tag text. Plain mode emits
//! the bare markup; jump mode additionally numbers every attribute value,
//! text value and empty tag body with a marker (`$N` when empty,
//! `${N:content}` otherwise) so a host editor can register tab stops. Both
//! modes are byte-identical apart from the markers.

use crate::domain::tree::{Document, NodeId};

/// Rendering configuration, threaded through one render call
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Emit numbered insertion-point markers
    pub jump_mode: bool,
    /// First marker index; 1 is conventionally reserved for the host trigger
    pub jump_start: u32,
    /// Continue `$`-numbering across nested multiplication instead of
    /// restarting per outer repetition
    pub stacked_multiplication: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            jump_mode: false,
            jump_start: 2,
            stacked_multiplication: false,
        }
    }
}

/// Render the document as indented markup, top-level tags joined by newlines.
pub fn render(doc: &Document, options: &RenderOptions) -> String {
    let mut slot = options.jump_start;
    let mut parts = Vec::with_capacity(doc.roots().len());
    for &id in doc.roots() {
        parts.push(render_tag(doc, id, 0, 1, options, &mut slot));
    }
    parts.join("\n")
}

fn render_tag(
    doc: &Document,
    id: NodeId,
    depth: usize,
    parent_position: u32,
    options: &RenderOptions,
    slot: &mut u32,
) -> String {
    let tag = doc.tag(id);
    let position = if options.stacked_multiplication {
        (parent_position - 1) * tag.total + tag.position
    } else {
        tag.position
    };

    let indent = "\t".repeat(depth);
    let mut out = format!("{}<{}", indent, tag.name);
    for attribute in &tag.attributes {
        let content = substitute_numbering(&attribute.values.join(" "), position);
        out.push_str(&format!(" {}=\"{}\"", attribute.name, emit_slot(content, options, slot)));
    }
    out.push('>');

    if let Some(raw) = &tag.text {
        let content = substitute_numbering(raw, position);
        out.push_str(&emit_slot(content, options, slot));
    }

    if !tag.children.is_empty() {
        let mut lines = Vec::with_capacity(tag.children.len());
        for &child in &tag.children {
            lines.push(render_tag(doc, child, depth + 1, position, options, slot));
        }
        out.push('\n');
        out.push_str(&lines.join("\n"));
        out.push('\n');
        out.push_str(&indent);
    } else if tag.text.is_none() {
        // Empty body is itself a jump slot.
        out.push_str(&emit_slot(String::new(), options, slot));
    }

    out.push_str(&format!("</{}>", tag.name));
    out
}

/// Wrap slot content in a jump marker, or pass it through in plain mode.
fn emit_slot(content: String, options: &RenderOptions, slot: &mut u32) -> String {
    if !options.jump_mode {
        return content;
    }
    let index = *slot;
    *slot += 1;
    if content.is_empty() {
        format!("${}", index)
    } else {
        format!("${{{}:{}}}", index, content)
    }
}

/// Replace every maximal run of `p` dollar signs with the position,
/// zero-padded to width `p`.
fn substitute_numbering(raw: &str, position: u32) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '$' {
            let mut width = 1;
            while chars.next_if_eq(&'$').is_some() {
                width += 1;
            }
            out.push_str(&format!("{:0width$}", position, width = width));
        } else {
            out.push(c);
        }
    }
    out
}
