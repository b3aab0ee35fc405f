//! Abbreviation parser
//!
//! Single pass over the abbreviation string. Non-operator characters collect
//! in a buffer; each operator character first applies the pending operator to
//! the buffered literal, then becomes the new pending operator. `[...]` and
//! `{...}` switch the scanner into a literal-capture mode where operator
//! characters and spaces pass through verbatim.
//!
//! Consecutive `^` characters merge into a single `Parent` operator with a
//! level count instead of composing closures; all ancestor walks saturate at
//! the document level. Positions reported in errors are character offsets
//! into the abbreviation.

use crate::domain::attributes::parse_attributes;
use crate::domain::tree::{Attribute, DefaultAttributeTable, Document, NodeId};
use crate::error::{EmxError, Result};

/// Parse an abbreviation into a document tree.
///
/// `defaults` pre-populates attributes per tag name at construction time
/// (e.g. anchors getting an empty `href`). A failed parse yields no document.
pub fn parse(abbreviation: &str, defaults: &DefaultAttributeTable) -> Result<Document> {
    let mut parser = Parser::new(defaults);
    let mut capture: Option<Capture> = None;

    for (at, c) in abbreviation.chars().enumerate() {
        if let Some(open) = capture.as_mut() {
            if c == open.kind.close() {
                let done = capture.take().unwrap();
                parser.dispatch_capture(done)?;
            } else {
                open.content.push(c);
            }
            continue;
        }
        match c {
            '>' => parser.operator(Op::Child, at)?,
            '+' => parser.operator(Op::Sibling, at)?,
            '^' => parser.operator(Op::Parent { levels: 1 }, at)?,
            '#' => parser.operator(Op::Id, at)?,
            '.' => parser.operator(Op::Class, at)?,
            '*' => parser.operator(Op::Multiply, at)?,
            // Reserved by the grammar, accepted without effect.
            '(' | ')' | ']' | '}' | '@' => parser.operator(Op::Inert, at)?,
            '[' => {
                parser.flush()?;
                capture = Some(Capture::new(CaptureKind::Attributes, at));
            }
            '{' => {
                parser.flush()?;
                capture = Some(Capture::new(CaptureKind::Text, at));
            }
            c if c.is_whitespace() => {}
            _ => parser.buffer.push(c),
        }
    }

    // End of input closes an open bracket or brace with whatever was captured.
    if let Some(open) = capture.take() {
        parser.dispatch_capture(open)?;
    }
    parser.flush()?;

    Ok(parser.doc)
}

/// Deferred binary operator awaiting its right-hand literal
#[derive(Clone, Copy, Debug)]
enum Op {
    Child,
    Sibling,
    Parent { levels: usize },
    Id,
    Class,
    Multiply,
    Inert,
}

#[derive(Clone, Copy, Debug)]
enum CaptureKind {
    Attributes,
    Text,
}

impl CaptureKind {
    fn close(self) -> char {
        match self {
            CaptureKind::Attributes => ']',
            CaptureKind::Text => '}',
        }
    }

    fn symbol(self) -> char {
        match self {
            CaptureKind::Attributes => '[',
            CaptureKind::Text => '{',
        }
    }
}

struct Capture {
    kind: CaptureKind,
    content: String,
    opened_at: usize,
}

impl Capture {
    fn new(kind: CaptureKind, opened_at: usize) -> Self {
        Capture {
            kind,
            content: String::new(),
            opened_at,
        }
    }
}

/// The tag or group the next literal applies to
#[derive(Clone, Debug)]
enum Cursor {
    Root,
    One(NodeId),
    Many(Vec<NodeId>),
}

impl Cursor {
    /// A single-element result collapses back to `One`, so chained operators
    /// treat a just-created group transparently as one node.
    fn from_ids(mut ids: Vec<NodeId>) -> Self {
        match ids.len() {
            0 => Cursor::Root,
            1 => Cursor::One(ids.remove(0)),
            _ => Cursor::Many(ids),
        }
    }

    fn members(&self) -> Vec<NodeId> {
        match self {
            Cursor::Root => Vec::new(),
            Cursor::One(id) => vec![*id],
            Cursor::Many(ids) => ids.clone(),
        }
    }
}

struct Parser<'a> {
    doc: Document,
    defaults: &'a DefaultAttributeTable,
    cursor: Cursor,
    pending: Option<(Op, usize)>,
    buffer: String,
}

impl<'a> Parser<'a> {
    fn new(defaults: &'a DefaultAttributeTable) -> Self {
        Parser {
            doc: Document::new(),
            defaults,
            cursor: Cursor::Root,
            pending: None,
            buffer: String::new(),
        }
    }

    /// Apply the pending operator to the buffered literal, or create the
    /// abbreviation's first top-level tag when no operator has been seen yet.
    fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        if let Some((op, at)) = self.pending.take() {
            let literal = std::mem::take(&mut self.buffer);
            self.cursor = self.apply(op, &literal, at)?;
        } else if matches!(self.cursor, Cursor::Root) {
            let literal = std::mem::take(&mut self.buffer);
            let id = self.doc.create_tag(&literal, self.defaults);
            self.doc.attach(None, id);
            self.cursor = Cursor::One(id);
        }
        Ok(())
    }

    fn operator(&mut self, op: Op, at: usize) -> Result<()> {
        self.flush()?;
        self.pending = match (self.pending.take(), op) {
            // Repeated '^' climbs one extra ancestor level per character.
            (Some((Op::Parent { levels }, first)), Op::Parent { .. }) => {
                Some((Op::Parent { levels: levels + 1 }, first))
            }
            // Other back-to-back operators are undefined by the grammar; the
            // most recent one wins.
            _ => Some((op, at)),
        };
        Ok(())
    }

    fn apply(&mut self, op: Op, literal: &str, at: usize) -> Result<Cursor> {
        match op {
            Op::Child => {
                let parents: Vec<Option<NodeId>> = match &self.cursor {
                    Cursor::Root => vec![None],
                    Cursor::One(id) => vec![Some(*id)],
                    Cursor::Many(ids) => ids.iter().map(|&id| Some(id)).collect(),
                };
                Ok(Cursor::from_ids(self.attach_new(literal, &parents)))
            }
            Op::Sibling => {
                let parents = self.unique_ancestors(1);
                Ok(Cursor::from_ids(self.attach_new(literal, &parents)))
            }
            Op::Parent { levels } => {
                // Attach at each unique grandparent of the group, then climb
                // the remaining levels one tag at a time.
                let parents = self.unique_ancestors(2);
                let produced = self.attach_new(literal, &parents);
                for _ in 1..levels {
                    for &id in &produced {
                        if let Some(old_parent) = self.doc.parent(id) {
                            let new_parent = self.doc.parent(old_parent);
                            self.doc.detach(id);
                            self.doc.attach(new_parent, id);
                        }
                    }
                }
                Ok(Cursor::from_ids(produced))
            }
            Op::Id => self.merge_attribute(Attribute::new("id", literal), '#', at),
            Op::Class => self.merge_attribute(Attribute::new("class", literal), '.', at),
            Op::Multiply => self.multiply(literal, at),
            Op::Inert => Ok(self.cursor.clone()),
        }
    }

    /// Create one tag per attachment target; `None` targets the document.
    fn attach_new(&mut self, name: &str, parents: &[Option<NodeId>]) -> Vec<NodeId> {
        let mut produced = Vec::with_capacity(parents.len());
        for &parent in parents {
            let id = self.doc.create_tag(name, self.defaults);
            self.doc.attach(parent, id);
            produced.push(id);
        }
        produced
    }

    /// Ancestors of the cursor members at the given level, de-duplicated in
    /// first-seen order (the group's virtual parent set). The document root's
    /// ancestors saturate at the document.
    fn unique_ancestors(&self, levels: usize) -> Vec<Option<NodeId>> {
        let members = self.cursor.members();
        if members.is_empty() {
            return vec![None];
        }
        let mut out = Vec::new();
        for id in members {
            let ancestor = self.doc.ancestor(id, levels);
            if !out.contains(&ancestor) {
                out.push(ancestor);
            }
        }
        out
    }

    fn merge_attribute(&mut self, attribute: Attribute, operator: char, at: usize) -> Result<Cursor> {
        let members = self.require_members(operator, at)?;
        for id in members {
            self.doc.add_attribute(id, attribute.clone());
        }
        Ok(self.cursor.clone())
    }

    fn require_members(&self, operator: char, at: usize) -> Result<Vec<NodeId>> {
        let members = self.cursor.members();
        if members.is_empty() {
            return Err(EmxError::LeadingOperator {
                operator,
                position: at,
            });
        }
        Ok(members)
    }

    /// Expand every cursor member into `count` positioned instances.
    ///
    /// A member carrying `(position p, total t)` from an earlier
    /// multiplication is renumbered to `((p-1)*count + i, t*count)`, which
    /// makes nested multiplication compose as a Cartesian expansion; a fresh
    /// tag at `(1, 1)` simply becomes position 1 of `count`. Clones are
    /// inserted as siblings immediately after their source.
    fn multiply(&mut self, literal: &str, at: usize) -> Result<Cursor> {
        let count: u32 = literal
            .trim()
            .parse()
            .ok()
            .filter(|&n| n >= 1)
            .ok_or_else(|| EmxError::MalformedMultiplier {
                literal: literal.to_string(),
                position: at,
            })?;
        let members = self.require_members('*', at)?;

        let mut result = Vec::with_capacity(members.len() * count as usize);
        for id in members {
            let (position, total) = {
                let tag = self.doc.tag(id);
                (tag.position, tag.total)
            };
            let base = (position - 1) * count;
            self.doc.set_multiplicity(id, base + 1, total * count);
            result.push(id);

            let mut anchor = id;
            for i in 2..=count {
                let copy = self.doc.clone_subtree(id);
                self.doc.set_multiplicity(copy, base + i, total * count);
                self.doc.attach_after(anchor, copy);
                anchor = copy;
                result.push(copy);
            }
        }
        Ok(Cursor::from_ids(result))
    }

    fn dispatch_capture(&mut self, capture: Capture) -> Result<()> {
        let members = self.require_members(capture.kind.symbol(), capture.opened_at)?;
        match capture.kind {
            CaptureKind::Attributes => {
                let attributes = parse_attributes(&capture.content);
                for &id in &members {
                    for attribute in &attributes {
                        self.doc.add_attribute(id, attribute.clone());
                    }
                }
            }
            CaptureKind::Text => {
                for id in members {
                    self.doc.set_text(id, capture.content.clone());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tree::Tag;

    fn parse_plain(abbreviation: &str) -> Document {
        parse(abbreviation, &DefaultAttributeTable::new()).unwrap()
    }

    fn root_tag<'d>(doc: &'d Document, index: usize) -> &'d Tag {
        doc.tag(doc.roots()[index])
    }

    #[test]
    fn test_empty_abbreviation_yields_empty_document() {
        let doc = parse_plain("");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_single_tag() {
        let doc = parse_plain("html");
        assert_eq!(doc.roots().len(), 1);
        assert_eq!(root_tag(&doc, 0).name, "html");
        assert!(root_tag(&doc, 0).children.is_empty());
    }

    #[test]
    fn test_child_chain() {
        let doc = parse_plain("html>body>p");
        let html = root_tag(&doc, 0);
        assert_eq!(html.name, "html");
        assert_eq!(html.children.len(), 1);
        let body = doc.tag(html.children[0]);
        assert_eq!(body.name, "body");
        let p = doc.tag(body.children[0]);
        assert_eq!(p.name, "p");
        assert_eq!(p.parent, Some(html.children[0]));
    }

    #[test]
    fn test_sibling_at_top_level() {
        let doc = parse_plain("html+body");
        assert_eq!(doc.roots().len(), 2);
        assert_eq!(root_tag(&doc, 0).name, "html");
        assert_eq!(root_tag(&doc, 1).name, "body");
    }

    #[test]
    fn test_parent_operator_climbs_one_level() {
        let doc = parse_plain("html>body>p^head");
        let html = root_tag(&doc, 0);
        let names: Vec<&str> = html
            .children
            .iter()
            .map(|&id| doc.tag(id).name.as_str())
            .collect();
        assert_eq!(names, vec!["body", "head"]);
    }

    #[test]
    fn test_stacked_parent_operator_climbs_to_top() {
        let doc = parse_plain("html>body>p^^head");
        assert_eq!(doc.roots().len(), 2);
        assert_eq!(root_tag(&doc, 1).name, "head");
    }

    #[test]
    fn test_class_accumulates_into_one_attribute() {
        let doc = parse_plain("div.a.b");
        let div = root_tag(&doc, 0);
        assert_eq!(div.attributes.len(), 1);
        assert_eq!(div.attributes[0].name, "class");
        assert_eq!(div.attributes[0].values, vec!["a", "b"]);
    }

    #[test]
    fn test_repeated_id_replaces_value() {
        let doc = parse_plain("html#id#id2");
        let html = root_tag(&doc, 0);
        assert_eq!(html.attributes.len(), 1);
        assert_eq!(html.attributes[0].values, vec!["id2"]);
    }

    #[test]
    fn test_multiplication_count_invariant() {
        let doc = parse_plain("li*3");
        assert_eq!(doc.roots().len(), 3);
        for (index, &id) in doc.roots().iter().enumerate() {
            let tag = doc.tag(id);
            assert_eq!(tag.position, index as u32 + 1);
            assert_eq!(tag.total, 3);
        }
    }

    #[test]
    fn test_multiplication_clones_subtrees() {
        let doc = parse_plain("html*2>body");
        assert_eq!(doc.roots().len(), 2);
        for &id in doc.roots() {
            let html = doc.tag(id);
            assert_eq!(html.children.len(), 1);
            assert_eq!(doc.tag(html.children[0]).name, "body");
        }
    }

    #[test]
    fn test_nested_multiplication_renumbers_globally() {
        let doc = parse_plain("a*2*3");
        assert_eq!(doc.roots().len(), 6);
        for (index, &id) in doc.roots().iter().enumerate() {
            let tag = doc.tag(id);
            assert_eq!(tag.position, index as u32 + 1);
            assert_eq!(tag.total, 6);
        }
    }

    #[test]
    fn test_multiplication_after_child_restarts_per_parent() {
        let doc = parse_plain("ul*2>li*2");
        for &ul in doc.roots() {
            let children = &doc.tag(ul).children;
            assert_eq!(children.len(), 2);
            for (index, &li) in children.iter().enumerate() {
                assert_eq!(doc.tag(li).position, index as u32 + 1);
                assert_eq!(doc.tag(li).total, 2);
            }
        }
    }

    #[test]
    fn test_parent_from_group_merges_on_shared_ancestor() {
        // Both bodies share the document as grandparent: one html2 results.
        let doc = parse_plain("html*2>body^html2");
        assert_eq!(doc.roots().len(), 3);
        assert_eq!(root_tag(&doc, 2).name, "html2");
    }

    #[test]
    fn test_parent_from_group_with_distinct_ancestors() {
        // Each h1 climbs to its own html: one html2 per html.
        let doc = parse_plain("html*2>body>h1^html2");
        assert_eq!(doc.roots().len(), 2);
        for &id in doc.roots() {
            let names: Vec<&str> = doc
                .tag(id)
                .children
                .iter()
                .map(|&c| doc.tag(c).name.as_str())
                .collect();
            assert_eq!(names, vec!["body", "html2"]);
        }
    }

    #[test]
    fn test_double_parent_from_group_moves_each_tag_up() {
        let doc = parse_plain("html*2>body>h1^^html2");
        let names: Vec<&str> = doc
            .roots()
            .iter()
            .map(|&id| doc.tag(id).name.as_str())
            .collect();
        assert_eq!(names, vec!["html", "html", "html2", "html2"]);
    }

    #[test]
    fn test_bracket_attributes_merge_into_tag() {
        let doc = parse_plain("input[type=text name=user]");
        let input = root_tag(&doc, 0);
        assert_eq!(input.attributes.len(), 2);
        assert_eq!(input.attributes[0].name, "type");
        assert_eq!(input.attributes[0].values, vec!["text"]);
        assert_eq!(input.attributes[1].name, "name");
    }

    #[test]
    fn test_unterminated_bracket_closed_at_end_of_input() {
        let doc = parse_plain("a[href=x");
        let a = root_tag(&doc, 0);
        assert_eq!(a.attributes[0].name, "href");
        assert_eq!(a.attributes[0].values, vec!["x"]);
    }

    #[test]
    fn test_text_replaces_prior_text() {
        let doc = parse_plain("p{first}{second}");
        assert_eq!(root_tag(&doc, 0).text.as_deref(), Some("second"));
    }

    #[test]
    fn test_text_preserves_spaces_and_operators() {
        let doc = parse_plain("p{item nr. $ > next}");
        assert_eq!(root_tag(&doc, 0).text.as_deref(), Some("item nr. $ > next"));
    }

    #[test]
    fn test_whitespace_outside_regions_skipped() {
        let doc = parse_plain("html > body");
        let html = root_tag(&doc, 0);
        assert_eq!(html.name, "html");
        assert_eq!(doc.tag(html.children[0]).name, "body");
    }

    #[test]
    fn test_reserved_grouping_operators_are_inert() {
        let doc = parse_plain("a(b)");
        assert_eq!(doc.roots().len(), 1);
        assert_eq!(root_tag(&doc, 0).name, "a");
    }

    #[test]
    fn test_defaults_are_applied_and_overridable() {
        let mut defaults = DefaultAttributeTable::new();
        defaults
            .entry("a".to_string())
            .or_default()
            .insert("href".to_string(), String::new());

        let doc = parse("a", &defaults).unwrap();
        assert_eq!(root_tag(&doc, 0).attributes[0].values, vec![""]);

        let doc = parse("a[href=x]", &defaults).unwrap();
        assert_eq!(root_tag(&doc, 0).attributes.len(), 1);
        assert_eq!(root_tag(&doc, 0).attributes[0].values, vec!["x"]);
    }

    #[test]
    fn test_leading_child_operator_attaches_at_document() {
        let doc = parse_plain(">html");
        assert_eq!(doc.roots().len(), 1);
        assert_eq!(root_tag(&doc, 0).name, "html");
    }

    #[test]
    fn test_leading_id_is_an_error() {
        let err = parse("#id", &DefaultAttributeTable::new()).unwrap_err();
        match err {
            EmxError::LeadingOperator { operator, position } => {
                assert_eq!(operator, '#');
                assert_eq!(position, 0);
            }
            other => panic!("Expected LeadingOperator, got {:?}", other),
        }
    }

    #[test]
    fn test_leading_text_is_an_error() {
        let err = parse("{text}", &DefaultAttributeTable::new()).unwrap_err();
        assert!(matches!(
            err,
            EmxError::LeadingOperator { operator: '{', .. }
        ));
    }

    #[test]
    fn test_malformed_multiplier_is_an_error() {
        let err = parse("li*x", &DefaultAttributeTable::new()).unwrap_err();
        match err {
            EmxError::MalformedMultiplier { literal, position } => {
                assert_eq!(literal, "x");
                assert_eq!(position, 2);
            }
            other => panic!("Expected MalformedMultiplier, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_multiplier_is_an_error() {
        let err = parse("li*0", &DefaultAttributeTable::new()).unwrap_err();
        assert!(matches!(err, EmxError::MalformedMultiplier { .. }));
    }

    #[test]
    fn test_trailing_operator_without_literal_ignored() {
        let doc = parse_plain("html>");
        assert_eq!(doc.roots().len(), 1);
        assert!(root_tag(&doc, 0).children.is_empty());
    }
}
