//! Markup tree model
//!
//! Every tag produced by one parse lives in a single `Document` arena and is
//! referenced by `NodeId`. The parent link is an index too (`None` means the
//! tag sits at document level), so detaching and re-attaching during parent
//! stacking is a plain index rewrite.

use std::collections::BTreeMap;

/// Default attributes applied at tag construction: tag name → attribute → value
pub type DefaultAttributeTable = BTreeMap<String, BTreeMap<String, String>>;

/// Index of a tag inside the document arena
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named attribute with one or more values
///
/// Multiple values are only meaningful for `class`, which accumulates on
/// merge; every other attribute holds exactly one value.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub values: Vec<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            values: vec![value.into()],
        }
    }
}

/// A markup tag
#[derive(Clone, Debug)]
pub struct Tag {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<NodeId>,
    /// Raw text content, may contain `$`-runs substituted at render time
    pub text: Option<String>,
    pub parent: Option<NodeId>,
    /// 1-based rank inside a multiplication group
    pub position: u32,
    /// Size of the multiplication group this tag belongs to
    pub total: u32,
}

impl Tag {
    fn new(name: &str) -> Self {
        Tag {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
            parent: None,
            position: 1,
            total: 1,
        }
    }

    /// Merge an attribute into this tag.
    ///
    /// Same name + `class` concatenates values in order (no de-duplication),
    /// same name otherwise replaces the value, new names are appended.
    pub fn merge_attribute(&mut self, attribute: Attribute) {
        match self
            .attributes
            .iter_mut()
            .find(|a| a.name == attribute.name)
        {
            Some(existing) if existing.name == "class" => {
                existing.values.extend(attribute.values);
            }
            Some(existing) => {
                existing.values = attribute.values;
            }
            None => self.attributes.push(attribute),
        }
    }
}

/// Root container for one parsed abbreviation
#[derive(Debug, Default)]
pub struct Document {
    nodes: Vec<Tag>,
    roots: Vec<NodeId>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Top-level tags in document order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn tag(&self, id: NodeId) -> &Tag {
        &self.nodes[id.index()]
    }

    fn tag_mut(&mut self, id: NodeId) -> &mut Tag {
        &mut self.nodes[id.index()]
    }

    fn push(&mut self, tag: Tag) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(tag);
        id
    }

    /// Create an unattached tag, pre-populated from the default table
    pub fn create_tag(&mut self, name: &str, defaults: &DefaultAttributeTable) -> NodeId {
        let mut tag = Tag::new(name);
        if let Some(table) = defaults.get(name) {
            for (attr, value) in table {
                tag.attributes.push(Attribute::new(attr.clone(), value.clone()));
            }
        }
        self.push(tag)
    }

    /// Attach a tag as the last child of `parent` (document level for `None`)
    pub fn attach(&mut self, parent: Option<NodeId>, child: NodeId) {
        self.tag_mut(child).parent = parent;
        match parent {
            Some(p) => self.tag_mut(p).children.push(child),
            None => self.roots.push(child),
        }
    }

    /// Attach a tag as the sibling immediately following `anchor`
    pub fn attach_after(&mut self, anchor: NodeId, child: NodeId) {
        let parent = self.tag(anchor).parent;
        self.tag_mut(child).parent = parent;
        let siblings = match parent {
            Some(p) => &mut self.tag_mut(p).children,
            None => &mut self.roots,
        };
        let at = siblings
            .iter()
            .position(|&id| id == anchor)
            .map(|i| i + 1)
            .unwrap_or(siblings.len());
        siblings.insert(at, child);
    }

    /// Remove a tag from its parent's child list without clearing its parent
    /// link; the caller re-attaches it immediately.
    pub fn detach(&mut self, child: NodeId) {
        let siblings = match self.tag(child).parent {
            Some(p) => &mut self.tag_mut(p).children,
            None => &mut self.roots,
        };
        siblings.retain(|&id| id != child);
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tag(id).parent
    }

    /// Walk `levels` parent links up, saturating at the document level
    pub fn ancestor(&self, id: NodeId, levels: usize) -> Option<NodeId> {
        let mut current = Some(id);
        for _ in 0..levels {
            current = match current {
                Some(c) => self.parent(c),
                None => return None,
            };
        }
        current
    }

    pub fn add_attribute(&mut self, id: NodeId, attribute: Attribute) {
        self.tag_mut(id).merge_attribute(attribute);
    }

    /// Set the text node, replacing any prior text
    pub fn set_text(&mut self, id: NodeId, text: String) {
        self.tag_mut(id).text = Some(text);
    }

    pub fn set_multiplicity(&mut self, id: NodeId, position: u32, total: u32) {
        let tag = self.tag_mut(id);
        tag.position = position;
        tag.total = total;
    }

    /// Deep-copy a subtree into the arena; the copy is unattached and the
    /// caller attaches it to the correct parent.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let source = self.tag(id).clone();
        let copy = self.push(Tag {
            name: source.name,
            attributes: source.attributes,
            children: Vec::new(),
            text: source.text,
            parent: None,
            position: source.position,
            total: source.total,
        });
        for child in source.children {
            let child_copy = self.clone_subtree(child);
            self.tag_mut(child_copy).parent = Some(copy);
            self.tag_mut(copy).children.push(child_copy);
        }
        copy
    }
}
