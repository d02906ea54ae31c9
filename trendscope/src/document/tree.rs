//! In-memory element tree implementing [`DocumentAccessor`].
//!
//! Built programmatically, so extraction logic can be exercised against a
//! known structure without a browser or an HTML parser.

use super::{DocumentAccessor, ElementKind, SelectorPattern, Step};
use crate::errors::AccessorError;

/// Handle to an element of a [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena index of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
enum Child {
    Element(usize),
    Text(String),
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    parent: Option<usize>,
    children: Vec<Child>,
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An arena-backed element tree rooted at a `body` element.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Element>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Creates a tree containing only the root `body` element.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Element {
                tag: "body".to_string(),
                attrs: Vec::new(),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Returns the root element.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the number of elements, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Appends an element with attributes under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Element {
            tag: tag.to_ascii_lowercase(),
            attrs: attrs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            parent: Some(parent.0),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(Child::Element(id));
        NodeId(id)
    }

    /// Appends an element holding a single text child.
    pub fn text_element(&mut self, parent: NodeId, tag: &str, text: &str) -> NodeId {
        let id = self.element(parent, tag, &[]);
        self.push_text(id, text);
        id
    }

    /// Appends a text run to `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` does not belong to this tree.
    pub fn push_text(&mut self, node: NodeId, text: &str) {
        self.nodes[node.0].children.push(Child::Text(text.to_string()));
    }

    /// Returns the tag name of `node`.
    pub fn tag(&self, node: NodeId) -> Result<&str, AccessorError> {
        Ok(self.get(node.0)?.tag.as_str())
    }

    fn get(&self, index: usize) -> Result<&Element, AccessorError> {
        self.nodes.get(index).ok_or(AccessorError::UnknownNode(index))
    }

    /// Element descendants of `index` in document order, `index` excluded.
    fn descendants(&self, index: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.child_elements(index).rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.child_elements(next).rev());
        }
        out
    }

    fn child_elements(&self, index: usize) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.nodes[index].children.iter().filter_map(|child| match child {
            Child::Element(id) => Some(*id),
            Child::Text(_) => None,
        })
    }

    /// 1-based position of `index` among its parent's element children.
    fn position(&self, index: usize) -> usize {
        self.nodes[index].parent.map_or(1, |parent| {
            self.child_elements(parent)
                .position(|id| id == index)
                .map_or(1, |p| p + 1)
        })
    }

    fn step_matches(&self, step: &Step, index: usize) -> bool {
        let element = &self.nodes[index];
        step.matches(&element.tag, |name| element.attr(name), self.position(index))
    }

    fn pattern_matches(&self, pattern: &SelectorPattern, index: usize) -> bool {
        let Some((last, outer)) = pattern.steps().split_last() else {
            return false;
        };
        if !self.step_matches(last, index) {
            return false;
        }
        // Descendant-only chains: matching each outer step against the
        // nearest qualifying ancestor is sufficient.
        let mut cursor = self.nodes[index].parent;
        for step in outer.iter().rev() {
            loop {
                match cursor {
                    None => return false,
                    Some(ancestor) => {
                        cursor = self.nodes[ancestor].parent;
                        if self.step_matches(step, ancestor) {
                            break;
                        }
                    }
                }
            }
        }
        true
    }

    fn collect_text(&self, index: usize, out: &mut String) {
        for child in &self.nodes[index].children {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Element(id) => self.collect_text(*id, out),
            }
        }
    }
}

impl DocumentAccessor for DomTree {
    type Node<'a> = NodeId;

    fn query<'a>(&'a self, pattern: &SelectorPattern) -> Result<Vec<NodeId>, AccessorError> {
        Ok(self
            .descendants(0)
            .into_iter()
            .filter(|&index| self.pattern_matches(pattern, index))
            .map(NodeId)
            .collect())
    }

    fn text_of<'a>(&'a self, node: NodeId) -> Result<String, AccessorError> {
        self.get(node.0)?;
        let mut text = String::new();
        self.collect_text(node.0, &mut text);
        Ok(text)
    }

    fn kind_of<'a>(&'a self, node: NodeId) -> ElementKind {
        self.nodes
            .get(node.0)
            .map_or(ElementKind::Other, |element| ElementKind::from_tag(&element.tag))
    }

    fn cells_of<'a>(&'a self, node: NodeId) -> Result<Vec<NodeId>, AccessorError> {
        self.get(node.0)?;
        Ok(self
            .descendants(node.0)
            .into_iter()
            .filter(|&index| ElementKind::from_tag(&self.nodes[index].tag) == ElementKind::Cell)
            .map(NodeId)
            .collect())
    }

    fn closest_row<'a>(&'a self, node: NodeId) -> Result<Option<NodeId>, AccessorError> {
        let mut cursor = Some(self.get(node.0).map(|_| node.0)?);
        while let Some(index) = cursor {
            if ElementKind::from_tag(&self.nodes[index].tag) == ElementKind::Row {
                return Ok(Some(NodeId(index)));
            }
            cursor = self.nodes[index].parent;
        }
        Ok(None)
    }
}
