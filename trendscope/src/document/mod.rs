//! Document accessor capability consumed by the extraction cascade.
//!
//! The navigation layer that renders pages lives outside this crate. What it
//! hands over is anything implementing [`DocumentAccessor`]: structural
//! queries by a [`SelectorPattern`], text of a matched element, its tag kind,
//! its descendant cells and its closest enclosing table row. Two backends
//! ship here:
//!
//! - [`DomTree`]: an in-memory element tree, built programmatically
//! - [`HtmlDocument`]: a parsed HTML snapshot (feature `html`)
//!
//! Class names are deliberately absent from the pattern vocabulary.

mod pattern;
mod tree;

#[cfg(feature = "html")]
mod html;

pub use pattern::{AttrMatch, SelectorPattern, Step};
pub use tree::{DomTree, NodeId};

#[cfg(feature = "html")]
pub use html::HtmlDocument;

use crate::errors::AccessorError;

/// Structural kind of an element, as far as the cascade cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A table row (`tr`).
    Row,
    /// A table cell (`td` or `th`).
    Cell,
    /// Anything else.
    Other,
}

impl ElementKind {
    /// Classifies a tag name (case-insensitive).
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("tr") {
            Self::Row
        } else if tag.eq_ignore_ascii_case("td") || tag.eq_ignore_ascii_case("th") {
            Self::Cell
        } else {
            Self::Other
        }
    }
}

/// Read access to an already-rendered document.
///
/// `Node` is a cheap handle borrowed from the document; handles from one
/// document must not be passed to another.
pub trait DocumentAccessor {
    /// Handle to an element of this document.
    type Node<'a>: Copy
    where
        Self: 'a;

    /// Returns every element matching `pattern`, in document order.
    fn query<'a>(&'a self, pattern: &SelectorPattern) -> Result<Vec<Self::Node<'a>>, AccessorError>;

    /// Returns the full text content of `node` (descendant text concatenated).
    fn text_of<'a>(&'a self, node: Self::Node<'a>) -> Result<String, AccessorError>;

    /// Returns the structural kind of `node`.
    fn kind_of<'a>(&'a self, node: Self::Node<'a>) -> ElementKind;

    /// Returns the `td`/`th` descendants of `node`, in document order.
    fn cells_of<'a>(&'a self, node: Self::Node<'a>) -> Result<Vec<Self::Node<'a>>, AccessorError>;

    /// Returns the closest `tr` that is `node` itself or one of its ancestors.
    fn closest_row<'a>(&'a self, node: Self::Node<'a>) -> Result<Option<Self::Node<'a>>, AccessorError>;
}
