//! Structural selector patterns.
//!
//! A pattern is a chain of [`Step`]s joined by descendant combinators, e.g.
//! `table[role="grid"] tbody tr`. Patterns are `const`-constructible so the
//! ranked strategy list can live in a static table, and they render to CSS
//! for backends that speak it.

use std::fmt;

/// Attribute condition of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrMatch {
    /// The attribute exists (`[name]`).
    Present(&'static str),
    /// The attribute equals a value (`[name="value"]`).
    Equals(&'static str, &'static str),
}

impl AttrMatch {
    fn matches<'v>(&self, lookup: impl Fn(&str) -> Option<&'v str>) -> bool {
        match *self {
            Self::Present(name) => lookup(name).is_some(),
            Self::Equals(name, value) => lookup(name) == Some(value),
        }
    }
}

/// One compound selector in a pattern chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    /// Required tag name, if any.
    pub tag: Option<&'static str>,
    /// Required attribute condition, if any.
    pub attr: Option<AttrMatch>,
    /// Required 1-based position among the parent's element children.
    pub nth_child: Option<usize>,
}

impl Step {
    /// A step matching any element.
    #[must_use]
    pub const fn any() -> Self {
        Self {
            tag: None,
            attr: None,
            nth_child: None,
        }
    }

    /// A step matching a tag name.
    #[must_use]
    pub const fn tag(tag: &'static str) -> Self {
        Self {
            tag: Some(tag),
            attr: None,
            nth_child: None,
        }
    }

    /// Requires the attribute to be present.
    #[must_use]
    pub const fn with_attr(mut self, name: &'static str) -> Self {
        self.attr = Some(AttrMatch::Present(name));
        self
    }

    /// Requires the attribute to equal `value`.
    #[must_use]
    pub const fn with_attr_value(mut self, name: &'static str, value: &'static str) -> Self {
        self.attr = Some(AttrMatch::Equals(name, value));
        self
    }

    /// Requires the element to be the `n`th element child of its parent.
    #[must_use]
    pub const fn nth_child(mut self, n: usize) -> Self {
        self.nth_child = Some(n);
        self
    }

    /// Tests an element described by its tag, attribute lookup and
    /// 1-based element-child position.
    pub fn matches<'v>(
        &self,
        tag: &str,
        lookup: impl Fn(&str) -> Option<&'v str>,
        position: usize,
    ) -> bool {
        if let Some(expected) = self.tag {
            if !expected.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(attr) = self.attr {
            if !attr.matches(lookup) {
                return false;
            }
        }
        self.nth_child.map_or(true, |n| n == position)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.tag, self.attr) {
            (Some(tag), _) => f.write_str(tag)?,
            (None, None) => f.write_str("*")?,
            (None, Some(_)) => {}
        }
        match self.attr {
            Some(AttrMatch::Present(name)) => write!(f, "[{name}]")?,
            Some(AttrMatch::Equals(name, value)) => write!(f, "[{name}=\"{value}\"]")?,
            None => {}
        }
        if let Some(n) = self.nth_child {
            write!(f, ":nth-child({n})")?;
        }
        Ok(())
    }
}

/// A descendant-combinator chain of steps; the last step selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectorPattern {
    steps: &'static [Step],
}

impl SelectorPattern {
    /// Creates a pattern from its steps, outermost first.
    #[must_use]
    pub const fn new(steps: &'static [Step]) -> Self {
        Self { steps }
    }

    /// Returns the steps, outermost first.
    #[must_use]
    pub const fn steps(&self) -> &'static [Step] {
        self.steps
    }

    /// Returns the CSS rendering of this pattern.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SelectorPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}
