//! Document fixtures.

use crate::document::{DomTree, NodeId};

/// One row of a trending-searches table.
#[derive(Debug, Clone)]
pub struct TrendRow {
    /// Text of the title cell.
    pub title: String,
    /// Text of the details cell (volume, recency).
    pub details: String,
}

impl TrendRow {
    /// Creates a row.
    #[must_use]
    pub fn new(title: &str, details: &str) -> Self {
        Self {
            title: title.to_string(),
            details: details.to_string(),
        }
    }
}

/// Builds `table[role=grid] > tbody > tr` rows, the title wrapped in a span.
#[must_use]
pub fn trending_table(rows: &[TrendRow]) -> DomTree {
    let mut tree = DomTree::new();
    let root = tree.root();
    append_table(&mut tree, root, rows);
    tree
}

/// A fuller page: page chrome, the trend table, and a few framework-tagged
/// widgets outside the table.
#[must_use]
pub fn trending_page(rows: &[TrendRow], widgets: &[&str]) -> DomTree {
    let mut tree = DomTree::new();
    let root = tree.root();

    let header = tree.element(root, "div", &[("jscontroller", "hdr")]);
    for label in ["Home", "Explore", "Sign in"] {
        tree.text_element(header, "span", label);
    }

    let main = tree.element(root, "div", &[("data-module-name", "trending")]);
    append_table(&mut tree, main, rows);

    let side = tree.element(root, "div", &[("role", "listitem")]);
    for widget in widgets {
        tree.text_element(side, "span", widget);
    }
    tree
}

fn append_table(tree: &mut DomTree, parent: NodeId, rows: &[TrendRow]) {
    let table = tree.element(parent, "table", &[("role", "grid")]);
    let tbody = tree.element(table, "tbody", &[]);
    for row in rows {
        let tr = tree.element(tbody, "tr", &[]);
        let title_cell = tree.element(tr, "td", &[]);
        tree.text_element(title_cell, "span", &row.title);
        tree.text_element(tr, "td", &row.details);
    }
}
