//! HTML snapshot backend built on `scraper`.
//!
//! The navigation layer can serialize a rendered page (`page.content()` or
//! an equivalent) and hand the markup over; queries then run against the
//! parsed snapshot.

use scraper::{ElementRef, Html, Selector};

use super::{DocumentAccessor, ElementKind, SelectorPattern};
use crate::errors::AccessorError;

const CELL_SELECTOR: &str = "td, th";

/// A parsed HTML document.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parses a full HTML document.
    #[must_use]
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    fn compile(css: &str) -> Result<Selector, AccessorError> {
        Selector::parse(css).map_err(|e| AccessorError::InvalidPattern {
            pattern: css.to_string(),
            reason: format!("{e:?}"),
        })
    }
}

impl DocumentAccessor for HtmlDocument {
    type Node<'a> = ElementRef<'a>;

    fn query<'a>(&'a self, pattern: &SelectorPattern) -> Result<Vec<ElementRef<'a>>, AccessorError> {
        let selector = Self::compile(&pattern.to_css())?;
        Ok(self.html.select(&selector).collect())
    }

    fn text_of<'a>(&'a self, node: ElementRef<'a>) -> Result<String, AccessorError> {
        Ok(node.text().collect())
    }

    fn kind_of<'a>(&'a self, node: ElementRef<'a>) -> ElementKind {
        ElementKind::from_tag(node.value().name())
    }

    fn cells_of<'a>(&'a self, node: ElementRef<'a>) -> Result<Vec<ElementRef<'a>>, AccessorError> {
        let selector = Self::compile(CELL_SELECTOR)?;
        Ok(node.select(&selector).collect())
    }

    fn closest_row<'a>(&'a self, node: ElementRef<'a>) -> Result<Option<ElementRef<'a>>, AccessorError> {
        if ElementKind::from_tag(node.value().name()) == ElementKind::Row {
            return Ok(Some(node));
        }
        Ok(node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| ElementKind::from_tag(el.value().name()) == ElementKind::Row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Step;

    const PAGE: &str = r#"
        <html><body>
          <table role="grid"><tbody>
            <tr><td><span>svelte 5</span></td><td>10K+ searches · 2h ago</td></tr>
            <tr><td><span>bun runtime</span></td><td>5K+ searches · 30m ago</td></tr>
          </tbody></table>
          <div data-ved="x"><span>Menu</span></div>
        </body></html>
    "#;

    const GRID_ROWS: SelectorPattern = SelectorPattern::new(&[
        Step::tag("table").with_attr_value("role", "grid"),
        Step::tag("tbody"),
        Step::tag("tr"),
    ]);

    #[test]
    fn test_query_rows_and_cells() {
        let doc = HtmlDocument::parse(PAGE);
        let rows = doc.query(&GRID_ROWS).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(doc.kind_of(rows[0]), ElementKind::Row);

        let cells = doc.cells_of(rows[1]).unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(doc.text_of(cells[0]).unwrap(), "bun runtime");
    }

    #[test]
    fn test_closest_row_from_span() {
        let doc = HtmlDocument::parse(PAGE);
        const SPANS: SelectorPattern = SelectorPattern::new(&[Step::tag("td"), Step::tag("span")]);
        let spans = doc.query(&SPANS).unwrap();
        let row = doc.closest_row(spans[0]).unwrap().unwrap();
        assert!(doc.text_of(row).unwrap().contains("10K+ searches"));

        const DATA_SPANS: SelectorPattern =
            SelectorPattern::new(&[Step::any().with_attr("data-ved"), Step::tag("span")]);
        let menu = doc.query(&DATA_SPANS).unwrap();
        assert_eq!(menu.len(), 1);
        assert!(doc.closest_row(menu[0]).unwrap().is_none());
    }
}
