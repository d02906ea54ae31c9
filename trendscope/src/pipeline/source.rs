//! The seam to the navigation layer.

use async_trait::async_trait;

use crate::document::DocumentAccessor;
use crate::errors::TrendscopeError;

/// Produces an already-rendered document for one extraction pass.
///
/// Browser control, navigation and URL fallbacks live behind this trait.
/// Errors should use [`TrendscopeError::Source`].
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// The document type handed to the cascade.
    type Document: DocumentAccessor;

    /// Name used in logs and span attributes.
    fn name(&self) -> &str;

    /// Loads the document.
    async fn load(&self) -> Result<Self::Document, TrendscopeError>;
}

/// Serves a fixed HTML snapshot.
#[cfg(feature = "html")]
#[derive(Debug, Clone)]
pub struct StaticMarkupSource {
    name: String,
    markup: String,
}

#[cfg(feature = "html")]
impl StaticMarkupSource {
    /// Creates a source serving `markup`.
    #[must_use]
    pub fn new(name: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            markup: markup.into(),
        }
    }
}

#[cfg(feature = "html")]
#[async_trait]
impl DocumentSource for StaticMarkupSource {
    type Document = crate::document::HtmlDocument;

    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<Self::Document, TrendscopeError> {
        Ok(crate::document::HtmlDocument::parse(&self.markup))
    }
}
