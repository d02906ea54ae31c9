//! Topical classification of trend titles.
//!
//! Classification is pure keyword membership over a [`Taxonomy`]; it never
//! fails and always yields at least one label.

mod classifier;
mod labels;
mod taxonomy;

pub use classifier::{CategoryClassifier, Classification, NICHE_BONUS, TECH_BONUS, TRENDING_BONUS};
pub use labels::CategoryLabel;
pub use taxonomy::{KeywordGroup, Taxonomy};
