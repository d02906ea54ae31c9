//! Ranked selector cascade.
//!
//! Strategies run from the most structurally specific to the last-resort
//! leaf span. They are not short-circuited: each one may contribute titles
//! the earlier ones missed, while a seen-title set shared by the whole pass
//! keeps a weaker strategy from re-emitting what a stronger one found.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use super::auxiliary::AuxiliaryFields;
use super::normalizer::{TextNormalizer, Verdict};
use crate::config::ExtractionConfig;
use crate::document::{DocumentAccessor, ElementKind, SelectorPattern, Step};
use crate::errors::{AccessorError, TrendscopeError};

/// A named extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    /// Human-readable name for logs.
    pub name: &'static str,
    /// Pattern selecting candidate elements.
    pub pattern: SelectorPattern,
}

impl Strategy {
    /// Creates a strategy from a name and a static step list.
    #[must_use]
    pub const fn new(name: &'static str, steps: &'static [Step]) -> Self {
        Self {
            name,
            pattern: SelectorPattern::new(steps),
        }
    }
}

/// Default strategies, most specific first. No class names anywhere.
pub const DEFAULT_STRATEGIES: &[Strategy] = &[
    Strategy::new(
        "grid rows",
        &[
            Step::tag("table").with_attr_value("role", "grid"),
            Step::tag("tbody"),
            Step::tag("tr"),
        ],
    ),
    Strategy::new("table rows", &[Step::tag("table"), Step::tag("tbody"), Step::tag("tr")]),
    Strategy::new(
        "grid cell spans",
        &[
            Step::tag("table").with_attr_value("role", "grid"),
            Step::tag("tbody"),
            Step::tag("tr"),
            Step::tag("td"),
            Step::tag("span"),
        ],
    ),
    Strategy::new(
        "table cell spans",
        &[
            Step::tag("table"),
            Step::tag("tbody"),
            Step::tag("tr"),
            Step::tag("td"),
            Step::tag("span"),
        ],
    ),
    Strategy::new(
        "first cell spans",
        &[
            Step::tag("table"),
            Step::tag("tr"),
            Step::tag("td").nth_child(1),
            Step::tag("span"),
        ],
    ),
    Strategy::new("data-ved spans", &[Step::any().with_attr("data-ved"), Step::tag("span")]),
    Strategy::new("data-hveid spans", &[Step::any().with_attr("data-hveid"), Step::tag("span")]),
    Strategy::new("jsname spans", &[Step::any().with_attr("jsname"), Step::tag("span")]),
    Strategy::new(
        "jscontroller spans",
        &[Step::any().with_attr("jscontroller"), Step::tag("span")],
    ),
    Strategy::new(
        "listitem spans",
        &[Step::any().with_attr_value("role", "listitem"), Step::tag("span")],
    ),
    Strategy::new(
        "button role spans",
        &[Step::any().with_attr_value("role", "button"), Step::tag("span")],
    ),
    Strategy::new("td spans", &[Step::tag("td"), Step::tag("span")]),
    Strategy::new("th spans", &[Step::tag("th"), Step::tag("span")]),
    Strategy::new("button spans", &[Step::tag("button"), Step::tag("span")]),
    Strategy::new(
        "module spans",
        &[Step::tag("div").with_attr("data-module-name"), Step::tag("span")],
    ),
    Strategy::new("first cells", &[Step::tag("table"), Step::tag("td").nth_child(1)]),
    Strategy::new("second cells", &[Step::tag("table"), Step::tag("td").nth_child(2)]),
    Strategy::new("leaf spans", &[Step::tag("div"), Step::tag("span")]),
];

/// An unverified record produced by one extraction pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCandidate {
    /// Cleaned title text.
    pub title: String,
    /// Search volume or `N/A`.
    pub volume: String,
    /// Recency or `N/A`.
    pub time_ago: String,
    /// Which strategy produced it (`selector_<n>`, 1-based).
    pub source_tag: String,
    /// Index of the element among its strategy's matches.
    pub position_hint: usize,
}

/// Runs the ranked strategies over a document.
#[derive(Debug, Clone)]
pub struct SelectorCascade {
    strategies: Vec<Strategy>,
    max_candidates: usize,
    normalizer: TextNormalizer,
}

impl Default for SelectorCascade {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

impl SelectorCascade {
    /// Creates a cascade with the default strategies and the given limits.
    #[must_use]
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            strategies: DEFAULT_STRATEGIES.to_vec(),
            max_candidates: config.max_candidates,
            normalizer: TextNormalizer::new(config.min_title_chars),
        }
    }

    /// Replaces the strategy list.
    #[must_use]
    pub fn with_strategies(mut self, strategies: Vec<Strategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Returns the strategies in rank order.
    #[must_use]
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Returns the candidate cap.
    #[must_use]
    pub const fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    /// Extracts up to `max_candidates` accepted candidates from `doc`.
    ///
    /// A failing element is logged and skipped; a failing query aborts the
    /// pass with [`TrendscopeError::Extraction`].
    pub fn extract<D>(&self, doc: &D) -> Result<Vec<RawCandidate>, TrendscopeError>
    where
        D: DocumentAccessor + ?Sized,
    {
        let mut results: Vec<RawCandidate> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (index, strategy) in self.strategies.iter().enumerate() {
            if results.len() >= self.max_candidates {
                break;
            }
            let source_tag = format!("selector_{}", index + 1);
            let elements = doc
                .query(&strategy.pattern)
                .map_err(|source| TrendscopeError::Extraction {
                    strategy: source_tag.clone(),
                    source,
                })?;
            debug!(
                strategy = %source_tag,
                name = strategy.name,
                pattern = %strategy.pattern,
                matched = elements.len(),
                "Running extraction strategy"
            );

            for (element_index, element) in elements.into_iter().enumerate() {
                if results.len() >= self.max_candidates {
                    break;
                }
                let (raw_title, fields) = match read_element(doc, element) {
                    Ok(Some(read)) => read,
                    Ok(None) => continue,
                    Err(e) => {
                        warn!(
                            strategy = %source_tag,
                            element_index,
                            error = %e,
                            "Skipping element that failed to read"
                        );
                        continue;
                    }
                };
                if let Verdict::Accepted(title) = self.normalizer.accept(&raw_title, &mut seen) {
                    debug!(title = %title, volume = %fields.volume, time_ago = %fields.time_ago, "Found trend");
                    results.push(RawCandidate {
                        title,
                        volume: fields.volume,
                        time_ago: fields.time_ago,
                        source_tag: source_tag.clone(),
                        position_hint: element_index,
                    });
                }
            }
        }

        debug!(count = results.len(), "Cascade finished");
        Ok(results)
    }
}

/// Extracts candidates with the default cascade.
pub fn extract<D>(doc: &D) -> Result<Vec<RawCandidate>, TrendscopeError>
where
    D: DocumentAccessor + ?Sized,
{
    SelectorCascade::default().extract(doc)
}

/// Reads the raw title and auxiliary fields of one matched element.
fn read_element<'a, D>(
    doc: &'a D,
    element: D::Node<'a>,
) -> Result<Option<(String, AuxiliaryFields)>, AccessorError>
where
    D: DocumentAccessor + ?Sized,
{
    if doc.kind_of(element) == ElementKind::Row {
        let cells = doc.cells_of(element)?;
        let Some((first, rest)) = cells.split_first() else {
            return Ok(None);
        };
        let title = doc.text_of(*first)?.trim().to_string();
        let fields = if rest.is_empty() {
            AuxiliaryFields::default()
        } else {
            AuxiliaryFields::parse(&joined_text(doc, rest)?)
        };
        return Ok(Some((title, fields)));
    }

    let title = doc.text_of(element)?.trim().to_string();
    if title.is_empty() {
        return Ok(None);
    }
    let fields = match doc.closest_row(element)? {
        Some(row) => {
            let cells = doc.cells_of(row)?;
            if cells.len() > 1 {
                AuxiliaryFields::parse(&joined_text(doc, &cells)?)
            } else {
                AuxiliaryFields::default()
            }
        }
        None => AuxiliaryFields::default(),
    };
    Ok(Some((title, fields)))
}

fn joined_text<'a, D>(doc: &'a D, nodes: &[D::Node<'a>]) -> Result<String, AccessorError>
where
    D: DocumentAccessor + ?Sized,
{
    let parts = nodes
        .iter()
        .map(|node| doc.text_of(*node))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join(" "))
}
