//! Test doubles for document access, document sources, span emitters and
//! the random source.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use crate::document::{DocumentAccessor, DomTree, ElementKind, NodeId, SelectorPattern};
use crate::errors::{AccessorError, TrendscopeError};
use crate::observability::{PassSpanAttributes, TracingEmitter};
use crate::pipeline::DocumentSource;
use crate::scheduler::RandomSource;

/// Wraps a [`DomTree`] and fails reads of chosen nodes, or every query.
#[derive(Debug, Clone)]
pub struct FailingDocument {
    tree: DomTree,
    failing: HashSet<NodeId>,
    fail_queries: bool,
}

impl FailingDocument {
    /// Wraps `tree` with no failures configured.
    #[must_use]
    pub fn new(tree: DomTree) -> Self {
        Self {
            tree,
            failing: HashSet::new(),
            fail_queries: false,
        }
    }

    /// Makes `text_of(node)` fail.
    #[must_use]
    pub fn fail_on(mut self, node: NodeId) -> Self {
        self.failing.insert(node);
        self
    }

    /// Makes every `query` fail.
    #[must_use]
    pub fn fail_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }
}

impl DocumentAccessor for FailingDocument {
    type Node<'a> = NodeId;

    fn query<'a>(&'a self, pattern: &SelectorPattern) -> Result<Vec<NodeId>, AccessorError> {
        if self.fail_queries {
            return Err(AccessorError::Backend(format!("query refused: {pattern}")));
        }
        self.tree.query(pattern)
    }

    fn text_of<'a>(&'a self, node: NodeId) -> Result<String, AccessorError> {
        if self.failing.contains(&node) {
            return Err(AccessorError::Backend(format!("detached node {}", node.index())));
        }
        self.tree.text_of(node)
    }

    fn kind_of<'a>(&'a self, node: NodeId) -> ElementKind {
        self.tree.kind_of(node)
    }

    fn cells_of<'a>(&'a self, node: NodeId) -> Result<Vec<NodeId>, AccessorError> {
        self.tree.cells_of(node)
    }

    fn closest_row<'a>(&'a self, node: NodeId) -> Result<Option<NodeId>, AccessorError> {
        self.tree.closest_row(node)
    }
}

/// A document source serving a fixed tree, or failing.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    name: String,
    tree: DomTree,
    failure: Option<String>,
}

impl FixtureSource {
    /// Serves `tree`.
    #[must_use]
    pub fn new(name: &str, tree: DomTree) -> Self {
        Self {
            name: name.to_string(),
            tree,
            failure: None,
        }
    }

    /// Fails every load with `message`.
    #[must_use]
    pub fn failing(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            tree: DomTree::new(),
            failure: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl DocumentSource for FixtureSource {
    type Document = DomTree;

    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<DomTree, TrendscopeError> {
        match &self.failure {
            Some(message) => Err(TrendscopeError::Source(message.clone())),
            None => Ok(self.tree.clone()),
        }
    }
}

/// Records pass events as `"start:<name>"`, `"end:<name>"` and
/// `"error:<name>:<component>"` strings, keeping the attributes of finished
/// and failed passes.
#[derive(Debug, Default)]
pub struct RecordingEmitter {
    events: Mutex<Vec<String>>,
    attributes: Mutex<Vec<PassSpanAttributes>>,
}

impl RecordingEmitter {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events so far.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    /// Attributes reported with each finished or failed pass, in order.
    #[must_use]
    pub fn attributes(&self) -> Vec<PassSpanAttributes> {
        self.attributes.lock().clone()
    }
}

impl TracingEmitter for RecordingEmitter {
    fn pass_started(&self, attrs: &PassSpanAttributes) {
        self.events.lock().push(format!("start:{}", attrs.pass_name));
    }

    fn pass_finished(&self, attrs: &PassSpanAttributes, _elapsed: Duration) {
        self.events.lock().push(format!("end:{}", attrs.pass_name));
        self.attributes.lock().push(attrs.clone());
    }

    fn pass_failed(&self, attrs: &PassSpanAttributes, error: &TrendscopeError) {
        self.events
            .lock()
            .push(format!("error:{}:{}", attrs.pass_name, error.component()));
        self.attributes.lock().push(attrs.clone());
    }
}

/// Replays scripted draws; once exhausted, repeats the last draw (or 0.0
/// and the range minimum when nothing was scripted).
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    units: VecDeque<f64>,
    last_unit: f64,
}

impl ScriptedRandom {
    /// Creates a source returning `units` from [`RandomSource::unit`] in order.
    ///
    /// [`RandomSource::between`] maps the next unit draw linearly onto the
    /// requested range, so a script of `[0.0]` always picks the minimum.
    #[must_use]
    pub fn new(units: impl IntoIterator<Item = f64>) -> Self {
        Self {
            units: units.into_iter().collect(),
            last_unit: 0.0,
        }
    }

    fn next(&mut self) -> f64 {
        if let Some(unit) = self.units.pop_front() {
            self.last_unit = unit;
        }
        self.last_unit
    }
}

impl RandomSource for ScriptedRandom {
    fn unit(&mut self) -> f64 {
        self.next()
    }

    fn between(&mut self, min: u64, max: u64) -> u64 {
        let unit = self.next().clamp(0.0, 1.0);
        let span = max.saturating_sub(min);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let offset = (unit * span as f64).round() as u64;
        min + offset.min(span)
    }
}
