//! Records the aggregator can merge.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pipeline::NormalizedTrend;

/// A record with a title-derived dedup key and an optional position.
pub trait Aggregatable {
    /// Lowercased, trimmed title; `None` when the record has no usable
    /// title, in which case it is dropped.
    fn dedup_key(&self) -> Option<String>;

    /// Sort position; a missing position sorts as 0.
    fn sort_position(&self) -> u64;
}

fn key_of(title: &str) -> Option<String> {
    let key = title.trim().to_lowercase();
    (!key.is_empty()).then_some(key)
}

impl Aggregatable for NormalizedTrend {
    fn dedup_key(&self) -> Option<String> {
        key_of(&self.title)
    }

    fn sort_position(&self) -> u64 {
        u64::try_from(self.position).unwrap_or(u64::MAX)
    }
}

/// A loosely-typed trend record from any pass.
///
/// Some passes name the title `query`; a non-empty `title` wins over
/// `query`. Other fields ride along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Alternative title field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Rank within its pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
    /// Everything else.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrendRecord {
    /// A record with a title and position.
    #[must_use]
    pub fn new(title: impl Into<String>, position: u64) -> Self {
        Self {
            title: Some(title.into()),
            position: Some(position),
            ..Self::default()
        }
    }

    /// Sets an extra field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The title used for display and dedup.
    #[must_use]
    pub fn display_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.query.as_deref())
    }
}

impl Aggregatable for TrendRecord {
    fn dedup_key(&self) -> Option<String> {
        self.display_title().and_then(key_of)
    }

    fn sort_position(&self) -> u64 {
        self.position.unwrap_or(0)
    }
}

/// Lets classified trends be merged with loosely-typed records from other
/// passes. Everything except title and position moves into `extra`.
impl From<NormalizedTrend> for TrendRecord {
    fn from(trend: NormalizedTrend) -> Self {
        let position = u64::try_from(trend.position).unwrap_or(u64::MAX);
        let mut extra = match serde_json::to_value(&trend) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        extra.remove("title");
        extra.remove("position");
        Self {
            title: Some(trend.title),
            query: None,
            position: Some(position),
            extra,
        }
    }
}
