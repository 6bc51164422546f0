//! The translated query description.
//!
//! A [`QueryDescription`] is what one parameter map turns into: a filter
//! keyed by field, a projection, an ordered sort, paging, and the raw values
//! of meta fields. It does not execute anything; a document-store client
//! consumes it.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::op::REGEX_PREDICATE;
use crate::ordering::{Dir, OrderBy};
use crate::value::Operand;

/// Predicates contributed by one field, keyed by predicate symbol (`$gt`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    predicates: BTreeMap<String, Operand>,
}

impl Fragment {
    /// Creates an empty fragment.
    pub fn new() -> Self {
        Fragment::default()
    }

    /// Sets the operand of a predicate, replacing any previous one.
    pub fn insert(&mut self, predicate: impl Into<String>, operand: Operand) {
        self.predicates.insert(predicate.into(), operand);
    }

    /// Returns the operand of a predicate.
    pub fn get(&self, predicate: &str) -> Option<&Operand> {
        self.predicates.get(predicate)
    }

    /// Iterates over predicates in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Operand)> {
        self.predicates.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of predicates.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Returns `true` if there are no predicates.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// A `$regex` predicate is written with a sibling `$options` entry.
impl Serialize for Fragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (predicate, operand) in &self.predicates {
            match operand {
                Operand::Regex(pattern) if predicate == REGEX_PREDICATE => {
                    map.serialize_entry(predicate, &pattern.pattern)?;
                    if pattern.case_insensitive {
                        map.serialize_entry("$options", pattern.options())?;
                    }
                }
                _ => map.serialize_entry(predicate, operand)?,
            }
        }
        map.end()
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (predicate, operand)) in self.predicates.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{predicate}: {operand}")?;
        }
        f.write_str("}")
    }
}

/// Backend-agnostic description of one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDescription {
    pub(crate) filter: BTreeMap<String, Fragment>,
    pub(crate) projection: BTreeMap<String, u8>,
    pub(crate) sort: Vec<OrderBy>,
    pub(crate) limit: u64,
    pub(crate) skip: u64,
    pub(crate) meta: BTreeMap<String, String>,
}

impl QueryDescription {
    /// Filter fragments keyed by field key.
    pub fn filter(&self) -> &BTreeMap<String, Fragment> {
        &self.filter
    }

    /// Projection, field key to `0` or `1`.
    pub fn projection(&self) -> &BTreeMap<String, u8> {
        &self.projection
    }

    /// Sort fields in the order the sort parameter listed them.
    pub fn sort(&self) -> &[OrderBy] {
        &self.sort
    }

    /// Maximum number of documents, `0` when unspecified.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of documents to skip.
    pub fn skip(&self) -> u64 {
        self.skip
    }

    /// Raw values of meta fields.
    pub fn meta(&self) -> &BTreeMap<String, String> {
        &self.meta
    }

    /// Returns the direction a field is sorted in, if any.
    pub fn sort_dir(&self, field: &str) -> Option<Dir> {
        self.sort.iter().find(|o| o.field == field).map(|o| o.dir)
    }

    /// Serializes to a JSON value.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

struct SortMap<'a>(&'a [OrderBy]);

impl Serialize for SortMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for order in self.0 {
            map.serialize_entry(&order.field, &order.dir.sign())?;
        }
        map.end()
    }
}

impl Serialize for QueryDescription {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(6))?;
        map.serialize_entry("filter", &self.filter)?;
        map.serialize_entry("projection", &self.projection)?;
        map.serialize_entry("sort", &SortMap(&self.sort))?;
        map.serialize_entry("limit", &self.limit)?;
        map.serialize_entry("skip", &self.skip)?;
        map.serialize_entry("meta", &self.meta)?;
        map.end()
    }
}

impl fmt::Display for QueryDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Filter ---")?;
        for (field, fragment) in &self.filter {
            writeln!(f, "{field}: {fragment}")?;
        }
        writeln!(f, "--- Projection ---")?;
        for (field, inclusion) in &self.projection {
            writeln!(f, "{field}: {inclusion}")?;
        }
        writeln!(f, "--- Sort ---")?;
        for order in &self.sort {
            writeln!(f, "{}: {}", order.field, order.dir.sign())?;
        }
        writeln!(f, "--- Paging ---")?;
        writeln!(f, "limit: {}", self.limit)?;
        writeln!(f, "skip: {}", self.skip)?;
        writeln!(f, "--- Meta ---")?;
        for (field, value) in &self.meta {
            writeln!(f, "{field}: {value}")?;
        }
        Ok(())
    }
}
