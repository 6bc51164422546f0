//! Splits one raw parameter value into operator/value-list pairs.
//!
//! ```text
//! gt:1,lt:10        -> gt: [1]      lt: [10]
//! a,b,in:c,d        -> eq: [a, b]   in: [c, d]
//! like:Hello, world -> like: [Hello, " world"]
//! ```
//!
//! Operator tokens are only recognized at the start of the value or right
//! after a separator. The scan does not look at value content, so a value
//! such as `in:x` inside a list is always read as an operator, and a colon in
//! a value is only safe when it does not form a token at one of those
//! positions.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::op::{Op, OP_DELIMITER, SEPARATOR};

static SCANNER: Lazy<Regex> = Lazy::new(|| {
    let mut keywords: Vec<&str> = Op::ALL.iter().map(|op| op.as_str()).collect();
    keywords.sort_by_key(|k| std::cmp::Reverse(k.len()));
    let pattern = format!(
        "(?:^|{})({}){}",
        regex::escape(&SEPARATOR.to_string()),
        keywords.join("|"),
        OP_DELIMITER
    );
    Regex::new(&pattern).unwrap_or_else(|e| unreachable!("operator scanner must compile: {e}"))
});

/// Operator to raw value fragments, in first-encounter order of operators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpValues {
    entries: Vec<(Op, Vec<String>)>,
}

impl OpValues {
    /// Creates an empty map.
    pub fn new() -> Self {
        OpValues::default()
    }

    /// Appends values to an operator, creating its entry if needed.
    pub fn push(&mut self, op: Op, values: impl IntoIterator<Item = String>) {
        match self.entries.iter_mut().find(|(o, _)| *o == op) {
            Some((_, existing)) => existing.extend(values),
            None => self.entries.push((op, values.into_iter().collect())),
        }
    }

    /// Returns the values recorded for an operator.
    pub fn get(&self, op: Op) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(o, _)| *o == op)
            .map(|(_, v)| v.as_slice())
    }

    /// Iterates over operators and their values.
    pub fn iter(&self) -> impl Iterator<Item = (Op, &[String])> {
        self.entries.iter().map(|(op, v)| (*op, v.as_slice()))
    }

    /// Number of distinct operators.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no operator was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tokenizes a raw parameter value.
///
/// Content before the first operator token, or the whole value when there
/// is none, is assigned to [`Op::Eq`].
pub fn tokenize(raw: &str) -> OpValues {
    let mut out = OpValues::new();
    if raw.is_empty() {
        return out;
    }

    let mut current = Op::Eq;
    let mut start = 0;
    for caps in SCANNER.captures_iter(raw) {
        let (Some(whole), Some(keyword)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let segment = &raw[start..whole.start()];
        // Leading content with no operator before it is equality.
        if start > 0 || !segment.is_empty() {
            out.push(current, split_values(segment));
        }
        current = match keyword.as_str().parse() {
            Ok(op) => op,
            Err(_) => continue,
        };
        start = whole.end();
    }
    out.push(current, split_values(&raw[start..]));
    out
}

/// Splits a segment on the separator, dropping one trailing empty fragment.
fn split_values(segment: &str) -> Vec<String> {
    let mut values: Vec<String> = segment.split(SEPARATOR).map(str::to_string).collect();
    if values.last().is_some_and(|v| v.is_empty()) {
        values.pop();
    }
    values
}
