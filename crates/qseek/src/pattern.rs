//! Safe search patterns for string fields.

use crate::op::{Op, SEPARATOR};
use crate::value::Pattern;

/// Where a search phrase is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    /// Anywhere in the field.
    Contains,
    /// At the start of the field.
    StartsWith,
    /// At the end of the field.
    EndsWith,
}

impl SearchKind {
    /// Returns the search kind of a search operator.
    pub fn from_op(op: Op) -> Option<SearchKind> {
        match op {
            Op::Like => Some(SearchKind::Contains),
            Op::SLike => Some(SearchKind::StartsWith),
            Op::ELike => Some(SearchKind::EndsWith),
            _ => None,
        }
    }
}

/// Builds a case-insensitive pattern matching the literal phrase formed by
/// rejoining `values` with the separator.
///
/// Every regex metacharacter in the phrase is escaped, so client input only
/// ever matches itself.
pub fn build_pattern(kind: SearchKind, values: &[String]) -> Pattern {
    let phrase = regex::escape(&values.join(&SEPARATOR.to_string()));
    let pattern = match kind {
        SearchKind::Contains => phrase,
        SearchKind::StartsWith => format!("^{phrase}"),
        SearchKind::EndsWith => format!("{phrase}$"),
    };
    Pattern {
        pattern,
        case_insensitive: true,
    }
}
