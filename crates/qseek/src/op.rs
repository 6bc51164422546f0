//! Operator tokens of the query-value grammar.
//!
//! The [`Op`] enum is the fixed vocabulary a client may put in front of a
//! value list (`gt:1`, `in:a,b`, `slike:Jo`). Each operator belongs to one
//! [`OpKind`], which decides how its values are coerced.

use std::str::FromStr;

/// Separates values inside a parameter, and tokens inside `sort`/`projection`.
pub const SEPARATOR: char = ',';

/// Ends an operator token (`gt:`).
pub const OP_DELIMITER: char = ':';

/// Prefix marking a predicate symbol in the output (`$gt`).
pub const PREDICATE_PREFIX: char = '$';

/// Predicate symbol used by all search operators.
pub const REGEX_PREDICATE: &str = "$regex";

/// Comparison, membership, or search operator.
///
/// Operators are grouped by how their values are treated:
/// - **Single**: `Eq`, `Ne`, `Gt`, `Gte`, `Lt`, `Lte` - one operand
/// - **Set**: `In`, `Nin`, `All` - a list of operands
/// - **Search**: `Like`, `SLike`, `ELike` - string fields only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Op {
    /// Equal to.
    Eq,
    /// Not equal to.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal to.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal to.
    Lte,
    /// In list of values.
    In,
    /// Not in list of values.
    Nin,
    /// Has all of the listed values.
    All,
    /// Contains the sequence.
    Like,
    /// Starts with the sequence.
    SLike,
    /// Ends with the sequence.
    ELike,
}

/// How an operator's values are coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Single-valued comparison.
    Single,
    /// Multi-valued set membership.
    Set,
    /// Substring search.
    Search,
}

impl Op {
    /// Every operator, in declaration order.
    pub const ALL: [Op; 12] = [
        Op::Eq,
        Op::Ne,
        Op::Gt,
        Op::Gte,
        Op::Lt,
        Op::Lte,
        Op::In,
        Op::Nin,
        Op::All,
        Op::Like,
        Op::SLike,
        Op::ELike,
    ];

    /// Returns the grammar keyword of this operator, without delimiter.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Ne => "ne",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::In => "in",
            Op::Nin => "nin",
            Op::All => "all",
            Op::Like => "like",
            Op::SLike => "slike",
            Op::ELike => "elike",
        }
    }

    /// Returns the kind of this operator.
    pub fn kind(self) -> OpKind {
        match self {
            Op::Eq | Op::Ne | Op::Gt | Op::Gte | Op::Lt | Op::Lte => OpKind::Single,
            Op::In | Op::Nin | Op::All => OpKind::Set,
            Op::Like | Op::SLike | Op::ELike => OpKind::Search,
        }
    }

    /// Returns the output predicate symbol.
    ///
    /// Search operators all map to `$regex`.
    pub fn predicate(self) -> String {
        match self.kind() {
            OpKind::Search => REGEX_PREDICATE.to_string(),
            _ => format!("{PREDICATE_PREFIX}{}", self.as_str()),
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown operator keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOp(pub String);

impl std::fmt::Display for UnknownOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown operator {:?}", self.0)
    }
}

impl std::error::Error for UnknownOp {}

impl FromStr for Op {
    type Err = UnknownOp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Op::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOp(s.to_string()))
    }
}

/// Sign marker on a `sort` or `projection` token.
///
/// `+` means ascending or include, `-` descending or exclude. A token with no
/// marker counts as `+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Marker {
    /// Ascending / include.
    #[default]
    Plus,
    /// Descending / exclude.
    Minus,
}

impl Marker {
    /// Splits a leading marker off a token.
    pub fn split(token: &str) -> (Marker, &str) {
        if let Some(rest) = token.strip_prefix('+') {
            (Marker::Plus, rest)
        } else if let Some(rest) = token.strip_prefix('-') {
            (Marker::Minus, rest)
        } else {
            (Marker::Plus, token)
        }
    }

    /// Returns `+1` or `-1`.
    pub fn sign(self) -> i32 {
        match self {
            Marker::Plus => 1,
            Marker::Minus => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_kinds() {
        assert_eq!(Op::Eq.kind(), OpKind::Single);
        assert_eq!(Op::Lte.kind(), OpKind::Single);
        assert_eq!(Op::In.kind(), OpKind::Set);
        assert_eq!(Op::All.kind(), OpKind::Set);
        assert_eq!(Op::Like.kind(), OpKind::Search);
        assert_eq!(Op::ELike.kind(), OpKind::Search);
    }

    #[test]
    fn op_predicates() {
        assert_eq!(Op::Gt.predicate(), "$gt");
        assert_eq!(Op::Nin.predicate(), "$nin");
        assert_eq!(Op::Like.predicate(), "$regex");
        assert_eq!(Op::SLike.predicate(), "$regex");
    }

    #[test]
    fn op_parse_roundtrips_keywords() {
        for op in Op::ALL {
            assert_eq!(op.as_str().parse::<Op>(), Ok(op));
        }
        assert!("between".parse::<Op>().is_err());
        assert!("GT".parse::<Op>().is_err());
    }

    #[test]
    fn marker_split() {
        assert_eq!(Marker::split("+name"), (Marker::Plus, "name"));
        assert_eq!(Marker::split("-name"), (Marker::Minus, "name"));
        assert_eq!(Marker::split("name"), (Marker::Plus, "name"));
        assert_eq!(Marker::split("-"), (Marker::Minus, ""));
        assert_eq!(Marker::Minus.sign(), -1);
        assert_eq!(Marker::default().sign(), 1);
    }
}
