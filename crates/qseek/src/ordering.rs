//! Sort directives.
//!
//! Provides [`Dir`] for sort direction, [`OrderBy`] for one field's ordering,
//! and [`SortDirectives`] for the parsed value of the sort parameter.

use tracing::trace;

use crate::op::{Marker, SEPARATOR};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Returns `1` for ascending, `-1` for descending.
    pub fn sign(self) -> i32 {
        match self {
            Dir::Asc => 1,
            Dir::Desc => -1,
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl From<Marker> for Dir {
    fn from(marker: Marker) -> Self {
        match marker {
            Marker::Plus => Dir::Asc,
            Marker::Minus => Dir::Desc,
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ordering clause specifying a field and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The field key to sort by.
    pub field: String,
    /// The sort direction.
    pub dir: Dir,
}

impl OrderBy {
    /// Creates a new ascending ordering for the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    /// Creates a new descending ordering for the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    /// Creates a new ordering with the given direction.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }
}

/// Names listed in the sort parameter with their directions.
///
/// A name listed twice keeps its first position and its last direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortDirectives {
    entries: Vec<(String, Dir)>,
}

impl SortDirectives {
    /// Parses the raw sort parameter (`"-count,+name,date"`).
    pub fn parse(raw: &str) -> Self {
        let mut directives = SortDirectives::default();
        for token in raw.split(SEPARATOR) {
            let (marker, name) = Marker::split(token);
            if name.is_empty() {
                if !token.is_empty() {
                    trace!(token, "ignoring sort token without a field name");
                }
                continue;
            }
            let dir = Dir::from(marker);
            match directives.entries.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = dir,
                None => directives.entries.push((name.to_string(), dir)),
            }
        }
        directives
    }

    /// Returns the position and direction of a listed name.
    pub fn lookup(&self, name: &str) -> Option<(usize, Dir)> {
        self.entries
            .iter()
            .position(|(n, _)| n == name)
            .map(|i| (i, self.entries[i].1))
    }

    /// Returns the position and direction for the first of `names` listed.
    ///
    /// Names are tried in order, so a field's key is preferred over its
    /// aliases.
    pub fn resolve<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Option<(usize, Dir)> {
        names.into_iter().find_map(|name| self.lookup(name))
    }

    /// Iterates over listed names in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Dir)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), *d))
    }

    /// Returns `true` if nothing was listed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_sign() {
        assert_eq!(Dir::Asc.sign(), 1);
        assert_eq!(Dir::Desc.sign(), -1);
        assert_eq!(Dir::default(), Dir::Asc);
    }

    #[test]
    fn dir_from_marker() {
        assert_eq!(Dir::from(Marker::Plus), Dir::Asc);
        assert_eq!(Dir::from(Marker::Minus), Dir::Desc);
        assert!(Dir::from(Marker::default()).is_asc());
        assert!(Dir::from(Marker::Minus).is_desc());
        assert!(!Dir::Asc.is_desc());
        assert_eq!(format!("{}/{}", Dir::Asc, Dir::Desc), "asc/desc");
    }

    #[test]
    fn order_by_keeps_key() {
        assert_eq!(OrderBy::desc("count"), OrderBy::new("count", Dir::Desc));
        assert!(OrderBy::asc("objectId").dir.is_asc());
    }

    #[test]
    fn parse_markers() {
        let d = SortDirectives::parse("-count,+name,date");
        assert_eq!(
            d.iter().collect::<Vec<_>>(),
            vec![("count", Dir::Desc), ("name", Dir::Asc), ("date", Dir::Asc)]
        );
    }

    #[test]
    fn parse_skips_empty_tokens() {
        let d = SortDirectives::parse(",,-,+,a,");
        assert_eq!(d.iter().collect::<Vec<_>>(), vec![("a", Dir::Asc)]);
        assert!(SortDirectives::parse("").is_empty());
    }

    #[test]
    fn repeated_name_keeps_position_takes_last_dir() {
        let d = SortDirectives::parse("a,b,-a");
        assert_eq!(d.lookup("a"), Some((0, Dir::Desc)));
        assert_eq!(d.lookup("b"), Some((1, Dir::Asc)));
    }

    #[test]
    fn resolve_prefers_earlier_names() {
        let d = SortDirectives::parse("-alias2,alias1");
        assert_eq!(d.resolve(["key", "alias1", "alias2"]), Some((1, Dir::Asc)));
        assert_eq!(d.resolve(["missing"]), None);
    }
}
