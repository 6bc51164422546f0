//! Projection directives.
//!
//! Backends cannot mix inclusion and exclusion in one projection, so the
//! signs in the projection parameter are summed into a single inclusion
//! value. The sum starts at 1, each include adds 1, each exclude subtracts
//! 1, and the result is clamped to 0 or 1:
//!
//! ```text
//! -a,-b,-c  -> 1 - 3 = -2 -> 0   (exclude a, b, c)
//! +a,-b     -> 1 + 1 - 1 = 1 -> 1 (include a, b)
//! ```

use std::collections::HashSet;

use tracing::trace;

use crate::op::{Marker, SEPARATOR};

/// Names listed in the projection parameter and their shared inclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionDirectives {
    names: HashSet<String>,
    inclusion: u8,
}

impl Default for ProjectionDirectives {
    fn default() -> Self {
        ProjectionDirectives {
            names: HashSet::new(),
            inclusion: 1,
        }
    }
}

impl ProjectionDirectives {
    /// Parses the raw projection parameter (`"-a,-b"`).
    ///
    /// Tokens that are empty once their marker is removed are ignored and do
    /// not count toward the sum.
    pub fn parse(raw: &str) -> Self {
        let mut names = HashSet::new();
        let mut sum: i64 = 1;
        for token in raw.split(SEPARATOR) {
            let (marker, name) = Marker::split(token);
            if name.is_empty() {
                if !token.is_empty() {
                    trace!(token, "ignoring projection token without a field name");
                }
                continue;
            }
            sum += i64::from(marker.sign());
            names.insert(name.to_string());
        }
        ProjectionDirectives {
            names,
            inclusion: sum.clamp(0, 1) as u8,
        }
    }

    /// The clamped inclusion value, `0` or `1`.
    pub fn inclusion(&self) -> u8 {
        self.inclusion
    }

    /// Returns `true` if `name` was listed.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns `true` if any of `names` was listed.
    pub fn contains_any<'a>(&self, mut names: impl Iterator<Item = &'a str>) -> bool {
        names.any(|name| self.contains(name))
    }

    /// Returns `true` if nothing was listed.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
