//! Sources of raw query parameters.
//!
//! The [`Params`] trait is the only thing the processor needs from the web
//! layer: a lookup from parameter name to its raw value.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// A read-only map from parameter name to raw value.
pub trait Params {
    /// Returns the raw value of a parameter.
    ///
    /// When a name occurs several times, implementations return the first.
    fn get_param(&self, key: &str) -> Option<&str>;
}

impl<S: BuildHasher> Params for HashMap<String, String, S> {
    fn get_param(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl<S: BuildHasher> Params for HashMap<&str, &str, S> {
    fn get_param(&self, key: &str) -> Option<&str> {
        self.get(key).copied()
    }
}

impl Params for BTreeMap<String, String> {
    fn get_param(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl Params for BTreeMap<&str, &str> {
    fn get_param(&self, key: &str) -> Option<&str> {
        self.get(key).copied()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> Params for [(K, V)] {
    fn get_param(&self, key: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }
}

impl<K: AsRef<str>, V: AsRef<str>> Params for Vec<(K, V)> {
    fn get_param(&self, key: &str) -> Option<&str> {
        self.as_slice().get_param(key)
    }
}

impl<K: AsRef<str>, V: AsRef<str>, const N: usize> Params for [(K, V); N] {
    fn get_param(&self, key: &str) -> Option<&str> {
        self.as_slice().get_param(key)
    }
}

impl<P: Params + ?Sized> Params for &P {
    fn get_param(&self, key: &str) -> Option<&str> {
        (**self).get_param(key)
    }
}

/// Decodes an `application/x-www-form-urlencoded` query string.
///
/// A leading `?` is ignored, `+` decodes to a space, and pairs whose name or
/// value is not valid percent-encoded UTF-8 are skipped. Pair order is kept.
///
/// ```
/// use qseek::{parse_query_string, Params};
///
/// let pairs = parse_query_string("?count=gt%3A1%2Clt%3A10&name=Jo+hn");
/// assert_eq!(pairs.get_param("count"), Some("gt:1,lt:10"));
/// assert_eq!(pairs.get_param("name"), Some("Jo hn"));
/// ```
pub fn parse_query_string(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            Some((decode_component(name)?, decode_component(value)?))
        })
        .collect()
}

fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(|s| s.into_owned())
}
