//! Turns raw parameter maps into [`QueryDescription`]s.
//!
//! For every declared field, in declaration order:
//!
//! 1. the raw value is looked up by key, then by each alias in order, then
//!    taken from the default supplier; a field with no value is skipped;
//! 2. meta fields copy the value into the meta map and stop there;
//! 3. projectable fields listed in the projection parameter get the shared
//!    inclusion value, sortable fields listed in the sort parameter get
//!    their direction;
//! 4. the value is tokenized and coerced into a filter fragment. A value
//!    that contributes nothing falls back to the default supplier, if any.
//!
//! Translation never fails. Malformed values only drop constraints.

use std::sync::Arc;

use tracing::trace;

use crate::coerce::coerce;
use crate::field::Field;
use crate::ordering::{OrderBy, SortDirectives};
use crate::params::Params;
use crate::projection::ProjectionDirectives;
use crate::query::{Fragment, QueryDescription};
use crate::registry::Registry;
use crate::tokenizer::tokenize;

/// Where a field's raw value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Param,
    Default,
}

impl Registry {
    /// Translates one parameter map.
    ///
    /// # Example
    ///
    /// ```
    /// use qseek::{Field, Registry};
    ///
    /// let registry = Registry::new([Field::new("count").integer()]).unwrap();
    /// let query = registry.process(&[("count", "gt:1,lt:10"), ("limit", "5")]);
    ///
    /// assert_eq!(query.limit(), 5);
    /// assert_eq!(query.filter()["count"].len(), 2);
    /// ```
    pub fn process<P: Params + ?Sized>(&self, params: &P) -> QueryDescription {
        let reserved = self.reserved();
        let projections =
            ProjectionDirectives::parse(params.get_param(&reserved.projection).unwrap_or(""));
        let sorts = SortDirectives::parse(params.get_param(&reserved.sort).unwrap_or(""));

        let mut out = QueryDescription {
            limit: parse_count(params.get_param(&reserved.limit)),
            skip: parse_count(params.get_param(&reserved.skip)),
            ..QueryDescription::default()
        };
        let mut sort: Vec<(usize, OrderBy)> = Vec::new();

        for field in self.fields() {
            let Some((raw, source)) = resolve(field, params) else {
                continue;
            };
            let key = field.key().to_string();

            if field.is_meta() {
                out.meta.insert(key, raw);
                continue;
            }

            if field.is_projectable() && projections.contains_any(field.names()) {
                out.projection.insert(key.clone(), projections.inclusion());
            }

            if field.is_sortable() {
                if let Some((position, dir)) = sorts.resolve(field.names()) {
                    sort.push((position, OrderBy::new(key.clone(), dir)));
                }
            }

            let fragment = build_fragment(field, &raw).or_else(|| {
                if source == Source::Default {
                    return None;
                }
                let fallback = field.default_raw()?;
                trace!(field = %key, value = %raw, "no usable value, using default");
                build_fragment(field, &fallback)
            });
            match fragment {
                Some(fragment) => {
                    out.filter.insert(key, fragment);
                }
                None => trace!(field = %key, value = %raw, "field contributes no filter"),
            }
        }

        sort.sort_by_key(|(position, _)| *position);
        out.sort = sort.into_iter().map(|(_, order)| order).collect();
        out
    }
}

/// Finds a field's raw value: key, then aliases in order, then default.
fn resolve<P: Params + ?Sized>(field: &Field, params: &P) -> Option<(String, Source)> {
    if let Some(raw) = non_empty(params.get_param(field.key())) {
        return Some((raw.to_string(), Source::Param));
    }
    for alias in field.aliases() {
        if let Some(raw) = non_empty(params.get_param(alias)) {
            trace!(field = field.key(), alias = alias.as_str(), "resolved by alias");
            return Some((raw.to_string(), Source::Param));
        }
    }
    let raw = field.default_raw().filter(|raw| !raw.is_empty())?;
    trace!(field = field.key(), value = %raw, "field absent, using default");
    Some((raw, Source::Default))
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|raw| !raw.is_empty())
}

/// Tokenizes and coerces a raw value. `None` if no operator contributed.
fn build_fragment(field: &Field, raw: &str) -> Option<Fragment> {
    let mut fragment = Fragment::new();
    let mut contributions = 0usize;
    for (op, values) in tokenize(raw).iter() {
        if let Some(operand) = coerce(op, values, field.field_type(), field.time_layouts()) {
            fragment.insert(op.predicate(), operand);
            contributions += 1;
        }
    }
    (contributions > 0).then_some(fragment)
}

fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|raw| raw.parse().ok()).unwrap_or(0)
}

/// A shareable handle that translates parameter maps against one registry.
///
/// Cloning is cheap; every clone uses the same registry.
#[derive(Debug, Clone)]
pub struct Processor {
    registry: Arc<Registry>,
}

impl Processor {
    /// Creates a processor for a registry.
    pub fn new(registry: Registry) -> Self {
        Processor {
            registry: Arc::new(registry),
        }
    }

    /// Creates a processor sharing an existing registry.
    pub fn shared(registry: Arc<Registry>) -> Self {
        Processor { registry }
    }

    /// Returns the registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Translates one parameter map.
    pub fn process<P: Params + ?Sized>(&self, params: &P) -> QueryDescription {
        self.registry.process(params)
    }
}

impl From<Registry> for Processor {
    fn from(registry: Registry) -> Self {
        Processor::new(registry)
    }
}

/// Returns a reusable function translating parameter maps of type `P`.
///
/// ```
/// use std::collections::HashMap;
/// use qseek::{processor, Field, Registry};
///
/// let registry = Registry::new([Field::new("name")]).unwrap();
/// let translate = processor::<HashMap<String, String>>(registry);
///
/// let params = HashMap::from([("name".to_string(), "Ada".to_string())]);
/// assert_eq!(translate(&params).filter().len(), 1);
/// ```
pub fn processor<P: Params + ?Sized>(
    registry: Registry,
) -> impl Fn(&P) -> QueryDescription + Clone + Send + Sync {
    let processor = Processor::new(registry);
    move |params: &P| processor.process(params)
}
