//! qseek - Translate URL query parameters into document-store queries.
//!
//! qseek lets an HTTP endpoint expose a small declarative query grammar to
//! clients without hand-written parameter parsing. You declare the fields a
//! client may query, and qseek turns each request's parameter map into a
//! [`QueryDescription`]:
//!
//! - a filter, keyed by field, of typed predicates (`$eq`, `$gt`, `$in`, ...)
//! - a projection and an ordered sort
//! - limit and skip
//! - the raw values of meta fields, for the caller to interpret
//!
//! # Quick Start
//!
//! ```rust
//! use qseek::{Field, Registry, Operand, Value};
//!
//! let registry = Registry::new([
//!     Field::new("name").projectable(),
//!     Field::new("count").integer().sortable(),
//!     Field::new("objectId").identifier().alias("id"),
//!     Field::new("pageMarker").meta(),
//! ])
//! .unwrap();
//!
//! let query = registry.process(&[
//!     ("count", "gt:1,lt:10"),
//!     ("name", "slike:Jo.hn"),
//!     ("sort", "-count"),
//!     ("limit", "20"),
//!     ("pageMarker", "abc"),
//! ]);
//!
//! let count = &query.filter()["count"];
//! assert_eq!(count.get("$gt"), Some(&Operand::Value(Value::from(1i64))));
//! assert_eq!(count.get("$lt"), Some(&Operand::Value(Value::from(10i64))));
//!
//! let name = query.filter()["name"].get("$regex").unwrap();
//! assert_eq!(name.as_pattern().unwrap().pattern, r"^Jo\.hn");
//!
//! assert_eq!(query.limit(), 20);
//! assert_eq!(query.meta()["pageMarker"], "abc");
//! ```
//!
//! # Value Grammar
//!
//! ```text
//! <op>:<v1>,<v2>,...[,<op>:<v1>,...]
//! ```
//!
//! Values before the first operator are compared for equality.
//!
//! | Operator | Predicate | Values |
//! |------|-----------|-----------|
//! | `eq`, `ne`, `gt`, `gte`, `lt`, `lte` | `$eq` ... `$lte` | one |
//! | `in`, `nin`, `all` | `$in`, `$nin`, `$all` | list |
//! | `like`, `slike`, `elike` | `$regex` (string fields) | contains / starts / ends |
//!
//! The reserved parameters `sort` and `projection` take comma-separated
//! field names, each optionally prefixed with `+` (ascending / include, the
//! default) or `-` (descending / exclude). `limit` and `skip` take
//! non-negative integers. The reserved names are configurable.
//!
//! # Error Policy
//!
//! Only building a [`Registry`] can fail, with a [`ConfigError`]. Translation
//! never fails: a value that does not parse as its field's type is dropped,
//! and a field whose values all fail is left out of the filter.

mod coerce;
mod config;
mod error;
mod field;
mod op;
mod ordering;
mod params;
mod pattern;
mod processor;
mod projection;
mod query;
mod registry;
mod tokenizer;
mod value;

// Re-export public API
pub use coerce::{coerce, parse_scalar};
pub use config::{FieldConfig, RegistryConfig};
pub use error::{ConfigError, Result};
pub use field::{DefaultFn, Field, FieldType};
pub use op::{Marker, Op, OpKind, UnknownOp, SEPARATOR};
pub use ordering::{Dir, OrderBy, SortDirectives};
pub use params::{parse_query_string, Params};
pub use pattern::{build_pattern, SearchKind};
pub use processor::{processor, Processor};
pub use projection::ProjectionDirectives;
pub use query::{Fragment, QueryDescription};
pub use registry::{Registry, RegistryBuilder, ReservedNames};
pub use tokenizer::{tokenize, OpValues};
pub use value::{InvalidObjectId, Number, ObjectId, Operand, Pattern, Timestamp, Value};
