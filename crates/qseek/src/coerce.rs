//! Type coercion of raw value fragments.
//!
//! Each value string is parsed on its own. A value that does not parse as
//! the field's type is dropped without error; an operator whose values all
//! fail contributes nothing.
//!
//! | Operator kind | String field | Typed field |
//! |------|-----------|-----------|
//! | Single | values rejoined with `,` | last parsable value |
//! | Set | every value, as given | parsable subset, if non-empty |
//! | Search | escaped pattern | nothing |

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::trace;

use crate::field::FieldType;
use crate::op::{Op, OpKind, SEPARATOR};
use crate::pattern::{build_pattern, SearchKind};
use crate::value::{Number, ObjectId, Operand, Timestamp, Value};

/// Coerces the values recorded for one operator into an operand.
///
/// `layouts` are the chrono format strings configured for timestamp fields;
/// when empty, timestamps are parsed as RFC 3339.
pub fn coerce(op: Op, values: &[String], field_type: FieldType, layouts: &[String]) -> Option<Operand> {
    let field_type = field_type.value_type();
    match (op.kind(), field_type) {
        (OpKind::Search, FieldType::String) => {
            let kind = SearchKind::from_op(op)?;
            Some(Operand::Regex(build_pattern(kind, values)))
        }
        (OpKind::Search, _) => {
            trace!(%op, %field_type, "search operator ignored on non-string field");
            None
        }
        (OpKind::Single, FieldType::String) => {
            let joined = values.join(&SEPARATOR.to_string());
            if joined.trim().is_empty() {
                return None;
            }
            Some(Operand::Value(Value::String(joined)))
        }
        (OpKind::Set, FieldType::String) => {
            if values.is_empty() {
                return None;
            }
            Some(Operand::List(
                values.iter().cloned().map(Value::String).collect(),
            ))
        }
        (OpKind::Single, _) => values
            .iter()
            .filter_map(|v| parse_scalar(v, field_type, layouts))
            .last()
            .map(Operand::Value),
        (OpKind::Set, _) => {
            let parsed: Vec<Value> = values
                .iter()
                .filter_map(|v| parse_scalar(v, field_type, layouts))
                .collect();
            if parsed.is_empty() {
                None
            } else {
                Some(Operand::List(parsed))
            }
        }
    }
}

/// Parses one value string as a scalar of `field_type`.
pub fn parse_scalar(raw: &str, field_type: FieldType, layouts: &[String]) -> Option<Value> {
    let parsed = match field_type.value_type() {
        FieldType::String | FieldType::Meta => Some(Value::String(raw.to_string())),
        FieldType::Integer => parse_integer(raw).map(Value::Number),
        FieldType::Float => parse_float(raw).map(Value::Number),
        FieldType::Boolean => parse_bool(raw).map(Value::Bool),
        FieldType::Timestamp => parse_timestamp(raw, layouts).map(Value::Timestamp),
        FieldType::Identifier => parse_object_id(raw).map(Value::ObjectId),
    };
    if parsed.is_none() {
        trace!(value = raw, %field_type, "dropping value that does not parse");
    }
    parsed
}

fn parse_integer(raw: &str) -> Option<Number> {
    raw.parse::<i64>().ok().map(Number::I64)
}

// `nan` and `inf` parse as f64 but are not comparable values.
fn parse_float(raw: &str) -> Option<Number> {
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(Number::F64)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn parse_object_id(raw: &str) -> Option<ObjectId> {
    raw.parse().ok()
}

/// Parses a timestamp with the first layout that accepts it.
///
/// A layout may describe a zoned datetime, a naive datetime (read as UTC),
/// or a bare date (midnight UTC).
fn parse_timestamp(raw: &str, layouts: &[String]) -> Option<Timestamp> {
    if layouts.is_empty() {
        return DateTime::parse_from_rfc3339(raw).ok().map(Timestamp::from);
    }
    layouts.iter().find_map(|layout| parse_with_layout(raw, layout))
}

fn parse_with_layout(raw: &str, layout: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_str(raw, layout) {
        return Some(dt.into());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
        return Some(naive.and_utc().into());
    }
    NaiveDate::parse_from_str(raw, layout)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().into())
}
