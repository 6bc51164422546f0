//! Typed operands produced by coercion.
//!
//! A [`Value`] is one coerced scalar. An [`Operand`] is what a predicate
//! symbol maps to in a filter fragment: a scalar, a list of scalars, or a
//! search [`Pattern`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Coerced scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String value, kept verbatim.
    String(String),
    /// Integer or floating point value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Point in time.
    Timestamp(Timestamp),
    /// Document identifier.
    ObjectId(ObjectId),
}

impl Value {
    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the timestamp value, if present.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Extracts the identifier value, if present.
    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            Value::ObjectId(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s:?}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Timestamp(t) => write!(f, "{t}"),
            Value::ObjectId(id) => write!(f, "ObjectId({id})"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Number(n) => n.serialize(serializer),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Timestamp(t) => t.serialize(serializer),
            Value::ObjectId(id) => id.serialize(serializer),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::I64(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(Number::F64(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Timestamp> for Value {
    fn from(t: Timestamp) -> Self {
        Value::Timestamp(t)
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::ObjectId(id)
    }
}

/// Numeric value.
///
/// Integer fields coerce to `I64`, float fields to `F64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::F64(n) => n,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n:?}"),
        }
    }
}

/// Non-finite floats have no JSON number form and are written as
/// `{"$numberDouble": "NaN"}`, `"Infinity"` or `"-Infinity"`.
impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Number::I64(n) => serializer.serialize_i64(*n),
            Number::F64(n) if n.is_finite() => serializer.serialize_f64(*n),
            Number::F64(n) => {
                let text = if n.is_nan() {
                    "NaN"
                } else if n.is_sign_positive() {
                    "Infinity"
                } else {
                    "-Infinity"
                };
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$numberDouble", text)?;
                map.end()
            }
        }
    }
}

/// Timestamp value represented as milliseconds since Unix epoch.
///
/// This is the resolution document stores keep dates at; sub-millisecond
/// precision in a parsed value is truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Converts to a UTC datetime, if in chrono's representable range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
    }
}

impl<Tz: chrono::TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Timestamp(dt.timestamp_millis())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// Serialized in relaxed extended JSON: `{"$date": "2021-01-01T15:00:00.000Z"}`.
impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self.to_datetime() {
            Some(dt) => {
                map.serialize_entry("$date", &dt.to_rfc3339_opts(SecondsFormat::Millis, true))?
            }
            None => map.serialize_entry("$date", &NumberLong(self.0))?,
        }
        map.end()
    }
}

struct NumberLong(i64);

impl Serialize for NumberLong {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("$numberLong", &self.0.to_string())?;
        map.end()
    }
}

/// 12-byte document identifier, written as 24 hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Creates an identifier from raw bytes.
    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        ObjectId(bytes)
    }

    /// Returns the raw bytes.
    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Returns the lowercase hex form.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Error returned for a string that is not 24 hex digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidObjectId(pub String);

impl fmt::Display for InvalidObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} is not a valid object id", self.0)
    }
}

impl std::error::Error for InvalidObjectId {}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidObjectId(s.to_string());
        if s.len() != 24 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let mut bytes = [0u8; 12];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(ObjectId(bytes))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Serialized in relaxed extended JSON: `{"$oid": "6050e7f529a90b22dc47f19e"}`.
impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("$oid", &self.to_hex())?;
        map.end()
    }
}

/// Escaped, case-insensitive search pattern for string fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Regular expression source with all client metacharacters escaped.
    pub pattern: String,
    /// Always `true` for patterns built from the grammar.
    pub case_insensitive: bool,
}

impl Pattern {
    /// Backend option string (`"i"` or `""`).
    pub fn options(&self) -> &'static str {
        if self.case_insensitive {
            "i"
        } else {
            ""
        }
    }
}

/// Serialized as `{"$regex": pattern, "$options": "i"}`, `$options` omitted
/// when empty.
impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("$regex", &self.pattern)?;
        if self.case_insensitive {
            map.serialize_entry("$options", self.options())?;
        }
        map.end()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.pattern, self.options())
    }
}

/// Right-hand side of a predicate in a filter fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// One value (`$eq`, `$gt`, ...).
    Value(Value),
    /// A list of values (`$in`, `$nin`, `$all`).
    List(Vec<Value>),
    /// A search pattern (`$regex`).
    Regex(Pattern),
}

impl Operand {
    /// Extracts the single value, if this is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Operand::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Extracts the list, if this is one.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Operand::List(v) => Some(v),
            _ => None,
        }
    }

    /// Extracts the pattern, if this is one.
    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            Operand::Regex(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(v) => write!(f, "{v}"),
            Operand::List(values) => {
                f.write_str("[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Operand::Regex(p) => write!(f, "{p}"),
        }
    }
}

impl Serialize for Operand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Operand::Value(v) => v.serialize(serializer),
            Operand::List(values) => values.serialize(serializer),
            Operand::Regex(p) => p.serialize(serializer),
        }
    }
}
