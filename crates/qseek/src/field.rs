//! Field descriptors.
//!
//! A [`Field`] declares one queryable parameter: its key, how its values are
//! typed, which alternative names clients may use, and whether it takes part
//! in sorting and projection. Fields are collected into a
//! [`Registry`](crate::Registry), which validates them together.
//!
//! # Example
//!
//! ```
//! use qseek::{Field, FieldType};
//!
//! let id = Field::new("objectId").identifier().alias("_id").alias("id");
//! let count = Field::new("count").integer().sortable().projectable();
//! let name = Field::new("name").default_value("slike:A");
//!
//! assert_eq!(id.field_type(), FieldType::Identifier);
//! assert_eq!(id.aliases(), ["_id", "id"]);
//! assert!(count.is_sortable());
//! assert!(name.has_default());
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

/// Supplies a fallback value, in grammar syntax, for an absent field.
pub type DefaultFn = Arc<dyn Fn() -> String + Send + Sync>;

/// How the values of a field are coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Values are kept as strings. Search operators are only honored here.
    #[default]
    String,
    /// Signed 64-bit integers.
    #[serde(alias = "int")]
    Integer,
    /// 64-bit floats.
    Float,
    /// Booleans (`true`, `false`, `1`, `0`, `t`, `f`, ...).
    #[serde(alias = "bool")]
    Boolean,
    /// Datetimes, RFC 3339 unless layouts are configured.
    #[serde(alias = "datetime")]
    Timestamp,
    /// 24-hex-digit document identifiers.
    #[serde(alias = "objectid")]
    Identifier,
    /// Raw value surfaced in the meta map; never filtered, sorted or projected.
    Meta,
}

impl FieldType {
    /// Returns the type values are coerced as. Meta fields hold strings.
    pub fn value_type(self) -> FieldType {
        match self {
            FieldType::Meta => FieldType::String,
            other => other,
        }
    }

    /// Returns the display name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Timestamp => "timestamp",
            FieldType::Identifier => "identifier",
            FieldType::Meta => "meta",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declaration of one queryable field.
#[derive(Clone)]
pub struct Field {
    key: String,
    field_type: FieldType,
    aliases: Vec<String>,
    projectable: bool,
    sortable: bool,
    default: Option<DefaultFn>,
    time_layouts: Vec<String>,
}

impl Field {
    /// Creates a string field with the given key.
    pub fn new(key: impl Into<String>) -> Self {
        Field {
            key: key.into(),
            field_type: FieldType::String,
            aliases: Vec::new(),
            projectable: false,
            sortable: false,
            default: None,
            time_layouts: Vec::new(),
        }
    }

    // ========================================================================
    // Type selection
    // ========================================================================

    /// Sets the field type.
    pub fn of_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Parses values as strings (the default).
    pub fn string(self) -> Self {
        self.of_type(FieldType::String)
    }

    /// Parses values as integers.
    pub fn integer(self) -> Self {
        self.of_type(FieldType::Integer)
    }

    /// Parses values as floats.
    pub fn float(self) -> Self {
        self.of_type(FieldType::Float)
    }

    /// Parses values as booleans.
    pub fn boolean(self) -> Self {
        self.of_type(FieldType::Boolean)
    }

    /// Parses values as timestamps.
    pub fn timestamp(self) -> Self {
        self.of_type(FieldType::Timestamp)
    }

    /// Parses values as document identifiers.
    pub fn identifier(self) -> Self {
        self.of_type(FieldType::Identifier)
    }

    /// Passes the raw value through to the meta map.
    pub fn meta(self) -> Self {
        self.of_type(FieldType::Meta)
    }

    // ========================================================================
    // Options
    // ========================================================================

    /// Adds an alternative parameter name.
    ///
    /// Aliases are tried in the order they were added, after the key.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds several alternative parameter names.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Allows the field in the projection parameter.
    pub fn projectable(mut self) -> Self {
        self.projectable = true;
        self
    }

    /// Allows the field in the sort parameter.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Sets a supplier for the value to use when the field is absent.
    ///
    /// The supplier must return grammar syntax (`"gt:5"`, `"slike:A"`) and is
    /// shared by concurrent queries, so it should be free of side effects.
    pub fn default_with<F>(mut self, supplier: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.default = Some(Arc::new(supplier));
        self
    }

    /// Sets a constant value to use when the field is absent.
    pub fn default_value(self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.default_with(move || value.clone())
    }

    /// Adds a chrono format string tried when parsing timestamps.
    ///
    /// Only valid on timestamp fields; checked when the registry is built.
    pub fn time_layout(mut self, layout: impl Into<String>) -> Self {
        self.time_layouts.push(layout.into());
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns the field key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the declared type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Returns the aliases in declaration order.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Returns `true` if this is a meta field.
    pub fn is_meta(&self) -> bool {
        self.field_type == FieldType::Meta
    }

    /// Returns `true` if the field may be projected.
    pub fn is_projectable(&self) -> bool {
        self.projectable
    }

    /// Returns `true` if the field may be sorted on.
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Returns `true` if a default supplier is configured.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Invokes the default supplier, if any.
    pub fn default_raw(&self) -> Option<String> {
        self.default.as_ref().map(|f| f())
    }

    /// Returns the configured timestamp layouts.
    pub fn time_layouts(&self) -> &[String] {
        &self.time_layouts
    }

    /// Returns `true` if `name` is this field's key or one of its aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        self.key == name || self.aliases.iter().any(|a| a == name)
    }

    /// Returns the key followed by the aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.key.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("field_type", &self.field_type)
            .field("aliases", &self.aliases)
            .field("projectable", &self.projectable)
            .field("sortable", &self.sortable)
            .field("has_default", &self.has_default())
            .field("time_layouts", &self.time_layouts)
            .finish()
    }
}
