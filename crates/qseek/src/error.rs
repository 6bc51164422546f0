//! Error types for the qseek crate.
//!
//! Only registry construction can fail. Translating a parameter map never
//! does: values that do not coerce are dropped from the filter instead.

use thiserror::Error;

/// Errors that can occur when building a [`Registry`](crate::Registry).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field was declared with an empty key.
    #[error("field key cannot be an empty string")]
    EmptyKey,

    /// A field key collides with a reserved parameter name.
    #[error("field {key:?} is using a reserved name (one of {reserved})")]
    ReservedKey { key: String, reserved: String },

    /// A field declared an empty alias.
    #[error("field {key:?} has an empty alias")]
    EmptyAlias { key: String },

    /// A field alias collides with a reserved parameter name.
    #[error("field {key:?} alias {alias:?} is using a reserved name (one of {reserved})")]
    ReservedAlias {
        key: String,
        alias: String,
        reserved: String,
    },

    /// A key or alias is used by more than one field.
    #[error("name {name:?} is declared by both {first:?} and {second:?}")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    /// Meta fields are never projected.
    #[error("meta field {key:?} cannot be projectable")]
    MetaNotProjectable { key: String },

    /// Meta fields are never sorted.
    #[error("meta field {key:?} cannot be sortable")]
    MetaNotSortable { key: String },

    /// Datetime layouts were given for a field that does not hold timestamps.
    #[error("field {key:?} must be a timestamp field to use datetime layouts")]
    TimeLayoutOnNonTimestamp { key: String },

    /// The reserved parameter names are empty or not distinct.
    #[error("invalid reserved parameter names: {0}")]
    InvalidReservedNames(String),

    /// A YAML registry config could not be parsed.
    #[error("invalid YAML registry config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON registry config could not be parsed.
    #[error("invalid JSON registry config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for registry construction.
pub type Result<T> = std::result::Result<T, ConfigError>;
