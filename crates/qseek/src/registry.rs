//! The validated, immutable set of declared fields.
//!
//! Fields are checked together when the registry is built: keys and aliases
//! must be non-empty, distinct, and must not shadow a reserved parameter.
//! Once built, a [`Registry`] never changes and can be shared across threads.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::field::{Field, FieldType};

/// Names of the top-level paging, sort, and projection parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReservedNames {
    /// Maximum number of documents.
    pub limit: String,
    /// Number of documents to skip.
    pub skip: String,
    /// Comma-separated sort directives.
    pub sort: String,
    /// Comma-separated projection directives.
    pub projection: String,
}

impl Default for ReservedNames {
    fn default() -> Self {
        ReservedNames {
            limit: "limit".to_string(),
            skip: "skip".to_string(),
            sort: "sort".to_string(),
            projection: "projection".to_string(),
        }
    }
}

impl ReservedNames {
    /// Creates a set of reserved names.
    pub fn new(
        limit: impl Into<String>,
        skip: impl Into<String>,
        sort: impl Into<String>,
        projection: impl Into<String>,
    ) -> Self {
        ReservedNames {
            limit: limit.into(),
            skip: skip.into(),
            sort: sort.into(),
            projection: projection.into(),
        }
    }

    /// Returns the four names in a fixed order.
    pub fn as_array(&self) -> [&str; 4] {
        [
            self.limit.as_str(),
            self.skip.as_str(),
            self.sort.as_str(),
            self.projection.as_str(),
        ]
    }

    /// Returns `true` if `name` is reserved.
    pub fn contains(&self, name: &str) -> bool {
        self.as_array().contains(&name)
    }

    fn describe(&self) -> String {
        self.as_array()
            .iter()
            .map(|n| format!("{n:?}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn validate(&self) -> Result<()> {
        let names = self.as_array();
        if names.iter().any(|n| n.is_empty()) {
            return Err(ConfigError::InvalidReservedNames(
                "names cannot be empty".to_string(),
            ));
        }
        for (i, a) in names.iter().enumerate() {
            if names[i + 1..].contains(a) {
                return Err(ConfigError::InvalidReservedNames(format!(
                    "{a:?} is used more than once"
                )));
            }
        }
        Ok(())
    }
}

/// Collects fields before validation.
///
/// # Example
///
/// ```
/// use qseek::{Field, Registry};
///
/// let registry = Registry::builder()
///     .field(Field::new("name"))
///     .field(Field::new("count").integer().sortable())
///     .build()
///     .unwrap();
///
/// assert_eq!(registry.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    fields: Vec<Field>,
    reserved: ReservedNames,
}

impl RegistryBuilder {
    /// Creates an empty builder with the default reserved names.
    pub fn new() -> Self {
        RegistryBuilder::default()
    }

    /// Adds a field.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds several fields.
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Replaces the reserved parameter names.
    pub fn reserved(mut self, reserved: ReservedNames) -> Self {
        self.reserved = reserved;
        self
    }

    /// Validates the fields and freezes them into a [`Registry`].
    pub fn build(self) -> Result<Registry> {
        self.reserved.validate()?;

        {
            let mut owners: HashMap<&str, &str> = HashMap::new();
            for field in &self.fields {
                validate_field(field, &self.reserved)?;
                for name in field.names() {
                    if let Some(first) = owners.insert(name, field.key()) {
                        return Err(ConfigError::DuplicateName {
                            name: name.to_string(),
                            first: first.to_string(),
                            second: field.key().to_string(),
                        });
                    }
                }
            }
        }

        debug!(
            fields = self.fields.len(),
            reserved = %self.reserved.describe(),
            "query field registry built"
        );
        Ok(Registry {
            fields: self.fields,
            reserved: self.reserved,
        })
    }
}

fn validate_field(field: &Field, reserved: &ReservedNames) -> Result<()> {
    let key = field.key();
    if key.is_empty() {
        return Err(ConfigError::EmptyKey);
    }
    if reserved.contains(key) {
        return Err(ConfigError::ReservedKey {
            key: key.to_string(),
            reserved: reserved.describe(),
        });
    }
    for alias in field.aliases() {
        if alias.is_empty() {
            return Err(ConfigError::EmptyAlias {
                key: key.to_string(),
            });
        }
        if reserved.contains(alias) {
            return Err(ConfigError::ReservedAlias {
                key: key.to_string(),
                alias: alias.clone(),
                reserved: reserved.describe(),
            });
        }
    }
    if field.is_meta() {
        if field.is_projectable() {
            return Err(ConfigError::MetaNotProjectable {
                key: key.to_string(),
            });
        }
        if field.is_sortable() {
            return Err(ConfigError::MetaNotSortable {
                key: key.to_string(),
            });
        }
    }
    if !field.time_layouts().is_empty() && field.field_type() != FieldType::Timestamp {
        return Err(ConfigError::TimeLayoutOnNonTimestamp {
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Validated, immutable field declarations.
#[derive(Debug, Clone)]
pub struct Registry {
    fields: Vec<Field>,
    reserved: ReservedNames,
}

impl Registry {
    /// Starts building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Builds a registry from fields with the default reserved names.
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Result<Registry> {
        RegistryBuilder::new().fields(fields).build()
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the reserved parameter names.
    pub fn reserved(&self) -> &ReservedNames {
        &self.reserved
    }

    /// Finds a field by key or alias.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.answers_to(name))
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
