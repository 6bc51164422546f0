//! Declarative registry configuration.
//!
//! Field declarations can be loaded from YAML or JSON instead of being built
//! in code. The result goes through the same validation as
//! [`RegistryBuilder::build`](crate::RegistryBuilder::build).
//!
//! ```yaml
//! reserved:
//!   limit: lmt
//!   skip: skp
//!   sort: srt
//!   projection: prj
//! fields:
//!   - key: objectId
//!     type: identifier
//!     aliases: [_id, id]
//!   - key: count
//!     type: integer
//!     sortable: true
//!     projectable: true
//!   - key: status
//!     default: "ne:archived"
//!   - key: created
//!     type: timestamp
//!     time_layouts: ["%Y-%m-%d"]
//!   - key: pageMarker
//!     type: meta
//! ```

use serde::Deserialize;

use crate::error::Result;
use crate::field::{Field, FieldType};
use crate::registry::{Registry, ReservedNames};

/// One field declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    /// Parameter name and output key.
    pub key: String,
    /// Value type, `string` when omitted.
    #[serde(default, rename = "type")]
    pub field_type: FieldType,
    /// Alternative parameter names, tried in order.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Whether the field may be projected.
    #[serde(default)]
    pub projectable: bool,
    /// Whether the field may be sorted on.
    #[serde(default)]
    pub sortable: bool,
    /// Constant value, in grammar syntax, used when the field is absent.
    #[serde(default)]
    pub default: Option<String>,
    /// chrono format strings for timestamp fields.
    #[serde(default)]
    pub time_layouts: Vec<String>,
}

impl FieldConfig {
    /// Converts to a [`Field`].
    pub fn into_field(self) -> Field {
        let mut field = Field::new(self.key)
            .of_type(self.field_type)
            .with_aliases(self.aliases);
        if self.projectable {
            field = field.projectable();
        }
        if self.sortable {
            field = field.sortable();
        }
        if let Some(default) = self.default {
            field = field.default_value(default);
        }
        for layout in self.time_layouts {
            field = field.time_layout(layout);
        }
        field
    }
}

/// A full registry declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Reserved parameter names; the defaults when omitted.
    #[serde(default)]
    pub reserved: ReservedNames,
    /// Field declarations, in order.
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

impl RegistryConfig {
    /// Parses a YAML declaration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a JSON declaration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates the declaration and builds a [`Registry`].
    pub fn into_registry(self) -> Result<Registry> {
        Registry::builder()
            .reserved(self.reserved)
            .fields(self.fields.into_iter().map(FieldConfig::into_field))
            .build()
    }
}
