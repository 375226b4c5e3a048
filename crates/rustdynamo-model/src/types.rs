//! Table descriptor types.
//!
//! All types follow the DynamoDB JSON wire format with `PascalCase` field names.
//! Enum variants use idiomatic Rust naming with explicit mapping to the
//! `SCREAMING_SNAKE_CASE` strings the service uses.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::key::{KeyAttribute, PrimaryKey};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Key type within a key schema element.
///
/// `Hash` denotes the partition key; `Range` denotes the sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// Partition key.
    #[serde(rename = "HASH")]
    Hash,
    /// Sort key.
    #[serde(rename = "RANGE")]
    Range,
}

impl KeyType {
    /// Returns the DynamoDB wire-format string representation of this key type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hash => "HASH",
            Self::Range => "RANGE",
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar attribute types usable in key schemas and attribute definitions.
///
/// Values outside `S`, `N` and `B` are kept as `Unknown` so a describe
/// response never fails to parse over an attribute type alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarAttributeType {
    /// String type.
    S,
    /// Number type.
    N,
    /// Binary type.
    B,
    /// A type string this client does not know.
    Unknown(String),
}

impl ScalarAttributeType {
    /// Returns the DynamoDB wire-format string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::S => "S",
            Self::N => "N",
            Self::B => "B",
            Self::Unknown(s) => s.as_str(),
        }
    }

    /// Returns `true` if this is a valid key attribute type (S, N, or B).
    #[must_use]
    pub fn is_valid_key_type(&self) -> bool {
        matches!(self, Self::S | Self::N | Self::B)
    }
}

impl Serialize for ScalarAttributeType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ScalarAttributeType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "S" => Ok(Self::S),
            "N" => Ok(Self::N),
            "B" => Ok(Self::B),
            _ => Ok(Self::Unknown(s)),
        }
    }
}

impl std::fmt::Display for ScalarAttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current status of a DynamoDB table, as reported by the service.
///
/// The client never drives these transitions; it only observes them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableStatus {
    /// The table is being created.
    Creating,
    /// The table is ready for use.
    Active,
    /// The table is being updated.
    Updating,
    /// The table is being deleted.
    Deleting,
    /// Any other status string the service reports.
    Unknown(String),
}

impl TableStatus {
    /// Returns the DynamoDB wire-format string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Creating => "CREATING",
            Self::Active => "ACTIVE",
            Self::Updating => "UPDATING",
            Self::Deleting => "DELETING",
            Self::Unknown(s) => s.as_str(),
        }
    }
}

impl Serialize for TableStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TableStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "CREATING" => Self::Creating,
            "ACTIVE" => Self::Active,
            "UPDATING" => Self::Updating,
            "DELETING" => Self::Deleting,
            _ => Self::Unknown(s),
        })
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

/// An element of the key schema for a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    /// The name of the key attribute.
    pub attribute_name: String,
    /// The role of the attribute in the key schema (`HASH` or `RANGE`).
    pub key_type: KeyType,
}

impl KeySchemaElement {
    /// Create a key schema element.
    #[must_use]
    pub fn new(attribute_name: impl Into<String>, key_type: KeyType) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            key_type,
        }
    }
}

/// An attribute definition specifying the attribute name and its scalar type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinition {
    /// The name of the attribute.
    pub attribute_name: String,
    /// The scalar data type of the attribute (`S`, `N`, or `B`).
    pub attribute_type: ScalarAttributeType,
}

impl AttributeDefinition {
    /// Create an attribute definition.
    #[must_use]
    pub fn new(attribute_name: impl Into<String>, attribute_type: ScalarAttributeType) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            attribute_type,
        }
    }
}

/// Provisioned read/write capacity for a table.
///
/// Describe responses carry extra bookkeeping fields next to these two; they
/// are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedThroughput {
    /// The maximum number of strongly consistent reads per second.
    pub read_capacity_units: i64,
    /// The maximum number of writes per second.
    pub write_capacity_units: i64,
}

/// Schema metadata of a table.
///
/// Used as the input of `CreateTable`/`DeleteTable` and as the result of
/// `DescribeTable`. For `DeleteTable` only the name matters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableDescription {
    /// The name of the table.
    #[serde(default)]
    pub table_name: String,
    /// The attribute definitions for the key attributes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_definitions: Vec<AttributeDefinition>,
    /// The key schema for the table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_schema: Vec<KeySchemaElement>,
    /// The provisioned throughput settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughput>,
    /// The current status of the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_status: Option<TableStatus>,
    /// The number of items in the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
    /// The total size of the table in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_size_bytes: Option<i64>,
    /// The date and time (epoch seconds) when the table was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<f64>,
    /// The Amazon Resource Name (ARN) of the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_arn: Option<String>,
}

impl TableDescription {
    /// A descriptor that carries only a table name, e.g. for `DeleteTable`.
    #[must_use]
    pub fn named(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Self::default()
        }
    }

    /// Look up the declared type of an attribute.
    #[must_use]
    pub fn attribute_type(&self, attribute_name: &str) -> Option<&ScalarAttributeType> {
        self.attribute_definitions
            .iter()
            .find(|def| def.attribute_name == attribute_name)
            .map(|def| &def.attribute_type)
    }

    /// Derive the table's [`PrimaryKey`] from its key schema and attribute
    /// definitions.
    pub fn primary_key(&self) -> Result<PrimaryKey, ModelError> {
        let key_attribute = |key_type: KeyType| -> Result<Option<KeyAttribute>, ModelError> {
            let mut elements = self.key_schema.iter().filter(|e| e.key_type == key_type);
            let Some(element) = elements.next() else {
                return Ok(None);
            };
            if elements.next().is_some() {
                return Err(ModelError::InvalidKeySchema(format!(
                    "more than one {key_type} key in table {:?}",
                    self.table_name
                )));
            }
            let attribute_type = self
                .attribute_type(&element.attribute_name)
                .ok_or_else(|| {
                    ModelError::InvalidKeySchema(format!(
                        "no attribute definition for key attribute {:?}",
                        element.attribute_name
                    ))
                })?;
            KeyAttribute::new(&element.attribute_name, attribute_type.clone()).map(Some)
        };

        let hash = key_attribute(KeyType::Hash)?.ok_or_else(|| {
            ModelError::InvalidKeySchema(format!(
                "table {:?} has no HASH key",
                self.table_name
            ))
        })?;
        let range = key_attribute(KeyType::Range)?;
        Ok(PrimaryKey { hash, range })
    }
}
