//! Key schema and concrete key addressing.
//!
//! A [`PrimaryKey`] describes which attributes identify an item in a table.
//! A [`Key`] holds the caller-supplied key values as text. Combining the two
//! yields the key payload sent with `GetItem` and `DeleteItem`.

use bytes::Bytes;

use crate::attribute_value::AttributeValue;
use crate::error::ModelError;
use crate::item::WireItem;
use crate::types::{
    AttributeDefinition, KeySchemaElement, KeyType, ScalarAttributeType,
};

/// A key attribute: its name and scalar type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyAttribute {
    /// Attribute name.
    pub name: String,
    /// Scalar type of the attribute.
    pub attribute_type: ScalarAttributeType,
}

impl KeyAttribute {
    /// Create a key attribute, rejecting types that cannot be key types.
    pub fn new(
        name: impl Into<String>,
        attribute_type: ScalarAttributeType,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        if !attribute_type.is_valid_key_type() {
            return Err(ModelError::InvalidKeySchema(format!(
                "attribute {name:?} has type {attribute_type}, which cannot be a key type"
            )));
        }
        Ok(Self {
            name,
            attribute_type,
        })
    }

    /// A string-typed key attribute.
    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute_type: ScalarAttributeType::S,
        }
    }

    /// A number-typed key attribute.
    #[must_use]
    pub fn number(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute_type: ScalarAttributeType::N,
        }
    }

    /// A binary-typed key attribute.
    #[must_use]
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute_type: ScalarAttributeType::B,
        }
    }

    /// Turn a textual key value into an attribute value of this attribute's
    /// type.
    ///
    /// Binary keys use the UTF-8 bytes of the text.
    pub fn attribute_value(&self, value: &str) -> Result<AttributeValue, ModelError> {
        match &self.attribute_type {
            ScalarAttributeType::S => Ok(AttributeValue::S(value.to_owned())),
            ScalarAttributeType::N => AttributeValue::number(value),
            ScalarAttributeType::B => {
                Ok(AttributeValue::B(Bytes::copy_from_slice(value.as_bytes())))
            }
            ScalarAttributeType::Unknown(other) => Err(ModelError::InvalidKeySchema(format!(
                "attribute {:?} has unsupported key type {other}",
                self.name
            ))),
        }
    }

    fn definition(&self) -> AttributeDefinition {
        AttributeDefinition::new(&self.name, self.attribute_type.clone())
    }
}

/// The primary key schema of a table: a hash attribute and an optional range
/// attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrimaryKey {
    /// Partition key attribute.
    pub hash: KeyAttribute,
    /// Sort key attribute, if the table has one.
    pub range: Option<KeyAttribute>,
}

impl PrimaryKey {
    /// A schema with only a hash key.
    #[must_use]
    pub fn hash_only(hash: KeyAttribute) -> Self {
        Self { hash, range: None }
    }

    /// A schema with both a hash key and a range key.
    #[must_use]
    pub fn composite(hash: KeyAttribute, range: KeyAttribute) -> Self {
        Self {
            hash,
            range: Some(range),
        }
    }

    /// Whether the schema declares a range key.
    #[must_use]
    pub fn has_range(&self) -> bool {
        self.range.is_some()
    }

    /// Build a concrete key for this schema, checking that a range value is
    /// present exactly when the schema has a range attribute.
    pub fn key(
        &self,
        hash: impl Into<String>,
        range: Option<impl Into<String>>,
    ) -> Result<Key, ModelError> {
        let key = Key {
            hash_key: hash.into(),
            range_key: range.map(Into::into),
        };
        self.check(&key)?;
        Ok(key)
    }

    /// Check that a concrete key fits this schema.
    pub fn check(&self, key: &Key) -> Result<(), ModelError> {
        match (&self.range, &key.range_key) {
            (Some(range), None) => Err(ModelError::KeySchemaMismatch(format!(
                "range key {:?} is required",
                range.name
            ))),
            (None, Some(_)) => Err(ModelError::KeySchemaMismatch(format!(
                "table key has no range attribute, but a range value was given for hash key {:?}",
                self.hash.name
            ))),
            _ => Ok(()),
        }
    }

    /// The key attributes of this schema, hash first.
    pub fn key_attributes(&self) -> impl Iterator<Item = &KeyAttribute> {
        std::iter::once(&self.hash).chain(self.range.as_ref())
    }

    /// Build the wire key payload for a concrete key.
    pub fn build_key_payload(&self, key: &Key) -> Result<WireItem, ModelError> {
        self.check(key)?;
        let mut payload = WireItem::new();
        payload.insert(
            self.hash.name.clone(),
            self.hash.attribute_value(&key.hash_key)?.encode()?,
        );
        if let (Some(range), Some(value)) = (&self.range, &key.range_key) {
            payload.insert(range.name.clone(), range.attribute_value(value)?.encode()?);
        }
        Ok(payload)
    }

    /// The `KeySchema` elements describing this key.
    #[must_use]
    pub fn key_schema(&self) -> Vec<KeySchemaElement> {
        let mut schema = vec![KeySchemaElement::new(&self.hash.name, KeyType::Hash)];
        if let Some(range) = &self.range {
            schema.push(KeySchemaElement::new(&range.name, KeyType::Range));
        }
        schema
    }

    /// The `AttributeDefinitions` for the key attributes.
    #[must_use]
    pub fn attribute_definitions(&self) -> Vec<AttributeDefinition> {
        self.key_attributes().map(KeyAttribute::definition).collect()
    }
}

/// A concrete key: the hash value and, for composite tables, the range value.
///
/// Values are kept as text so `"1"` and `"1.0"` remain distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    /// Hash key value.
    pub hash_key: String,
    /// Range key value.
    pub range_key: Option<String>,
}

impl Key {
    /// A key with only a hash value.
    #[must_use]
    pub fn hash(hash_key: impl Into<String>) -> Self {
        Self {
            hash_key: hash_key.into(),
            range_key: None,
        }
    }

    /// A key with both hash and range values.
    #[must_use]
    pub fn composite(hash_key: impl Into<String>, range_key: impl Into<String>) -> Self {
        Self {
            hash_key: hash_key.into(),
            range_key: Some(range_key.into()),
        }
    }
}
