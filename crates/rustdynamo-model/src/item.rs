//! Items and named attributes.
//!
//! An [`Item`] maps attribute names to values. On the wire it becomes a JSON
//! object whose values are tagged attribute objects ([`WireItem`]).

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::attribute_value::AttributeValue;
use crate::error::ModelError;

/// A decoded item: attribute name to value.
pub type Item = HashMap<String, AttributeValue>;

/// An encoded item as it appears in a request or response body.
pub type WireItem = Map<String, Value>;

/// A single named attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name, unique within an item.
    pub name: String,
    /// Attribute value.
    pub value: AttributeValue,
}

impl Attribute {
    /// Create an attribute from a name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Create a string attribute.
    #[must_use]
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, AttributeValue::S(value.into()))
    }

    /// Create a numeric attribute. The number is validated when encoded.
    #[must_use]
    pub fn number(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, AttributeValue::N(value.into()))
    }

    /// Create a binary attribute.
    #[must_use]
    pub fn binary(name: impl Into<String>, value: impl Into<bytes::Bytes>) -> Self {
        Self::new(name, AttributeValue::B(value.into()))
    }

    /// Create a string set attribute.
    #[must_use]
    pub fn string_set(name: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(name, AttributeValue::Ss(values))
    }

    /// Create a number set attribute.
    #[must_use]
    pub fn number_set(name: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(name, AttributeValue::Ns(values))
    }
}

/// Collect attributes into an item, rejecting repeated names.
pub fn item_from_attributes(
    attributes: impl IntoIterator<Item = Attribute>,
) -> Result<Item, ModelError> {
    let mut item = Item::new();
    for Attribute { name, value } in attributes {
        if item.contains_key(&name) {
            return Err(ModelError::DuplicateAttribute(name));
        }
        item.insert(name, value);
    }
    Ok(item)
}

/// Encode an item into its wire mapping.
pub fn encode_item(item: &Item) -> Result<WireItem, ModelError> {
    item.iter()
        .map(|(name, value)| Ok((name.clone(), value.encode()?)))
        .collect()
}

/// Decode a wire mapping into an item.
///
/// Any attribute that fails to decode is reported as
/// [`ModelError::MalformedItem`] naming the attribute.
pub fn decode_item(wire: &WireItem) -> Result<Item, ModelError> {
    wire.iter()
        .map(|(name, value)| {
            AttributeValue::decode(value)
                .map(|decoded| (name.clone(), decoded))
                .map_err(|source| ModelError::MalformedItem {
                    attribute: name.clone(),
                    source: Box::new(source),
                })
        })
        .collect()
}
