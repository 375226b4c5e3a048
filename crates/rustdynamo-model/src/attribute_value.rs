//! DynamoDB `AttributeValue` type and its wire codec.
//!
//! `AttributeValue` is a tagged union where exactly one variant is present.
//! The JSON wire format uses single-key objects like `{"S": "hello"}`.
//!
//! [`AttributeValue::encode`] validates before producing the wire object and
//! [`AttributeValue::decode`] is strict about the shape it accepts, so
//! `decode(encode(v)) == v` holds for every value that encodes.

use std::collections::HashSet;
use std::fmt;

use base64::Engine;
use bytes::Bytes;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::{Map, Value};

use crate::error::ModelError;

/// The six type tags understood by the codec.
pub const TYPE_TAGS: [&str; 6] = ["S", "N", "B", "SS", "NS", "BS"];

/// DynamoDB attribute value.
///
/// Numbers are kept as their decimal string so no precision is lost between
/// the caller and the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    /// String value.
    S(String),
    /// Number value (decimal string).
    N(String),
    /// Binary value (base64-encoded in JSON).
    B(Bytes),
    /// String Set.
    Ss(Vec<String>),
    /// Number Set (decimal strings).
    Ns(Vec<String>),
    /// Binary Set (base64-encoded in JSON).
    Bs(Vec<Bytes>),
}

impl AttributeValue {
    /// Create a string value.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::S(value.into())
    }

    /// Create a number value, checking the decimal syntax up front.
    pub fn number(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        check_number("N", &value)?;
        Ok(Self::N(value))
    }

    /// Create a binary value.
    #[must_use]
    pub fn binary(value: impl Into<Bytes>) -> Self {
        Self::B(value.into())
    }

    /// Returns the string value if this is an `S` variant.
    #[must_use]
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number string if this is an `N` variant.
    #[must_use]
    pub fn as_n(&self) -> Option<&str> {
        match self {
            Self::N(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the bytes if this is a `B` variant.
    #[must_use]
    pub fn as_b(&self) -> Option<&Bytes> {
        match self {
            Self::B(b) => Some(b),
            _ => None,
        }
    }

    /// Check the value against the rules the service enforces.
    ///
    /// Numbers must be syntactically valid decimals; sets must be non-empty
    /// and free of duplicates.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::S(_) | Self::B(_) => Ok(()),
            Self::N(n) => check_number("N", n),
            Self::Ss(v) => check_set("SS", v),
            Self::Ns(v) => {
                for n in v {
                    check_number("NS", n)?;
                }
                check_set("NS", v)
            }
            Self::Bs(v) => check_set("BS", v),
        }
    }

    /// Encode into the wire representation, e.g. `{"N": "1"}`.
    pub fn encode(&self) -> Result<Value, ModelError> {
        self.validate()?;
        serde_json::to_value(self).map_err(|e| ModelError::MalformedAttribute(e.to_string()))
    }

    /// Decode a wire object into an attribute value.
    ///
    /// The object must carry exactly one key, and that key must be one of the
    /// six recognized type tags.
    pub fn decode(wire: &Value) -> Result<Self, ModelError> {
        let Value::Object(map) = wire else {
            return Err(ModelError::MalformedAttribute(format!(
                "expected a JSON object, got {wire}"
            )));
        };
        Self::decode_map(map)
    }

    fn decode_map(map: &Map<String, Value>) -> Result<Self, ModelError> {
        let mut entries = map.iter();
        let (Some((tag, value)), None) = (entries.next(), entries.next()) else {
            return Err(ModelError::MalformedAttribute(format!(
                "expected exactly one type tag, found {} keys",
                map.len()
            )));
        };

        let decoded = match tag.as_str() {
            "S" => Self::S(expect_string(tag, value)?.to_owned()),
            "N" => Self::N(expect_string(tag, value)?.to_owned()),
            "B" => Self::B(decode_base64("B", expect_string(tag, value)?)?),
            "SS" => Self::Ss(expect_string_list(tag, value)?),
            "NS" => Self::Ns(expect_string_list(tag, value)?),
            "BS" => Self::Bs(
                expect_string_list(tag, value)?
                    .iter()
                    .map(|encoded| decode_base64("BS", encoded))
                    .collect::<Result<Vec<_>, ModelError>>()?,
            ),
            other => {
                return Err(ModelError::MalformedAttribute(format!(
                    "unrecognized type tag {other:?}, expected one of {TYPE_TAGS:?}"
                )));
            }
        };

        decoded.validate()?;
        Ok(decoded)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S(s) => write!(f, "{{S: {s}}}"),
            Self::N(n) => write!(f, "{{N: {n}}}"),
            Self::B(b) => write!(f, "{{B: {} bytes}}", b.len()),
            Self::Ss(v) => write!(f, "{{SS: {v:?}}}"),
            Self::Ns(v) => write!(f, "{{NS: {v:?}}}"),
            Self::Bs(v) => write!(f, "{{BS: {} items}}", v.len()),
        }
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let engine = &base64::engine::general_purpose::STANDARD;
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::S(s) => map.serialize_entry("S", s)?,
            Self::N(n) => map.serialize_entry("N", n)?,
            Self::B(b) => map.serialize_entry("B", &engine.encode(b))?,
            Self::Ss(v) => map.serialize_entry("SS", v)?,
            Self::Ns(v) => map.serialize_entry("NS", v)?,
            Self::Bs(v) => {
                let encoded: Vec<String> = v.iter().map(|b| engine.encode(b)).collect();
                map.serialize_entry("BS", &encoded)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Self::decode_map(&map).map_err(de::Error::custom)
    }
}

/// Returns `true` if `s` is a decimal number the service accepts.
///
/// Grammar: optional sign, digits with an optional fractional part (at least
/// one digit overall), optional exponent with its own optional sign.
#[must_use]
pub fn is_valid_number(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_digits = count_digits(&bytes[i..]);
    i += int_digits;

    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        frac_digits = count_digits(&bytes[i..]);
        i += frac_digits;
    }

    if int_digits + frac_digits == 0 {
        return false;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_digits = count_digits(&bytes[i..]);
        if exp_digits == 0 {
            return false;
        }
        i += exp_digits;
    }

    i == bytes.len()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn check_number(tag: &'static str, value: &str) -> Result<(), ModelError> {
    if is_valid_number(value) {
        Ok(())
    } else {
        Err(ModelError::InvalidAttributeValue {
            tag,
            value: value.to_owned(),
            reason: "not a valid decimal number".to_owned(),
        })
    }
}

fn check_set<T: Eq + std::hash::Hash + fmt::Debug>(
    tag: &'static str,
    members: &[T],
) -> Result<(), ModelError> {
    if members.is_empty() {
        return Err(ModelError::InvalidAttributeValue {
            tag,
            value: "[]".to_owned(),
            reason: "sets must not be empty".to_owned(),
        });
    }
    let mut seen = HashSet::with_capacity(members.len());
    for member in members {
        if !seen.insert(member) {
            return Err(ModelError::InvalidAttributeValue {
                tag,
                value: format!("{member:?}"),
                reason: "duplicate set member".to_owned(),
            });
        }
    }
    Ok(())
}

fn expect_string<'a>(tag: &str, value: &'a Value) -> Result<&'a str, ModelError> {
    value.as_str().ok_or_else(|| {
        ModelError::MalformedAttribute(format!("{tag} expects a string, got {value}"))
    })
}

fn expect_string_list(tag: &str, value: &Value) -> Result<Vec<String>, ModelError> {
    let Value::Array(items) = value else {
        return Err(ModelError::MalformedAttribute(format!(
            "{tag} expects a list, got {value}"
        )));
    };
    items
        .iter()
        .map(|item| expect_string(tag, item).map(ToOwned::to_owned))
        .collect()
}

fn decode_base64(tag: &str, encoded: &str) -> Result<Bytes, ModelError> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map(Bytes::from)
        .map_err(|e| ModelError::MalformedAttribute(format!("{tag} is not valid base64: {e}")))
}
