//! DynamoDB model types for RustDynamo.
//!
//! This crate holds everything that has to be bit-exact on the wire but does
//! not perform I/O:
//!
//! - [`AttributeValue`] and its tagged-object JSON codec
//! - [`Item`] encode/decode helpers
//! - [`PrimaryKey`] / [`Key`] addressing and key payload construction
//! - table descriptor types and the operation input/output shapes
//! - local validation errors ([`ModelError`]) and service error codes
// "DynamoDB" appears in virtually every doc comment in this crate.
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod attribute_value;
pub mod error;
pub mod input;
pub mod item;
pub mod key;
pub mod operations;
pub mod output;
pub mod types;

pub use attribute_value::AttributeValue;
pub use error::{DynamoDBErrorCode, ModelError};
pub use item::{Attribute, Item, WireItem, decode_item, encode_item, item_from_attributes};
pub use key::{Key, KeyAttribute, PrimaryKey};
pub use operations::DynamoDBOperation;
pub use types::TableDescription;
