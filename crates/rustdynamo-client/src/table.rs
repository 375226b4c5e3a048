//! Table handle: item operations.

use rustdynamo_model::input::{DeleteItemInput, GetItemInput, PutItemInput};
use rustdynamo_model::output::{DeleteItemOutput, GetItemOutput, PutItemOutput};
use rustdynamo_model::{
    Attribute, DynamoDBOperation, Item, Key, ModelError, PrimaryKey, TableDescription,
    decode_item, encode_item,
};
use tracing::debug;

use crate::error::ClientError;
use crate::server::Server;

/// A handle to one table.
///
/// Holds no table state beyond its name and key schema; every call goes to
/// the service.
#[derive(Debug, Clone)]
pub struct Table {
    server: Server,
    name: String,
    primary_key: PrimaryKey,
}

impl Table {
    /// Create a table handle.
    pub fn new(server: Server, name: impl Into<String>, primary_key: PrimaryKey) -> Self {
        Self {
            server,
            name: name.into(),
            primary_key,
        }
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key schema.
    #[must_use]
    pub fn primary_key(&self) -> &PrimaryKey {
        &self.primary_key
    }

    /// The server this table is reached through.
    #[must_use]
    pub fn server(&self) -> &Server {
        &self.server
    }

    /// Store an item addressed by `hash_key` and `range_key` with the given
    /// extra attributes, replacing any existing item with the same key.
    ///
    /// Key attributes are derived from the key schema and must not be repeated
    /// in `attributes`.
    pub async fn put_item(
        &self,
        hash_key: &str,
        range_key: Option<&str>,
        attributes: &[Attribute],
    ) -> Result<(), ClientError> {
        let key = self.primary_key.key(hash_key, range_key)?;
        let mut item = Item::with_capacity(attributes.len() + 2);
        let hash = &self.primary_key.hash;
        item.insert(hash.name.clone(), hash.attribute_value(&key.hash_key)?);
        if let (Some(range), Some(value)) = (&self.primary_key.range, &key.range_key) {
            item.insert(range.name.clone(), range.attribute_value(value)?);
        }
        for attribute in attributes {
            if item
                .insert(attribute.name.clone(), attribute.value.clone())
                .is_some()
            {
                return Err(ModelError::DuplicateAttribute(attribute.name.clone()).into());
            }
        }

        let input = PutItemInput {
            table_name: self.name.clone(),
            item: encode_item(&item)?,
        };
        let _: PutItemOutput = self.server.call(DynamoDBOperation::PutItem, &input).await?;
        debug!(table = %self.name, hash_key, ?range_key, "put item");
        Ok(())
    }

    /// Fetch the item with `key`, or `None` if there is none.
    pub async fn get_item(&self, key: &Key) -> Result<Option<Item>, ClientError> {
        self.fetch(key, None).await
    }

    /// Like [`get_item`](Self::get_item) but with a strongly consistent read.
    pub async fn get_item_consistent(&self, key: &Key) -> Result<Option<Item>, ClientError> {
        self.fetch(key, Some(true)).await
    }

    async fn fetch(
        &self,
        key: &Key,
        consistent_read: Option<bool>,
    ) -> Result<Option<Item>, ClientError> {
        let input = GetItemInput {
            table_name: self.name.clone(),
            key: self.primary_key.build_key_payload(key)?,
            consistent_read,
        };
        let output: GetItemOutput = self.server.call(DynamoDBOperation::GetItem, &input).await?;
        Ok(output.item.as_ref().map(decode_item).transpose()?)
    }

    /// Delete the item with `key`. Deleting a missing item succeeds.
    pub async fn delete_item(&self, key: &Key) -> Result<(), ClientError> {
        let input = DeleteItemInput {
            table_name: self.name.clone(),
            key: self.primary_key.build_key_payload(key)?,
        };
        let _: DeleteItemOutput = self
            .server
            .call(DynamoDBOperation::DeleteItem, &input)
            .await?;
        Ok(())
    }

    /// Fetch the table's current description from the service.
    pub async fn describe(&self) -> Result<TableDescription, ClientError> {
        self.server.describe_table(&self.name).await
    }
}
