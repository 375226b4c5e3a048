//! Tests against a running DynamoDB Local instance.

#[cfg(test)]
mod tests {
    use anyhow::{Context, Result};
    use rustdynamo_client::ClientError;
    use rustdynamo_model::types::TableStatus;
    use rustdynamo_model::{Attribute, AttributeValue, Key, TableDescription};

    use crate::{composite_table, local_server, test_table_name};

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_should_create_list_and_delete_table() -> Result<()> {
        let server = local_server();
        let desc = composite_table(&test_table_name("tables"));

        let status = server.create_table(&desc).await?;
        assert!(matches!(status, TableStatus::Creating | TableStatus::Active));

        let names = server.list_tables().await?;
        assert!(names.contains(&desc.table_name));

        let described = server.describe_table(&desc.table_name).await?;
        assert_eq!(described.key_schema, desc.key_schema);

        server
            .delete_table(&TableDescription::named(&desc.table_name))
            .await?;
        let err = server
            .describe_table(&desc.table_name)
            .await
            .err()
            .context("table still exists after delete")?;
        assert!(matches!(err, ClientError::ResourceNotFound(_)));
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_should_put_and_get_item() -> Result<()> {
        let server = local_server();
        let desc = composite_table(&test_table_name("items"));
        server.create_table(&desc).await?;
        let table = server.table_from_description(&desc)?;

        table
            .put_item(
                "NewHashKeyVal",
                Some("12"),
                &[
                    Attribute::string("Attr1", "Attr1Val"),
                    Attribute::number("Attr2", "12"),
                ],
            )
            .await?;

        let item = table
            .get_item_consistent(&Key::composite("NewHashKeyVal", "12"))
            .await?
            .context("item not found")?;
        assert_eq!(item["Attr1"].as_s(), Some("Attr1Val"));
        assert_eq!(item["Attr2"], AttributeValue::N("12".into()));

        table
            .delete_item(&Key::composite("NewHashKeyVal", "12"))
            .await?;
        assert!(
            table
                .get_item_consistent(&Key::composite("NewHashKeyVal", "12"))
                .await?
                .is_none()
        );

        server.delete_table(&desc).await?;
        Ok(())
    }
}
