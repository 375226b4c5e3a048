//! Table management through the `Server` facade.

#[cfg(test)]
mod tests {
    use rustdynamo_client::ClientError;
    use rustdynamo_model::types::{ScalarAttributeType, TableStatus};
    use rustdynamo_model::{DynamoDBOperation, TableDescription};

    use crate::fake::FakeDynamoDB;
    use crate::{composite_table, fake_server, fake_service, simple_table, test_credentials};

    #[tokio::test]
    async fn test_should_list_no_tables_on_empty_service() {
        let fake = fake_service();
        let server = fake_server(&fake);

        let names = server.list_tables().await.unwrap();

        assert!(names.is_empty());
        assert_eq!(fake.request_count(), 1);
    }

    #[tokio::test]
    async fn test_should_create_describe_and_list_table() {
        let fake = fake_service();
        let server = fake_server(&fake);
        let desc = composite_table("DynamoDBTestMyTable");

        let status = server.create_table(&desc).await.unwrap();
        assert_eq!(status, TableStatus::Creating);

        let described = server.describe_table("DynamoDBTestMyTable").await.unwrap();
        assert_eq!(described.table_name, "DynamoDBTestMyTable");
        assert_eq!(described.table_status, Some(TableStatus::Active));
        assert_eq!(described.key_schema, desc.key_schema);
        assert_eq!(
            described.attribute_type("TestRangeKey"),
            Some(&ScalarAttributeType::N)
        );
        assert_eq!(described.item_count, Some(0));

        let names = server.list_tables().await.unwrap();
        assert_eq!(names, vec!["DynamoDBTestMyTable".to_owned()]);
    }

    #[tokio::test]
    async fn test_should_send_create_table_with_key_schema() {
        let fake = fake_service();
        let server = fake_server(&fake);

        server
            .create_table(&composite_table("DynamoDBTestMyTable"))
            .await
            .unwrap();

        let requests = fake.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].operation, Some(DynamoDBOperation::CreateTable));
        let body = &requests[0].body;
        assert_eq!(body["TableName"], "DynamoDBTestMyTable");
        assert_eq!(body["KeySchema"][0]["AttributeName"], "TestHashKey");
        assert_eq!(body["KeySchema"][0]["KeyType"], "HASH");
        assert_eq!(body["KeySchema"][1]["KeyType"], "RANGE");
        assert_eq!(body["ProvisionedThroughput"]["ReadCapacityUnits"], 1);
    }

    #[tokio::test]
    async fn test_should_delete_table() {
        let fake = fake_service();
        let server = fake_server(&fake);
        let desc = simple_table("to-delete");
        server.create_table(&desc).await.unwrap();

        let status = server
            .delete_table(&TableDescription::named("to-delete"))
            .await
            .unwrap();

        assert_eq!(status, TableStatus::Deleting);
        assert!(server.list_tables().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_should_not_retry_missing_table_on_delete() {
        let fake = fake_service();
        let server = fake_server(&fake);

        let err = server
            .delete_table(&TableDescription::named("missing"))
            .await
            .unwrap_err();

        let ClientError::ResourceNotFound(service) = &err else {
            panic!("expected ResourceNotFound, got {err:?}");
        };
        assert_eq!(service.code, "ResourceNotFoundException");
        assert!(service.message.contains("missing"));
        assert!(service.request_id.is_some());
        assert!(!err.is_retryable());
        assert_eq!(fake.request_count(), 1);
    }

    #[tokio::test]
    async fn test_should_report_resource_in_use_on_duplicate_create() {
        let fake = fake_service();
        let server = fake_server(&fake);
        let desc = simple_table("dup");
        server.create_table(&desc).await.unwrap();

        let err = server.create_table(&desc).await.unwrap_err();

        assert!(matches!(err, ClientError::Request(_)), "got {err:?}");
        assert_eq!(err.code(), Some("ResourceInUseException"));
        assert_eq!(fake.request_count(), 2);
    }

    #[tokio::test]
    async fn test_should_follow_list_tables_pagination() {
        let fake = std::sync::Arc::new(FakeDynamoDB::new(&test_credentials()).with_page_size(2));
        let server = fake_server(&fake);
        for name in ["t-e", "t-a", "t-c", "t-b", "t-d"] {
            server.create_table(&simple_table(name)).await.unwrap();
        }

        let names = server.list_tables().await.unwrap();

        assert_eq!(names, vec!["t-a", "t-b", "t-c", "t-d", "t-e"]);
        let list_requests: Vec<_> = fake
            .requests()
            .into_iter()
            .filter(|r| r.operation == Some(DynamoDBOperation::ListTables))
            .collect();
        assert_eq!(list_requests.len(), 3);
        assert!(list_requests[0].body.get("ExclusiveStartTableName").is_none());
        assert_eq!(list_requests[1].body["ExclusiveStartTableName"], "t-b");
        assert_eq!(list_requests[2].body["ExclusiveStartTableName"], "t-d");
    }

    #[tokio::test]
    async fn test_should_fetch_single_page_with_limit() {
        let fake = fake_service();
        let server = fake_server(&fake);
        for name in ["a", "b", "c"] {
            server.create_table(&simple_table(name)).await.unwrap();
        }

        let page = server.list_tables_page(None, Some(2)).await.unwrap();
        assert_eq!(page.table_names, vec!["a", "b"]);
        assert_eq!(page.last_evaluated_table_name.as_deref(), Some("b"));

        let page = server.list_tables_page(Some("b"), Some(2)).await.unwrap();
        assert_eq!(page.table_names, vec!["c"]);
        assert_eq!(page.last_evaluated_table_name, None);
    }

    #[tokio::test]
    async fn test_should_describe_missing_table_as_not_found() {
        let fake = fake_service();
        let server = fake_server(&fake);

        let err = server.describe_table("nope").await.unwrap_err();

        assert!(matches!(err, ClientError::ResourceNotFound(_)));
    }

    #[tokio::test]
    async fn test_should_open_table_from_description() {
        let fake = fake_service();
        let server = fake_server(&fake);
        let desc = composite_table("DynamoDBTestMyTable");
        server.create_table(&desc).await.unwrap();

        let table = server.table_from_description(&desc).unwrap();

        assert_eq!(table.name(), "DynamoDBTestMyTable");
        assert!(table.primary_key().has_range());
        assert_eq!(table.primary_key().hash.name, "TestHashKey");
        let described = table.describe().await.unwrap();
        assert_eq!(described.table_status, Some(TableStatus::Active));
    }

    #[test]
    fn test_should_reject_description_without_key_schema() {
        let fake = fake_service();
        let server = fake_server(&fake);

        let err = server
            .table_from_description(&TableDescription::named("bare"))
            .unwrap_err();

        assert!(matches!(err, ClientError::Model(_)));
        assert_eq!(fake.request_count(), 0);
    }
}
