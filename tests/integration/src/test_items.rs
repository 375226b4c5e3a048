//! Item operations through the `Table` facade.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use rustdynamo_client::{ClientConfig, ClientError, Credentials, Region, Server, Table};
    use rustdynamo_model::types::{
        AttributeDefinition, KeySchemaElement, KeyType, ScalarAttributeType,
    };
    use rustdynamo_model::{
        Attribute, AttributeValue, DynamoDBOperation, Key, ModelError, TableDescription,
        item_from_attributes,
    };

    use crate::fake::FakeDynamoDB;
    use crate::{composite_table, fake_server, fake_service, simple_table, test_retry};

    async fn composite(fake: &Arc<FakeDynamoDB>) -> Table {
        let server = fake_server(fake);
        let desc = composite_table("DynamoDBTestMyTable");
        server.create_table(&desc).await.unwrap();
        server.table_from_description(&desc).unwrap()
    }

    #[tokio::test]
    async fn test_should_put_then_get_item() {
        let fake = fake_service();
        let table = composite(&fake).await;

        table
            .put_item(
                "NewHashKey",
                Some("1"),
                &[Attribute::string("Attr1", "ATTR1VAL")],
            )
            .await
            .unwrap();

        let item = table
            .get_item(&Key::composite("NewHashKey", "1"))
            .await
            .unwrap()
            .expect("item exists");

        let expected = item_from_attributes([
            Attribute::string("TestHashKey", "NewHashKey"),
            Attribute::number("TestRangeKey", "1"),
            Attribute::string("Attr1", "ATTR1VAL"),
        ])
        .unwrap();
        assert_eq!(item, expected);
    }

    #[tokio::test]
    async fn test_should_send_typed_key_on_put() {
        let fake = fake_service();
        let table = composite(&fake).await;

        table
            .put_item("h", Some("7"), &[Attribute::string("a", "b")])
            .await
            .unwrap();

        let put = fake.requests().pop().unwrap();
        assert_eq!(put.operation, Some(DynamoDBOperation::PutItem));
        assert_eq!(put.body["TableName"], "DynamoDBTestMyTable");
        assert_eq!(put.body["Item"]["TestHashKey"]["S"], "h");
        assert_eq!(put.body["Item"]["TestRangeKey"]["N"], "7");
        assert_eq!(put.body["Item"]["a"]["S"], "b");
    }

    #[tokio::test]
    async fn test_should_return_none_for_missing_item() {
        let fake = fake_service();
        let table = composite(&fake).await;

        let item = table.get_item(&Key::composite("nobody", "1")).await.unwrap();

        assert!(item.is_none());
    }

    #[tokio::test]
    async fn test_should_replace_item_with_same_key() {
        let fake = fake_service();
        let table = composite(&fake).await;
        let key = Key::composite("h", "1");

        table
            .put_item("h", Some("1"), &[Attribute::string("v", "first")])
            .await
            .unwrap();
        table
            .put_item("h", Some("1"), &[Attribute::string("w", "second")])
            .await
            .unwrap();

        let item = table.get_item(&key).await.unwrap().unwrap();
        assert!(!item.contains_key("v"));
        assert_eq!(item["w"], AttributeValue::S("second".into()));
    }

    #[tokio::test]
    async fn test_should_delete_item() {
        let fake = fake_service();
        let table = composite(&fake).await;
        let key = Key::composite("h", "1");
        table.put_item("h", Some("1"), &[]).await.unwrap();

        table.delete_item(&key).await.unwrap();

        assert!(table.get_item(&key).await.unwrap().is_none());
        // Deleting again is not an error.
        table.delete_item(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_should_request_consistent_read() {
        let fake = fake_service();
        let table = composite(&fake).await;
        table.put_item("h", Some("1"), &[]).await.unwrap();

        let item = table
            .get_item_consistent(&Key::composite("h", "1"))
            .await
            .unwrap();
        assert!(item.is_some());
        table.get_item(&Key::composite("h", "1")).await.unwrap();

        let gets: Vec<_> = fake
            .requests()
            .into_iter()
            .filter(|r| r.operation == Some(DynamoDBOperation::GetItem))
            .collect();
        assert_eq!(gets[0].body["ConsistentRead"], true);
        assert!(gets[1].body.get("ConsistentRead").is_none());
        assert_eq!(gets[0].body["Key"]["TestRangeKey"]["N"], "1");
    }

    #[tokio::test]
    async fn test_should_reject_key_shape_mismatch_before_sending() {
        let fake = fake_service();
        let table = composite(&fake).await;
        let sent = fake.request_count();

        let missing_range = table.get_item(&Key::hash("h")).await.unwrap_err();
        let unexpected_range = fake_server(&fake)
            .table_from_description(&simple_table("simple"))
            .unwrap()
            .delete_item(&Key::composite("h", "r"))
            .await
            .unwrap_err();

        for err in [missing_range, unexpected_range] {
            assert!(
                matches!(err, ClientError::Model(ModelError::KeySchemaMismatch(_))),
                "got {err:?}"
            );
            assert!(!err.is_retryable());
        }
        assert_eq!(fake.request_count(), sent);
    }

    #[tokio::test]
    async fn test_should_reject_invalid_number_key_before_sending() {
        let fake = fake_service();
        let table = composite(&fake).await;
        let sent = fake.request_count();

        let on_put = table.put_item("h", Some("abc"), &[]).await.unwrap_err();
        let on_get = table
            .get_item(&Key::composite("h", "twelve"))
            .await
            .unwrap_err();

        for err in [on_put, on_get] {
            assert!(
                matches!(
                    err,
                    ClientError::Model(ModelError::InvalidAttributeValue { tag: "N", .. })
                ),
                "got {err:?}"
            );
            assert!(!err.is_retryable());
        }
        assert_eq!(fake.request_count(), sent);
    }

    #[tokio::test]
    async fn test_should_reject_attribute_repeating_key_name() {
        let fake = fake_service();
        let table = composite(&fake).await;
        let sent = fake.request_count();

        let err = table
            .put_item("h", Some("1"), &[Attribute::string("TestHashKey", "other")])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ClientError::Model(ModelError::DuplicateAttribute(ref name)) if name == "TestHashKey"
        ));
        assert_eq!(fake.request_count(), sent);
    }

    #[tokio::test]
    async fn test_should_keep_number_keys_textually_distinct() {
        let fake = fake_service();
        let table = composite(&fake).await;

        table
            .put_item("h", Some("1"), &[Attribute::string("which", "one")])
            .await
            .unwrap();
        table
            .put_item("h", Some("1.0"), &[Attribute::string("which", "one point oh")])
            .await
            .unwrap();

        let one = table.get_item(&Key::composite("h", "1")).await.unwrap().unwrap();
        let one_point_oh = table
            .get_item(&Key::composite("h", "1.0"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(one["which"], AttributeValue::S("one".into()));
        assert_eq!(one_point_oh["which"], AttributeValue::S("one point oh".into()));
        assert_eq!(one_point_oh["TestRangeKey"], AttributeValue::N("1.0".into()));
    }

    #[tokio::test]
    async fn test_should_address_binary_key_by_utf8_bytes() {
        let fake = fake_service();
        let server = fake_server(&fake);
        let desc = TableDescription {
            table_name: "blobs".to_owned(),
            attribute_definitions: vec![AttributeDefinition::new("id", ScalarAttributeType::B)],
            key_schema: vec![KeySchemaElement::new("id", KeyType::Hash)],
            ..TableDescription::default()
        };
        server.create_table(&desc).await.unwrap();
        let table = server.table_from_description(&desc).unwrap();

        table
            .put_item("key", None, &[Attribute::binary("payload", Bytes::from_static(&[0, 1, 2]))])
            .await
            .unwrap();

        let put = fake.requests().pop().unwrap();
        // base64("key")
        assert_eq!(put.body["Item"]["id"]["B"], "a2V5");
        let item = table.get_item(&Key::hash("key")).await.unwrap().unwrap();
        assert_eq!(item["id"].as_b().map(|b| &b[..]), Some(&b"key"[..]));
        assert_eq!(item["payload"], AttributeValue::B(Bytes::from_static(&[0, 1, 2])));
    }

    #[tokio::test]
    async fn test_should_round_trip_sets() {
        let fake = fake_service();
        let table = composite(&fake).await;

        table
            .put_item(
                "h",
                Some("1"),
                &[
                    Attribute::string_set("tags", vec!["red".into(), "blue".into()]),
                    Attribute::number_set("scores", vec!["1".into(), "2.5".into()]),
                ],
            )
            .await
            .unwrap();

        let item = table.get_item(&Key::composite("h", "1")).await.unwrap().unwrap();
        let AttributeValue::Ss(tags) = &item["tags"] else {
            panic!("expected string set");
        };
        assert_eq!(tags.len(), 2);
        assert!(tags.contains(&"red".to_owned()) && tags.contains(&"blue".to_owned()));
        let AttributeValue::Ns(scores) = &item["scores"] else {
            panic!("expected number set");
        };
        assert!(scores.contains(&"2.5".to_owned()));
    }

    #[tokio::test]
    async fn test_should_reject_invalid_number_attribute_locally() {
        let fake = fake_service();
        let table = composite(&fake).await;
        let sent = fake.request_count();

        let err = table
            .put_item("h", Some("1"), &[Attribute::number("n", "abc")])
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Model(_)), "got {err:?}");
        assert_eq!(fake.request_count(), sent);
    }

    #[tokio::test]
    async fn test_should_surface_rejected_signature() {
        let fake = fake_service();
        composite(&fake).await;
        let impostor = Server::with_transport(
            fake.clone(),
            Credentials::new("AKIDTESTEXAMPLE", "not-the-secret"),
            Region::with_endpoint("us-east-1", "http://dynamodb.test:8000"),
            ClientConfig {
                retry: test_retry(),
                ..ClientConfig::default()
            },
        )
        .unwrap();

        let err = impostor
            .table_from_description(&composite_table("DynamoDBTestMyTable"))
            .unwrap()
            .get_item(&Key::composite("h", "1"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Request(_)), "got {err:?}");
        assert_eq!(err.code(), Some("UnrecognizedClientException"));
    }

    #[tokio::test]
    async fn test_should_report_missing_table_on_item_write() {
        let fake = fake_service();
        let table = fake_server(&fake)
            .table_from_description(&composite_table("ghost"))
            .unwrap();

        let err = table.put_item("h", Some("1"), &[]).await.unwrap_err();

        assert!(matches!(err, ClientError::ResourceNotFound(_)));
        assert_eq!(fake.request_count(), 1);
    }
}
