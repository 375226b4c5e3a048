//! Retry, backoff and deadline behavior seen from the facades.
//!
//! These run on a paused tokio clock so waits complete instantly while
//! keeping their measured lengths.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rustdynamo_client::{CallOptions, ClientError, RetryConfig, TransientError};
    use rustdynamo_model::{DynamoDBErrorCode, Key};

    use crate::fake::Fault;
    use crate::{composite_table, fake_server, fake_server_with, fake_service, test_retry};

    fn gaps(fake: &crate::fake::FakeDynamoDB, skip: usize) -> Vec<Duration> {
        let times: Vec<_> = fake.requests().iter().skip(skip).map(|r| r.at).collect();
        times.windows(2).map(|w| w[1] - w[0]).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_back_off_without_shrinking_under_throttling() {
        let fake = fake_service();
        let server = fake_server(&fake);
        let desc = composite_table("DynamoDBTestMyTable");
        server.create_table(&desc).await.unwrap();
        let table = server.table_from_description(&desc).unwrap();
        table.put_item("h", Some("1"), &[]).await.unwrap();
        let before = fake.request_count();

        fake.push_faults([Fault::Throttle, Fault::Throttle, Fault::Throttle]);
        let item = table.get_item(&Key::composite("h", "1")).await.unwrap();

        assert!(item.is_some());
        assert_eq!(fake.request_count(), before + 4);
        let gaps = gaps(&fake, before);
        assert_eq!(gaps.len(), 3);
        let policy = test_retry();
        for (retry, gap) in (1..).zip(&gaps) {
            assert!(*gap >= policy.backoff(retry), "retry {retry} waited {gap:?}");
        }
        assert!(gaps.windows(2).all(|w| w[0] <= w[1]), "gaps shrank: {gaps:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_re_sign_every_attempt() {
        let fake = fake_service();
        let server = fake_server(&fake);
        fake.push_faults([Fault::Throttle, Fault::ServerError]);

        server.list_tables().await.unwrap();

        let requests = fake.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.amz_date.is_some()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_retry_transport_failure_then_succeed() {
        let fake = fake_service();
        let server = fake_server(&fake);
        fake.push_faults([Fault::TransportFailure]);

        let names = server.list_tables().await.unwrap();

        assert!(names.is_empty());
        assert_eq!(fake.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_retry_internal_server_error() {
        let fake = fake_service();
        let server = fake_server(&fake);
        fake.push_faults([
            Fault::Error(
                DynamoDBErrorCode::InternalServerError,
                "Internal server error".to_owned(),
            ),
            Fault::ServerError,
        ]);

        server.list_tables().await.unwrap();

        assert_eq!(fake.request_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_give_up_after_max_attempts() {
        let fake = fake_service();
        let server = fake_server(&fake);
        fake.push_faults(std::iter::repeat_n(Fault::Throttle, 10));

        let err = server.list_tables().await.unwrap_err();

        let ClientError::Throttling(service) = &err else {
            panic!("expected throttling, got {err:?}");
        };
        assert_eq!(service.code, "ProvisionedThroughputExceededException");
        assert_eq!(fake.request_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_not_retry_when_disabled() {
        let fake = fake_service();
        let server = fake_server_with(&fake, RetryConfig::disabled());
        fake.push_faults([Fault::Throttle]);

        let err = server.list_tables().await.unwrap_err();

        assert!(matches!(err, ClientError::Throttling(_)));
        assert_eq!(fake.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_not_retry_validation_error() {
        let fake = fake_service();
        let server = fake_server(&fake);
        fake.push_faults([Fault::Error(
            DynamoDBErrorCode::ValidationException,
            "1 validation error detected".to_owned(),
        )]);

        let err = server.list_tables().await.unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(fake.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_time_out_hung_attempt_and_retry() {
        let fake = fake_service();
        let server = fake_server(&fake)
            .with_options(CallOptions::default().attempt_timeout(Duration::from_millis(500)));
        fake.push_faults([Fault::Hang]);

        let started = tokio::time::Instant::now();
        server.list_tables().await.unwrap();

        assert_eq!(fake.request_count(), 2);
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_stop_at_call_deadline() {
        let fake = fake_service();
        let server = fake_server(&fake).with_options(
            CallOptions::default()
                .attempt_timeout(Duration::from_secs(2))
                .deadline(Duration::from_secs(3)),
        );
        fake.push_faults([Fault::Hang, Fault::Hang, Fault::Hang]);

        let started = tokio::time::Instant::now();
        let err = server.list_tables().await.unwrap_err();

        let ClientError::DeadlineExceeded {
            attempts,
            last_error,
            ..
        } = &err
        else {
            panic!("expected deadline exceeded, got {err:?}");
        };
        assert_eq!(*attempts, 2);
        assert!(matches!(
            last_error.as_deref(),
            Some(ClientError::Transient(TransientError::Timeout(_)))
        ));
        assert!(!err.is_retryable());
        assert!(started.elapsed() <= Duration::from_millis(3010));
        assert_eq!(fake.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_not_sleep_past_deadline() {
        let fake = fake_service();
        let server = fake_server_with(
            &fake,
            RetryConfig {
                base_delay: Duration::from_secs(10),
                ..test_retry()
            },
        )
        .with_options(CallOptions::default().deadline(Duration::from_secs(1)));
        fake.push_faults([Fault::Throttle]);

        let started = tokio::time::Instant::now();
        let err = server.list_tables().await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::DeadlineExceeded { attempts: 1, .. }
        ));
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(fake.request_count(), 1);
    }
}
