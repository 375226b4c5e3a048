//! Request execution with timeouts, deadlines and retries.
//!
//! Each attempt builds and signs a fresh request, so a retried request never
//! carries a stale timestamp. Throttling and transient failures are retried
//! with exponential backoff until the attempt budget or the call deadline runs
//! out; every other failure is returned as soon as it is seen.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use rustdynamo_auth::Credentials;
use rustdynamo_model::DynamoDBOperation;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::{CallOptions, ClientConfig, Region};
use crate::error::{ClientError, TransientError};
use crate::request::build_request;
use crate::response::classify_response;
use crate::transport::HttpTransport;

/// Sends operations to the service on behalf of [`Server`](crate::Server) and
/// [`Table`](crate::Table) handles.
#[derive(Debug)]
pub struct Executor {
    transport: Arc<dyn HttpTransport>,
    credentials: Credentials,
    region: Region,
    config: ClientConfig,
    clock: fn() -> DateTime<Utc>,
}

impl Executor {
    /// Create an executor. Requests are signed with the current wall-clock
    /// time.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credentials: Credentials,
        region: Region,
        config: ClientConfig,
    ) -> Self {
        Self {
            transport,
            credentials,
            region,
            config,
            clock: Utc::now,
        }
    }

    /// Replace the clock used for signing timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// The region requests are sent to.
    #[must_use]
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// The client-wide configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run `operation` with `input` as the request body and decode the
    /// response body as `O`.
    pub async fn execute<I, O>(
        &self,
        operation: DynamoDBOperation,
        input: &I,
        options: &CallOptions,
    ) -> Result<O, ClientError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let body = serde_json::to_vec(input).map_err(ClientError::Serialization)?;
        let body = self.send(operation, Bytes::from(body), options).await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::MalformedResponse {
            operation: operation.as_str(),
            reason: e.to_string(),
        })
    }

    /// Send a raw JSON body, retrying as the policy allows, and return the
    /// body of the successful response.
    pub async fn send(
        &self,
        operation: DynamoDBOperation,
        body: Bytes,
        options: &CallOptions,
    ) -> Result<Bytes, ClientError> {
        let started = Instant::now();
        let deadline = options.deadline.map(|d| started + d);
        let attempt_timeout = options
            .attempt_timeout
            .unwrap_or(self.config.attempt_timeout);
        let retry = &self.config.retry;
        let max_attempts = retry.max_attempts.max(1);

        let deadline_exceeded = |attempts: u32, last_error: Option<ClientError>| {
            ClientError::DeadlineExceeded {
                elapsed: started.elapsed(),
                attempts,
                last_error: last_error.map(Box::new),
            }
        };

        let mut attempt: u32 = 0;
        loop {
            let timeout = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Err(deadline_exceeded(attempt, None));
                    }
                    attempt_timeout.min(remaining)
                }
                None => attempt_timeout,
            };

            attempt += 1;
            debug!(operation = %operation, attempt, "sending request");
            let err = match self.attempt(operation, body.clone(), timeout).await {
                Ok(body) => return Ok(body),
                Err(err) => err,
            };

            if !err.is_retryable() {
                debug!(operation = %operation, attempt, error = %err, "request failed");
                return Err(err);
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(deadline_exceeded(attempt, Some(err)));
            }
            if attempt >= max_attempts {
                warn!(operation = %operation, attempts = attempt, error = %err, "retries exhausted");
                return Err(err);
            }

            let delay = retry.backoff(attempt);
            if deadline.is_some_and(|d| Instant::now() + delay >= d) {
                return Err(deadline_exceeded(attempt, Some(err)));
            }
            warn!(
                operation = %operation,
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "retrying request"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn attempt(
        &self,
        operation: DynamoDBOperation,
        body: Bytes,
        timeout: Duration,
    ) -> Result<Bytes, ClientError> {
        let request = build_request(
            operation,
            body,
            &self.credentials,
            &self.region,
            (self.clock)(),
        )?;
        match tokio::time::timeout(timeout, self.transport.send(request)).await {
            Ok(Ok(response)) => {
                debug!(operation = %operation, status = %response.status(), "received response");
                classify_response(response)
            }
            Ok(Err(e)) => Err(TransientError::Transport(e).into()),
            Err(_) => Err(TransientError::Timeout(timeout).into()),
        }
    }
}
