//! Client error taxonomy.
//!
//! Local validation failures ([`ClientError::Model`], [`ClientError::Signing`],
//! [`ClientError::InvalidEndpoint`]) are raised before anything is sent and are
//! never retried. Everything else comes from the transport or the service.

use std::fmt;
use std::time::Duration;

use http::StatusCode;
use rustdynamo_auth::AuthError;
use rustdynamo_model::ModelError;

use crate::transport::TransportError;

/// An error reported by the service, with its code and message preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    /// Short error code, e.g. `ResourceNotFoundException`.
    pub code: String,
    /// Human-readable message from the service.
    pub message: String,
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Value of `x-amzn-RequestId`, when present.
    pub request_id: Option<String>,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.status.as_u16())?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

/// A failure that may succeed if the request is sent again.
#[derive(Debug, thiserror::Error)]
pub enum TransientError {
    /// The transport could not deliver the request or read the response.
    #[error("transport failure: {0}")]
    Transport(#[source] TransportError),

    /// The attempt did not complete within its timeout.
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    /// The service answered with a server-side failure.
    #[error("service unavailable: {0}")]
    Service(ServiceError),
}

/// Errors returned by client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Local encoding or key validation failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The service asked the client to slow down.
    #[error("request throttled: {0}")]
    Throttling(ServiceError),

    /// The table or item does not exist.
    #[error("resource not found: {0}")]
    ResourceNotFound(ServiceError),

    /// A condition on the request evaluated to false.
    #[error("conditional check failed: {0}")]
    ConditionalCheckFailed(ServiceError),

    /// The service rejected the request as invalid.
    #[error("validation failed: {0}")]
    Validation(ServiceError),

    /// Any other client-side rejection by the service.
    #[error("request rejected: {0}")]
    Request(ServiceError),

    /// A transport or server-side failure.
    #[error(transparent)]
    Transient(#[from] TransientError),

    /// The call's total deadline passed before it could complete.
    #[error("deadline exceeded after {attempts} attempt(s) in {elapsed:?}")]
    DeadlineExceeded {
        /// Time spent on the call.
        elapsed: Duration,
        /// Attempts started.
        attempts: u32,
        /// The failure of the last completed attempt, if any.
        #[source]
        last_error: Option<Box<ClientError>>,
    },

    /// The request could not be signed.
    #[error("failed to sign request: {0}")]
    Signing(#[from] AuthError),

    /// The configured endpoint cannot be used.
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint {
        /// The endpoint as configured.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A successful response body did not have the expected shape.
    #[error("malformed {operation} response: {reason}")]
    MalformedResponse {
        /// Operation whose response failed to parse.
        operation: &'static str,
        /// Parse failure.
        reason: String,
    },

    /// A request body could not be serialized.
    #[error("failed to serialize request: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ClientError {
    /// Whether the executor may retry the attempt that produced this error.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Throttling(_) | Self::Transient(_))
    }

    /// The service error behind this error, if the service produced it.
    #[must_use]
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Throttling(e)
            | Self::ResourceNotFound(e)
            | Self::ConditionalCheckFailed(e)
            | Self::Validation(e)
            | Self::Request(e)
            | Self::Transient(TransientError::Service(e)) => Some(e),
            _ => None,
        }
    }

    /// The service error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.service_error().map(|e| e.code.as_str())
    }
}
