//! Response classification.
//!
//! An error response looks like:
//!
//! ```json
//! {
//!   "__type": "com.amazonaws.dynamodb.v20120810#ResourceNotFoundException",
//!   "message": "Requested resource not found"
//! }
//! ```
//!
//! The code is taken from `__type` (the part after `#`), falling back to the
//! `x-amzn-ErrorType` header. Recognized codes decide the classification;
//! unknown codes fall back to the status class.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use rustdynamo_model::DynamoDBErrorCode;
use serde_json::Value;

use crate::error::{ClientError, ServiceError, TransientError};

/// Header that may carry the error type.
pub const X_AMZN_ERROR_TYPE: &str = "x-amzn-errortype";

/// Header carrying the service request id.
pub const X_AMZN_REQUEST_ID: &str = "x-amzn-requestid";

/// Code used when neither body nor headers name one.
pub const UNKNOWN_ERROR_CODE: &str = "UnknownError";

/// Return the body of a successful response, or classify the failure.
pub fn classify_response(response: http::Response<Bytes>) -> Result<Bytes, ClientError> {
    let (parts, body) = response.into_parts();
    if parts.status.is_success() {
        return Ok(body);
    }
    Err(classify_service_error(parse_service_error(
        parts.status,
        &parts.headers,
        &body,
    )))
}

/// Extract code, message and request id from an error response.
#[must_use]
pub fn parse_service_error(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> ServiceError {
    let object = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    };
    let field = |name: &str| {
        object
            .as_ref()
            .and_then(|map| map.get(name))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
    };

    let header_type = headers
        .get(X_AMZN_ERROR_TYPE)
        .and_then(|v| v.to_str().ok())
        // The header may carry a trailing `:<url>` qualifier.
        .map(|v| v.split(':').next().unwrap_or(v).to_owned());

    let code = field("__type")
        .or(header_type)
        .map(|t| short_code(&t).to_owned())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| UNKNOWN_ERROR_CODE.to_owned());

    let message = field("message")
        .or_else(|| field("Message"))
        .unwrap_or_else(|| {
            if object.is_some() {
                String::new()
            } else {
                String::from_utf8_lossy(body).trim().to_owned()
            }
        });

    ServiceError {
        code,
        message,
        status,
        request_id: headers
            .get(X_AMZN_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned),
    }
}

/// Map a service error onto the client taxonomy.
#[must_use]
pub fn classify_service_error(error: ServiceError) -> ClientError {
    match DynamoDBErrorCode::from_error_type(&error.code) {
        Some(code) if code.is_throttling() => ClientError::Throttling(error),
        Some(DynamoDBErrorCode::ResourceNotFoundException) => ClientError::ResourceNotFound(error),
        Some(DynamoDBErrorCode::ConditionalCheckFailedException) => {
            ClientError::ConditionalCheckFailed(error)
        }
        Some(DynamoDBErrorCode::ValidationException) => ClientError::Validation(error),
        Some(DynamoDBErrorCode::InternalServerError | DynamoDBErrorCode::ServiceUnavailable) => {
            ClientError::Transient(TransientError::Service(error))
        }
        _ if error.status.is_server_error() => {
            ClientError::Transient(TransientError::Service(error))
        }
        _ => ClientError::Request(error),
    }
}

fn short_code(error_type: &str) -> &str {
    error_type
        .rsplit_once('#')
        .map_or(error_type, |(_, code)| code)
}
