//! Model-level errors and DynamoDB service error codes.
//!
//! [`ModelError`] covers failures detected locally while encoding or decoding
//! wire data; none of them is ever sent to the service. [`DynamoDBErrorCode`]
//! names the error types the service reports in the `__type` field of an
//! error response.

use std::fmt;

/// Local validation failure raised by the codec or the key model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The wire object is not a valid tagged attribute value.
    #[error("malformed attribute value: {0}")]
    MalformedAttribute(String),

    /// The value under a recognized tag violates the type's rules.
    #[error("invalid {tag} attribute value {value:?}: {reason}")]
    InvalidAttributeValue {
        /// The type tag (`S`, `N`, `B`, `SS`, `NS` or `BS`).
        tag: &'static str,
        /// The offending value as text.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// An attribute inside an item failed to decode.
    #[error("malformed item: attribute {attribute:?} could not be decoded")]
    MalformedItem {
        /// Name of the attribute that failed.
        attribute: String,
        /// The attribute-level failure.
        #[source]
        source: Box<ModelError>,
    },

    /// A concrete key does not fit the table's key schema.
    #[error("key does not match the table key schema: {0}")]
    KeySchemaMismatch(String),

    /// A table descriptor cannot produce a usable primary key.
    #[error("invalid key schema: {0}")]
    InvalidKeySchema(String),

    /// The same attribute name was supplied twice for one item.
    #[error("duplicate attribute name {0:?}")]
    DuplicateAttribute(String),
}

/// Well-known DynamoDB error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DynamoDBErrorCode {
    /// Table already exists or is in use.
    ResourceInUseException,
    /// Table not found.
    ResourceNotFoundException,
    /// Condition check failed.
    ConditionalCheckFailedException,
    /// Item collection size limit exceeded.
    ItemCollectionSizeLimitExceededException,
    /// Provisioned throughput exceeded.
    ProvisionedThroughputExceededException,
    /// Generic throttling.
    ThrottlingException,
    /// Account-level request limit exceeded.
    RequestLimitExceeded,
    /// Too many control-plane operations in flight.
    LimitExceededException,
    /// Validation error.
    ValidationException,
    /// Serialization error.
    SerializationException,
    /// Internal server error.
    InternalServerError,
    /// Service temporarily unavailable.
    ServiceUnavailable,
    /// Missing action.
    MissingAction,
    /// Access denied.
    AccessDeniedException,
    /// Unknown operation or bad credentials.
    UnrecognizedClientException,
}

impl DynamoDBErrorCode {
    const ALL: [Self; 15] = [
        Self::ResourceInUseException,
        Self::ResourceNotFoundException,
        Self::ConditionalCheckFailedException,
        Self::ItemCollectionSizeLimitExceededException,
        Self::ProvisionedThroughputExceededException,
        Self::ThrottlingException,
        Self::RequestLimitExceeded,
        Self::LimitExceededException,
        Self::ValidationException,
        Self::SerializationException,
        Self::InternalServerError,
        Self::ServiceUnavailable,
        Self::MissingAction,
        Self::AccessDeniedException,
        Self::UnrecognizedClientException,
    ];

    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResourceInUseException => "ResourceInUseException",
            Self::ResourceNotFoundException => "ResourceNotFoundException",
            Self::ConditionalCheckFailedException => "ConditionalCheckFailedException",
            Self::ItemCollectionSizeLimitExceededException => {
                "ItemCollectionSizeLimitExceededException"
            }
            Self::ProvisionedThroughputExceededException => {
                "ProvisionedThroughputExceededException"
            }
            Self::ThrottlingException => "ThrottlingException",
            Self::RequestLimitExceeded => "RequestLimitExceeded",
            Self::LimitExceededException => "LimitExceededException",
            Self::ValidationException => "ValidationException",
            Self::SerializationException => "SerializationException",
            Self::InternalServerError => "InternalServerError",
            Self::ServiceUnavailable => "ServiceUnavailable",
            Self::MissingAction => "MissingAction",
            Self::AccessDeniedException => "AccessDeniedException",
            Self::UnrecognizedClientException => "UnrecognizedClientException",
        }
    }

    /// Returns the fully-qualified error type string used in the `__type` field.
    #[must_use]
    pub fn error_type(&self) -> String {
        match self {
            Self::ValidationException => "com.amazon.coral.validate#ValidationException".to_owned(),
            other => format!("com.amazonaws.dynamodb.v20120810#{}", other.as_str()),
        }
    }

    /// Parse an error type as reported by the service.
    ///
    /// Accepts both the short form (`ResourceNotFoundException`) and the
    /// fully-qualified form (`com.amazonaws.dynamodb.v20120810#ResourceNotFoundException`).
    #[must_use]
    pub fn from_error_type(error_type: &str) -> Option<Self> {
        let short = error_type
            .rsplit_once('#')
            .map_or(error_type, |(_, code)| code);
        Self::ALL.into_iter().find(|code| code.as_str() == short)
    }

    /// Whether this code tells the client to slow down and try again.
    #[must_use]
    pub fn is_throttling(&self) -> bool {
        matches!(
            self,
            Self::ProvisionedThroughputExceededException
                | Self::ThrottlingException
                | Self::RequestLimitExceeded
                | Self::LimitExceededException
        )
    }

    /// Returns the HTTP status code the service uses for this error.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::InternalServerError => http::StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => http::StatusCode::SERVICE_UNAVAILABLE,
            _ => http::StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for DynamoDBErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
