//! HTTP transport seam.
//!
//! The executor hands fully signed requests to an [`HttpTransport`] and gets
//! back a buffered response. Connection pooling and TLS belong to the
//! transport, not to the client.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<http::Response<Bytes>, TransportError>> + Send + 'a>>;

/// Something that can send a request and buffer the response.
pub trait HttpTransport: fmt::Debug + Send + Sync + 'static {
    /// Send one request. Non-2xx responses are not errors at this level.
    fn send(&self, request: http::Request<Bytes>) -> TransportFuture<'_>;
}

/// A failure below HTTP: connection refused, reset, unreadable body.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    /// A transport error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// A transport error wrapping an underlying cause.
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Plain-HTTP transport over the hyper-util pooled client.
///
/// Suitable for DynamoDB Local and other `http://` endpoints. For TLS,
/// implement [`HttpTransport`] over a TLS-capable connector.
#[derive(Debug, Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HyperTransport {
    /// Create a transport with a fresh connection pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for HyperTransport {
    fn send(&self, request: http::Request<Bytes>) -> TransportFuture<'_> {
        let client = self.client.clone();
        Box::pin(async move {
            let response = client
                .request(request.map(Full::new))
                .await
                .map_err(|e| TransportError::with_source("failed to send request", e))?;
            let (parts, body) = response.into_parts();
            let body = body
                .collect()
                .await
                .map_err(|e| TransportError::with_source("failed to read response body", e))?
                .to_bytes();
            Ok(http::Response::from_parts(parts, body))
        })
    }
}
