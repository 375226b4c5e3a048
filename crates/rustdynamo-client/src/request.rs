//! Request construction and signing.
//!
//! A request is rebuilt and re-signed for every attempt; only the JSON body
//! is shared between attempts.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method, Uri};
use rustdynamo_auth::{Credentials, SigningParams, sign_request};
use rustdynamo_model::DynamoDBOperation;

use crate::config::Region;
use crate::error::ClientError;

/// Content type of every request and response body.
pub const AMZ_JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.0";

/// Header naming the target operation.
pub const X_AMZ_TARGET: &str = "x-amz-target";

/// Parse and check an endpoint URL.
pub fn endpoint_uri(endpoint: &str) -> Result<Uri, ClientError> {
    let invalid = |reason: &str| ClientError::InvalidEndpoint {
        endpoint: endpoint.to_owned(),
        reason: reason.to_owned(),
    };
    let uri: Uri = endpoint.parse().map_err(|e: http::uri::InvalidUri| invalid(&e.to_string()))?;
    match uri.scheme_str() {
        Some("http" | "https") => {}
        _ => return Err(invalid("scheme must be http or https")),
    }
    if uri.authority().is_none() {
        return Err(invalid("missing host"));
    }
    if uri.query().is_some() {
        return Err(invalid("query strings are not allowed"));
    }
    Ok(uri)
}

/// Build a signed `POST` for `operation` carrying `body`.
///
/// `time` becomes the request timestamp; callers pass the current time on
/// every attempt.
pub fn build_request(
    operation: DynamoDBOperation,
    body: Bytes,
    credentials: &Credentials,
    region: &Region,
    time: DateTime<Utc>,
) -> Result<http::Request<Bytes>, ClientError> {
    let uri = endpoint_uri(&region.endpoint)?;
    let target = HeaderValue::from_str(&operation.target()).map_err(|_| {
        ClientError::InvalidEndpoint {
            endpoint: region.endpoint.clone(),
            reason: format!("invalid target for {operation}"),
        }
    })?;

    let mut request = http::Request::new(body);
    *request.method_mut() = Method::POST;
    *request.uri_mut() = uri;
    request
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(AMZ_JSON_CONTENT_TYPE));
    request.headers_mut().insert(X_AMZ_TARGET, target);

    sign_request(
        &mut request,
        &SigningParams {
            credentials,
            region: &region.name,
            service: &region.signing_name,
            time,
        },
    )?;
    Ok(request)
}
