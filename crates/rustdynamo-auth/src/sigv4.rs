//! AWS Signature Version 4 signing and verification.
//!
//! Signing ([`sign_request`]):
//!
//! 1. Add `host`, `x-amz-date` and, for temporary credentials,
//!    `x-amz-security-token`.
//! 2. Canonicalize the request over every header it carries.
//! 3. Build the string to sign from the timestamp, credential scope and
//!    canonical request hash.
//! 4. Derive the signing key from the secret key and scope, then sign.
//! 5. Attach the `Authorization` header.
//!
//! Verification ([`verify_sigv4`]) runs the same steps against the headers
//! named in an incoming `Authorization` header and compares signatures in
//! constant time.

use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use http::HeaderValue;
use http::header::{AUTHORIZATION, HOST};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{CanonicalRequest, HeaderSelection};
use crate::credentials::{CredentialProvider, Credentials};
use crate::error::AuthError;

/// The only algorithm supported by this implementation.
const SUPPORTED_ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Format of the `x-amz-date` header.
pub const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Header carrying the request timestamp.
pub const X_AMZ_DATE: &str = "x-amz-date";

/// Header carrying the session token of temporary credentials.
pub const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

type HmacSha256 = Hmac<Sha256>;

/// Everything needed to sign one request besides the request itself.
#[derive(Debug, Clone, Copy)]
pub struct SigningParams<'a> {
    /// Credentials to sign with.
    pub credentials: &'a Credentials,
    /// Region of the credential scope.
    pub region: &'a str,
    /// Service name of the credential scope, e.g. `dynamodb`.
    pub service: &'a str,
    /// Signing time. Becomes `x-amz-date` and the scope date.
    pub time: DateTime<Utc>,
}

impl SigningParams<'_> {
    fn amz_date(&self) -> String {
        self.time.format(AMZ_DATE_FORMAT).to_string()
    }

    fn scope_date(&self) -> String {
        self.time.format("%Y%m%d").to_string()
    }

    fn credential_scope(&self) -> String {
        format!(
            "{}/{}/{}/aws4_request",
            self.scope_date(),
            self.region,
            self.service
        )
    }
}

/// Sign a request in place.
///
/// Any existing `Authorization` header is replaced. All headers present on the
/// request after the SigV4 headers are added become signed headers.
///
/// # Errors
///
/// Returns [`AuthError::MissingHost`] if neither a `Host` header nor a URI
/// authority is available, and [`AuthError::InvalidHeaderValue`] if a header
/// cannot be canonicalized.
pub fn sign_request<B: AsRef<[u8]>>(
    request: &mut http::Request<B>,
    params: &SigningParams<'_>,
) -> Result<(), AuthError> {
    if !request.headers().contains_key(HOST) {
        let authority = request
            .uri()
            .authority()
            .ok_or(AuthError::MissingHost)?
            .as_str()
            .to_owned();
        let host = HeaderValue::from_str(&authority)
            .map_err(|_| AuthError::InvalidHeaderValue(HOST.as_str().to_owned()))?;
        request.headers_mut().insert(HOST, host);
    }

    let amz_date = params.amz_date();
    request.headers_mut().insert(
        X_AMZ_DATE,
        HeaderValue::from_str(&amz_date)
            .map_err(|_| AuthError::InvalidHeaderValue(X_AMZ_DATE.to_owned()))?,
    );
    if let Some(token) = &params.credentials.session_token {
        let token = HeaderValue::from_str(token)
            .map_err(|_| AuthError::InvalidHeaderValue(X_AMZ_SECURITY_TOKEN.to_owned()))?;
        request.headers_mut().insert(X_AMZ_SECURITY_TOKEN, token);
    }
    request.headers_mut().remove(AUTHORIZATION);

    let canonical = CanonicalRequest::new(
        request.method(),
        request.uri(),
        request.headers(),
        HeaderSelection::All,
        hash_payload(request.body().as_ref()),
    )?;

    let credential_scope = params.credential_scope();
    let string_to_sign = build_string_to_sign(&amz_date, &credential_scope, &canonical.hash());
    let signing_key = derive_signing_key(
        &params.credentials.secret_access_key,
        &params.scope_date(),
        params.region,
        params.service,
    );
    let signature = compute_signature(&signing_key, &string_to_sign);

    let authorization = format!(
        "{SUPPORTED_ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={}, Signature={signature}",
        params.credentials.access_key_id,
        canonical.signed_headers(),
    );
    debug!(
        access_key_id = %params.credentials.access_key_id,
        scope = %credential_scope,
        signed_headers = %canonical.signed_headers(),
        "Signed request"
    );
    request.headers_mut().insert(
        AUTHORIZATION,
        HeaderValue::from_str(&authorization)
            .map_err(|_| AuthError::InvalidHeaderValue(AUTHORIZATION.as_str().to_owned()))?,
    );
    Ok(())
}

/// The result of a successful SigV4 verification.
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// The access key ID that signed the request.
    pub access_key_id: String,
    /// The AWS region from the credential scope.
    pub region: String,
    /// The AWS service from the credential scope.
    pub service: String,
    /// The list of headers that were included in the signature.
    pub signed_headers: Vec<String>,
}

/// Parsed components of an AWS SigV4 `Authorization` header.
///
/// Format:
/// ```text
/// AWS4-HMAC-SHA256 Credential=AKID/20150830/us-east-1/dynamodb/aws4_request,
///   SignedHeaders=content-type;host;x-amz-date;x-amz-target,
///   Signature=<hex-signature>
/// ```
#[derive(Debug, Clone)]
pub struct ParsedAuth {
    /// The signing algorithm (must be `AWS4-HMAC-SHA256`).
    pub algorithm: String,
    /// The access key ID.
    pub access_key_id: String,
    /// The date component of the credential scope (YYYYMMDD).
    pub date: String,
    /// The AWS region from the credential scope.
    pub region: String,
    /// The AWS service from the credential scope.
    pub service: String,
    /// The list of signed header names (lowercase).
    pub signed_headers: Vec<String>,
    /// The hex-encoded signature.
    pub signature: String,
}

/// Parse an AWS SigV4 `Authorization` header value into its components.
///
/// # Errors
///
/// Returns [`AuthError::InvalidAuthHeader`] if the header format is invalid,
/// or [`AuthError::UnsupportedAlgorithm`] if the algorithm is not `AWS4-HMAC-SHA256`.
pub fn parse_authorization_header(header: &str) -> Result<ParsedAuth, AuthError> {
    let (algorithm, rest) = header.split_once(' ').ok_or(AuthError::InvalidAuthHeader)?;

    if algorithm != SUPPORTED_ALGORITHM {
        return Err(AuthError::UnsupportedAlgorithm(algorithm.to_owned()));
    }

    let mut credential = None;
    let mut signed_headers = None;
    let mut signature = None;

    for part in rest.split(',') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix("Credential=") {
            credential = Some(value);
        } else if let Some(value) = part.strip_prefix("SignedHeaders=") {
            signed_headers = Some(value);
        } else if let Some(value) = part.strip_prefix("Signature=") {
            signature = Some(value);
        }
    }

    let credential = credential.ok_or(AuthError::InvalidAuthHeader)?;
    let signed_headers = signed_headers.ok_or(AuthError::InvalidAuthHeader)?;
    let signature = signature.ok_or(AuthError::InvalidAuthHeader)?;

    // AKID/date/region/service/aws4_request
    let cred_parts: Vec<&str> = credential.splitn(5, '/').collect();
    if cred_parts.len() != 5 || cred_parts[4] != "aws4_request" {
        return Err(AuthError::InvalidCredential);
    }

    Ok(ParsedAuth {
        algorithm: algorithm.to_owned(),
        access_key_id: cred_parts[0].to_owned(),
        date: cred_parts[1].to_owned(),
        region: cred_parts[2].to_owned(),
        service: cred_parts[3].to_owned(),
        signed_headers: signed_headers.split(';').map(ToOwned::to_owned).collect(),
        signature: signature.to_owned(),
    })
}

/// Build the SigV4 string to sign.
///
/// ```text
/// AWS4-HMAC-SHA256\n
/// <ISO8601 timestamp>\n
/// <credential_scope>\n
/// <hex(SHA256(canonical_request))>
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{SUPPORTED_ALGORITHM}\n{timestamp}\n{credential_scope}\n{canonical_request_hash}")
}

/// Derive the SigV4 signing key using HMAC-SHA256 chain.
///
/// ```text
/// DateKey              = HMAC-SHA256("AWS4" + secret_key, date)
/// DateRegionKey        = HMAC-SHA256(DateKey, region)
/// DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
/// SigningKey           = HMAC-SHA256(DateRegionServiceKey, "aws4_request")
/// ```
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let date_key = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let date_region_key = hmac_sha256(&date_key, region.as_bytes());
    let date_region_service_key = hmac_sha256(&date_region_key, service.as_bytes());
    hmac_sha256(&date_region_service_key, b"aws4_request")
}

/// Compute the hex-encoded HMAC-SHA256 signature of `data`.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Verify an AWS SigV4-signed HTTP request.
///
/// # Errors
///
/// Returns an [`AuthError`] if:
/// - The `Authorization` header is missing or malformed
/// - The access key is not found
/// - Required signed headers are missing
/// - The signature does not match
pub fn verify_sigv4(
    parts: &http::request::Parts,
    body_hash: &str,
    credential_provider: &dyn CredentialProvider,
) -> Result<AuthResult, AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let parsed = parse_authorization_header(auth_header)?;
    let secret_key = credential_provider.get_secret_key(&parsed.access_key_id)?;

    let timestamp = parts
        .headers
        .get(X_AMZ_DATE)
        .ok_or_else(|| AuthError::MissingHeader(X_AMZ_DATE.to_owned()))?
        .to_str()
        .map_err(|_| AuthError::InvalidHeaderValue(X_AMZ_DATE.to_owned()))?;

    debug!(
        access_key_id = %parsed.access_key_id,
        date = %parsed.date,
        region = %parsed.region,
        service = %parsed.service,
        "Verifying SigV4 signature"
    );

    let signed_header_refs: Vec<&str> = parsed.signed_headers.iter().map(String::as_str).collect();
    let canonical = CanonicalRequest::new(
        &parts.method,
        &parts.uri,
        &parts.headers,
        HeaderSelection::Only(&signed_header_refs),
        body_hash,
    )?;

    let credential_scope = format!(
        "{}/{}/{}/aws4_request",
        parsed.date, parsed.region, parsed.service
    );
    let string_to_sign = build_string_to_sign(timestamp, &credential_scope, &canonical.hash());
    let signing_key =
        derive_signing_key(&secret_key, &parsed.date, &parsed.region, &parsed.service);
    let expected_signature = compute_signature(&signing_key, &string_to_sign);

    if parsed
        .signature
        .as_bytes()
        .ct_eq(expected_signature.as_bytes())
        .into()
    {
        Ok(AuthResult {
            access_key_id: parsed.access_key_id,
            region: parsed.region,
            service: parsed.service,
            signed_headers: parsed.signed_headers,
        })
    } else {
        debug!(
            expected = %expected_signature,
            provided = %parsed.signature,
            "Signature mismatch"
        );
        Err(AuthError::SignatureDoesNotMatch)
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Compute the SHA-256 hash of the given payload and return it as a hex string.
///
/// # Examples
///
/// ```
/// use rustdynamo_auth::sigv4::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}
