//! Canonical request construction for AWS Signature Version 4.
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! The signer canonicalizes every header it sends; the verifier only the
//! headers listed in `SignedHeaders`. Both go through [`CanonicalRequest`] so
//! they cannot disagree on normalization.

use std::collections::BTreeMap;
use std::fmt;

use http::HeaderMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use sha2::{Digest, Sha256};

use crate::error::AuthError;

/// Characters left unencoded in a path segment: `A-Z a-z 0-9 - _ . ~`.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Which headers take part in the canonical request.
#[derive(Debug, Clone, Copy)]
pub enum HeaderSelection<'a> {
    /// Every header present on the request.
    All,
    /// Only the named (lowercase) headers; each must be present.
    Only(&'a [&'a str]),
}

/// A canonicalized request, ready to be hashed into the string to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: String,
    uri: String,
    query: String,
    headers: BTreeMap<String, String>,
    payload_hash: String,
}

impl CanonicalRequest {
    /// Canonicalize request parts.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidHeaderValue`] for a header value that is not
    /// valid visible ASCII, and [`AuthError::MissingHeader`] when a selected
    /// header is absent.
    pub fn new(
        method: &http::Method,
        uri: &http::Uri,
        headers: &HeaderMap,
        selection: HeaderSelection<'_>,
        payload_hash: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let mut canonical_headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in headers {
            if let HeaderSelection::Only(names) = selection {
                if !names.contains(&name.as_str()) {
                    continue;
                }
            }
            let value = value
                .to_str()
                .map_err(|_| AuthError::InvalidHeaderValue(name.as_str().to_owned()))?;
            let value = collapse_whitespace(value.trim());
            canonical_headers
                .entry(name.as_str().to_owned())
                .and_modify(|existing| {
                    existing.push(',');
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        if let HeaderSelection::Only(names) = selection {
            if let Some(missing) = names.iter().find(|n| !canonical_headers.contains_key(**n)) {
                return Err(AuthError::MissingHeader((*missing).to_owned()));
            }
        }

        Ok(Self {
            method: method.as_str().to_owned(),
            uri: build_canonical_uri(uri.path()),
            query: build_canonical_query_string(uri.query().unwrap_or("")),
            headers: canonical_headers,
            payload_hash: payload_hash.into(),
        })
    }

    /// The `SignedHeaders` value: sorted lowercase names joined by `;`.
    #[must_use]
    pub fn signed_headers(&self) -> String {
        self.headers.keys().map(String::as_str).collect::<Vec<_>>().join(";")
    }

    /// Hex-encoded SHA-256 of the canonical request.
    #[must_use]
    pub fn hash(&self) -> String {
        hex::encode(Sha256::digest(self.to_string().as_bytes()))
    }
}

impl fmt::Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.uri)?;
        writeln!(f, "{}", self.query)?;
        for (name, value) in &self.headers {
            writeln!(f, "{name}:{value}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers())?;
        f.write_str(&self.payload_hash)
    }
}

/// Build the canonical URI by URI-encoding each path segment individually.
///
/// Forward slashes (`/`) are preserved. Empty paths are normalized to `/`.
///
/// # Examples
///
/// ```
/// use rustdynamo_auth::canonical::build_canonical_uri;
///
/// assert_eq!(build_canonical_uri(""), "/");
/// assert_eq!(build_canonical_uri("/a b"), "/a%20b");
/// ```
#[must_use]
pub fn build_canonical_uri(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    path.split('/')
        .map(|segment| {
            // Decode first so an already-encoded path is not encoded twice.
            let decoded = percent_decode_str(segment).decode_utf8_lossy();
            utf8_percent_encode(&decoded, URI_ENCODE_SET).to_string()
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Build the canonical query string by sorting parameters.
///
/// Values are kept exactly as they appear on the request.
#[must_use]
pub fn build_canonical_query_string(query: &str) -> String {
    let mut params: Vec<(&str, &str)> = query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|param| param.split_once('=').unwrap_or((param, "")))
        .collect();

    params.sort_unstable();

    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result
}
