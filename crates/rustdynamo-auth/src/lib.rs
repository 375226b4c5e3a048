//! AWS Signature Version 4 request signing for RustDynamo.
//!
//! The client signs every outgoing request with [`sign_request`]. The same
//! canonicalization backs [`verify_sigv4`], which test doubles use to check
//! that what the client sent would be accepted by the service.
//!
//! # Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use rustdynamo_auth::{Credentials, SigningParams, sign_request};
//!
//! let credentials = Credentials::new("AKIDEXAMPLE", "secret");
//! let params = SigningParams {
//!     credentials: &credentials,
//!     region: "us-east-1",
//!     service: "dynamodb",
//!     time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
//! };
//! let mut request = http::Request::post("https://dynamodb.us-east-1.amazonaws.com/")
//!     .body(b"{}".to_vec())
//!     .unwrap();
//! sign_request(&mut request, &params).unwrap();
//! assert!(request.headers().contains_key(http::header::AUTHORIZATION));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical request construction
//! - [`credentials`] - Signing credentials and the verification-side key lookup
//! - [`error`] - Signing and verification error types
//! - [`sigv4`] - Signing key derivation, request signing and verification

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod sigv4;

pub use credentials::{CredentialProvider, Credentials, StaticCredentialProvider};
pub use error::AuthError;
pub use sigv4::{AuthResult, SigningParams, hash_payload, sign_request, verify_sigv4};
