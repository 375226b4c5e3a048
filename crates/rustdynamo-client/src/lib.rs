//! Signed, retrying DynamoDB client for RustDynamo.
//!
//! The crate is layered leaf-first:
//!
//! - [`request`] builds and signs one HTTP request per attempt
//! - [`transport`] is the seam to whatever actually sends bytes
//! - [`response`] classifies replies into success or a [`ClientError`]
//! - [`executor`] runs attempts with per-attempt timeouts, a call deadline
//!   and exponential backoff on throttling and transient failures
//! - [`Server`] and [`Table`] expose the table and item operations
//!
//! Handles are cheap to clone and safe to share between tasks; they hold no
//! mutable state.
#![allow(clippy::doc_markdown)]

pub mod config;
pub mod error;
pub mod executor;
pub mod request;
pub mod response;
pub mod server;
pub mod table;
pub mod transport;

pub use config::{CallOptions, ClientConfig, Region, RetryConfig};
pub use error::{ClientError, ServiceError, TransientError};
pub use executor::Executor;
pub use rustdynamo_auth::Credentials;
pub use server::Server;
pub use table::Table;
pub use transport::{HttpTransport, HyperTransport, TransportError};
