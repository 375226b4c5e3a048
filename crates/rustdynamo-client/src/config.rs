//! Client configuration.
//!
//! Every setting has a default and can be overridden from the environment:
//!
//! | Variable | Default |
//! |---|---|
//! | `DYNAMODB_MAX_ATTEMPTS` | `4` |
//! | `DYNAMODB_BASE_DELAY_MS` | `50` |
//! | `DYNAMODB_MAX_BACKOFF_MS` | `20000` |
//! | `DYNAMODB_ATTEMPT_TIMEOUT_MS` | `10000` |
//! | `DYNAMODB_ENDPOINT` | derived from the region |
//! | `AWS_REGION` / `AWS_DEFAULT_REGION` | `us-east-1` |

use std::env;
use std::time::Duration;

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Service name in the SigV4 credential scope.
pub const SIGNING_NAME: &str = "dynamodb";

/// Where requests go and how they are scoped for signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Region name, e.g. `us-east-1`.
    pub name: String,
    /// Endpoint URL requests are posted to.
    pub endpoint: String,
    /// Service name used in the signature scope.
    pub signing_name: String,
}

impl Region {
    /// The public endpoint of a region.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let endpoint = format!("https://dynamodb.{name}.amazonaws.com");
        Self::with_endpoint(name, endpoint)
    }

    /// A region served from a custom endpoint, such as DynamoDB Local.
    pub fn with_endpoint(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            signing_name: SIGNING_NAME.to_owned(),
        }
    }

    /// Read the region from `AWS_REGION` (falling back to `AWS_DEFAULT_REGION`)
    /// and the endpoint from `DYNAMODB_ENDPOINT`.
    #[must_use]
    pub fn from_env() -> Self {
        let name = env::var("AWS_REGION")
            .or_else(|_| env::var("AWS_DEFAULT_REGION"))
            .unwrap_or_else(|_| DEFAULT_REGION.to_owned());
        match env::var("DYNAMODB_ENDPOINT") {
            Ok(endpoint) if !endpoint.is_empty() => Self::with_endpoint(name, endpoint),
            _ => Self::new(name),
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::new(DEFAULT_REGION)
    }
}

/// Retry and backoff policy.
///
/// Retry `n` (1-based) waits a random duration in `[e/2, e)` where
/// `e = base_delay * 2^(n-1)`, capped at `max_backoff`. The ranges of
/// consecutive retries abut, so waits never shrink from one retry to the next.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Total attempts per call, the first one included.
    pub max_attempts: u32,
    /// Base of the exponential backoff.
    pub base_delay: Duration,
    /// Upper bound for a single wait.
    pub max_backoff: Duration,
    /// Source of jitter in `[0, 1)`.
    pub jitter: fn() -> f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(50),
            max_backoff: Duration::from_secs(20),
            jitter: fastrand::f64,
        }
    }
}

impl RetryConfig {
    /// A policy that never retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Replace the jitter source, e.g. with a constant in tests.
    #[must_use]
    pub fn with_jitter(mut self, jitter: fn() -> f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Wait before retry `retry` (1-based).
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        let ceiling = self.base_delay.saturating_mul(1 << exponent);
        let half = ceiling / 2;
        let jitter = (self.jitter)().clamp(0.0, 1.0);
        half.saturating_add(half.mul_f64(jitter)).min(self.max_backoff)
    }
}

/// Client-wide defaults.
#[derive(Debug, Clone, Copy)]
pub struct ClientConfig {
    /// Retry policy.
    pub retry: RetryConfig,
    /// Timeout for a single attempt when the call does not set one.
    pub attempt_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            attempt_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            retry: RetryConfig {
                max_attempts: env_u64("DYNAMODB_MAX_ATTEMPTS")
                    .and_then(|v| u32::try_from(v).ok())
                    .unwrap_or(defaults.retry.max_attempts)
                    .max(1),
                base_delay: env_millis("DYNAMODB_BASE_DELAY_MS")
                    .unwrap_or(defaults.retry.base_delay),
                max_backoff: env_millis("DYNAMODB_MAX_BACKOFF_MS")
                    .unwrap_or(defaults.retry.max_backoff),
                jitter: defaults.retry.jitter,
            },
            attempt_timeout: env_millis("DYNAMODB_ATTEMPT_TIMEOUT_MS")
                .unwrap_or(defaults.attempt_timeout),
        }
    }
}

/// Per-call overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Timeout for each attempt of this call.
    pub attempt_timeout: Option<Duration>,
    /// Total time budget for the call, retries and waits included.
    pub deadline: Option<Duration>,
}

impl CallOptions {
    /// Set the per-attempt timeout.
    #[must_use]
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Set the total deadline.
    #[must_use]
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_millis(key: &str) -> Option<Duration> {
    env_u64(key).map(Duration::from_millis)
}
