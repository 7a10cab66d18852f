//! Typed error hierarchy for the shop-floor client.
//!
//! Two enums cover the two subsystems:
//! - `ApiError` — request client failures (transport, HTTP, structured)
//! - `ConfigError` — endpoint/protocol resolution failures

use thiserror::Error;

/// Fallback error code when a structured error carries no extension code.
pub const GRAPHQL_ERROR_CODE: &str = "GRAPHQL_ERROR";

/// Errors from the request client, one variant per failure class.
///
/// Precedence when a response is ambiguous: a structured error list outranks
/// the HTTP status, so `Server` is raised even on a non-2xx response that
/// also carries an error payload.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: the endpoint was unreachable or the body was not
    /// decodable JSON.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx status with no structured error payload.
    #[error("HTTP {status}")]
    Http { status: u16 },

    /// Structured error reported by the server. `code` comes from the first
    /// error's `extensions.code`, falling back to `GRAPHQL_ERROR`.
    #[error("{message}")]
    Server { code: String, message: String },
}

impl ApiError {
    /// Stable machine-readable tag for each failure class.
    pub fn code(&self) -> &str {
        match self {
            Self::Network(_) => "NETWORK",
            Self::Http { .. } => "HTTP_ERROR",
            Self::Server { code, .. } => code,
        }
    }
}

/// Errors from endpoint/protocol resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid protocol '{0}' (expected 'graphql' or 'rest')")]
    InvalidProtocol(String),
}
