//! Endpoint configuration for the shop-floor API client.
//!
//! Resolution order mirrors the deployment reality: explicit values win,
//! then environment variables (with `.env` support), then defaults.

use std::str::FromStr;

use crate::errors::ConfigError;

/// Default endpoint when `SHOPFLOOR_API_URL` is unset.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/graphql";

/// Environment variable naming the API endpoint. For the GraphQL protocol
/// this is the full endpoint URL; for REST it is the base URL the resource
/// paths hang off.
pub const ENV_API_URL: &str = "SHOPFLOOR_API_URL";

/// Environment variable selecting the transport protocol.
pub const ENV_API_PROTOCOL: &str = "SHOPFLOOR_API_PROTOCOL";

/// Wire protocol spoken by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    #[default]
    Graphql,
    Rest,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Graphql => "graphql",
            Self::Rest => "rest",
        }
    }
}

impl FromStr for Protocol {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "graphql" => Ok(Self::Graphql),
            "rest" => Ok(Self::Rest),
            _ => Err(ConfigError::InvalidProtocol(s.to_string())),
        }
    }
}

/// Runtime configuration for the API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub endpoint: String,
    pub protocol: Protocol,
}

impl ApiConfig {
    /// Build a config from explicit values.
    pub fn new(endpoint: impl Into<String>, protocol: Protocol) -> Self {
        Self {
            endpoint: endpoint.into(),
            protocol,
        }
    }

    /// Resolve from the environment, reading `.env` if present and falling
    /// back to the default endpoint and protocol.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_API_PROTOCOL).ok(),
        )
    }

    /// Resolve from already-read variable values. `from_env` delegates here;
    /// tests call it directly to stay independent of process state.
    pub fn from_vars(url: Option<String>, protocol: Option<String>) -> Result<Self, ConfigError> {
        let protocol = match protocol {
            Some(raw) => raw.parse()?,
            None => Protocol::default(),
        };
        let endpoint = url.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Ok(Self { endpoint, protocol })
    }
}
