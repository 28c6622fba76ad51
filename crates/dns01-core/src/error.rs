//! Error types for the DNS-01 solver
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for DNS-01 operations
pub type Result<T> = std::result::Result<T, Error>;

/// Maximum number of characters of a provider response kept in an error
const BODY_EXCERPT_LIMIT: usize = 512;

/// Core error type for the DNS-01 solver
#[derive(Error, Debug)]
pub enum Error {
    /// Credentials cannot be resolved from the given configuration
    #[error("Invalid solver config: {0}")]
    InvalidConfig(String),

    /// The referenced credential secret does not exist
    #[error("Secret \"{namespace}/{name}\" not found")]
    SecretNotFound {
        /// Namespace the secret was looked up in
        namespace: String,
        /// Secret name
        name: String,
    },

    /// The credential secret exists but lacks a required entry
    #[error("key {field} not found in secret \"{secret}/{namespace}\"")]
    MissingCredentialField {
        /// Missing entry (`apiKey` or `apiSecretKey`)
        field: String,
        /// Secret name
        secret: String,
        /// Secret namespace
        namespace: String,
    },

    /// Malformed per-request configuration payload
    #[error("error decoding solver config: {0}")]
    Decode(String),

    /// Network failure reaching the provider
    #[error("Transport error calling {endpoint}: {message}")]
    Transport {
        /// Endpoint that was being called
        endpoint: String,
        /// Underlying failure
        message: String,
    },

    /// The provider answered with a non-success status
    #[error("Provider rejected request to {endpoint} (status {status}): {body}")]
    ProviderRejected {
        /// Endpoint that was being called
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Excerpt of the response body
        body: String,
    },

    /// The provider answered with an unexpected JSON shape
    #[error("Malformed response from {endpoint}: {message}")]
    MalformedResponse {
        /// Endpoint that was being called
        endpoint: String,
        /// Decode failure
        message: String,
    },

    /// Secret store backend errors (I/O, permissions)
    #[error("Secret store error: {0}")]
    SecretStore(String),

    /// Solver used before `initialize`
    #[error("Solver {0} has not been initialized")]
    NotInitialized(String),

    /// Harness and registry configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a "secret not found" error
    pub fn secret_not_found(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::SecretNotFound {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Create a missing credential field error
    pub fn missing_field(
        field: impl Into<String>,
        secret: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::MissingCredentialField {
            field: field.into(),
            secret: secret.into(),
            namespace: namespace.into(),
        }
    }

    /// Create a config decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a transport error
    pub fn transport(endpoint: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: msg.into(),
        }
    }

    /// Create a provider rejection error, truncating the body
    pub fn rejected(endpoint: impl Into<String>, status: u16, body: &str) -> Self {
        Self::ProviderRejected {
            endpoint: endpoint.into(),
            status,
            body: excerpt(body),
        }
    }

    /// Create a malformed response error
    pub fn malformed(endpoint: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            message: msg.into(),
        }
    }

    /// Create a secret store error
    pub fn secret_store(msg: impl Into<String>) -> Self {
        Self::SecretStore(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether retrying the whole operation may succeed without a config change
    ///
    /// Provider rejections count as retryable because rate limiting cannot be
    /// told apart from a permanent rejection.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::ProviderRejected { .. })
    }
}

/// Cap a response body so errors stay readable
pub fn excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_LIMIT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
