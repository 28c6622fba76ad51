//! Credential resolution
//!
//! Turns a decoded [`ProviderConfig`] into a usable API key pair. Inline
//! keys win; anything missing is filled from the referenced secret.

use std::sync::Arc;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::traits::{SecretData, SecretStore};

/// Secret entry holding the API key
pub const API_KEY_FIELD: &str = "apiKey";

/// Secret entry holding the secret API key
pub const API_SECRET_KEY_FIELD: &str = "apiSecretKey";

/// A resolved API key pair
///
/// The Debug implementation intentionally does NOT expose either key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Provider API key
    /// ⚠️ NEVER log this value
    pub api_key: String,
    /// Provider secret API key
    /// ⚠️ NEVER log this value
    pub secret_api_key: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(api_key: impl Into<String>, secret_api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_api_key: secret_api_key.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<REDACTED>")
            .field("secret_api_key", &"<REDACTED>")
            .finish()
    }
}

/// Resolves credentials from configuration and the secret store
#[derive(Clone)]
pub struct CredentialResolver {
    secret_store: Arc<dyn SecretStore>,
}

impl CredentialResolver {
    /// Create a resolver backed by the given secret store
    pub fn new(secret_store: Arc<dyn SecretStore>) -> Self {
        Self { secret_store }
    }

    /// Resolve the API key pair for a request
    ///
    /// The configuration must already have passed [`ProviderConfig::validate`].
    /// When both keys are inline the secret store is never queried.
    ///
    /// # Parameters
    ///
    /// - `config`: Decoded request configuration
    /// - `resource_namespace`: Namespace used when the secret reference has none
    pub async fn resolve(
        &self,
        config: &ProviderConfig,
        resource_namespace: &str,
    ) -> Result<Credentials> {
        if config.has_inline_keys() {
            debug!("Using inline API keys from solver config");
            return Ok(Credentials::new(
                config.api_key.clone(),
                config.api_secret_key.clone(),
            ));
        }

        let secret_ref = &config.api_keys_secret_ref;
        let namespace = if secret_ref.namespace.is_empty() {
            resource_namespace
        } else {
            secret_ref.namespace.as_str()
        };

        debug!("Loading API keys from secret {}/{}", namespace, secret_ref.name);
        let data = self.secret_store.get(namespace, &secret_ref.name).await?;

        let api_key = merge_field(
            &config.api_key,
            &data,
            API_KEY_FIELD,
            &secret_ref.name,
            namespace,
        )?;
        let secret_api_key = merge_field(
            &config.api_secret_key,
            &data,
            API_SECRET_KEY_FIELD,
            &secret_ref.name,
            namespace,
        )?;

        Ok(Credentials::new(api_key, secret_api_key))
    }
}

/// Keep an inline value, or require the field in the secret
fn merge_field(
    inline: &str,
    data: &SecretData,
    field: &str,
    secret: &str,
    namespace: &str,
) -> Result<String> {
    if !inline.is_empty() {
        debug!("{} supplied inline", field);
        return Ok(inline.to_string());
    }

    let bytes = data
        .get(field)
        .ok_or_else(|| Error::missing_field(field, secret, namespace))?;

    String::from_utf8(bytes.clone()).map_err(|_| {
        Error::invalid_config(format!(
            "key {} in secret \"{}/{}\" is not valid UTF-8",
            field, secret, namespace
        ))
    })
}
