//! Configuration types for the DNS-01 solver
//!
//! [`ProviderConfig`] is decoded fresh from every challenge request.
//! [`ClientConfig`] is supplied once by the host when the solver is
//! initialized.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default HTTP timeout for provider API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Per-request solver configuration
///
/// Set by users in the issuer's webhook `config` field. Either a secret
/// reference or both inline keys must be present.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Secret holding `apiKey` / `apiSecretKey` entries
    #[serde(default)]
    pub api_keys_secret_ref: SecretReference,

    /// Inline API key
    #[serde(default)]
    pub api_key: String,

    /// Inline secret API key
    #[serde(default)]
    pub api_secret_key: String,
}

// Keeps inline keys out of logs
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_keys_secret_ref", &self.api_keys_secret_ref)
            .field("api_key", &redacted(&self.api_key))
            .field("api_secret_key", &redacted(&self.api_secret_key))
            .finish()
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() { "<empty>" } else { "<REDACTED>" }
}

impl ProviderConfig {
    /// Decode the opaque configuration payload of a challenge request
    ///
    /// An absent payload (or JSON `null`) yields the zero-value config.
    /// Unknown fields are ignored.
    pub fn decode(raw: Option<&serde_json::Value>) -> Result<Self, crate::Error> {
        match raw {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => {
                Self::deserialize(value).map_err(|e| crate::Error::decode(e.to_string()))
            }
        }
    }

    /// Check that credentials can be resolved from this configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.api_keys_secret_ref.name.is_empty() || self.has_inline_keys() {
            return Ok(());
        }

        Err(crate::Error::invalid_config("API keys or secret not provided"))
    }

    /// Whether both keys are supplied inline
    pub fn has_inline_keys(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret_key.is_empty()
    }
}

/// Pointer to a secret by namespace and name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretReference {
    /// Secret namespace; the request's resource namespace when empty
    #[serde(default)]
    pub namespace: String,

    /// Secret name
    #[serde(default)]
    pub name: String,
}

/// Provider client settings supplied by the host at initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Override for the provider API base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Perform searches but only log mutations
    #[serde(default)]
    pub dry_run: bool,
}

impl ClientConfig {
    /// Create a live client config with the default timeout
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
            dry_run: false,
        }
    }

    /// Point the client at a different API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The per-request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the client configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("HTTP timeout must be > 0"));
        }

        if let Some(url) = &self.base_url
            && !url.starts_with("https://")
            && !url.starts_with("http://")
        {
            return Err(crate::Error::config(format!(
                "Provider base URL must use HTTP or HTTPS scheme. Got: {}",
                url
            )));
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_absent_payload_yields_defaults() {
        let cfg = ProviderConfig::decode(None).unwrap();
        assert_eq!(cfg, ProviderConfig::default());

        let cfg = ProviderConfig::decode(Some(&serde_json::Value::Null)).unwrap();
        assert_eq!(cfg, ProviderConfig::default());
    }

    #[test]
    fn test_decode_full_payload() {
        let raw = json!({
            "apiKeysSecretRef": { "namespace": "dns", "name": "porkbun-keys" },
            "apiKey": "pk1_abc",
            "apiSecretKey": "sk1_def",
            "unrelated": true
        });

        let cfg = ProviderConfig::decode(Some(&raw)).unwrap();
        assert_eq!(cfg.api_keys_secret_ref.namespace, "dns");
        assert_eq!(cfg.api_keys_secret_ref.name, "porkbun-keys");
        assert_eq!(cfg.api_key, "pk1_abc");
        assert_eq!(cfg.api_secret_key, "sk1_def");
    }

    #[test]
    fn test_decode_wrong_shape_fails() {
        let raw = json!({ "apiKey": 42 });
        let err = ProviderConfig::decode(Some(&raw)).unwrap_err();
        assert!(matches!(err, crate::Error::Decode(_)), "got {err:?}");

        let raw = json!(["not", "an", "object"]);
        assert!(matches!(
            ProviderConfig::decode(Some(&raw)),
            Err(crate::Error::Decode(_))
        ));
    }

    #[test]
    fn test_validate_accepts_secret_ref_only() {
        let cfg = ProviderConfig {
            api_keys_secret_ref: SecretReference {
                namespace: String::new(),
                name: "porkbun-keys".to_string(),
            },
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_inline_keys_only() {
        let cfg = ProviderConfig {
            api_key: "pk".to_string(),
            api_secret_key: "sk".to_string(),
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_partial_inline_keys() {
        let cfg = ProviderConfig {
            api_key: "pk".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(crate::Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ProviderConfig::default().validate(),
            Err(crate::Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_debug_redacts_inline_keys() {
        let cfg = ProviderConfig {
            api_key: "pk1_visible_in_logs".to_string(),
            api_secret_key: "sk1_visible_in_logs".to_string(),
            ..Default::default()
        };
        let debug_str = format!("{:?}", cfg);
        assert!(!debug_str.contains("visible_in_logs"));
        assert!(debug_str.contains("<REDACTED>"));
    }

    #[test]
    fn test_client_config_validation() {
        assert!(ClientConfig::new().validate().is_ok());
        assert!(ClientConfig::new().with_timeout_secs(0).validate().is_err());
        assert!(
            ClientConfig::new()
                .with_base_url("ftp://api.example")
                .validate()
                .is_err()
        );
        assert_eq!(ClientConfig::new().timeout(), Duration::from_secs(30));
    }
}
