//! Challenge request supplied by the host
//!
//! The field names follow the host framework's camelCase wire format so a
//! request exported from the host can be replayed through `dns01d`.

use serde::{Deserialize, Serialize};

/// A DNS-01 challenge the host wants presented or cleaned up
///
/// Read-only to the solver. `resolved_fqdn` and `resolved_zone` carry the
/// trailing dot the host resolves them with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    /// Host-assigned identifier of the challenge
    #[serde(default)]
    pub uid: String,

    /// Host action (`Present` or `CleanUp`), informational only
    #[serde(default)]
    pub action: String,

    /// Challenge type, always `dns-01` here
    #[serde(default, rename = "type")]
    pub challenge_type: String,

    /// Name being validated (e.g. `example.com`)
    #[serde(default)]
    pub dns_name: String,

    /// Expected TXT record value
    pub key: String,

    /// Namespace to resolve secret references against
    #[serde(default)]
    pub resource_namespace: String,

    /// FQDN of the TXT record, e.g. `_acme-challenge.example.com.`
    #[serde(rename = "resolvedFQDN")]
    pub resolved_fqdn: String,

    /// Zone that owns the record, e.g. `example.com.`
    pub resolved_zone: String,

    /// Unused by this solver; ambient credentials are never consulted
    #[serde(default)]
    pub allow_ambient_credentials: bool,

    /// Opaque solver configuration payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl ChallengeRequest {
    /// Create a request with the fields the solver reads
    pub fn new(
        resolved_fqdn: impl Into<String>,
        resolved_zone: impl Into<String>,
        key: impl Into<String>,
        resource_namespace: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            resource_namespace: resource_namespace.into(),
            resolved_fqdn: resolved_fqdn.into(),
            resolved_zone: resolved_zone.into(),
            challenge_type: "dns-01".to_string(),
            ..Default::default()
        }
    }

    /// Attach a solver configuration payload
    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }

    /// The record FQDN without its trailing dot
    pub fn fqdn(&self) -> &str {
        self.resolved_fqdn.trim_end_matches('.')
    }

    /// The zone without its trailing dot
    pub fn zone(&self) -> &str {
        self.resolved_zone.trim_end_matches('.')
    }

    /// Record name relative to the zone
    pub fn short_name(&self) -> String {
        record_short_name(&self.resolved_fqdn, &self.resolved_zone)
    }
}

/// Derive the zone-relative record name from an FQDN
///
/// Trailing dots are stripped from both inputs, the zone suffix is removed
/// from the FQDN, and any trailing dot left behind is stripped again. The
/// zone apex yields an empty name.
pub fn record_short_name(fqdn: &str, zone: &str) -> String {
    let zone = zone.trim_end_matches('.');
    let fqdn = fqdn.trim_end_matches('.');
    let name = fqdn.strip_suffix(zone).unwrap_or(fqdn);
    name.trim_end_matches('.').to_string()
}
