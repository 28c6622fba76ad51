// # Record API Trait
//
// Defines the interface for reading and mutating challenge TXT records via
// a provider's REST API.
//
// ## Implementations
//
// - Porkbun: `dns01-provider-porkbun` crate
//
// ## Usage
//
// ```rust,ignore
// use dns01_core::traits::{RecordApi, CHALLENGE_TTL};
//
// let api = /* RecordApi implementation */;
// match api.search(&credentials, "example.com", "_acme-challenge.example.com", "token").await? {
//     Some(record) => api.delete(&credentials, "example.com", &record.id).await?,
//     None => api.create(&credentials, "example.com", "_acme-challenge", "token", CHALLENGE_TTL).await?,
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::credentials::Credentials;

/// Record type managed by the solver
pub const TXT_RECORD_TYPE: &str = "TXT";

/// TTL of challenge records, string-encoded as the provider expects
pub const CHALLENGE_TTL: &str = "600";

/// A DNS record as returned by the provider
///
/// Numeric fields stay string-encoded, matching the provider's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned record ID
    pub id: String,
    /// Record FQDN without trailing dot
    pub name: String,
    /// Record type (always `TXT` for challenge records)
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record value (the challenge token)
    pub content: String,
    /// Time-to-live
    pub ttl: String,
    /// Priority, unused for TXT records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prio: Option<String>,
    /// Free-form provider notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DnsRecord {
    /// Create a TXT record with the challenge TTL
    pub fn txt(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            record_type: TXT_RECORD_TYPE.to_string(),
            content: content.into(),
            ttl: CHALLENGE_TTL.to_string(),
            prio: None,
            notes: None,
        }
    }

    /// Whether this record is the one governed by `(fqdn, content)`
    pub fn matches(&self, fqdn: &str, content: &str) -> bool {
        self.name == fqdn && self.content == content
    }
}

/// Trait for provider record API implementations
///
/// # Trust Level: Untrusted
///
/// Record APIs are thin, stateless wrappers around a provider's endpoints.
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to their endpoints only
/// - ✅ Decode provider-specific responses into typed records
/// - ✅ Return success or failure
///
/// ## Forbidden Capabilities
/// - ❌ Implement retry logic or backoff (the host retries whole operations)
/// - ❌ Decide whether a record should be created, updated or deleted (owned by `DnsSolver`)
/// - ❌ Cache records beyond a single request
/// - ❌ Log credential values
///
/// Every method performs exactly one API call.
#[async_trait]
pub trait RecordApi: Send + Sync {
    /// Find the record governed by a challenge
    ///
    /// Returns the first record (in provider order) whose name equals `fqdn`
    /// and whose content equals `content`. Records with the same name but a
    /// different value belong to other challenges and are never returned.
    ///
    /// # Parameters
    ///
    /// - `zone`: Zone without trailing dot (e.g. "example.com")
    /// - `fqdn`: Record FQDN without trailing dot
    /// - `content`: Expected challenge token
    async fn search(
        &self,
        credentials: &Credentials,
        zone: &str,
        fqdn: &str,
        content: &str,
    ) -> Result<Option<DnsRecord>, crate::Error>;

    /// Create a TXT record
    ///
    /// `name` is relative to the zone (see [`crate::challenge::record_short_name`]).
    async fn create(
        &self,
        credentials: &Credentials,
        zone: &str,
        name: &str,
        content: &str,
        ttl: &str,
    ) -> Result<(), crate::Error>;

    /// Replace the content of an existing TXT record
    async fn update(
        &self,
        credentials: &Credentials,
        zone: &str,
        record_id: &str,
        name: &str,
        content: &str,
        ttl: &str,
    ) -> Result<(), crate::Error>;

    /// Delete a record by ID
    async fn delete(
        &self,
        credentials: &Credentials,
        zone: &str,
        record_id: &str,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing record APIs when a solver is initialized
pub trait RecordApiFactory: Send + Sync {
    /// Create a RecordApi instance from the host's client configuration
    fn create(&self, config: &ClientConfig) -> Result<Box<dyn RecordApi>, crate::Error>;
}
