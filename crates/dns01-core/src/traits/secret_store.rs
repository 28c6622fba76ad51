// # Secret Store Trait
//
// Defines the interface for looking up provider credential secrets.
//
// ## Purpose
//
// Issuers may reference a secret instead of embedding API keys in their
// configuration. The solver resolves that reference through this trait.
//
// ## Implementations
//
// - In-memory: tests and embedding (`MemorySecretStore`)
// - Directory: mounted secret volumes (`DirSecretStore`)

use async_trait::async_trait;
use std::collections::HashMap;

/// Secret entries keyed by name, values as raw bytes
pub type SecretData = HashMap<String, Vec<u8>>;

/// Trait for secret store implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
///
/// # Trust Level: Trusted (Core Component)
///
/// ## Allowed Capabilities
/// - ✅ Perform I/O against the secret backend
/// - ✅ Return secret values to the credential resolver
///
/// ## Forbidden Capabilities
/// - ❌ Log secret values
/// - ❌ Cache secrets across requests (credentials are resolved fresh every call)
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a secret's data
    ///
    /// # Returns
    ///
    /// - `Ok(SecretData)`: The secret's entries
    /// - `Err(Error::SecretNotFound)`: No such secret
    /// - `Err(Error)`: Backend error
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretData, crate::Error>;
}
