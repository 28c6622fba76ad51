// # Memory Secret Store
//
// In-memory implementation of SecretStore.
//
// ## Purpose
//
// Provides a simple secret store for tests and for hosts that load their
// credentials some other way and hand them to the solver directly.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::secret_store::{SecretData, SecretStore};

/// In-memory secret store implementation
///
/// Secrets are kept in a HashMap keyed by `(namespace, name)` and protected
/// by a RwLock. Every lookup is counted so callers can verify whether the
/// store was consulted.
///
/// # Example
///
/// ```rust,no_run
/// use dns01_core::secrets::MemorySecretStore;
/// use dns01_core::traits::SecretStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemorySecretStore::new();
///     store
///         .insert("cert-manager", "porkbun-keys", [("apiKey", "pk1"), ("apiSecretKey", "sk1")])
///         .await;
///
///     let data = store.get("cert-manager", "porkbun-keys").await?;
///     assert_eq!(data["apiKey"], b"pk1".to_vec());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySecretStore {
    inner: Arc<RwLock<HashMap<(String, String), SecretData>>>,
    lookups: Arc<AtomicUsize>,
}

impl MemorySecretStore {
    /// Create a new empty memory secret store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a secret with string entries
    pub async fn insert<K, V>(
        &self,
        namespace: &str,
        name: &str,
        entries: impl IntoIterator<Item = (K, V)>,
    ) where
        K: Into<String>,
        V: AsRef<str>,
    {
        let data = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.as_ref().as_bytes().to_vec()))
            .collect();
        self.insert_bytes(namespace, name, data).await;
    }

    /// Insert or replace a secret with raw byte entries
    pub async fn insert_bytes(&self, namespace: &str, name: &str, data: SecretData) {
        let mut guard = self.inner.write().await;
        guard.insert((namespace.to_string(), name.to_string()), data);
    }

    /// Remove a secret
    pub async fn remove(&self, namespace: &str, name: &str) {
        let mut guard = self.inner.write().await;
        guard.remove(&(namespace.to_string(), name.to_string()));
    }

    /// Number of `get` calls served so far
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretData, Error> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let guard = self.inner.read().await;
        guard
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| Error::secret_not_found(namespace, name))
    }
}
