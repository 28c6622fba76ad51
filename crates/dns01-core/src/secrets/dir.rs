// # Directory Secret Store
//
// SecretStore backed by mounted secret volumes.
//
// ## Layout
//
// Each secret is a directory and each entry a file holding the raw value:
//
// ```text
// <root>/
//   cert-manager/
//     porkbun-keys/
//       apiKey
//       apiSecretKey
// ```
//
// This is the layout a Kubernetes secret volume produces, so a projected
// volume mounted at `<root>/<namespace>/<name>` works unchanged. Entries
// whose names start with `.` (the volume's `..data` bookkeeping) are skipped.
//
// Secrets are read from disk on every lookup; nothing is cached, so rotated
// credentials are picked up by the next challenge.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::Error;
use crate::traits::secret_store::{SecretData, SecretStore};

/// Directory-backed secret store
///
/// # Example
///
/// ```rust,no_run
/// use dns01_core::secrets::DirSecretStore;
/// use dns01_core::traits::SecretStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = DirSecretStore::new("/var/run/secrets/dns01");
///     let data = store.get("cert-manager", "porkbun-keys").await?;
///     println!("{} entries", data.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DirSecretStore {
    root: PathBuf,
}

impl DirSecretStore {
    /// Create a store rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the directory of a secret, rejecting path traversal
    fn secret_dir(&self, namespace: &str, name: &str) -> Result<PathBuf, Error> {
        for part in [namespace, name] {
            if part.is_empty() || part.starts_with('.') || part.contains(['/', '\\']) {
                return Err(Error::secret_store(format!(
                    "Invalid secret path component: {:?}",
                    part
                )));
            }
        }

        Ok(self.root.join(namespace).join(name))
    }
}

#[async_trait]
impl SecretStore for DirSecretStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretData, Error> {
        let dir = self.secret_dir(namespace, name)?;

        let exists = fs::try_exists(&dir).await.map_err(|e| {
            Error::secret_store(format!(
                "Failed to stat secret directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        if !exists {
            tracing::debug!("Secret directory does not exist: {}", dir.display());
            return Err(Error::secret_not_found(namespace, name));
        }

        let mut entries = fs::read_dir(&dir).await.map_err(|e| {
            Error::secret_store(format!(
                "Failed to read secret directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let mut data = SecretData::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            Error::secret_store(format!(
                "Failed to list secret directory {}: {}",
                dir.display(),
                e
            ))
        })? {
            let key = entry.file_name().to_string_lossy().into_owned();
            if key.starts_with('.') {
                continue;
            }

            // Follows symlinks, as volume entries point into `..data`
            let path = entry.path();
            let metadata = match fs::metadata(&path).await {
                Ok(metadata) => metadata,
                // Removed between listing and stat
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(Error::secret_store(format!(
                        "Failed to stat secret entry {}: {}",
                        path.display(),
                        e
                    )));
                }
            };
            if !metadata.is_file() {
                continue;
            }

            let value = fs::read(&path).await.map_err(|e| {
                Error::secret_store(format!(
                    "Failed to read secret entry {}: {}",
                    path.display(),
                    e
                ))
            })?;
            data.insert(key, value);
        }

        tracing::trace!("Loaded secret {}/{}: {} entries", namespace, name, data.len());
        Ok(data)
    }
}
