// # Solver Trait
//
// The capability surface a host framework binds to: a fixed name for
// routing, one-time initialization, and the two challenge operations.

use async_trait::async_trait;
use std::sync::Arc;

use crate::challenge::ChallengeRequest;
use crate::config::ClientConfig;
use crate::traits::SecretStore;

/// Everything a solver needs from the host at startup
#[derive(Clone)]
pub struct SolverContext {
    /// Secret store used to resolve `apiKeysSecretRef`
    pub secret_store: Arc<dyn SecretStore>,
    /// Provider HTTP client settings
    pub client: ClientConfig,
}

impl SolverContext {
    /// Create a context with the default client configuration
    pub fn new(secret_store: Arc<dyn SecretStore>) -> Self {
        Self {
            secret_store,
            client: ClientConfig::default(),
        }
    }

    /// Replace the client configuration
    pub fn with_client(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }
}

impl std::fmt::Debug for SolverContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverContext")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

/// A DNS-01 challenge solver
///
/// Both challenge operations must tolerate being called repeatedly with the
/// same request; the host retries whole operations on failure.
#[async_trait]
pub trait Solver: Send + Sync {
    /// Identifier the host uses to route requests to this solver
    ///
    /// Must be unique within a group.
    fn name(&self) -> &'static str;

    /// Establish the secret-store handle and HTTP client
    ///
    /// Called once when the host starts.
    async fn initialize(&mut self, ctx: SolverContext) -> Result<(), crate::Error>;

    /// Ensure the challenge TXT record exists with the request's key
    async fn present(&self, request: &ChallengeRequest) -> Result<(), crate::Error>;

    /// Ensure the challenge TXT record for the request's key is gone
    ///
    /// Only the record whose value equals the request's key is removed, so
    /// concurrent validations of the same name are left alone.
    async fn clean_up(&self, request: &ChallengeRequest) -> Result<(), crate::Error>;
}
