//! Challenge record reconciler
//!
//! The DnsSolver is responsible for:
//! - Decoding and validating the per-request configuration
//! - Resolving provider credentials
//! - Searching the provider for the challenge record
//! - Deciding and performing the single mutation that makes the provider
//!   match the desired state
//!
//! ## Architecture
//!
//! ```text
//!                  ┌──────────────────┐
//!  ChallengeRequest│    DnsSolver     │
//! ────────────────►│ (present/clean)  │
//!                  └──────────────────┘
//!                           │
//!         ┌─────────────────┼──────────────────┐
//!         │                 │                  │
//!         ▼                 ▼                  ▼
//! ┌──────────────┐  ┌──────────────────┐  ┌─────────────┐
//! │ProviderConfig│  │CredentialResolver│  │  RecordApi  │
//! │  (decode)    │  │  (SecretStore)   │  │(search/mut.)│
//! └──────────────┘  └──────────────────┘  └─────────────┘
//! ```
//!
//! ## Decision Table
//!
//! | Operation | Search result              | Action  |
//! |-----------|----------------------------|---------|
//! | present   | none                       | create  |
//! | present   | record, same content       | no-op   |
//! | present   | record, different content  | update  |
//! | clean_up  | record                     | delete  |
//! | clean_up  | none                       | no-op   |
//!
//! No state is kept between calls; every call re-derives the decision from
//! the provider, which is what makes retries safe.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::challenge::ChallengeRequest;
use crate::config::ProviderConfig;
use crate::credentials::{CredentialResolver, Credentials};
use crate::error::{Error, Result};
use crate::traits::{CHALLENGE_TTL, RecordApi, RecordApiFactory, Solver, SolverContext};

/// What a reconciliation did at the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// A new record was created
    Created,
    /// An existing record was rewritten with the desired token
    Updated {
        /// ID of the rewritten record
        record_id: String,
    },
    /// The desired record was already present
    Unchanged {
        /// ID of the existing record
        record_id: String,
    },
    /// The challenge record was deleted
    Deleted {
        /// ID of the deleted record
        record_id: String,
    },
    /// There was nothing to delete
    Absent,
}

/// Handles established by `initialize`
struct Initialized {
    api: Arc<dyn RecordApi>,
    resolver: CredentialResolver,
}

/// DNS-01 solver reconciling one TXT record per challenge
///
/// ## Lifecycle
///
/// 1. Create with [`DnsSolver::new()`]
/// 2. Call [`Solver::initialize()`] once with the host's [`SolverContext`]
/// 3. Serve any number of concurrent `present` / `clean_up` calls
///
/// ## Threading
///
/// After initialization the solver is immutable; concurrent challenges do
/// not coordinate and rely on the content filter of
/// [`RecordApi::search`] to stay isolated.
pub struct DnsSolver {
    /// Routing name reported to the host
    name: &'static str,

    /// Builds the record API during `initialize`
    factory: Box<dyn RecordApiFactory>,

    /// Set once `initialize` succeeds
    ready: Option<Initialized>,
}

impl DnsSolver {
    /// Create an uninitialized solver
    ///
    /// # Parameters
    ///
    /// - `name`: Routing name reported to the host (e.g. "porkbun")
    /// - `factory`: Builds the provider record API from the host's client config
    pub fn new(name: &'static str, factory: Box<dyn RecordApiFactory>) -> Self {
        Self {
            name,
            factory,
            ready: None,
        }
    }

    /// Whether `initialize` has completed
    pub fn is_initialized(&self) -> bool {
        self.ready.is_some()
    }

    /// Ensure the challenge record is present, reporting what was done
    pub async fn reconcile_present(&self, request: &ChallengeRequest) -> Result<ReconcileOutcome> {
        let (ready, credentials) = self.prepare(request).await?;
        let api = ready.api.as_ref();
        let zone = request.zone();
        let fqdn = request.fqdn();

        debug!("Searching {} for existing record: {}", api.provider_name(), fqdn);
        let existing = api.search(&credentials, zone, fqdn, &request.key).await?;

        let outcome = match existing {
            Some(record) if record.content == request.key => {
                debug!("Record {} (id {}) already present", fqdn, record.id);
                ReconcileOutcome::Unchanged {
                    record_id: record.id,
                }
            }
            Some(record) => {
                // Unreachable while search filters on content as well as
                // name. Kept until the owners decide whether search should
                // match on name alone.
                info!("Updating TXT record {} (id {})", fqdn, record.id);
                api.update(
                    &credentials,
                    zone,
                    &record.id,
                    &request.short_name(),
                    &request.key,
                    CHALLENGE_TTL,
                )
                .await?;
                ReconcileOutcome::Updated {
                    record_id: record.id,
                }
            }
            None => {
                info!("Adding TXT record: {}", fqdn);
                api.create(
                    &credentials,
                    zone,
                    &request.short_name(),
                    &request.key,
                    CHALLENGE_TTL,
                )
                .await?;
                ReconcileOutcome::Created
            }
        };

        info!("present {}: {:?}", fqdn, outcome);
        Ok(outcome)
    }

    /// Ensure the challenge record is absent, reporting what was done
    pub async fn reconcile_clean_up(
        &self,
        request: &ChallengeRequest,
    ) -> Result<ReconcileOutcome> {
        let (ready, credentials) = self.prepare(request).await?;
        let api = ready.api.as_ref();
        let zone = request.zone();
        let fqdn = request.fqdn();

        debug!("Searching {} for existing record: {}", api.provider_name(), fqdn);
        let outcome = match api.search(&credentials, zone, fqdn, &request.key).await? {
            Some(record) => {
                info!("Deleting TXT record {} (id {})", fqdn, record.id);
                api.delete(&credentials, zone, &record.id).await?;
                ReconcileOutcome::Deleted {
                    record_id: record.id,
                }
            }
            None => {
                debug!("Record {} does not exist, nothing to clean up", fqdn);
                ReconcileOutcome::Absent
            }
        };

        info!("clean_up {}: {:?}", fqdn, outcome);
        Ok(outcome)
    }

    /// Decode config, validate it and resolve credentials
    ///
    /// Validation happens before any secret-store or network access.
    async fn prepare(&self, request: &ChallengeRequest) -> Result<(&Initialized, Credentials)> {
        let ready = self
            .ready
            .as_ref()
            .ok_or_else(|| Error::NotInitialized(self.name.to_string()))?;

        let config = ProviderConfig::decode(request.config.as_ref())?;
        config.validate()?;

        let credentials = ready
            .resolver
            .resolve(&config, &request.resource_namespace)
            .await?;

        Ok((ready, credentials))
    }
}

impl std::fmt::Debug for DnsSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsSolver")
            .field("name", &self.name)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[async_trait]
impl Solver for DnsSolver {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn initialize(&mut self, ctx: SolverContext) -> Result<()> {
        ctx.client.validate()?;

        let api = self.factory.create(&ctx.client)?;
        info!(
            "Initialized {} solver (provider: {}, dry_run: {})",
            self.name,
            api.provider_name(),
            ctx.client.dry_run
        );

        self.ready = Some(Initialized {
            api: Arc::from(api),
            resolver: CredentialResolver::new(ctx.secret_store),
        });
        Ok(())
    }

    async fn present(&self, request: &ChallengeRequest) -> Result<()> {
        self.reconcile_present(request).await.map(|_| ())
    }

    async fn clean_up(&self, request: &ChallengeRequest) -> Result<()> {
        self.reconcile_clean_up(request).await.map(|_| ())
    }
}
