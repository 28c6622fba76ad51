// # Porkbun Record API
//
// This crate provides the Porkbun implementation of `RecordApi` for the
// DNS-01 solver, plus the `porkbun` solver built on top of it.
//
// ## Behavior
//
// - One HTTP request per trait call, no retries (the ACME host retries)
// - Every call is a POST carrying `apikey` / `secretapikey` in the body
// - HTTP timeout configured (30 seconds by default)
// - Dry-run mode: searches run, mutations are only logged
//
// ## Security Requirements
//
// - API keys NEVER appear in logs, errors or Debug output
// - Provider response bodies are truncated before they land in errors
//
// ## API Reference
//
// - Porkbun API v3: https://porkbun.com/api/json/v3/documentation
// - Retrieve records: POST `/dns/retrieve/:domain`
// - Create record:    POST `/dns/create/:domain`
// - Edit record:      POST `/dns/edit/:domain/:id`
// - Delete record:    POST `/dns/delete/:domain/:id`

use async_trait::async_trait;
use dns01_core::config::ClientConfig;
use dns01_core::traits::{
    DnsRecord, RecordApi, RecordApiFactory, Solver, SolverContext, TXT_RECORD_TYPE,
};
use dns01_core::{Credentials, DnsSolver, Error, Result, SolverRegistry};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Porkbun API base URL
pub const PORKBUN_API_BASE: &str = "https://api.porkbun.com/api/json/v3";

/// Name the Porkbun solver registers under
pub const SOLVER_NAME: &str = "porkbun";

/// Authentication body shared by every request
#[derive(Serialize)]
struct AuthBody<'a> {
    secretapikey: &'a str,
    apikey: &'a str,
}

impl<'a> AuthBody<'a> {
    fn new(credentials: &'a Credentials) -> Self {
        Self {
            secretapikey: &credentials.secret_api_key,
            apikey: &credentials.api_key,
        }
    }
}

/// Body of create and edit requests
#[derive(Serialize)]
struct RecordBody<'a> {
    #[serde(flatten)]
    auth: AuthBody<'a>,
    name: &'a str,
    #[serde(rename = "type")]
    record_type: &'a str,
    content: &'a str,
    ttl: &'a str,
}

/// Response of `/dns/retrieve`
#[derive(Deserialize)]
struct RetrieveResponse {
    records: Vec<DnsRecord>,
}

/// Porkbun record API client
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the client will:
/// - Perform retrieve requests
/// - Log the intended create, edit or delete
/// - **NOT** actually modify DNS records
///
/// # Security
///
/// The client holds no credentials; they arrive per call and are only
/// written into request bodies.
pub struct PorkbunClient {
    /// HTTP client for API requests
    client: reqwest::Client,

    /// API base URL without trailing slash
    base_url: String,

    /// Dry-run mode: if true, search but skip mutations
    dry_run: bool,
}

impl std::fmt::Debug for PorkbunClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PorkbunClient")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl PorkbunClient {
    /// Create a client from the shared HTTP client configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(PORKBUN_API_BASE)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            base_url,
            dry_run: config.dry_run,
        })
    }

    /// Create a live client against the public Porkbun API
    pub fn new_live() -> Result<Self> {
        Self::new(&ClientConfig::new())
    }

    /// Create a dry-run client against the public Porkbun API
    pub fn new_dry_run() -> Result<Self> {
        Self::new(&ClientConfig::new().with_dry_run(true))
    }

    /// Whether mutations are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// POST a JSON body, returning the status and raw response text
    async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<(StatusCode, String)> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::transport(endpoint, e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(endpoint, format!("Failed to read response: {}", e)))?;

        Ok((status, text))
    }

    /// POST a mutation, treating any non-2xx status as a rejection
    async fn mutate<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<()> {
        let (status, text) = self.post(endpoint, body).await?;

        if !status.is_success() {
            tracing::warn!("Porkbun rejected {} with status {}", endpoint, status);
            return Err(Error::rejected(endpoint, status.as_u16(), &text));
        }

        Ok(())
    }
}

#[async_trait]
impl RecordApi for PorkbunClient {
    /// Find the TXT record governed by `(fqdn, content)`
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /dns/retrieve/example.com
    /// { "secretapikey": "...", "apikey": "..." }
    /// ```
    async fn search(
        &self,
        credentials: &Credentials,
        zone: &str,
        fqdn: &str,
        content: &str,
    ) -> Result<Option<DnsRecord>> {
        let endpoint = format!("/dns/retrieve/{}", zone);
        tracing::debug!("Searching porkbun for existing record: {}", fqdn);

        let (status, text) = self.post(&endpoint, &AuthBody::new(credentials)).await?;

        if status != StatusCode::OK {
            tracing::warn!(
                "Record search for {} failed with status {}",
                fqdn,
                status
            );
            return Err(Error::rejected(
                &endpoint,
                status.as_u16(),
                &format!("requested_record: '{}', response: {}", fqdn, text),
            ));
        }

        let parsed: RetrieveResponse =
            serde_json::from_str(&text).map_err(|e| Error::malformed(&endpoint, e.to_string()))?;

        let found = parsed
            .records
            .into_iter()
            .find(|record| record.matches(fqdn, content));

        match &found {
            Some(record) => tracing::debug!("Existing record found: {} (id {})", fqdn, record.id),
            None => tracing::debug!("Record: {} does not exist", fqdn),
        }

        Ok(found)
    }

    async fn create(
        &self,
        credentials: &Credentials,
        zone: &str,
        name: &str,
        content: &str,
        ttl: &str,
    ) -> Result<()> {
        let endpoint = format!("/dns/create/{}", zone);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would POST {} with payload: {}",
                endpoint,
                serde_json::json!({
                    "name": name,
                    "type": TXT_RECORD_TYPE,
                    "content": content,
                    "ttl": ttl,
                })
            );
            return Ok(());
        }

        let body = RecordBody {
            auth: AuthBody::new(credentials),
            name,
            record_type: TXT_RECORD_TYPE,
            content,
            ttl,
        };
        self.mutate(&endpoint, &body).await?;

        tracing::info!("Created TXT record {} in zone {}", name, zone);
        Ok(())
    }

    async fn update(
        &self,
        credentials: &Credentials,
        zone: &str,
        record_id: &str,
        name: &str,
        content: &str,
        ttl: &str,
    ) -> Result<()> {
        let endpoint = format!("/dns/edit/{}/{}", zone, record_id);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would POST {} with payload: {}",
                endpoint,
                serde_json::json!({
                    "name": name,
                    "type": TXT_RECORD_TYPE,
                    "content": content,
                    "ttl": ttl,
                })
            );
            return Ok(());
        }

        let body = RecordBody {
            auth: AuthBody::new(credentials),
            name,
            record_type: TXT_RECORD_TYPE,
            content,
            ttl,
        };
        self.mutate(&endpoint, &body).await?;

        tracing::info!("Updated TXT record {} (id {})", name, record_id);
        Ok(())
    }

    async fn delete(&self, credentials: &Credentials, zone: &str, record_id: &str) -> Result<()> {
        let endpoint = format!("/dns/delete/{}/{}", zone, record_id);

        if self.dry_run {
            tracing::info!("[DRY-RUN] Would POST {}", endpoint);
            return Ok(());
        }

        self.mutate(&endpoint, &AuthBody::new(credentials)).await?;

        tracing::info!("Deleted TXT record {} in zone {}", record_id, zone);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "porkbun"
    }
}

/// Factory for creating Porkbun clients
pub struct PorkbunFactory;

impl RecordApiFactory for PorkbunFactory {
    fn create(&self, config: &ClientConfig) -> Result<Box<dyn RecordApi>> {
        if config.dry_run {
            tracing::warn!("Porkbun client running in DRY-RUN mode - no changes will be made");
        }

        Ok(Box::new(PorkbunClient::new(config)?))
    }
}

/// Create the (uninitialized) Porkbun solver
pub fn solver() -> DnsSolver {
    DnsSolver::new(SOLVER_NAME, Box::new(PorkbunFactory))
}

/// Initialize the Porkbun solver and register it with a registry
///
/// # Example
///
/// ```rust,ignore
/// use dns01_core::{MemorySecretStore, SolverRegistry};
/// use dns01_core::traits::SolverContext;
///
/// let registry = SolverRegistry::new("acme.example.com")?;
/// let ctx = SolverContext::new(Arc::new(MemorySecretStore::new()));
/// dns01_provider_porkbun::register(&registry, ctx).await?;
/// ```
pub async fn register(registry: &SolverRegistry, ctx: SolverContext) -> Result<()> {
    let mut solver = solver();
    solver.initialize(ctx).await?;
    registry.register(Arc::new(solver))
}
