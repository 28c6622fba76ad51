//! Test doubles and common utilities for solver contract tests
//!
//! This module provides an in-memory provider that behaves like a real
//! record store, so contract tests can assert on provider-visible state.

#![allow(dead_code)]

use dns01_core::config::ClientConfig;
use dns01_core::error::{Error, Result};
use dns01_core::traits::{DnsRecord, RecordApi, RecordApiFactory, Solver, SolverContext};
use dns01_core::{ChallengeRequest, Credentials, DnsSolver, MemorySecretStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A mutation the provider received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Create {
        zone: String,
        name: String,
        content: String,
        ttl: String,
    },
    Update {
        zone: String,
        record_id: String,
        name: String,
        content: String,
        ttl: String,
    },
    Delete {
        zone: String,
        record_id: String,
    },
}

/// How the fake provider filters search results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Name and content must match (production behavior)
    Strict,
    /// Name alone must match
    NameOnly,
}

#[derive(Debug)]
struct ProviderState {
    records: Vec<DnsRecord>,
    calls: Vec<ProviderCall>,
    next_id: u64,
    reject_mutations: bool,
}

/// In-memory provider record store
///
/// Clones share state, so a clone handed to the solver can be inspected
/// from the test.
#[derive(Debug, Clone)]
pub struct FakeProvider {
    state: Arc<Mutex<ProviderState>>,
    search_count: Arc<AtomicUsize>,
    mode: SearchMode,
    credentials: Credentials,
}

impl FakeProvider {
    /// Create an empty provider accepting the given credentials
    pub fn new(credentials: Credentials) -> Self {
        Self {
            state: Arc::new(Mutex::new(ProviderState {
                records: Vec::new(),
                calls: Vec::new(),
                next_id: 1,
                reject_mutations: false,
            })),
            search_count: Arc::new(AtomicUsize::new(0)),
            mode: SearchMode::Strict,
            credentials,
        }
    }

    /// Switch the search filter (shares state with `self`)
    pub fn with_search_mode(&self, mode: SearchMode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }

    /// Seed a record (FQDN name, no trailing dot)
    pub fn seed(&self, id: &str, fqdn: &str, content: &str) {
        self.state
            .lock()
            .unwrap()
            .records
            .push(DnsRecord::txt(id, fqdn, content));
    }

    /// Make every create/update/delete fail with HTTP 400
    pub fn reject_mutations(&self) {
        self.state.lock().unwrap().reject_mutations = true;
    }

    /// Current records at the provider
    pub fn records(&self) -> Vec<DnsRecord> {
        self.state.lock().unwrap().records.clone()
    }

    /// Mutations received so far
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of search calls received so far
    pub fn search_count(&self) -> usize {
        self.search_count.load(Ordering::SeqCst)
    }

    /// Total number of API calls received so far
    pub fn api_call_count(&self) -> usize {
        self.search_count() + self.calls().len()
    }

    fn authorize(&self, credentials: &Credentials, endpoint: &str) -> Result<()> {
        if credentials != &self.credentials {
            return Err(Error::rejected(
                endpoint,
                400,
                r#"{"status":"ERROR","message":"Invalid API key."}"#,
            ));
        }
        Ok(())
    }

    fn check_mutation(&self, endpoint: &str) -> Result<()> {
        if self.state.lock().unwrap().reject_mutations {
            return Err(Error::rejected(
                endpoint,
                400,
                r#"{"status":"ERROR","message":"Edit error: We were unable to edit the DNS record."}"#,
            ));
        }
        Ok(())
    }
}

fn fqdn_of(name: &str, zone: &str) -> String {
    if name.is_empty() {
        zone.to_string()
    } else {
        format!("{}.{}", name, zone)
    }
}

#[async_trait::async_trait]
impl RecordApi for FakeProvider {
    async fn search(
        &self,
        credentials: &Credentials,
        _zone: &str,
        fqdn: &str,
        content: &str,
    ) -> Result<Option<DnsRecord>> {
        self.search_count.fetch_add(1, Ordering::SeqCst);
        self.authorize(credentials, "retrieve")?;

        let state = self.state.lock().unwrap();
        let found = state.records.iter().find(|r| match self.mode {
            SearchMode::Strict => r.matches(fqdn, content),
            SearchMode::NameOnly => r.name == fqdn,
        });
        Ok(found.cloned())
    }

    async fn create(
        &self,
        credentials: &Credentials,
        zone: &str,
        name: &str,
        content: &str,
        ttl: &str,
    ) -> Result<()> {
        self.authorize(credentials, "create")?;
        self.check_mutation("create")?;

        let mut state = self.state.lock().unwrap();
        let id = state.next_id.to_string();
        state.next_id += 1;
        state.records.push(DnsRecord::txt(id, fqdn_of(name, zone), content));
        state.calls.push(ProviderCall::Create {
            zone: zone.to_string(),
            name: name.to_string(),
            content: content.to_string(),
            ttl: ttl.to_string(),
        });
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
        self.authorize(credentials, "edit")?;
        self.check_mutation("edit")?;

        let mut state = self.state.lock().unwrap();
        if let Some(record) = state.records.iter_mut().find(|r| r.id == record_id) {
            record.name = fqdn_of(name, zone);
            record.content = content.to_string();
        }
        state.calls.push(ProviderCall::Update {
            zone: zone.to_string(),
            record_id: record_id.to_string(),
            name: name.to_string(),
            content: content.to_string(),
            ttl: ttl.to_string(),
        });
        Ok(())
    }

    async fn delete(&self, credentials: &Credentials, zone: &str, record_id: &str) -> Result<()> {
        self.authorize(credentials, "delete")?;
        self.check_mutation("delete")?;

        let mut state = self.state.lock().unwrap();
        state.records.retain(|r| r.id != record_id);
        state.calls.push(ProviderCall::Delete {
            zone: zone.to_string(),
            record_id: record_id.to_string(),
        });
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// Factory handing out clones of one FakeProvider
pub struct FakeProviderFactory {
    provider: FakeProvider,
}

impl FakeProviderFactory {
    pub fn new(provider: &FakeProvider) -> Self {
        Self {
            provider: provider.clone(),
        }
    }
}

impl RecordApiFactory for FakeProviderFactory {
    fn create(&self, _config: &ClientConfig) -> Result<Box<dyn RecordApi>> {
        Ok(Box::new(self.provider.clone()))
    }
}

/// Credentials the fake provider accepts
pub fn valid_credentials() -> Credentials {
    Credentials::new("pk1_test", "sk1_test")
}

/// Solver config carrying the valid credentials inline
pub fn inline_config() -> serde_json::Value {
    serde_json::json!({
        "apiKey": "pk1_test",
        "apiSecretKey": "sk1_test"
    })
}

/// Challenge for `_acme-challenge.example.com.` with the given token
pub fn challenge(token: &str) -> ChallengeRequest {
    ChallengeRequest::new(
        "_acme-challenge.example.com.",
        "example.com.",
        token,
        "cert-manager",
    )
    .with_config(inline_config())
}

/// Build and initialize a solver over the given provider and secret store
pub async fn initialized_solver(provider: &FakeProvider, store: &MemorySecretStore) -> DnsSolver {
    let mut solver = DnsSolver::new("fake", Box::new(FakeProviderFactory::new(provider)));
    solver
        .initialize(SolverContext::new(Arc::new(store.clone())))
        .await
        .expect("initialize succeeds");
    solver
}
