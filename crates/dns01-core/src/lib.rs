// # dns01-core
//
// Core library for solving ACME DNS-01 challenges against a DNS provider's
// record API.
//
// ## Architecture Overview
//
// This library provides the reconciliation logic for challenge TXT records:
// - **RecordApi**: Trait for searching and mutating records via a provider API
// - **SecretStore**: Trait for looking up credential secrets
// - **Solver**: The capability surface a host framework invokes
// - **DnsSolver**: Reconciler implementing present / clean_up
// - **SolverRegistry**: Routes `(group, name)` to solvers
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Reconciliation is separate from provider HTTP details
// 2. **Stateless**: Every call re-derives its decision from the provider
// 3. **Content Isolation**: Only the record matching both name and token is touched
// 4. **Library-First**: The host harness is a thin layer over this crate
// 5. **Idempotency**: present and clean_up can be retried safely

pub mod challenge;
pub mod config;
pub mod credentials;
pub mod error;
pub mod registry;
pub mod secrets;
pub mod solver;
pub mod traits;

// Re-export core types for convenience
pub use challenge::{ChallengeRequest, record_short_name};
pub use config::{ClientConfig, ProviderConfig, SecretReference};
pub use credentials::{CredentialResolver, Credentials};
pub use error::{Error, Result};
pub use registry::SolverRegistry;
pub use secrets::{DirSecretStore, MemorySecretStore};
pub use solver::{DnsSolver, ReconcileOutcome};
pub use traits::{DnsRecord, RecordApi, RecordApiFactory, SecretStore, Solver, SolverContext};
