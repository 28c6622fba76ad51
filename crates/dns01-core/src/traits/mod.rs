//! Core traits for the DNS-01 solver
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`RecordApi`]: Search and mutate TXT records via a provider API
//! - [`SecretStore`]: Look up credential secrets by namespace and name
//! - [`Solver`]: The capability surface the host invokes

pub mod record_api;
pub mod secret_store;
pub mod solver;

pub use record_api::{DnsRecord, RecordApi, RecordApiFactory, CHALLENGE_TTL, TXT_RECORD_TYPE};
pub use secret_store::{SecretData, SecretStore};
pub use solver::{Solver, SolverContext};
