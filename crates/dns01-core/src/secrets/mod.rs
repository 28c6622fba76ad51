//! Secret store implementations
//!
//! This module provides concrete implementations of the SecretStore trait.

pub mod dir;
pub mod memory;

pub use dir::DirSecretStore;
pub use memory::MemorySecretStore;
