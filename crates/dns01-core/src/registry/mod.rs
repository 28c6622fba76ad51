//! Solver registry
//!
//! The registry maps solver names to initialized solvers under a single API
//! group, the way the host framework routes challenge requests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dns01_core::registry::SolverRegistry;
//!
//! // The group name is a startup parameter, never read from globals
//! let registry = SolverRegistry::new("acme.example.com")?;
//!
//! // Register an initialized solver
//! registry.register(Arc::new(solver));
//!
//! // Route a request
//! let solver = registry.route("acme.example.com", "porkbun")?;
//! solver.present(&request).await?;
//! ```

use crate::error::{Error, Result};
use crate::traits::Solver;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Routes `(group, name)` pairs to solvers
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
pub struct SolverRegistry {
    /// API group this registry serves
    group_name: String,

    /// Registered solvers keyed by `Solver::name()`
    solvers: RwLock<HashMap<String, Arc<dyn Solver>>>,
}

impl SolverRegistry {
    /// Create an empty registry for a group
    ///
    /// # Returns
    ///
    /// - `Err(Error::Config)` if the group name is empty
    pub fn new(group_name: impl Into<String>) -> Result<Self> {
        let group_name = group_name.into();
        if group_name.is_empty() {
            return Err(Error::config("group name must be specified"));
        }

        Ok(Self {
            group_name,
            solvers: RwLock::new(HashMap::new()),
        })
    }

    /// The group this registry serves
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Register a solver under its own name
    ///
    /// A solver registered under an existing name replaces the previous one.
    pub fn register(&self, solver: Arc<dyn Solver>) -> Result<()> {
        let mut solvers = self
            .solvers
            .write()
            .map_err(|_| Error::Other("solver registry lock poisoned".to_string()))?;
        solvers.insert(solver.name().to_string(), solver);
        Ok(())
    }

    /// Find the solver for a request
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn Solver>)`: The registered solver
    /// - `Err(Error::Config)`: Wrong group or unknown solver name
    pub fn route(&self, group: &str, name: &str) -> Result<Arc<dyn Solver>> {
        if group != self.group_name {
            return Err(Error::config(format!(
                "Unknown group {} (serving {})",
                group, self.group_name
            )));
        }

        let solvers = self
            .solvers
            .read()
            .map_err(|_| Error::Other("solver registry lock poisoned".to_string()))?;

        solvers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown solver: {}", name)))
    }

    /// List all registered solver names
    pub fn list_solvers(&self) -> Vec<String> {
        self.solvers
            .read()
            .map(|solvers| solvers.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Check if a solver name is registered
    pub fn has_solver(&self, name: &str) -> bool {
        self.solvers
            .read()
            .map(|solvers| solvers.contains_key(name))
            .unwrap_or(false)
    }
}
