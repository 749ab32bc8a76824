//! Per-batch configuration, passed explicitly into the resolver entry point.
//!
//! Nothing in the resolver reads ambient or global state: two batches resolved with the same
//! configuration cannot observe each other, and concurrent batches cannot interfere.

use crate::task::Operation;
use std::collections::BTreeSet;
use symgraph_compute::Domain;

/// Configuration for resolving one batch.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// The domain assumed for variables without an explicit assumption.
    pub default_domain: Domain,

    /// The operations tasks are allowed to request. A task requesting anything else aborts the
    /// batch.
    pub enabled_operations: BTreeSet<Operation>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_domain: Domain::Real,
            enabled_operations: [
                Operation::Simplify,
                Operation::Expand,
                Operation::Factor,
                Operation::Evaluate,
                Operation::Solve,
            ]
            .into_iter()
            .collect(),
        }
    }
}

impl ResolverConfig {
    /// Returns true if tasks may request the operation.
    pub fn is_enabled(&self, operation: Operation) -> bool {
        self.enabled_operations.contains(&operation)
    }
}
