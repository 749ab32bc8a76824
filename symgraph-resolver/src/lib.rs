//! Resolution of batches of symbolic computation tasks.
//!
//! A batch is an ordered list of [`Task`]s whose expressions may reference each other's results
//! through `[[CAS:<id>]]` tokens. Resolution runs in fixed stages:
//!
//! 1. the [`registry`] takes ownership of the batch and enforces id uniqueness;
//! 2. the [`graph`] builder scans the raw expressions and rejects unknown references and
//!    cycles (a self-reference is a cycle of length one);
//! 3. the [`schedule`]r derives a stable topological order, breaking ties by batch position;
//! 4. each task in order has its reference tokens replaced by the canonical forms of prior
//!    results, is normalized and parsed, and runs through the safe evaluation passes of
//!    `symgraph-compute`;
//! 5. results land in the [`store`], exactly once each, and the [`template`] engine substitutes
//!    typeset forms into the caller's text artifact.
//!
//! The first failure aborts the whole batch: no partial result set, no partially substituted
//! template. A failed batch leaves no state behind; every batch gets its own registry, graph and
//! store, so resolution is stateless across batches.

pub mod config;
pub mod error;
mod evaluator;
pub mod graph;
pub mod refs;
pub mod registry;
pub mod schedule;
pub mod store;
pub mod task;
pub mod template;

pub use config::ResolverConfig;
pub use error::BatchError;
pub use task::{Operation, Task, TaskResult};

use registry::Registry;
use store::ResultStore;
use tracing::debug;

/// One row of the human-readable batch summary.
#[derive(Debug, Clone)]
struct SummaryRow {
    id: String,
    operation: Operation,
    expression: String,
}

/// The completed resolution of one batch.
#[derive(Debug)]
pub struct Resolution {
    store: ResultStore,
    rows: Vec<SummaryRow>,
}

impl Resolution {
    /// All results, in execution order.
    pub fn results(&self) -> &[TaskResult] {
        self.store.results()
    }

    /// The result for a task id.
    pub fn get(&self, id: &str) -> Option<&TaskResult> {
        self.store.get(id)
    }

    /// Substitutes every placeholder in the template with the corresponding typeset form, or
    /// fails atomically.
    pub fn fill_template(&self, template: &str) -> Result<String, BatchError> {
        template::fill(template, &self.store)
    }

    /// A human-readable summary: one line per task with its id, operation, original expression
    /// and typeset result.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            let typeset = self
                .store
                .get(&row.id)
                .map(|result| result.typeset_form.as_str())
                .unwrap_or_default();
            out.push_str(&format!(
                "{}  {}  {}  =>  {}\n",
                row.id, row.operation, row.expression, typeset
            ));
        }
        out
    }
}

/// Resolves one batch under the given configuration.
///
/// An empty batch is valid and produces an empty result set.
pub fn resolve_batch(tasks: Vec<Task>, config: &ResolverConfig) -> Result<Resolution, BatchError> {
    debug!(tasks = tasks.len(), "resolving batch");

    let registry = Registry::new(tasks)?;
    let graph = graph::build(&registry)?;
    let order = schedule::order(&graph);

    let mut store = ResultStore::default();
    let mut rows = Vec::with_capacity(order.len());
    for position in order {
        let task = registry.get(position);
        debug!(id = %task.id, operation = %task.operation, "evaluating task");

        let result = evaluator::execute(task, &store, config)?;
        rows.push(SummaryRow {
            id: task.id.clone(),
            operation: task.operation,
            expression: task.expression.clone(),
        });
        store.insert(result);
    }

    debug!(results = store.len(), "batch resolved");
    Ok(Resolution { store, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn task(id: &str, operation: Operation, expression: &str) -> Task {
        Task {
            id: id.to_string(),
            operation,
            expression: expression.to_string(),
            variables: Vec::new(),
            assumptions: BTreeMap::new(),
            constraints: Vec::new(),
        }
    }

    fn solve_task(id: &str, expression: &str, variables: &[&str]) -> Task {
        Task {
            variables: variables.iter().map(|v| v.to_string()).collect(),
            ..task(id, Operation::Solve, expression)
        }
    }

    fn resolve(tasks: Vec<Task>) -> Result<Resolution, BatchError> {
        resolve_batch(tasks, &ResolverConfig::default())
    }

    #[test]
    fn empty_batch_is_valid() {
        let resolution = resolve(Vec::new()).unwrap();
        assert!(resolution.results().is_empty());
    }

    #[test]
    fn simplify_leaves_expanded_polynomials_alone() {
        let resolution = resolve(vec![task("1", Operation::Simplify, "x^2+2x+1")]).unwrap();
        assert_eq!(resolution.get("1").unwrap().canonical_form, "x**2 + 2*x + 1");
    }

    #[test]
    fn factor_scenario() {
        let resolution = resolve(vec![task("1", Operation::Factor, "x^2+2x+1")]).unwrap();
        assert_eq!(resolution.get("1").unwrap().canonical_form, "(x + 1)**2");
        assert_eq!(
            resolution.get("1").unwrap().typeset_form,
            "\\left(x + 1\\right)^{2}"
        );
    }

    #[test]
    fn solve_scenario() {
        let resolution = resolve(vec![solve_task("1", "x^2-4", &["x"])]).unwrap();
        assert_eq!(resolution.get("1").unwrap().canonical_form, "{-2, 2}");
        assert_eq!(
            resolution.get("1").unwrap().typeset_form,
            "\\left\\{-2, 2\\right\\}"
        );
    }

    #[test]
    fn chained_tasks_resolve_in_dependency_order() {
        let resolution = resolve(vec![
            task("1", Operation::Simplify, "2+2"),
            task("2", Operation::Evaluate, "[[CAS:1]]*3"),
        ])
        .unwrap();
        assert_eq!(resolution.get("1").unwrap().canonical_form, "4");
        assert_eq!(resolution.get("2").unwrap().canonical_form, "12");
    }

    #[test]
    fn chains_work_regardless_of_batch_order() {
        let resolution = resolve(vec![
            task("2", Operation::Evaluate, "[[CAS:1]]*3"),
            task("1", Operation::Simplify, "2+2"),
        ])
        .unwrap();
        assert_eq!(resolution.get("2").unwrap().canonical_form, "12");
        // results are stored in execution order, dependencies first
        assert_eq!(resolution.results()[0].id, "1");
    }

    #[test]
    fn template_scenario() {
        let resolution = resolve(vec![task("1", Operation::Evaluate, "2+2")]).unwrap();
        assert_eq!(
            resolution.fill_template("Answer: [[CAS:1]]").unwrap(),
            "Answer: 4"
        );
    }

    #[test]
    fn determinism_across_runs() {
        let batch = || {
            vec![
                task("1", Operation::Factor, "x^2+2x+1"),
                solve_task("2", "x^2-4", &["x"]),
                task("3", Operation::Evaluate, "sin(pi/2) + 2"),
            ]
        };
        let first = resolve(batch()).unwrap();
        let second = resolve(batch()).unwrap();
        assert_eq!(first.results(), second.results());
        assert_eq!(
            first.fill_template("[[CAS:1]] [[CAS:2]] [[CAS:3]]").unwrap(),
            second.fill_template("[[CAS:1]] [[CAS:2]] [[CAS:3]]").unwrap()
        );
    }

    #[test]
    fn cycles_abort_the_batch() {
        let err = resolve(vec![
            task("1", Operation::Simplify, "[[CAS:2]]"),
            task("2", Operation::Simplify, "[[CAS:1]]"),
        ])
        .unwrap_err();
        assert!(matches!(err, BatchError::DependencyCycle { .. }));
    }

    #[test]
    fn unknown_references_abort_the_batch() {
        let err = resolve(vec![task("1", Operation::Simplify, "[[CAS:9]]")]).unwrap_err();
        assert!(matches!(err, BatchError::UnknownReference { .. }));
    }

    #[test]
    fn disallowed_constructs_abort_the_batch() {
        let err = resolve(vec![task("1", Operation::Simplify, "__import__(1)")]).unwrap_err();
        assert!(matches!(err, BatchError::Task { .. }));

        let err = resolve(vec![task("1", Operation::Evaluate, "mystery(4)")]).unwrap_err();
        assert!(matches!(err, BatchError::Task { .. }));
    }

    #[test]
    fn disabled_operations_abort_the_batch() {
        let mut config = ResolverConfig::default();
        config.enabled_operations.remove(&Operation::Solve);
        let err = resolve_batch(vec![solve_task("1", "x^2-4", &["x"])], &config).unwrap_err();
        assert!(matches!(err, BatchError::DisallowedOperation { .. }));
    }

    #[test]
    fn solve_requires_one_variable() {
        let err = resolve(vec![solve_task("1", "x^2-4", &[])]).unwrap_err();
        assert!(matches!(err, BatchError::SolveUnknowns { given: 0, .. }));
    }

    #[test]
    fn assumptions_filter_solutions() {
        let mut task = solve_task("1", "x^2-4", &["x"]);
        task.assumptions
            .insert("x".to_string(), "positive".to_string());
        let resolution = resolve(vec![task]).unwrap();
        assert_eq!(resolution.get("1").unwrap().canonical_form, "{2}");
    }

    #[test]
    fn invalid_assumptions_abort_the_batch() {
        let mut bad = solve_task("1", "x^2-4", &["x"]);
        bad.assumptions
            .insert("x".to_string(), "quaternion".to_string());
        let err = resolve(vec![bad]).unwrap_err();
        assert!(matches!(err, BatchError::InvalidDomain { .. }));

        // the keyword is checked even when the operation ignores assumptions
        let mut bad = task("1", Operation::Simplify, "x + 1");
        bad.assumptions
            .insert("x".to_string(), "quaternion".to_string());
        let err = resolve(vec![bad]).unwrap_err();
        assert!(matches!(err, BatchError::InvalidDomain { .. }));
    }

    #[test]
    fn constraints_filter_solutions() {
        let mut task = solve_task("1", "x^2-4", &["x"]);
        task.constraints.push("x > 0".to_string());
        let resolution = resolve(vec![task]).unwrap();
        assert_eq!(resolution.get("1").unwrap().canonical_form, "{2}");
    }

    #[test]
    fn equations_with_two_sides() {
        let resolution = resolve(vec![solve_task("1", "x^2 = 4", &["x"])]).unwrap();
        assert_eq!(resolution.get("1").unwrap().canonical_form, "{-2, 2}");
    }

    #[test]
    fn latex_input_is_normalized() {
        let resolution = resolve(vec![task(
            "1",
            Operation::Evaluate,
            r"\frac{1}{2} + \frac{1}{2}",
        )])
        .unwrap();
        assert_eq!(resolution.get("1").unwrap().canonical_form, "1");
    }

    #[test]
    fn summary_lists_every_task() {
        let resolution = resolve(vec![
            task("1", Operation::Simplify, "2+2"),
            task("2", Operation::Evaluate, "[[CAS:1]]*3"),
        ])
        .unwrap();
        let summary = resolution.summary();
        assert!(summary.contains("1  simplify  2+2  =>  4"));
        assert!(summary.contains("2  evaluate  [[CAS:1]]*3  =>  12"));
    }
}
