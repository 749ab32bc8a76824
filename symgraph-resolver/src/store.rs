//! The result store: the id → result mapping produced during execution.

use crate::task::TaskResult;
use std::collections::HashMap;

/// Results in execution order, with lookup by id. Each result is written exactly once (the
/// scheduler guarantees a task runs once, and the store enforces it) and is immutable
/// afterwards. A store belongs to exactly one batch resolution.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: Vec<TaskResult>,
    index: HashMap<String, usize>,
}

impl ResultStore {
    /// Writes a result. A second write for the same id is a scheduler bug, not an input error.
    pub fn insert(&mut self, result: TaskResult) {
        let previous = self.index.insert(result.id.clone(), self.results.len());
        assert!(previous.is_none(), "result `{}` written twice", result.id);
        self.results.push(result);
    }

    /// Looks up the result for a task id.
    pub fn get(&self, id: &str) -> Option<&TaskResult> {
        self.index.get(id).map(|&position| &self.results[position])
    }

    /// All results, in execution order.
    pub fn results(&self) -> &[TaskResult] {
        &self.results
    }

    /// The number of results written so far.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True when no results have been written.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
