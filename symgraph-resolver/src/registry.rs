//! The task registry: the unresolved batch, held immutably.

use crate::error::BatchError;
use crate::task::Task;
use std::collections::HashMap;

/// Holds one batch of tasks. Ids are unique; tasks are never mutated after construction.
#[derive(Debug)]
pub struct Registry {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Creates a registry, enforcing id uniqueness.
    pub fn new(tasks: Vec<Task>) -> Result<Registry, BatchError> {
        let mut index = HashMap::with_capacity(tasks.len());
        for (position, task) in tasks.iter().enumerate() {
            if index.insert(task.id.clone(), position).is_some() {
                return Err(BatchError::DuplicateTaskId { id: task.id.clone() });
            }
        }
        Ok(Registry { tasks, index })
    }

    /// The number of tasks in the batch.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True for a batch with no tasks, which is valid and resolves to an empty result set.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The task at the given batch position.
    pub fn get(&self, position: usize) -> &Task {
        &self.tasks[position]
    }

    /// The batch position of the task with the given id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// All tasks in batch order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Operation;
    use std::collections::BTreeMap;

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            operation: Operation::Simplify,
            expression: "x".to_string(),
            variables: Vec::new(),
            assumptions: BTreeMap::new(),
            constraints: Vec::new(),
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Registry::new(vec![task("1"), task("1")]).unwrap_err();
        assert!(matches!(err, BatchError::DuplicateTaskId { id } if id == "1"));
    }

    #[test]
    fn lookup_by_id() {
        let registry = Registry::new(vec![task("a"), task("b")]).unwrap();
        assert_eq!(registry.position("b"), Some(1));
        assert_eq!(registry.position("c"), None);
        assert_eq!(registry.get(0).id, "a");
    }
}
