//! The scheduler: a stable topological order over the dependency graph.

use crate::graph::DepGraph;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Computes one linear execution order in which every task appears after all tasks it depends
/// on. Ties among ready tasks go to the lowest batch position, so the order (and with it every
/// downstream artifact) is reproducible across runs.
///
/// The graph has already been checked for cycles, so the order always covers every task.
pub fn order(graph: &DepGraph) -> Vec<usize> {
    let deps = graph.dependencies();
    let count = deps.len();

    let mut indegree: Vec<usize> = deps.iter().map(|d| d.len()).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (task, task_deps) in deps.iter().enumerate() {
        for &dep in task_deps {
            dependents[dep].push(task);
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = indegree
        .iter()
        .enumerate()
        .filter(|(_, &degree)| degree == 0)
        .map(|(task, _)| Reverse(task))
        .collect();

    let mut out = Vec::with_capacity(count);
    while let Some(Reverse(task)) = ready.pop() {
        out.push(task);
        for &dependent in &dependents[task] {
            indegree[dependent] -= 1;
            if indegree[dependent] == 0 {
                ready.push(Reverse(dependent));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph;
    use crate::registry::Registry;
    use crate::task::{Operation, Task};
    use std::collections::BTreeMap;

    fn task(id: &str, expression: &str) -> Task {
        Task {
            id: id.to_string(),
            operation: Operation::Simplify,
            expression: expression.to_string(),
            variables: Vec::new(),
            assumptions: BTreeMap::new(),
            constraints: Vec::new(),
        }
    }

    fn ordered(tasks: Vec<Task>) -> Vec<usize> {
        let registry = Registry::new(tasks).unwrap();
        order(&graph::build(&registry).unwrap())
    }

    #[test]
    fn dependencies_come_first() {
        // task 0 depends on task 2; 2 must precede 0
        let order = ordered(vec![
            task("a", "[[CAS:c]] + 1"),
            task("b", "2"),
            task("c", "3"),
        ]);
        let pos = |i: usize| order.iter().position(|&x| x == i).unwrap();
        assert!(pos(2) < pos(0));
    }

    #[test]
    fn independent_tasks_keep_batch_order() {
        let order = ordered(vec![task("x", "1"), task("y", "2"), task("z", "3")]);
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn chain() {
        let order = ordered(vec![
            task("1", "[[CAS:2]]"),
            task("2", "[[CAS:3]]"),
            task("3", "5"),
        ]);
        assert_eq!(order, vec![2, 1, 0]);
    }
}
