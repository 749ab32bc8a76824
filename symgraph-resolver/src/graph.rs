//! The dependency graph among the tasks of one batch.
//!
//! The graph is an explicit adjacency list built once from reference-token scans and discarded
//! after scheduling; tasks themselves stay immutable and carry no back-references. Construction
//! is all-or-nothing: an unknown reference or a cycle aborts the batch with no partial graph.

use crate::error::BatchError;
use crate::refs;
use crate::registry::Registry;

/// The directed dependency graph: an edge from a task to each task it references.
#[derive(Debug)]
pub struct DepGraph {
    /// `dependencies[i]` lists the batch positions task `i` depends on, in reference order.
    dependencies: Vec<Vec<usize>>,
}

impl DepGraph {
    /// The adjacency list, indexed by batch position.
    pub fn dependencies(&self) -> &[Vec<usize>] {
        &self.dependencies
    }
}

/// Scans every task's raw expression and builds the graph, rejecting unknown references and
/// cycles.
pub fn build(registry: &Registry) -> Result<DepGraph, BatchError> {
    let mut dependencies = Vec::with_capacity(registry.len());
    for task in registry.tasks() {
        let mut deps: Vec<usize> = Vec::new();
        for token in refs::scan(&task.expression) {
            match registry.position(&token.id) {
                Some(position) => {
                    if !deps.contains(&position) {
                        deps.push(position);
                    }
                },
                None => {
                    return Err(BatchError::UnknownReference {
                        task_id: task.id.clone(),
                        missing: token.id,
                        span: token.span,
                        src_text: task.expression.clone(),
                    });
                },
            }
        }
        dependencies.push(deps);
    }

    let graph = DepGraph { dependencies };
    check_acyclic(&graph, registry)?;
    Ok(graph)
}

/// Depth-first search for a back edge. On finding one, the current visitation stack yields the
/// cycle path for the diagnostic.
fn check_acyclic(graph: &DepGraph, registry: &Registry) -> Result<(), BatchError> {
    const WHITE: u8 = 0;
    const GRAY: u8 = 1;
    const BLACK: u8 = 2;

    let deps = graph.dependencies();
    let mut color = vec![WHITE; deps.len()];

    for start in 0..deps.len() {
        if color[start] != WHITE {
            continue;
        }

        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        color[start] = GRAY;

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            if cursor < deps[node].len() {
                frame.1 += 1;
                let child = deps[node][cursor];
                match color[child] {
                    WHITE => {
                        color[child] = GRAY;
                        stack.push((child, 0));
                    },
                    GRAY => {
                        // a back edge closes the cycle; report it from its first occurrence
                        let first = stack
                            .iter()
                            .position(|&(visited, _)| visited == child)
                            .unwrap_or(0);
                        let mut path: Vec<String> = stack[first..]
                            .iter()
                            .map(|&(visited, _)| registry.get(visited).id.clone())
                            .collect();
                        path.push(registry.get(child).id.clone());
                        return Err(BatchError::DependencyCycle { path });
                    },
                    _ => {},
                }
            } else {
                color[node] = BLACK;
                stack.pop();
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn registry(tasks: Vec<Task>) -> Registry {
        Registry::new(tasks).unwrap()
    }

    #[test]
    fn no_references_builds_an_empty_graph() {
        let registry = registry(vec![task("1", "x + 1"), task("2", "x + 2")]);
        let graph = build(&registry).unwrap();
        assert_eq!(graph.dependencies(), &[Vec::<usize>::new(), Vec::new()]);
    }

    #[test]
    fn references_become_edges() {
        let registry = registry(vec![
            task("1", "2 + 2"),
            task("2", "[[CAS:1]] * 3"),
            task("3", "[[CAS:1]] + [[CAS:2]]"),
        ]);
        let graph = build(&registry).unwrap();
        assert_eq!(graph.dependencies(), &[vec![], vec![0], vec![0, 1]]);
    }

    #[test]
    fn unknown_references_are_rejected() {
        let registry = registry(vec![task("1", "[[CAS:9]] + 1")]);
        let err = build(&registry).unwrap_err();
        assert!(matches!(
            err,
            BatchError::UnknownReference { task_id, missing, .. }
                if task_id == "1" && missing == "9"
        ));
    }

    #[test]
    fn two_task_cycles_name_both_ids() {
        let registry = registry(vec![task("a", "[[CAS:b]]"), task("b", "[[CAS:a]]")]);
        let err = build(&registry).unwrap_err();
        let BatchError::DependencyCycle { path } = err else {
            panic!("expected a cycle, got {:?}", err);
        };
        assert!(path.contains(&"a".to_string()));
        assert!(path.contains(&"b".to_string()));
        assert_eq!(path.first(), path.last());
    }

    #[test]
    fn self_reference_is_a_cycle_of_length_one() {
        let registry = registry(vec![task("1", "[[CAS:1]] + 1")]);
        let err = build(&registry).unwrap_err();
        assert!(matches!(
            err,
            BatchError::DependencyCycle { path } if path == vec!["1".to_string(), "1".to_string()]
        ));
    }
}
