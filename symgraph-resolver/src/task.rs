//! The task and result records exchanged with the owning pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The closed set of operations a task may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Simplify,
    Expand,
    Factor,
    Evaluate,
    Solve,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Simplify => write!(f, "simplify"),
            Operation::Expand => write!(f, "expand"),
            Operation::Factor => write!(f, "factor"),
            Operation::Evaluate => write!(f, "evaluate"),
            Operation::Solve => write!(f, "solve"),
        }
    }
}

/// One requested computation. Tasks are created once per batch and never mutated; the resolver
/// retires them into [`TaskResult`]s.
///
/// The serde aliases accept the field names used by the expression-producing collaborator
/// (`task` for the operation, `target_expr` for the expression).
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    /// Unique within the batch; doubles as the cross-reference key and the placeholder name.
    pub id: String,

    /// What to do with the expression.
    #[serde(alias = "task")]
    pub operation: Operation,

    /// The raw expression, possibly containing `[[CAS:<id>]]` reference tokens and notation
    /// that the normalizer folds away.
    #[serde(alias = "target_expr")]
    pub expression: String,

    /// Symbol names relevant to the expression. `solve` requires exactly one; advisory
    /// elsewhere.
    #[serde(default)]
    pub variables: Vec<String>,

    /// Domain restrictions per variable; unrestricted by default.
    #[serde(default)]
    pub assumptions: BTreeMap<String, String>,

    /// Auxiliary conditions attached to `solve` tasks.
    #[serde(default)]
    pub constraints: Vec<String>,
}

/// The outcome of one task. Immutable once produced; written to the result store exactly once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskResult {
    /// Matches the originating task.
    pub id: String,

    /// The human-facing LaTeX rendering of the computed value.
    pub typeset_form: String,

    /// The machine-parsable form, suitable for substitution into dependent expressions.
    pub canonical_form: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_collaborator_field_names() {
        let json = r#"{
            "id": "S1",
            "task": "solve",
            "target_expr": "x^2 - 4",
            "variables": ["x"]
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, "S1");
        assert_eq!(task.operation, Operation::Solve);
        assert_eq!(task.expression, "x^2 - 4");
        assert_eq!(task.variables, vec!["x".to_string()]);
        assert!(task.assumptions.is_empty());
        assert!(task.constraints.is_empty());
    }

    #[test]
    fn unknown_operations_are_rejected() {
        let json = r#"{"id": "1", "operation": "integrate", "expression": "x"}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }
}
