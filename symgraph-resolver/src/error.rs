//! Batch-level errors.
//!
//! Every variant aborts the whole batch: there is no partial-success mode, because a
//! half-resolved graph or a half-substituted template is unsafe to hand downstream. Each variant
//! carries enough context (task id, offending span, cycle path) for the caller to log and halt.

use crate::task::Operation;
use std::ops::Range;
use symgraph_error::Error;
use thiserror::Error as ThisError;

/// An error that aborted resolution of a batch.
#[derive(Debug, ThisError)]
pub enum BatchError {
    /// Two tasks in the batch share an id.
    #[error("duplicate task id `{id}`")]
    DuplicateTaskId {
        /// The id that appears more than once.
        id: String,
    },

    /// A task's expression references an id that is not in the batch.
    #[error("task `{task_id}` references unknown task `{missing}`")]
    UnknownReference {
        /// The task whose expression contains the bad token.
        task_id: String,
        /// The id the token names.
        missing: String,
        /// Where the token sits in the raw expression.
        span: Range<usize>,
        /// The raw expression the span refers to.
        src_text: String,
    },

    /// The reference tokens form a cycle. A self-reference is a cycle of length one.
    #[error("dependency cycle: {}", .path.join(" -> "))]
    DependencyCycle {
        /// The ids along the cycle, with the starting id repeated at the end.
        path: Vec<String>,
    },

    /// The template references an id that produced no result.
    #[error("template references task `{id}`, which produced no result")]
    UnresolvedPlaceholder {
        /// The id the template token names.
        id: String,
        /// Where the token sits in the template.
        span: Range<usize>,
        /// The template text the span refers to.
        src_text: String,
    },

    /// A task requested an operation the configuration does not enable.
    #[error("operation `{operation}` is disabled by configuration (task `{task_id}`)")]
    DisallowedOperation {
        /// The requesting task.
        task_id: String,
        /// The requested operation.
        operation: Operation,
    },

    /// An assumption names a domain the resolver does not know.
    #[error("unknown domain `{domain}` for variable `{var}` in task `{task_id}`")]
    InvalidDomain {
        /// The task carrying the assumption.
        task_id: String,
        /// The variable the assumption is for.
        var: String,
        /// The unrecognized domain keyword.
        domain: String,
    },

    /// A `solve` task did not declare exactly one variable.
    #[error("task `{task_id}` must declare exactly one variable to solve for, found {given}")]
    SolveUnknowns {
        /// The solve task.
        task_id: String,
        /// How many variables it declared.
        given: usize,
    },

    /// An expression-level failure: the expression is malformed, uses a disallowed construct,
    /// or does not evaluate.
    #[error("task `{task_id}`: the expression could not be processed")]
    Task {
        /// The failing task.
        task_id: String,
        /// The text (normalized expression or constraint) the error spans refer to.
        src_text: String,
        /// The underlying error, with spans into `src_text`.
        error: Error,
    },
}

impl BatchError {
    /// Prints a diagnostic for this error to stderr, with source highlighting where spans are
    /// available.
    pub fn report_to_stderr(&self) {
        match self {
            BatchError::Task { task_id, src_text, error } => {
                error.report_to_stderr(task_id, src_text);
            },
            BatchError::UnknownReference { task_id, missing, span, src_text } => {
                let error = Error::new(
                    vec![span.clone()],
                    kind::UnknownTask { missing: missing.clone() },
                );
                error.report_to_stderr(task_id, src_text);
            },
            BatchError::UnresolvedPlaceholder { id, span, src_text } => {
                let error = Error::new(vec![span.clone()], kind::MissingResult { id: id.clone() });
                error.report_to_stderr("template", src_text);
            },
            other => eprintln!("error: {}", other),
        }
    }
}

/// Span-carrying kinds for the reference errors, so they render like every other diagnostic.
mod kind {
    use symgraph_attrs::ErrorKind;
    use symgraph_error::ErrorKind;

    /// A reference token names a task that is not in the batch.
    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        message = format!("no task in this batch has the id `{}`", self.missing),
        labels = ["this reference".to_string()],
        help = "an expression may reference only ids present in the same batch".to_string(),
    )]
    pub struct UnknownTask {
        /// The id the token names.
        pub missing: String,
    }

    /// A template token names a task that produced no result.
    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        message = format!("no result exists for the id `{}`", self.id),
        labels = ["this placeholder".to_string()],
        help = "every placeholder in the template must name a task of the batch".to_string(),
    )]
    pub struct MissingResult {
        /// The id the token names.
        pub id: String,
    }
}
