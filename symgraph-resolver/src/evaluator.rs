//! Execution of one task: reference substitution, normalization, parsing, and dispatch to the
//! safe evaluation passes.

use crate::config::ResolverConfig;
use crate::error::BatchError;
use crate::refs;
use crate::store::ResultStore;
use crate::task::{Operation, Task, TaskResult};
use std::collections::BTreeMap;
use symgraph_compute::{
    canonical, evaluate, expand, factor, filter_solutions, simplify, solve, Domain, Latex,
    Relation, SymExpr,
};
use symgraph_error::Error;
use symgraph_parser::normalize::Normalizer;
use symgraph_parser::parser::ast;
use symgraph_parser::parser::op::BinOpKind;
use symgraph_parser::parser::Parser;

/// Runs one task against the results accumulated so far. The scheduler guarantees that every
/// reference the expression contains is already in the store.
pub(crate) fn execute(
    task: &Task,
    store: &ResultStore,
    config: &ResolverConfig,
) -> Result<TaskResult, BatchError> {
    if !config.is_enabled(task.operation) {
        return Err(BatchError::DisallowedOperation {
            task_id: task.id.clone(),
            operation: task.operation,
        });
    }
    let domains = parse_assumptions(task)?;

    // prior results flow in as parenthesized canonical forms, then the whole expression is
    // normalized and parsed
    let substituted = refs::substitute(&task.expression, |id| {
        store.get(id).map(|result| result.canonical_form.clone())
    });
    let normalizer = Normalizer::new();
    let normalized = normalizer.normalize(&substituted);

    let ast = Parser::new(&normalized)
        .try_parse_full()
        .map_err(|error| task_error(task, &normalized, error))?;

    let (canonical_form, typeset_form) = match task.operation {
        Operation::Simplify => rewrite(&ast, simplify).map_err(|e| task_error(task, &normalized, e))?,
        Operation::Expand => rewrite(&ast, expand).map_err(|e| task_error(task, &normalized, e))?,
        Operation::Factor => rewrite(&ast, factor).map_err(|e| task_error(task, &normalized, e))?,
        Operation::Evaluate => {
            let expr = SymExpr::from_ast(&ast).map_err(|e| task_error(task, &normalized, e))?;
            let value = evaluate(&expr, 0..normalized.len())
                .map_err(|e| task_error(task, &normalized, e))?;
            let result = value.into_expr();
            (canonical(&result), result.as_display().to_string())
        },
        Operation::Solve => solve_task(task, &ast, &normalized, &normalizer, &domains, config)?,
    };

    Ok(TaskResult {
        id: task.id.clone(),
        typeset_form,
        canonical_form,
    })
}

fn task_error(task: &Task, source: &str, error: Error) -> BatchError {
    BatchError::Task {
        task_id: task.id.clone(),
        src_text: source.to_string(),
        error,
    }
}

/// Validates the task's assumptions. An unknown domain keyword is a batch error no matter which
/// operation the task requests; the parsed domains only influence `solve`.
fn parse_assumptions(task: &Task) -> Result<BTreeMap<&str, Domain>, BatchError> {
    let mut domains = BTreeMap::new();
    for (name, keyword) in &task.assumptions {
        let parsed: Domain = keyword.parse().map_err(|_| BatchError::InvalidDomain {
            task_id: task.id.clone(),
            var: name.clone(),
            domain: keyword.clone(),
        })?;
        domains.insert(name.as_str(), parsed);
    }
    Ok(domains)
}

/// The pure rewriting operations share one shape: convert, apply, render both forms.
fn rewrite(ast: &ast::Expr, pass: fn(&SymExpr) -> SymExpr) -> Result<(String, String), Error> {
    let expr = SymExpr::from_ast(ast)?;
    let result = pass(&expr);
    Ok((canonical(&result), result.as_display().to_string()))
}

fn solve_task(
    task: &Task,
    ast: &ast::Expr,
    normalized: &str,
    normalizer: &Normalizer,
    domains: &BTreeMap<&str, Domain>,
    config: &ResolverConfig,
) -> Result<(String, String), BatchError> {
    let [var] = task.variables.as_slice() else {
        return Err(BatchError::SolveUnknowns {
            task_id: task.id.clone(),
            given: task.variables.len(),
        });
    };
    let domain = domains
        .get(var.as_str())
        .copied()
        .unwrap_or(config.default_domain);

    let lhs_minus_rhs =
        equation_expr(ast).map_err(|e| task_error(task, normalized, e))?;

    let mut relations = Vec::new();
    for constraint in &task.constraints {
        let constraint_normalized = normalizer.normalize(constraint);
        let constraint_ast = Parser::new(&constraint_normalized)
            .try_parse_full()
            .map_err(|e| task_error(task, &constraint_normalized, e))?;
        let relation = relation_expr(&constraint_ast)
            .map_err(|e| task_error(task, &constraint_normalized, e))?;
        relations.push(relation);
    }

    let set = solve(&lhs_minus_rhs, var, domain);
    let set = filter_solutions(set, var, &relations);
    Ok((set.canonical(), set.as_display().to_string()))
}

/// Reads the task expression as an equation: `lhs = rhs` becomes `lhs - rhs`, and a bare
/// expression is implicitly equated with zero.
fn equation_expr(ast: &ast::Expr) -> Result<SymExpr, Error> {
    if let ast::Expr::Binary(binary) = ast.innermost() {
        if binary.op.kind == BinOpKind::Eq {
            let lhs = SymExpr::from_ast(&binary.lhs)?;
            let rhs = SymExpr::from_ast(&binary.rhs)?;
            return Ok(SymExpr::add_flat(vec![lhs, rhs.neg()]));
        }
    }
    SymExpr::from_ast(ast)
}

/// Reads a constraint as a relation. A top-level comparison keeps its operator; a bare
/// expression is an equation against zero.
fn relation_expr(ast: &ast::Expr) -> Result<Relation, Error> {
    if let ast::Expr::Binary(binary) = ast.innermost() {
        if binary.op.kind.is_relational() {
            return Ok(Relation {
                op: binary.op.kind,
                lhs: SymExpr::from_ast(&binary.lhs)?,
                rhs: SymExpr::from_ast(&binary.rhs)?,
            });
        }
    }
    Ok(Relation {
        op: BinOpKind::Eq,
        lhs: SymExpr::from_ast(ast)?,
        rhs: SymExpr::int(0),
    })
}
