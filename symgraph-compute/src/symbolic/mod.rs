//! Algebraic manipulation of expressions.
//!
//! # Expression representation
//!
//! Expressions in this module are represented as a tree of [`SymExpr`] nodes. The shape is
//! similar to the AST produced by `symgraph-parser`, with the main difference that [`SymExpr`]
//! **flattens** the tree: `x + (y + z)` is a single [`SymExpr::Add`] node with three children.
//! Combining "like" children is the bread and butter of every pass here, and the flat shape puts
//! all candidates at the same level.
//!
//! # Passes
//!
//! - [`simplify()`] applies a fixed set of local rewrite rules until a fixed point: merging
//!   terms and factors, folding numeric powers and roots, and reducing trigonometric calls at
//!   exact multiples of half pi. It never distributes products over sums, so factored structure
//!   survives simplification.
//! - [`expand()`] distributes products and small integer powers over sums, then simplifies.
//! - [`factor()`] pulls out numeric content and common monomials, then factors univariate
//!   polynomials over the rationals.
//! - [`solve()`] produces a [`SolutionSet`] for one unknown.
//!
//! Every pass is deterministic: the same input expression always produces the same output
//! expression, byte for byte once rendered.

pub mod expand;
pub mod expr;
pub mod factor;
pub mod poly;
pub mod simplify;
pub mod solve;

pub use expand::expand;
pub use expr::{Primary, SymExpr};
pub use factor::factor;
pub use simplify::simplify;
pub use solve::{solve, SolutionSet};
