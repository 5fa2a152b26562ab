//! Typed, serializable expression trees.
//!
//! This module provides:
//! - Expression tree representation keyed by a closed kind enum
//! - A phantom-typed builder API for constructing well-typed trees
//! - Static type resolution over finished trees
//! - A shape-keyed visitor protocol for compilation backends
//! - Aggregation over collection-valued operands
//! - A JSON wire form with validated reconstruction
//! - An in-process interpreter and predicate compiler

pub mod aggregate;
pub mod builder;
pub mod error;
pub mod eval;
pub mod kind;
pub mod node;
pub mod types;
pub mod visitor;
pub mod wire;

pub use aggregate::Aggregator;
pub use builder::{ComparableValue, Expr, ExprValue, IntoExpr, NumericValue};
pub use error::{ExprError, ExprResult};
pub use eval::{compile_predicate, evaluate, Predicate};
pub use kind::{NodeKind, OpShape, ValueCategory};
pub use node::{ExprNode, MAX_TREE_DEPTH};
pub use types::{check_predicate, result_type};
pub use visitor::{dispatch, reduce, referenced_properties, ExprVisitor, TreeReducer};
pub use wire::{from_json, from_wire, to_json, to_wire, WireNode};
