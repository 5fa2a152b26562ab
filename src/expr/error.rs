//! Error types for expression construction, resolution, and evaluation.

use crate::expr::kind::{NodeKind, OpShape};
use crate::value::DataType;
use thiserror::Error;

/// Errors that can occur while building, resolving, or evaluating a tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// A node's resolved type does not satisfy its kind's operand constraint
    #[error("Type mismatch in {context}: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        expected: DataType,
        actual: Option<DataType>,
        context: String,
    },

    /// Operand values incompatible with the operator at evaluation time
    #[error("Invalid operand types for {kind:?}: left={left:?}, right={right:?}")]
    InvalidOperandTypes {
        kind: NodeKind,
        left: Option<DataType>,
        right: Option<DataType>,
    },

    /// Property name absent from the entity descriptor
    #[error("Entity '{entity}' has no property '{name}'")]
    UnresolvedProperty { entity: String, name: String },

    /// A node whose operation shape does not match what its kind requires
    #[error("Node kind {kind:?} requires shape {expected:?}, found {actual:?}")]
    ShapeMismatch {
        kind: NodeKind,
        expected: OpShape,
        actual: OpShape,
    },

    /// Unrecognized discriminator in a serialized tree
    #[error("Unknown node kind '{name}' in serialized tree")]
    UnknownKind { name: String },

    /// A serialized node is missing a field its kind requires
    #[error("Serialized {kind:?} node is missing required field '{field}'")]
    MissingField { kind: NodeKind, field: &'static str },

    /// Tree deeper than the reconstruction bound
    #[error("Expression tree exceeds maximum depth of {max_depth}")]
    DepthExceeded { max_depth: usize },

    /// A literal with no derivable type (null, empty collection) where a
    /// resolved type is required
    #[error("Cannot derive a type for {context}")]
    UnderivableType { context: String },

    #[error("Division by zero")]
    DivisionByZero,

    /// Pattern for a `matches` node failed to compile
    #[error("Invalid match pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Serialized tree is not well-formed JSON for the wire schema
    #[error("Malformed serialized tree: {reason}")]
    Malformed { reason: String },
}

/// Result type for expression operations
pub type ExprResult<T> = Result<T, ExprError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExprError::TypeMismatch {
            expected: DataType::Boolean,
            actual: Some(DataType::Int32),
            context: "predicate".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Type mismatch in predicate: expected Boolean, got Some(Int32)"
        );

        let err = ExprError::UnresolvedProperty {
            entity: "Product".to_string(),
            name: "weight".to_string(),
        };
        assert_eq!(err.to_string(), "Entity 'Product' has no property 'weight'");

        let err = ExprError::UnknownKind {
            name: "frobnicate".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown node kind 'frobnicate' in serialized tree"
        );

        let err = ExprError::MissingField {
            kind: NodeKind::And,
            field: "right",
        };
        assert_eq!(
            err.to_string(),
            "Serialized And node is missing required field 'right'"
        );

        assert_eq!(ExprError::DivisionByZero.to_string(), "Division by zero");
    }
}
