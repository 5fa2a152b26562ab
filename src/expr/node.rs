//! Expression tree nodes.
//!
//! One variant per operation shape, with the node kind carried as data.
//! Nodes are immutable value objects; trees are built bottom-up and never
//! mutated afterwards.

use crate::expr::error::{ExprError, ExprResult};
use crate::expr::kind::{NodeKind, OpShape};
use crate::schema::PropertyRef;
use crate::value::{DataType, Value};

/// Maximum depth accepted when validating trees reconstructed from
/// untrusted serialized input.
pub const MAX_TREE_DEPTH: usize = 64;

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    /// Literal value; its declared type derives from the literal itself
    Constant { kind: NodeKind, value: Value },

    /// Unbound input of a declared type, supplied at evaluation time
    Argument { kind: NodeKind, arg_type: DataType },

    /// Read a named property off the target's result
    Property {
        kind: NodeKind,
        target: Box<ExprNode>,
        property: PropertyRef,
    },

    /// Single-operand operation
    Unary {
        kind: NodeKind,
        operand: Box<ExprNode>,
    },

    /// Two-operand operation
    Binary {
        kind: NodeKind,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },

    /// Collection operator: a source collection plus a per-element
    /// operation whose own argument stands for one element. The node
    /// stores its declared element type rather than deriving it.
    Collection {
        kind: NodeKind,
        elem_type: DataType,
        source: Box<ExprNode>,
        operation: Box<ExprNode>,
    },

    /// Run `inner` against the result of `outer`
    Composed {
        kind: NodeKind,
        outer: Box<ExprNode>,
        inner: Box<ExprNode>,
    },
}

impl ExprNode {
    pub fn constant(kind: NodeKind, value: Value) -> Self {
        debug_assert_eq!(kind.shape(), OpShape::Constant);
        ExprNode::Constant { kind, value }
    }

    pub fn argument(kind: NodeKind, arg_type: DataType) -> Self {
        debug_assert_eq!(kind.shape(), OpShape::Argument);
        ExprNode::Argument { kind, arg_type }
    }

    pub fn property(kind: NodeKind, target: ExprNode, property: PropertyRef) -> Self {
        debug_assert_eq!(kind.shape(), OpShape::Property);
        ExprNode::Property {
            kind,
            target: Box::new(target),
            property,
        }
    }

    pub fn unary(kind: NodeKind, operand: ExprNode) -> Self {
        debug_assert_eq!(kind.shape(), OpShape::Unary);
        ExprNode::Unary {
            kind,
            operand: Box::new(operand),
        }
    }

    pub fn binary(kind: NodeKind, left: ExprNode, right: ExprNode) -> Self {
        debug_assert_eq!(kind.shape(), OpShape::Binary);
        ExprNode::Binary {
            kind,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn collection(
        kind: NodeKind,
        elem_type: DataType,
        source: ExprNode,
        operation: ExprNode,
    ) -> Self {
        debug_assert_eq!(kind.shape(), OpShape::Collection);
        ExprNode::Collection {
            kind,
            elem_type,
            source: Box::new(source),
            operation: Box::new(operation),
        }
    }

    pub fn composed(kind: NodeKind, outer: ExprNode, inner: ExprNode) -> Self {
        debug_assert_eq!(kind.shape(), OpShape::Composition);
        ExprNode::Composed {
            kind,
            outer: Box::new(outer),
            inner: Box::new(inner),
        }
    }

    /// The node's kind discriminator
    pub fn kind(&self) -> NodeKind {
        match self {
            ExprNode::Constant { kind, .. }
            | ExprNode::Argument { kind, .. }
            | ExprNode::Property { kind, .. }
            | ExprNode::Unary { kind, .. }
            | ExprNode::Binary { kind, .. }
            | ExprNode::Collection { kind, .. }
            | ExprNode::Composed { kind, .. } => *kind,
        }
    }

    /// The operation shape of this node's variant
    pub fn shape(&self) -> OpShape {
        match self {
            ExprNode::Constant { .. } => OpShape::Constant,
            ExprNode::Argument { .. } => OpShape::Argument,
            ExprNode::Property { .. } => OpShape::Property,
            ExprNode::Unary { .. } => OpShape::Unary,
            ExprNode::Binary { .. } => OpShape::Binary,
            ExprNode::Collection { .. } => OpShape::Collection,
            ExprNode::Composed { .. } => OpShape::Composition,
        }
    }

    /// Operand nodes, in evaluation order
    pub fn children(&self) -> Vec<&ExprNode> {
        match self {
            ExprNode::Constant { .. } | ExprNode::Argument { .. } => vec![],
            ExprNode::Property { target, .. } => vec![target],
            ExprNode::Unary { operand, .. } => vec![operand],
            ExprNode::Binary { left, right, .. } => vec![left, right],
            ExprNode::Collection {
                source, operation, ..
            } => vec![source, operation],
            ExprNode::Composed { outer, inner, .. } => vec![outer, inner],
        }
    }

    /// Check that every node's kind agrees with its variant's shape and
    /// that the tree stays within the depth bound. Run on trees
    /// reconstructed from serialized input before resolving or compiling
    /// them.
    pub fn validate(&self, max_depth: usize) -> ExprResult<()> {
        // Explicit work stack: reconstructed trees may be arbitrarily deep.
        let mut stack: Vec<(&ExprNode, usize)> = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            if depth > max_depth {
                return Err(ExprError::DepthExceeded { max_depth });
            }
            let kind = node.kind();
            if kind.shape() != node.shape() {
                return Err(ExprError::ShapeMismatch {
                    kind,
                    expected: kind.shape(),
                    actual: node.shape(),
                });
            }
            for child in node.children() {
                stack.push((child, depth + 1));
            }
        }
        Ok(())
    }

    /// True when the tree contains no argument or property leaves, i.e.
    /// it evaluates to the same value regardless of input
    pub fn is_constant(&self) -> bool {
        match self {
            ExprNode::Constant { .. } => true,
            ExprNode::Argument { .. } | ExprNode::Property { .. } => false,
            _ => self.children().iter().all(|c| c.is_constant()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_const(v: i32) -> ExprNode {
        ExprNode::constant(NodeKind::NumericConstant, Value::Int32(v))
    }

    #[test]
    fn test_kind_and_shape() {
        let node = ExprNode::binary(NodeKind::Add, int_const(1), int_const(2));
        assert_eq!(node.kind(), NodeKind::Add);
        assert_eq!(node.shape(), OpShape::Binary);
        assert_eq!(node.children().len(), 2);
    }

    #[test]
    fn test_validate_accepts_well_formed_tree() {
        let node = ExprNode::unary(
            NodeKind::Not,
            ExprNode::binary(
                NodeKind::LessThan,
                ExprNode::argument(NodeKind::NumericArgument, DataType::Int32),
                int_const(10),
            ),
        );
        assert!(node.validate(MAX_TREE_DEPTH).is_ok());
    }

    #[test]
    fn test_validate_rejects_shape_mismatch() {
        // An `And` kind stuffed into a unary node, as a corrupt payload
        // could produce
        let node = ExprNode::Unary {
            kind: NodeKind::And,
            operand: Box::new(int_const(1)),
        };
        assert!(matches!(
            node.validate(MAX_TREE_DEPTH),
            Err(ExprError::ShapeMismatch {
                kind: NodeKind::And,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_deep_tree() {
        let mut node = int_const(0);
        for _ in 0..10 {
            node = ExprNode::unary(NodeKind::Negate, node);
        }
        assert!(node.validate(MAX_TREE_DEPTH).is_ok());
        assert!(matches!(
            node.validate(5),
            Err(ExprError::DepthExceeded { max_depth: 5 })
        ));
    }

    #[test]
    fn test_is_constant() {
        assert!(int_const(42).is_constant());
        assert!(ExprNode::binary(NodeKind::Add, int_const(1), int_const(2)).is_constant());

        let arg = ExprNode::argument(NodeKind::NumericArgument, DataType::Int32);
        assert!(!arg.is_constant());
        assert!(!ExprNode::binary(NodeKind::Add, arg, int_const(2)).is_constant());
    }
}
