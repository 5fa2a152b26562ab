//! Type resolution: recover a node's result type from the tree alone.
//!
//! The typed builder's generic parameters are erased in the boxed and
//! serialized forms; codec lookup and dynamic validation recover them with
//! one resolution rule per node kind. Resolution fails fast when a node's
//! runtime value or operand does not match the shape its kind requires, so
//! malformed deserialized trees surface here instead of misbehaving later.

use crate::expr::error::{ExprError, ExprResult};
use crate::expr::kind::NodeKind;
use crate::expr::node::ExprNode;
use crate::value::DataType;

fn ensure_shape(node: &ExprNode) -> ExprResult<()> {
    let kind = node.kind();
    if kind.shape() != node.shape() {
        return Err(ExprError::ShapeMismatch {
            kind,
            expected: kind.shape(),
            actual: node.shape(),
        });
    }
    Ok(())
}

/// Element type of a collection-valued operand
fn element_type(operand: &ExprNode, context: &str) -> ExprResult<DataType> {
    match result_type(operand)? {
        DataType::List(elem) => Ok(*elem),
        other => Err(ExprError::TypeMismatch {
            expected: DataType::List(Box::new(other.clone())),
            actual: Some(other),
            context: context.to_string(),
        }),
    }
}

/// Element type of a collection-valued node, e.g. an aggregate's operand
pub fn element_type_of(node: &ExprNode) -> ExprResult<DataType> {
    element_type(node, "collection operand")
}

/// Resolve the statically-known result type of a node.
///
/// Total over the closed kind set; recursion follows one operand spine per
/// kind (left operand for arithmetic, the inner stage for compositions),
/// bounded by [`ExprNode::validate`](crate::expr::node::ExprNode::validate)
/// on reconstructed trees.
pub fn result_type(node: &ExprNode) -> ExprResult<DataType> {
    ensure_shape(node)?;
    match node {
        ExprNode::Constant { value, .. } => {
            value
                .data_type()
                .ok_or_else(|| ExprError::UnderivableType {
                    context: "constant literal".to_string(),
                })
        }

        // Arguments declare their own type at construction
        ExprNode::Argument { arg_type, .. } => Ok(arg_type.clone()),

        ExprNode::Property { property, .. } => Ok(property.data_type.clone()),

        ExprNode::Unary { kind, operand } => match kind {
            // Fixed boolean results
            NodeKind::Not | NodeKind::IsNull | NodeKind::IsEmpty => Ok(DataType::Boolean),

            // Fixed string results
            NodeKind::ToLower | NodeKind::ToUpper | NodeKind::Trim => Ok(DataType::Text),

            NodeKind::Length => Ok(DataType::Int32),

            // Propagate the operand type
            NodeKind::Negate => result_type(operand),

            // Width-preserving reducers propagate the element type;
            // Count and Average normalize regardless of input width.
            // Backends depend on this asymmetry.
            NodeKind::Sum => element_type(operand, "sum operand"),
            NodeKind::Min => element_type(operand, "min operand"),
            NodeKind::Max => element_type(operand, "max operand"),
            NodeKind::Count => {
                element_type(operand, "count operand")?;
                Ok(DataType::Int64)
            }
            NodeKind::Average => {
                let elem = element_type(operand, "average operand")?;
                if !elem.is_numeric() {
                    return Err(ExprError::TypeMismatch {
                        expected: DataType::Float64,
                        actual: Some(elem),
                        context: "average operand".to_string(),
                    });
                }
                Ok(DataType::Float64)
            }

            other => unreachable!("non-unary kind {:?} in unary node", other),
        },

        ExprNode::Binary { kind, left, .. } => match kind {
            NodeKind::And
            | NodeKind::Or
            | NodeKind::Equals
            | NodeKind::ValueIn
            | NodeKind::LessThan
            | NodeKind::GreaterThan
            | NodeKind::StartsWith
            | NodeKind::EndsWith
            | NodeKind::ContainsString
            | NodeKind::Matches
            | NodeKind::ContainsElement => Ok(DataType::Boolean),

            NodeKind::Concat => Ok(DataType::Text),

            // Left-operand rule: mixed-width arithmetic is not widened
            NodeKind::Add | NodeKind::Sub | NodeKind::Mul | NodeKind::Div => result_type(left),

            other => unreachable!("non-binary kind {:?} in binary node", other),
        },

        // Collection operators store their own declared element type
        ExprNode::Collection { elem_type, .. } => {
            Ok(DataType::List(Box::new(elem_type.clone())))
        }

        // A composition resolves to whatever its second stage resolves to
        ExprNode::Composed { inner, .. } => result_type(inner),
    }
}

/// Ensure a tree resolves to boolean before compiling it as a predicate
pub fn check_predicate(node: &ExprNode) -> ExprResult<()> {
    match result_type(node)? {
        DataType::Boolean => Ok(()),
        other => Err(ExprError::TypeMismatch {
            expected: DataType::Boolean,
            actual: Some(other),
            context: "predicate".to_string(),
        }),
    }
}
