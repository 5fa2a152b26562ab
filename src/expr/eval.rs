//! Interpretive compilation backend: fold a tree into values in-process.
//!
//! Evaluation carries a single current argument binding. Argument nodes
//! read it; composition and per-element collection operations replace it
//! for their sub-expression. Null follows three-valued logic: comparisons
//! with null are null, null propagates through arithmetic and string
//! operators, and reading a property off a null target yields null.

use crate::expr::aggregate::Aggregator;
use crate::expr::builder::{Expr, ExprValue};
use crate::expr::error::{ExprError, ExprResult};
use crate::expr::kind::NodeKind;
use crate::expr::node::ExprNode;
use crate::expr::types;
use crate::value::Value;
use log::debug;
use regex::Regex;
use std::cmp::Ordering;

/// Evaluate a tree against an argument binding.
///
/// Recursion follows tree depth: builder-constructed trees are bounded by
/// their construction, reconstructed ones by the wire form's depth check.
pub fn evaluate(node: &ExprNode, argument: &Value) -> ExprResult<Value> {
    match node {
        ExprNode::Constant { value, .. } => Ok(value.clone()),

        ExprNode::Argument { .. } => Ok(argument.clone()),

        ExprNode::Property {
            target, property, ..
        } => match evaluate(target, argument)? {
            // Reading off a null target yields null instead of failing
            Value::Null => Ok(Value::Null),
            Value::Record(record) => {
                record
                    .get(&property.name)
                    .cloned()
                    .ok_or_else(|| ExprError::UnresolvedProperty {
                        entity: "record".to_string(),
                        name: property.name.clone(),
                    })
            }
            other => Err(ExprError::InvalidOperandTypes {
                kind: node.kind(),
                left: other.data_type(),
                right: None,
            }),
        },

        ExprNode::Unary { kind, operand } => evaluate_unary(*kind, operand, argument),

        ExprNode::Binary { kind, left, right } => evaluate_binary(*kind, left, right, argument),

        ExprNode::Collection {
            kind,
            source,
            operation,
            ..
        } => match evaluate(source, argument)? {
            Value::Null => Ok(Value::Null),
            Value::List(items) => evaluate_collection(*kind, &items, operation),
            other => Err(ExprError::InvalidOperandTypes {
                kind: *kind,
                left: other.data_type(),
                right: None,
            }),
        },

        // Bind the inner stage's argument to the outer stage's result
        ExprNode::Composed { outer, inner, .. } => {
            let carried = evaluate(outer, argument)?;
            evaluate(inner, &carried)
        }
    }
}

fn evaluate_unary(kind: NodeKind, operand: &ExprNode, argument: &Value) -> ExprResult<Value> {
    let invalid = |value: &Value| ExprError::InvalidOperandTypes {
        kind,
        left: value.data_type(),
        right: None,
    };

    match kind {
        NodeKind::IsNull => {
            let v = evaluate(operand, argument)?;
            Ok(Value::Boolean(v.is_null()))
        }

        NodeKind::Not => match evaluate(operand, argument)? {
            Value::Null => Ok(Value::Null),
            Value::Boolean(b) => Ok(Value::Boolean(!b)),
            other => Err(invalid(&other)),
        },

        NodeKind::ToLower | NodeKind::ToUpper | NodeKind::Trim => {
            match evaluate(operand, argument)? {
                Value::Null => Ok(Value::Null),
                Value::String(s) => Ok(Value::String(match kind {
                    NodeKind::ToLower => s.to_lowercase(),
                    NodeKind::ToUpper => s.to_uppercase(),
                    _ => s.trim().to_string(),
                })),
                other => Err(invalid(&other)),
            }
        }

        NodeKind::Length => match evaluate(operand, argument)? {
            Value::Null => Ok(Value::Null),
            Value::String(s) => Ok(Value::Int32(s.chars().count() as i32)),
            other => Err(invalid(&other)),
        },

        NodeKind::Negate => match evaluate(operand, argument)? {
            Value::Null => Ok(Value::Null),
            Value::Int32(n) => Ok(Value::Int32(n.wrapping_neg())),
            Value::Int64(n) => Ok(Value::Int64(n.wrapping_neg())),
            Value::Float64(n) => Ok(Value::Float64(-n)),
            other => Err(invalid(&other)),
        },

        NodeKind::IsEmpty => match evaluate(operand, argument)? {
            Value::Null => Ok(Value::Null),
            Value::List(items) => Ok(Value::Boolean(items.is_empty())),
            other => Err(invalid(&other)),
        },

        NodeKind::Count | NodeKind::Sum | NodeKind::Average | NodeKind::Min | NodeKind::Max => {
            match evaluate(operand, argument)? {
                Value::Null => Ok(Value::Null),
                Value::List(items) => {
                    let aggregator = Aggregator::from_kind(kind)
                        .unwrap_or_else(|| unreachable!("{:?} is an aggregate kind", kind));
                    // An empty sum needs the declared element type to pick
                    // the width of its zero
                    let empty_elem = if items.is_empty() {
                        types::element_type_of(operand).ok()
                    } else {
                        None
                    };
                    aggregator.reduce(&items, empty_elem)
                }
                other => Err(invalid(&other)),
            }
        }

        other => unreachable!("non-unary kind {:?} in unary node", other),
    }
}

fn evaluate_binary(
    kind: NodeKind,
    left: &ExprNode,
    right: &ExprNode,
    argument: &Value,
) -> ExprResult<Value> {
    // And/Or short-circuit, so they evaluate their own operands
    match kind {
        NodeKind::And => {
            return match evaluate(left, argument)? {
                Value::Boolean(false) => Ok(Value::Boolean(false)),
                Value::Boolean(true) => expect_tristate_bool(kind, evaluate(right, argument)?),
                Value::Null => match evaluate(right, argument)? {
                    // null AND false = false, null AND true = null
                    Value::Boolean(false) => Ok(Value::Boolean(false)),
                    Value::Boolean(true) | Value::Null => Ok(Value::Null),
                    other => Err(operand_error(kind, &Value::Null, &other)),
                },
                // The right operand never ran, so the error carries no
                // type for it
                other => Err(ExprError::InvalidOperandTypes {
                    kind,
                    left: other.data_type(),
                    right: None,
                }),
            };
        }
        NodeKind::Or => {
            return match evaluate(left, argument)? {
                Value::Boolean(true) => Ok(Value::Boolean(true)),
                Value::Boolean(false) => expect_tristate_bool(kind, evaluate(right, argument)?),
                Value::Null => match evaluate(right, argument)? {
                    // null OR true = true, null OR false = null
                    Value::Boolean(true) => Ok(Value::Boolean(true)),
                    Value::Boolean(false) | Value::Null => Ok(Value::Null),
                    other => Err(operand_error(kind, &Value::Null, &other)),
                },
                other => Err(ExprError::InvalidOperandTypes {
                    kind,
                    left: other.data_type(),
                    right: None,
                }),
            };
        }
        _ => {}
    }

    let lhs = evaluate(left, argument)?;
    let rhs = evaluate(right, argument)?;

    // Null propagates through every remaining operator
    if lhs.is_null() || rhs.is_null() {
        return Ok(Value::Null);
    }

    match kind {
        NodeKind::Equals => equals(kind, &lhs, &rhs).map(Value::Boolean),

        NodeKind::LessThan => {
            compare_values(kind, &lhs, &rhs).map(|ord| Value::Boolean(ord == Ordering::Less))
        }
        NodeKind::GreaterThan => {
            compare_values(kind, &lhs, &rhs).map(|ord| Value::Boolean(ord == Ordering::Greater))
        }

        NodeKind::ValueIn => match &rhs {
            Value::List(items) => {
                for item in items {
                    if equals(kind, &lhs, item)? {
                        return Ok(Value::Boolean(true));
                    }
                }
                Ok(Value::Boolean(false))
            }
            _ => Err(operand_error(kind, &lhs, &rhs)),
        },

        NodeKind::Add | NodeKind::Sub | NodeKind::Mul | NodeKind::Div => {
            numeric_binary(kind, &lhs, &rhs)
        }

        NodeKind::Concat => match (&lhs, &rhs) {
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            _ => Err(operand_error(kind, &lhs, &rhs)),
        },

        NodeKind::StartsWith | NodeKind::EndsWith | NodeKind::ContainsString => {
            match (&lhs, &rhs) {
                (Value::String(a), Value::String(b)) => Ok(Value::Boolean(match kind {
                    NodeKind::StartsWith => a.starts_with(b.as_str()),
                    NodeKind::EndsWith => a.ends_with(b.as_str()),
                    _ => a.contains(b.as_str()),
                })),
                _ => Err(operand_error(kind, &lhs, &rhs)),
            }
        }

        NodeKind::Matches => match (&lhs, &rhs) {
            (Value::String(subject), Value::String(pattern)) => {
                // Full-string semantics: the pattern must cover the whole
                // subject
                let anchored = format!("^(?:{})$", pattern);
                let re = Regex::new(&anchored).map_err(|e| ExprError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
                Ok(Value::Boolean(re.is_match(subject)))
            }
            _ => Err(operand_error(kind, &lhs, &rhs)),
        },

        NodeKind::ContainsElement => match &lhs {
            Value::List(items) => {
                for item in items {
                    if equals(kind, item, &rhs)? {
                        return Ok(Value::Boolean(true));
                    }
                }
                Ok(Value::Boolean(false))
            }
            _ => Err(operand_error(kind, &lhs, &rhs)),
        },

        other => unreachable!("non-binary kind {:?} in binary node", other),
    }
}

fn evaluate_collection(
    kind: NodeKind,
    items: &[Value],
    operation: &ExprNode,
) -> ExprResult<Value> {
    match kind {
        NodeKind::MapCollection => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(evaluate(operation, item)?);
            }
            Ok(Value::List(out))
        }

        NodeKind::FilterCollection => {
            let mut out = Vec::new();
            for item in items {
                match evaluate(operation, item)? {
                    Value::Boolean(true) => out.push(item.clone()),
                    // false and null both drop the element
                    Value::Boolean(false) | Value::Null => {}
                    other => {
                        return Err(ExprError::InvalidOperandTypes {
                            kind,
                            left: other.data_type(),
                            right: None,
                        })
                    }
                }
            }
            Ok(Value::List(out))
        }

        NodeKind::FlatMapCollection => {
            let mut out = Vec::new();
            for item in items {
                match evaluate(operation, item)? {
                    Value::List(mut sub) => out.append(&mut sub),
                    // A null sub-sequence contributes nothing
                    Value::Null => {}
                    other => {
                        return Err(ExprError::InvalidOperandTypes {
                            kind,
                            left: other.data_type(),
                            right: None,
                        })
                    }
                }
            }
            Ok(Value::List(out))
        }

        other => unreachable!("non-collection kind {:?} in collection node", other),
    }
}

fn expect_tristate_bool(kind: NodeKind, value: Value) -> ExprResult<Value> {
    match value {
        Value::Boolean(_) | Value::Null => Ok(value),
        other => Err(ExprError::InvalidOperandTypes {
            kind,
            left: other.data_type(),
            right: None,
        }),
    }
}

fn operand_error(kind: NodeKind, left: &Value, right: &Value) -> ExprError {
    ExprError::InvalidOperandTypes {
        kind,
        left: left.data_type(),
        right: right.data_type(),
    }
}

/// Structural equality for same-typed operands
fn equals(kind: NodeKind, left: &Value, right: &Value) -> ExprResult<bool> {
    match (left.data_type(), right.data_type()) {
        (Some(lt), Some(rt)) if lt == rt => Ok(left == right),
        // Records and empty lists have no derivable type; fall back to
        // structural comparison when both sides lack one
        (None, None) => Ok(left == right),
        _ => Err(operand_error(kind, left, right)),
    }
}

/// Ordering comparison between two same-typed values
pub(crate) fn compare_values(kind: NodeKind, left: &Value, right: &Value) -> ExprResult<Ordering> {
    match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
        (Value::Int32(a), Value::Int32(b)) => Ok(a.cmp(b)),
        (Value::Int64(a), Value::Int64(b)) => Ok(a.cmp(b)),
        (Value::Float64(a), Value::Float64(b)) => a
            .partial_cmp(b)
            .ok_or_else(|| operand_error(kind, left, right)),
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        _ => Err(operand_error(kind, left, right)),
    }
}

fn numeric_binary(kind: NodeKind, left: &Value, right: &Value) -> ExprResult<Value> {
    fn as_i64(value: &Value) -> Option<i64> {
        match value {
            Value::Int32(n) => Some(*n as i64),
            Value::Int64(n) => Some(*n),
            Value::Float64(n) => Some(*n as i64),
            _ => None,
        }
    }
    fn as_f64(value: &Value) -> Option<f64> {
        match value {
            Value::Int32(n) => Some(*n as f64),
            Value::Int64(n) => Some(*n as f64),
            Value::Float64(n) => Some(*n),
            _ => None,
        }
    }

    // The left operand fixes the result width; the right operand is
    // truncated into it rather than widened
    match left {
        Value::Int32(a) => {
            let b = as_i64(right).ok_or_else(|| operand_error(kind, left, right))? as i32;
            Ok(Value::Int32(match kind {
                NodeKind::Add => a.wrapping_add(b),
                NodeKind::Sub => a.wrapping_sub(b),
                NodeKind::Mul => a.wrapping_mul(b),
                _ => {
                    if b == 0 {
                        return Err(ExprError::DivisionByZero);
                    }
                    a.wrapping_div(b)
                }
            }))
        }
        Value::Int64(a) => {
            let b = as_i64(right).ok_or_else(|| operand_error(kind, left, right))?;
            Ok(Value::Int64(match kind {
                NodeKind::Add => a.wrapping_add(b),
                NodeKind::Sub => a.wrapping_sub(b),
                NodeKind::Mul => a.wrapping_mul(b),
                _ => {
                    if b == 0 {
                        return Err(ExprError::DivisionByZero);
                    }
                    a.wrapping_div(b)
                }
            }))
        }
        Value::Float64(a) => {
            let b = as_f64(right).ok_or_else(|| operand_error(kind, left, right))?;
            Ok(Value::Float64(match kind {
                NodeKind::Add => a + b,
                NodeKind::Sub => a - b,
                NodeKind::Mul => a * b,
                _ => a / b,
            }))
        }
        _ => Err(operand_error(kind, left, right)),
    }
}

/// Compiled predicate over a typed entity
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send>;

/// Compile a boolean expression into an executable predicate.
///
/// Null results and evaluation failures filter the entity out, matching
/// how a query layer treats a predicate that cannot say "yes".
pub fn compile_predicate<T: ExprValue>(expr: Expr<bool>) -> Predicate<T> {
    let node = expr.into_node();
    debug!("compiling predicate over {} node(s) kind={:?}", tree_size(&node), node.kind());
    Box::new(move |entity: &T| {
        matches!(evaluate(&node, &entity.to_value()), Ok(Value::Boolean(true)))
    })
}

/// Untyped variant of [`compile_predicate`] for backends holding
/// reconstructed trees
pub fn node_to_predicate(node: ExprNode) -> Box<dyn Fn(&Value) -> bool + Send> {
    Box::new(move |argument: &Value| {
        matches!(evaluate(&node, argument), Ok(Value::Boolean(true)))
    })
}

fn tree_size(node: &ExprNode) -> usize {
    let mut count = 0;
    let mut stack = vec![node];
    while let Some(n) = stack.pop() {
        count += 1;
        stack.extend(n.children());
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::DataType;

    fn i32_const(v: i32) -> ExprNode {
        ExprNode::constant(NodeKind::NumericConstant, Value::Int32(v))
    }

    fn str_const(s: &str) -> ExprNode {
        ExprNode::constant(NodeKind::StringConstant, Value::String(s.to_string()))
    }

    fn bool_const(b: bool) -> ExprNode {
        ExprNode::constant(NodeKind::BooleanConstant, Value::Boolean(b))
    }

    fn null_const() -> ExprNode {
        ExprNode::Constant {
            kind: NodeKind::Constant,
            value: Value::Null,
        }
    }

    fn num_arg() -> ExprNode {
        ExprNode::argument(NodeKind::NumericArgument, DataType::Int32)
    }

    fn eval(node: &ExprNode) -> Value {
        evaluate(node, &Value::Null).unwrap()
    }

    #[test]
    fn test_constant_and_argument() {
        assert_eq!(eval(&i32_const(42)), Value::Int32(42));
        assert_eq!(
            evaluate(&num_arg(), &Value::Int32(7)).unwrap(),
            Value::Int32(7)
        );
    }

    #[test]
    fn test_arithmetic() {
        let add = ExprNode::binary(NodeKind::Add, i32_const(10), i32_const(5));
        assert_eq!(eval(&add), Value::Int32(15));

        let div = ExprNode::binary(NodeKind::Div, i32_const(10), i32_const(3));
        assert_eq!(eval(&div), Value::Int32(3));

        let by_zero = ExprNode::binary(NodeKind::Div, i32_const(10), i32_const(0));
        assert_eq!(
            evaluate(&by_zero, &Value::Null),
            Err(ExprError::DivisionByZero)
        );

        let bad = ExprNode::binary(NodeKind::Add, i32_const(10), str_const("5"));
        assert!(matches!(
            evaluate(&bad, &Value::Null),
            Err(ExprError::InvalidOperandTypes { .. })
        ));
    }

    #[test]
    fn test_mixed_width_arithmetic_keeps_left_width() {
        let node = ExprNode::binary(
            NodeKind::Add,
            i32_const(1),
            ExprNode::constant(NodeKind::NumericConstant, Value::Int64(2)),
        );
        assert_eq!(eval(&node), Value::Int32(3));
    }

    #[test]
    fn test_comparisons() {
        let lt = ExprNode::binary(NodeKind::LessThan, i32_const(3), i32_const(5));
        assert_eq!(eval(&lt), Value::Boolean(true));

        let gt = ExprNode::binary(NodeKind::GreaterThan, str_const("b"), str_const("a"));
        assert_eq!(eval(&gt), Value::Boolean(true));

        let eq = ExprNode::binary(NodeKind::Equals, i32_const(5), i32_const(5));
        assert_eq!(eval(&eq), Value::Boolean(true));
    }

    #[test]
    fn test_null_three_valued_logic() {
        // Comparison with null is null
        let node = ExprNode::binary(NodeKind::Equals, null_const(), i32_const(5));
        assert_eq!(eval(&node), Value::Null);

        // false AND null = false
        let node = ExprNode::binary(NodeKind::And, bool_const(false), null_const());
        assert_eq!(eval(&node), Value::Boolean(false));

        // null AND false = false
        let node = ExprNode::binary(NodeKind::And, null_const(), bool_const(false));
        assert_eq!(eval(&node), Value::Boolean(false));

        // null AND true = null
        let node = ExprNode::binary(NodeKind::And, null_const(), bool_const(true));
        assert_eq!(eval(&node), Value::Null);

        // true OR null = true
        let node = ExprNode::binary(NodeKind::Or, bool_const(true), null_const());
        assert_eq!(eval(&node), Value::Boolean(true));

        // null OR false = null
        let node = ExprNode::binary(NodeKind::Or, null_const(), bool_const(false));
        assert_eq!(eval(&node), Value::Null);

        // NOT null = null
        let node = ExprNode::unary(NodeKind::Not, null_const());
        assert_eq!(eval(&node), Value::Null);
    }

    #[test]
    fn test_non_boolean_logic_operand_blames_only_the_left() {
        // The right operand never runs, so the error must not report a
        // type for it
        for kind in [NodeKind::And, NodeKind::Or] {
            let node = ExprNode::binary(kind, i32_const(1), bool_const(true));
            assert_eq!(
                evaluate(&node, &Value::Null),
                Err(ExprError::InvalidOperandTypes {
                    kind,
                    left: Some(DataType::Int32),
                    right: None,
                })
            );
        }
    }

    #[test]
    fn test_and_short_circuits() {
        // The right side would divide by zero; false on the left must
        // prevent it from running
        let exploding = ExprNode::binary(
            NodeKind::Equals,
            ExprNode::binary(NodeKind::Div, i32_const(1), i32_const(0)),
            i32_const(1),
        );
        let node = ExprNode::binary(NodeKind::And, bool_const(false), exploding.clone());
        assert_eq!(eval(&node), Value::Boolean(false));

        let node = ExprNode::binary(NodeKind::Or, bool_const(true), exploding);
        assert_eq!(eval(&node), Value::Boolean(true));
    }

    #[test]
    fn test_string_operators() {
        let node = ExprNode::binary(NodeKind::Concat, str_const("Hello"), str_const(" World"));
        assert_eq!(eval(&node), Value::String("Hello World".to_string()));

        let node = ExprNode::unary(NodeKind::ToUpper, str_const("abc"));
        assert_eq!(eval(&node), Value::String("ABC".to_string()));

        let node = ExprNode::unary(NodeKind::Trim, str_const("  x  "));
        assert_eq!(eval(&node), Value::String("x".to_string()));

        let node = ExprNode::unary(NodeKind::Length, str_const("abc"));
        assert_eq!(eval(&node), Value::Int32(3));

        let node = ExprNode::binary(NodeKind::StartsWith, str_const("widget"), str_const("wid"));
        assert_eq!(eval(&node), Value::Boolean(true));

        let node = ExprNode::binary(
            NodeKind::ContainsString,
            str_const("widget"),
            str_const("dge"),
        );
        assert_eq!(eval(&node), Value::Boolean(true));
    }

    #[test]
    fn test_matches_is_full_string() {
        let node = ExprNode::binary(NodeKind::Matches, str_const("widget"), str_const("wid.*"));
        assert_eq!(eval(&node), Value::Boolean(true));

        // A partial match is not enough
        let node = ExprNode::binary(NodeKind::Matches, str_const("widget"), str_const("wid"));
        assert_eq!(eval(&node), Value::Boolean(false));

        let node = ExprNode::binary(NodeKind::Matches, str_const("x"), str_const("(unclosed"));
        assert!(matches!(
            evaluate(&node, &Value::Null),
            Err(ExprError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_value_in() {
        let list = ExprNode::constant(
            NodeKind::CollectionConstant,
            Value::List(vec![Value::Int32(1), Value::Int32(2)]),
        );
        let node = ExprNode::binary(NodeKind::ValueIn, i32_const(2), list.clone());
        assert_eq!(eval(&node), Value::Boolean(true));

        let node = ExprNode::binary(NodeKind::ValueIn, i32_const(9), list);
        assert_eq!(eval(&node), Value::Boolean(false));
    }

    #[test]
    fn test_collection_operators() {
        let source = ExprNode::constant(
            NodeKind::CollectionConstant,
            Value::List(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)]),
        );
        let elem = ExprNode::argument(NodeKind::NumericArgument, DataType::Int32);

        // map: double each element
        let node = ExprNode::collection(
            NodeKind::MapCollection,
            DataType::Int32,
            source.clone(),
            ExprNode::binary(NodeKind::Mul, elem.clone(), i32_const(2)),
        );
        assert_eq!(
            eval(&node),
            Value::List(vec![Value::Int32(2), Value::Int32(4), Value::Int32(6)])
        );

        // filter: keep elements > 1
        let node = ExprNode::collection(
            NodeKind::FilterCollection,
            DataType::Int32,
            source.clone(),
            ExprNode::binary(NodeKind::GreaterThan, elem.clone(), i32_const(1)),
        );
        assert_eq!(
            eval(&node),
            Value::List(vec![Value::Int32(2), Value::Int32(3)])
        );

        // contains
        let node = ExprNode::binary(NodeKind::ContainsElement, source.clone(), i32_const(3));
        assert_eq!(eval(&node), Value::Boolean(true));

        // isEmpty
        let node = ExprNode::unary(NodeKind::IsEmpty, source);
        assert_eq!(eval(&node), Value::Boolean(false));
    }

    #[test]
    fn test_flat_map_concatenates() {
        let nested = ExprNode::constant(
            NodeKind::CollectionConstant,
            Value::List(vec![
                Value::List(vec![Value::Int32(1), Value::Int32(2)]),
                Value::List(vec![Value::Int32(3)]),
            ]),
        );
        let elem = ExprNode::argument(
            NodeKind::CollectionArgument,
            DataType::List(Box::new(DataType::Int32)),
        );
        let node = ExprNode::collection(
            NodeKind::FlatMapCollection,
            DataType::Int32,
            nested,
            elem,
        );
        assert_eq!(
            eval(&node),
            Value::List(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)])
        );
    }

    #[test]
    fn test_composition_rebinds_argument() {
        // outer: argument * 2, inner: argument + 1; composed: (x * 2) + 1
        let outer = ExprNode::binary(NodeKind::Mul, num_arg(), i32_const(2));
        let inner = ExprNode::binary(NodeKind::Add, num_arg(), i32_const(1));
        let node = ExprNode::composed(NodeKind::NumericComposition, outer, inner);
        assert_eq!(evaluate(&node, &Value::Int32(5)).unwrap(), Value::Int32(11));
    }

    #[test]
    fn test_property_read_off_null_is_null() {
        let node = ExprNode::property(
            NodeKind::StringProperty,
            null_const(),
            crate::schema::PropertyRef {
                name: "name".to_string(),
                data_type: DataType::Text,
            },
        );
        assert_eq!(eval(&node), Value::Null);
    }

    #[test]
    fn test_node_to_predicate_null_is_false() {
        let node = ExprNode::binary(NodeKind::Equals, num_arg(), i32_const(5));
        let pred = node_to_predicate(node);
        assert!(pred(&Value::Int32(5)));
        assert!(!pred(&Value::Int32(6)));
        // null = 5 is null, which the predicate treats as false
        assert!(!pred(&Value::Null));
    }
}
