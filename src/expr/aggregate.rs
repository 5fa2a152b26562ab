//! Aggregators: reducers from a collection-valued expression to a scalar.
//!
//! Each aggregator is a pure factory shared by every backend; the
//! interpreter reduces materialized lists here, remote backends translate
//! the same node kinds into native pipelines.

use crate::expr::error::{ExprError, ExprResult};
use crate::expr::eval::compare_values;
use crate::expr::kind::NodeKind;
use crate::expr::node::ExprNode;
use crate::expr::types;
use crate::value::{DataType, Value};
use std::cmp::Ordering;

/// The aggregator family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregator {
    /// Element count, 64-bit regardless of element type
    Count,
    /// Sum; keeps the element type's width
    Sum,
    /// Arithmetic mean, always floating-point
    Average,
    /// Minimum; keeps the element type
    Min,
    /// Maximum; keeps the element type
    Max,
}

impl Aggregator {
    /// The node kind this aggregator produces
    pub fn kind(self) -> NodeKind {
        match self {
            Aggregator::Count => NodeKind::Count,
            Aggregator::Sum => NodeKind::Sum,
            Aggregator::Average => NodeKind::Average,
            Aggregator::Min => NodeKind::Min,
            Aggregator::Max => NodeKind::Max,
        }
    }

    pub fn from_kind(kind: NodeKind) -> Option<Aggregator> {
        match kind {
            NodeKind::Count => Some(Aggregator::Count),
            NodeKind::Sum => Some(Aggregator::Sum),
            NodeKind::Average => Some(Aggregator::Average),
            NodeKind::Min => Some(Aggregator::Min),
            NodeKind::Max => Some(Aggregator::Max),
            _ => None,
        }
    }

    /// Declared result type for the given element type.
    ///
    /// Count and Average normalize the width, Sum/Min/Max preserve it;
    /// backends depend on this asymmetry, so it is deliberate.
    pub fn result_type(self, element: &DataType) -> ExprResult<DataType> {
        match self {
            Aggregator::Count => Ok(DataType::Int64),
            Aggregator::Average => {
                if !element.is_numeric() {
                    return Err(ExprError::TypeMismatch {
                        expected: DataType::Float64,
                        actual: Some(element.clone()),
                        context: "average element".to_string(),
                    });
                }
                Ok(DataType::Float64)
            }
            Aggregator::Sum => {
                if !element.is_numeric() {
                    return Err(ExprError::TypeMismatch {
                        expected: DataType::Int64,
                        actual: Some(element.clone()),
                        context: "sum element".to_string(),
                    });
                }
                Ok(element.clone())
            }
            Aggregator::Min | Aggregator::Max => {
                if !element.is_comparable() {
                    return Err(ExprError::TypeMismatch {
                        expected: DataType::Text,
                        actual: Some(element.clone()),
                        context: "min/max element".to_string(),
                    });
                }
                Ok(element.clone())
            }
        }
    }

    /// Apply this aggregator to a collection-valued expression, checking
    /// the element-type constraint before building the node
    pub fn apply(self, source: ExprNode) -> ExprResult<ExprNode> {
        let element = types::element_type_of(&source)?;
        self.result_type(&element)?;
        Ok(ExprNode::unary(self.kind(), source))
    }

    /// Reduce a materialized list. `empty_elem` supplies the declared
    /// element type so an empty sum can pick the width of its zero.
    pub(crate) fn reduce(
        self,
        items: &[Value],
        empty_elem: Option<DataType>,
    ) -> ExprResult<Value> {
        match self {
            Aggregator::Count => Ok(Value::Int64(items.len() as i64)),
            Aggregator::Sum => self.reduce_sum(items, empty_elem),
            Aggregator::Average => self.reduce_average(items),
            Aggregator::Min => self.reduce_extremum(items, Ordering::Less),
            Aggregator::Max => self.reduce_extremum(items, Ordering::Greater),
        }
    }

    fn element_error(self, value: &Value) -> ExprError {
        ExprError::InvalidOperandTypes {
            kind: self.kind(),
            left: value.data_type(),
            right: None,
        }
    }

    fn reduce_sum(self, items: &[Value], empty_elem: Option<DataType>) -> ExprResult<Value> {
        let mut values = items.iter().filter(|v| !v.is_null());
        let Some(first) = values.next() else {
            // Zero in the declared element width; null when nothing
            // declares one
            return Ok(match empty_elem {
                Some(DataType::Int32) => Value::Int32(0),
                Some(DataType::Int64) => Value::Int64(0),
                Some(DataType::Float64) => Value::Float64(0.0),
                _ => Value::Null,
            });
        };
        match first {
            Value::Int32(n) => {
                let mut acc = *n;
                for v in values {
                    match v {
                        Value::Int32(n) => acc = acc.wrapping_add(*n),
                        other => return Err(self.element_error(other)),
                    }
                }
                Ok(Value::Int32(acc))
            }
            Value::Int64(n) => {
                let mut acc = *n;
                for v in values {
                    match v {
                        Value::Int64(n) => acc = acc.wrapping_add(*n),
                        other => return Err(self.element_error(other)),
                    }
                }
                Ok(Value::Int64(acc))
            }
            Value::Float64(n) => {
                let mut acc = *n;
                for v in values {
                    match v {
                        Value::Float64(n) => acc += *n,
                        other => return Err(self.element_error(other)),
                    }
                }
                Ok(Value::Float64(acc))
            }
            other => Err(self.element_error(other)),
        }
    }

    fn reduce_average(self, items: &[Value]) -> ExprResult<Value> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for v in items {
            match v {
                Value::Null => {}
                Value::Int32(n) => {
                    sum += *n as f64;
                    count += 1;
                }
                Value::Int64(n) => {
                    sum += *n as f64;
                    count += 1;
                }
                Value::Float64(n) => {
                    sum += *n;
                    count += 1;
                }
                other => return Err(self.element_error(other)),
            }
        }
        if count == 0 {
            return Ok(Value::Null);
        }
        Ok(Value::Float64(sum / count as f64))
    }

    fn reduce_extremum(self, items: &[Value], keep: Ordering) -> ExprResult<Value> {
        let mut values = items.iter().filter(|v| !v.is_null());
        let Some(first) = values.next() else {
            return Ok(Value::Null);
        };
        let mut best = first;
        for v in values {
            if compare_values(self.kind(), v, best)? == keep {
                best = v;
            }
        }
        Ok(best.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_list_arg() -> ExprNode {
        ExprNode::argument(
            NodeKind::CollectionArgument,
            DataType::List(Box::new(DataType::Int32)),
        )
    }

    #[test]
    fn test_result_types() {
        // Width-normalizing reducers
        assert_eq!(
            Aggregator::Count.result_type(&DataType::Text).unwrap(),
            DataType::Int64
        );
        assert_eq!(
            Aggregator::Average.result_type(&DataType::Int32).unwrap(),
            DataType::Float64
        );

        // Width-preserving reducers
        assert_eq!(
            Aggregator::Sum.result_type(&DataType::Int32).unwrap(),
            DataType::Int32
        );
        assert_eq!(
            Aggregator::Min.result_type(&DataType::Text).unwrap(),
            DataType::Text
        );

        // Constraints
        assert!(Aggregator::Sum.result_type(&DataType::Text).is_err());
        assert!(Aggregator::Average.result_type(&DataType::Text).is_err());
        assert!(Aggregator::Max
            .result_type(&DataType::Entity("Product".to_string()))
            .is_err());
    }

    #[test]
    fn test_apply_builds_unary_node() {
        let node = Aggregator::Sum.apply(int_list_arg()).unwrap();
        assert_eq!(node.kind(), NodeKind::Sum);

        let strings = ExprNode::argument(
            NodeKind::CollectionArgument,
            DataType::List(Box::new(DataType::Text)),
        );
        assert!(Aggregator::Sum.apply(strings).is_err());
    }

    #[test]
    fn test_reduce_sum_min_max() {
        let items = vec![Value::Int32(3), Value::Int32(1), Value::Int32(2)];
        assert_eq!(
            Aggregator::Sum.reduce(&items, None).unwrap(),
            Value::Int32(6)
        );
        assert_eq!(
            Aggregator::Min.reduce(&items, None).unwrap(),
            Value::Int32(1)
        );
        assert_eq!(
            Aggregator::Max.reduce(&items, None).unwrap(),
            Value::Int32(3)
        );
    }

    #[test]
    fn test_reduce_count_and_average() {
        let items = vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)];
        assert_eq!(
            Aggregator::Count.reduce(&items, None).unwrap(),
            Value::Int64(3)
        );
        assert_eq!(
            Aggregator::Average.reduce(&items, None).unwrap(),
            Value::Float64(2.0)
        );
    }

    #[test]
    fn test_reduce_empty() {
        assert_eq!(Aggregator::Count.reduce(&[], None).unwrap(), Value::Int64(0));
        assert_eq!(
            Aggregator::Sum
                .reduce(&[], Some(DataType::Int32))
                .unwrap(),
            Value::Int32(0)
        );
        assert_eq!(Aggregator::Sum.reduce(&[], None).unwrap(), Value::Null);
        assert_eq!(Aggregator::Average.reduce(&[], None).unwrap(), Value::Null);
        assert_eq!(Aggregator::Min.reduce(&[], None).unwrap(), Value::Null);
    }

    #[test]
    fn test_reduce_skips_nulls() {
        let items = vec![Value::Int32(4), Value::Null, Value::Int32(2)];
        assert_eq!(
            Aggregator::Sum.reduce(&items, None).unwrap(),
            Value::Int32(6)
        );
        assert_eq!(
            Aggregator::Average.reduce(&items, None).unwrap(),
            Value::Float64(3.0)
        );
        assert_eq!(
            Aggregator::Min.reduce(&items, None).unwrap(),
            Value::Int32(2)
        );
        // Count counts elements, not non-null values
        assert_eq!(
            Aggregator::Count.reduce(&items, None).unwrap(),
            Value::Int64(3)
        );
    }
}
