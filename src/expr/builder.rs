//! Statically-typed fluent construction API over the node model.
//!
//! `Expr<T>` wraps an untyped [`ExprNode`] with the Rust type it resolves
//! to. Capability traits (`ExprValue`, `ComparableValue`, `NumericValue`)
//! decide which operator groups a given `T` unlocks; the node kinds they
//! emit carry the same information as data for the serialized form.

use crate::expr::error::{ExprError, ExprResult};
use crate::expr::kind::{NodeKind, ValueCategory};
use crate::expr::node::ExprNode;
use crate::schema::Entity;
use crate::value::{DataType, Value};
use std::fmt;
use std::marker::PhantomData;

/// Rust types usable as expression values
pub trait ExprValue {
    /// Declared data type of this Rust type
    fn data_type() -> DataType;

    /// Value category deciding the typed operators available
    fn category() -> ValueCategory;

    /// Convert an instance into the interpreter's value form
    fn to_value(&self) -> Value;
}

/// Marker for types supporting ordering comparisons
pub trait ComparableValue: ExprValue {}

/// Marker for types supporting arithmetic
pub trait NumericValue: ComparableValue {}

impl ExprValue for bool {
    fn data_type() -> DataType {
        DataType::Boolean
    }
    fn category() -> ValueCategory {
        ValueCategory::Boolean
    }
    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }
}

impl ExprValue for i32 {
    fn data_type() -> DataType {
        DataType::Int32
    }
    fn category() -> ValueCategory {
        ValueCategory::Numeric
    }
    fn to_value(&self) -> Value {
        Value::Int32(*self)
    }
}

impl ExprValue for i64 {
    fn data_type() -> DataType {
        DataType::Int64
    }
    fn category() -> ValueCategory {
        ValueCategory::Numeric
    }
    fn to_value(&self) -> Value {
        Value::Int64(*self)
    }
}

impl ExprValue for f64 {
    fn data_type() -> DataType {
        DataType::Float64
    }
    fn category() -> ValueCategory {
        ValueCategory::Numeric
    }
    fn to_value(&self) -> Value {
        Value::Float64(*self)
    }
}

impl ExprValue for String {
    fn data_type() -> DataType {
        DataType::Text
    }
    fn category() -> ValueCategory {
        ValueCategory::String
    }
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl<E: ExprValue> ExprValue for Vec<E> {
    fn data_type() -> DataType {
        DataType::List(Box::new(E::data_type()))
    }
    fn category() -> ValueCategory {
        ValueCategory::Collection
    }
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ExprValue::to_value).collect())
    }
}

impl ComparableValue for i32 {}
impl ComparableValue for i64 {}
impl ComparableValue for f64 {}
impl ComparableValue for String {}

impl NumericValue for i32 {}
impl NumericValue for i64 {}
impl NumericValue for f64 {}

/// Typed expression: an untyped node plus the Rust type it resolves to
pub struct Expr<T> {
    node: ExprNode,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Expr<T> {
    fn clone(&self) -> Self {
        Expr {
            node: self.node.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Expr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Expr").field(&self.node).finish()
    }
}

/// Operand position accepting either an expression or a literal.
///
/// Literals are wrapped into the constant kind matching their value
/// category.
pub trait IntoExpr<T> {
    fn into_expr(self) -> Expr<T>;
}

impl<T> IntoExpr<T> for Expr<T> {
    fn into_expr(self) -> Expr<T> {
        self
    }
}

impl<T> IntoExpr<T> for &Expr<T> {
    fn into_expr(self) -> Expr<T> {
        self.clone()
    }
}

impl<T: ExprValue> IntoExpr<T> for T {
    fn into_expr(self) -> Expr<T> {
        Expr::constant(&self)
    }
}

impl IntoExpr<String> for &str {
    fn into_expr(self) -> Expr<String> {
        Expr::constant(&self.to_string())
    }
}

impl<T> Expr<T> {
    pub(crate) fn wrap(node: ExprNode) -> Self {
        Expr {
            node,
            _marker: PhantomData,
        }
    }

    /// Reattach a typed view to an untyped node, e.g. one reconstructed
    /// from the wire form. The caller asserts the node resolves to `T`;
    /// use `result_type` to check when in doubt.
    pub fn from_node_unchecked(node: ExprNode) -> Self {
        Expr::wrap(node)
    }

    pub fn node(&self) -> &ExprNode {
        &self.node
    }

    pub fn into_node(self) -> ExprNode {
        self.node
    }
}

impl<T: ExprValue> Expr<T> {
    /// Placeholder for an unbound input of type `T`
    pub fn argument() -> Self {
        Expr::wrap(ExprNode::argument(
            T::category().argument_kind(),
            T::data_type(),
        ))
    }

    /// Literal constant; the declared type derives from the literal
    pub fn constant(value: &T) -> Self {
        Expr::wrap(ExprNode::constant(
            T::category().constant_kind(),
            value.to_value(),
        ))
    }

    pub fn eq(&self, other: impl IntoExpr<T>) -> Expr<bool> {
        Expr::wrap(ExprNode::binary(
            NodeKind::Equals,
            self.node.clone(),
            other.into_expr().node,
        ))
    }

    pub fn not_eq(&self, other: impl IntoExpr<T>) -> Expr<bool> {
        self.eq(other).not()
    }

    pub fn is_null(&self) -> Expr<bool> {
        Expr::wrap(ExprNode::unary(NodeKind::IsNull, self.node.clone()))
    }

    pub fn is_not_null(&self) -> Expr<bool> {
        self.is_null().not()
    }

    /// Membership test against a literal set
    pub fn in_values(&self, values: impl IntoIterator<Item = T>) -> Expr<bool> {
        let items: Vec<Value> = values.into_iter().map(|v| v.to_value()).collect();
        Expr::wrap(ExprNode::binary(
            NodeKind::ValueIn,
            self.node.clone(),
            ExprNode::constant(NodeKind::CollectionConstant, Value::List(items)),
        ))
    }

    /// Rebase an expression onto this one: `f` builds the second stage
    /// against an argument standing for this expression's result
    pub fn compose<R: ExprValue>(&self, f: impl FnOnce(Expr<T>) -> Expr<R>) -> Expr<R> {
        let inner = f(Expr::<T>::argument());
        Expr::wrap(ExprNode::composed(
            R::category().composition_kind(),
            self.node.clone(),
            inner.node,
        ))
    }
}

impl<T: Entity + ExprValue> Expr<T> {
    /// Argument node standing for the entity itself
    pub fn root() -> Self {
        Expr::argument()
    }

    /// Read a property, resolving it against the entity descriptor at
    /// construction time. Fails if the name is unknown or its declared
    /// type is not `P`.
    pub fn get<P: ExprValue>(&self, name: &str) -> ExprResult<Expr<P>> {
        let descriptor = T::descriptor();
        let prop = descriptor
            .property(name)
            .ok_or_else(|| ExprError::UnresolvedProperty {
                entity: descriptor.type_name.clone(),
                name: name.to_string(),
            })?;
        if prop.data_type != P::data_type() {
            return Err(ExprError::TypeMismatch {
                expected: P::data_type(),
                actual: Some(prop.data_type.clone()),
                context: format!("property '{}' of {}", name, descriptor.type_name),
            });
        }
        Ok(Expr::wrap(ExprNode::property(
            P::category().property_kind(),
            self.node.clone(),
            prop.into(),
        )))
    }
}

impl Expr<bool> {
    pub fn and(&self, other: impl IntoExpr<bool>) -> Expr<bool> {
        Expr::wrap(ExprNode::binary(
            NodeKind::And,
            self.node.clone(),
            other.into_expr().node,
        ))
    }

    pub fn or(&self, other: impl IntoExpr<bool>) -> Expr<bool> {
        Expr::wrap(ExprNode::binary(
            NodeKind::Or,
            self.node.clone(),
            other.into_expr().node,
        ))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(&self) -> Expr<bool> {
        Expr::wrap(ExprNode::unary(NodeKind::Not, self.node.clone()))
    }
}

impl<T: ComparableValue> Expr<T> {
    pub fn less_than(&self, other: impl IntoExpr<T>) -> Expr<bool> {
        Expr::wrap(ExprNode::binary(
            NodeKind::LessThan,
            self.node.clone(),
            other.into_expr().node,
        ))
    }

    pub fn greater_than(&self, other: impl IntoExpr<T>) -> Expr<bool> {
        Expr::wrap(ExprNode::binary(
            NodeKind::GreaterThan,
            self.node.clone(),
            other.into_expr().node,
        ))
    }

    pub fn less_or_equal(&self, other: impl IntoExpr<T>) -> Expr<bool> {
        self.greater_than(other).not()
    }

    pub fn greater_or_equal(&self, other: impl IntoExpr<T>) -> Expr<bool> {
        self.less_than(other).not()
    }

    /// `min < self < max`, built from the two strict comparisons
    pub fn between_exclusive(
        &self,
        min: impl IntoExpr<T>,
        max: impl IntoExpr<T>,
    ) -> Expr<bool> {
        self.greater_than(min).and(self.less_than(max))
    }

    /// `min <= self <= max`, built as the negated exclusion so backends
    /// only need `<`, `>`, `not` and `or`
    pub fn between_inclusive(
        &self,
        min: impl IntoExpr<T>,
        max: impl IntoExpr<T>,
    ) -> Expr<bool> {
        self.less_than(min).or(self.greater_than(max)).not()
    }
}

impl<T: NumericValue> Expr<T> {
    /// Result type follows the left operand; mixed widths are not widened
    pub fn add<R: NumericValue>(&self, rhs: impl IntoExpr<R>) -> Expr<T> {
        Expr::wrap(ExprNode::binary(
            NodeKind::Add,
            self.node.clone(),
            rhs.into_expr().node,
        ))
    }

    pub fn sub<R: NumericValue>(&self, rhs: impl IntoExpr<R>) -> Expr<T> {
        Expr::wrap(ExprNode::binary(
            NodeKind::Sub,
            self.node.clone(),
            rhs.into_expr().node,
        ))
    }

    pub fn mul<R: NumericValue>(&self, rhs: impl IntoExpr<R>) -> Expr<T> {
        Expr::wrap(ExprNode::binary(
            NodeKind::Mul,
            self.node.clone(),
            rhs.into_expr().node,
        ))
    }

    pub fn div<R: NumericValue>(&self, rhs: impl IntoExpr<R>) -> Expr<T> {
        Expr::wrap(ExprNode::binary(
            NodeKind::Div,
            self.node.clone(),
            rhs.into_expr().node,
        ))
    }

    pub fn negate(&self) -> Expr<T> {
        Expr::wrap(ExprNode::unary(NodeKind::Negate, self.node.clone()))
    }
}

impl Expr<String> {
    pub fn concat(&self, other: impl IntoExpr<String>) -> Expr<String> {
        Expr::wrap(ExprNode::binary(
            NodeKind::Concat,
            self.node.clone(),
            other.into_expr().node,
        ))
    }

    pub fn to_lower(&self) -> Expr<String> {
        Expr::wrap(ExprNode::unary(NodeKind::ToLower, self.node.clone()))
    }

    pub fn to_upper(&self) -> Expr<String> {
        Expr::wrap(ExprNode::unary(NodeKind::ToUpper, self.node.clone()))
    }

    pub fn trim(&self) -> Expr<String> {
        Expr::wrap(ExprNode::unary(NodeKind::Trim, self.node.clone()))
    }

    pub fn length(&self) -> Expr<i32> {
        Expr::wrap(ExprNode::unary(NodeKind::Length, self.node.clone()))
    }

    pub fn starts_with(&self, prefix: impl IntoExpr<String>) -> Expr<bool> {
        Expr::wrap(ExprNode::binary(
            NodeKind::StartsWith,
            self.node.clone(),
            prefix.into_expr().node,
        ))
    }

    pub fn ends_with(&self, suffix: impl IntoExpr<String>) -> Expr<bool> {
        Expr::wrap(ExprNode::binary(
            NodeKind::EndsWith,
            self.node.clone(),
            suffix.into_expr().node,
        ))
    }

    pub fn contains(&self, needle: impl IntoExpr<String>) -> Expr<bool> {
        Expr::wrap(ExprNode::binary(
            NodeKind::ContainsString,
            self.node.clone(),
            needle.into_expr().node,
        ))
    }

    /// Full-string regular-expression match
    pub fn matches(&self, pattern: impl IntoExpr<String>) -> Expr<bool> {
        Expr::wrap(ExprNode::binary(
            NodeKind::Matches,
            self.node.clone(),
            pattern.into_expr().node,
        ))
    }
}

impl<E: ExprValue> Expr<Vec<E>> {
    pub fn contains_item(&self, item: impl IntoExpr<E>) -> Expr<bool> {
        Expr::wrap(ExprNode::binary(
            NodeKind::ContainsElement,
            self.node.clone(),
            item.into_expr().node,
        ))
    }

    pub fn is_empty(&self) -> Expr<bool> {
        Expr::wrap(ExprNode::unary(NodeKind::IsEmpty, self.node.clone()))
    }

    pub fn is_not_empty(&self) -> Expr<bool> {
        self.is_empty().not()
    }

    /// Apply `f` to each element; `f` receives an argument standing for
    /// one element
    pub fn map<R: ExprValue>(&self, f: impl FnOnce(Expr<E>) -> Expr<R>) -> Expr<Vec<R>> {
        let operation = f(Expr::<E>::argument());
        Expr::wrap(ExprNode::collection(
            NodeKind::MapCollection,
            R::data_type(),
            self.node.clone(),
            operation.node,
        ))
    }

    pub fn flat_map<R: ExprValue>(
        &self,
        f: impl FnOnce(Expr<E>) -> Expr<Vec<R>>,
    ) -> Expr<Vec<R>> {
        let operation = f(Expr::<E>::argument());
        Expr::wrap(ExprNode::collection(
            NodeKind::FlatMapCollection,
            R::data_type(),
            self.node.clone(),
            operation.node,
        ))
    }

    pub fn filter(&self, f: impl FnOnce(Expr<E>) -> Expr<bool>) -> Expr<Vec<E>> {
        let operation = f(Expr::<E>::argument());
        Expr::wrap(ExprNode::collection(
            NodeKind::FilterCollection,
            E::data_type(),
            self.node.clone(),
            operation.node,
        ))
    }

    /// Existential quantifier: `filter(cond)` is non-empty
    pub fn any(&self, f: impl FnOnce(Expr<E>) -> Expr<bool>) -> Expr<bool> {
        self.filter(f).is_not_empty()
    }

    /// Universal quantifier: `filter(!cond)` is empty; vacuously true on
    /// an empty source
    pub fn all(&self, f: impl FnOnce(Expr<E>) -> Expr<bool>) -> Expr<bool> {
        self.filter(|e| f(e).not()).is_empty()
    }

    /// Number of elements, as a 64-bit integer regardless of element type
    pub fn count(&self) -> Expr<i64> {
        Expr::wrap(ExprNode::unary(NodeKind::Count, self.node.clone()))
    }
}

impl<E: NumericValue> Expr<Vec<E>> {
    /// Sum of the elements; keeps the element type's width
    pub fn sum(&self) -> Expr<E> {
        Expr::wrap(ExprNode::unary(NodeKind::Sum, self.node.clone()))
    }

    /// Arithmetic mean, always floating-point regardless of element width
    pub fn average(&self) -> Expr<f64> {
        Expr::wrap(ExprNode::unary(NodeKind::Average, self.node.clone()))
    }
}

impl<E: ComparableValue> Expr<Vec<E>> {
    pub fn min(&self) -> Expr<E> {
        Expr::wrap(ExprNode::unary(NodeKind::Min, self.node.clone()))
    }

    pub fn max(&self) -> Expr<E> {
        Expr::wrap(ExprNode::unary(NodeKind::Max, self.node.clone()))
    }
}
