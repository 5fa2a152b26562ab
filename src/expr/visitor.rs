//! Visitor and structural-reduction protocol for compilation backends.
//!
//! Backends fold a tree into their own target value (closure, query text,
//! structured filter) without the node model knowing about any of them.
//! The visitor is keyed by operation shape; the node's kind arrives as
//! data. Reduction walks with an explicit work stack so deeply composed
//! trees cannot exhaust the native stack.

use crate::expr::kind::NodeKind;
use crate::expr::node::ExprNode;
use crate::schema::PropertyRef;
use crate::value::{DataType, Value};

/// Shape-keyed visitor: one method per operation shape
pub trait ExprVisitor<R> {
    fn visit_constant(&mut self, kind: NodeKind, value: &Value) -> R;

    fn visit_argument(&mut self, kind: NodeKind, arg_type: &DataType) -> R;

    fn visit_property(&mut self, kind: NodeKind, target: &ExprNode, property: &PropertyRef) -> R;

    fn visit_unary(&mut self, kind: NodeKind, operand: &ExprNode) -> R;

    fn visit_binary(&mut self, kind: NodeKind, left: &ExprNode, right: &ExprNode) -> R;

    fn visit_collection(
        &mut self,
        kind: NodeKind,
        elem_type: &DataType,
        source: &ExprNode,
        operation: &ExprNode,
    ) -> R;

    fn visit_composed(&mut self, kind: NodeKind, outer: &ExprNode, inner: &ExprNode) -> R;
}

/// Route a node to the visitor method matching its shape
pub fn dispatch<R, V: ExprVisitor<R> + ?Sized>(node: &ExprNode, visitor: &mut V) -> R {
    match node {
        ExprNode::Constant { kind, value } => visitor.visit_constant(*kind, value),
        ExprNode::Argument { kind, arg_type } => visitor.visit_argument(*kind, arg_type),
        ExprNode::Property {
            kind,
            target,
            property,
        } => visitor.visit_property(*kind, target, property),
        ExprNode::Unary { kind, operand } => visitor.visit_unary(*kind, operand),
        ExprNode::Binary { kind, left, right } => visitor.visit_binary(*kind, left, right),
        ExprNode::Collection {
            kind,
            elem_type,
            source,
            operation,
        } => visitor.visit_collection(*kind, elem_type, source, operation),
        ExprNode::Composed { kind, outer, inner } => visitor.visit_composed(*kind, outer, inner),
    }
}

/// Bottom-up structural reduction to a single result type.
///
/// Leaves (constants, arguments) reduce on their own; one-child shapes
/// (unary operators, property access) fold through `reduce_unary`;
/// two-child shapes (binary operators, collection operators, composition)
/// fold through `reduce_binary`. The node is passed alongside the child
/// results so reducers can read kinds, property names, or declared types.
pub trait TreeReducer {
    type Output;

    fn reduce_leaf(&mut self, node: &ExprNode) -> Self::Output;

    fn reduce_unary(&mut self, node: &ExprNode, operand: Self::Output) -> Self::Output;

    fn reduce_binary(
        &mut self,
        node: &ExprNode,
        left: Self::Output,
        right: Self::Output,
    ) -> Self::Output;
}

/// Post-order fold of a tree, iterative
pub fn reduce<T: TreeReducer>(root: &ExprNode, reducer: &mut T) -> T::Output {
    enum Frame<'a> {
        Enter(&'a ExprNode),
        Exit(&'a ExprNode),
    }

    let mut work = vec![Frame::Enter(root)];
    let mut results: Vec<T::Output> = Vec::new();

    while let Some(frame) = work.pop() {
        match frame {
            Frame::Enter(node) => {
                work.push(Frame::Exit(node));
                // Reversed so the leftmost child is reduced first
                for child in node.children().into_iter().rev() {
                    work.push(Frame::Enter(child));
                }
            }
            Frame::Exit(node) => {
                let arity = node.children().len();
                let folded = match arity {
                    0 => reducer.reduce_leaf(node),
                    1 => {
                        let operand = results.pop().expect("reduction stack underflow");
                        reducer.reduce_unary(node, operand)
                    }
                    _ => {
                        let right = results.pop().expect("reduction stack underflow");
                        let left = results.pop().expect("reduction stack underflow");
                        reducer.reduce_binary(node, left, right)
                    }
                };
                results.push(folded);
            }
        }
    }

    results.pop().expect("reduction produced no result")
}

struct PropertyCollector {
    names: Vec<String>,
}

impl TreeReducer for PropertyCollector {
    type Output = ();

    fn reduce_leaf(&mut self, _node: &ExprNode) {}

    fn reduce_unary(&mut self, node: &ExprNode, _operand: ()) {
        if let ExprNode::Property { property, .. } = node {
            if !self.names.contains(&property.name) {
                self.names.push(property.name.clone());
            }
        }
    }

    fn reduce_binary(&mut self, _node: &ExprNode, _left: (), _right: ()) {}
}

/// Names of all properties a tree reads, in first-reference order
pub fn referenced_properties(node: &ExprNode) -> Vec<String> {
    let mut collector = PropertyCollector { names: Vec::new() };
    reduce(node, &mut collector);
    collector.names
}
