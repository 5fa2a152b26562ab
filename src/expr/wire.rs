//! JSON wire form for expression trees.
//!
//! Every node serializes as an object with a lowerCamelCase `kind`
//! discriminator plus the fields its shape requires; absent fields are
//! omitted entirely. Deserialization validates the discriminator, the
//! presence of required fields, and bounds tree depth so untrusted input
//! cannot exhaust the stack during reconstruction.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::expr::error::{ExprError, ExprResult};
use crate::expr::kind::{NodeKind, OpShape};
use crate::expr::node::{ExprNode, MAX_TREE_DEPTH};
use crate::schema::PropertyRef;
use crate::value::{DataType, Value};

/// One serialized tree node. A single schema covers every shape; which
/// optional fields are populated depends on the kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireNode {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg_type: Option<DataType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Box<WireNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertyRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operand: Option<Box<WireNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<WireNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<WireNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elem_type: Option<DataType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Box<WireNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<Box<WireNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outer: Option<Box<WireNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner: Option<Box<WireNode>>,
}

impl WireNode {
    fn bare(kind: NodeKind) -> WireNode {
        WireNode {
            kind: kind.wire_name().to_string(),
            value: None,
            arg_type: None,
            target: None,
            property: None,
            operand: None,
            left: None,
            right: None,
            elem_type: None,
            source: None,
            operation: None,
            outer: None,
            inner: None,
        }
    }
}

/// Convert a tree to its wire representation.
///
/// Recurses to the tree's depth; in-process trees are bounded by their
/// construction, so no explicit stack is needed here.
pub fn to_wire(node: &ExprNode) -> WireNode {
    match node {
        ExprNode::Constant { kind, value } => {
            let mut wire = WireNode::bare(*kind);
            wire.value = Some(value.clone());
            wire
        }
        ExprNode::Argument { kind, arg_type } => {
            let mut wire = WireNode::bare(*kind);
            wire.arg_type = Some(arg_type.clone());
            wire
        }
        ExprNode::Property {
            kind,
            target,
            property,
        } => {
            let mut wire = WireNode::bare(*kind);
            wire.target = Some(Box::new(to_wire(target)));
            wire.property = Some(property.clone());
            wire
        }
        ExprNode::Unary { kind, operand } => {
            let mut wire = WireNode::bare(*kind);
            wire.operand = Some(Box::new(to_wire(operand)));
            wire
        }
        ExprNode::Binary { kind, left, right } => {
            let mut wire = WireNode::bare(*kind);
            wire.left = Some(Box::new(to_wire(left)));
            wire.right = Some(Box::new(to_wire(right)));
            wire
        }
        ExprNode::Collection {
            kind,
            elem_type,
            source,
            operation,
        } => {
            let mut wire = WireNode::bare(*kind);
            wire.elem_type = Some(elem_type.clone());
            wire.source = Some(Box::new(to_wire(source)));
            wire.operation = Some(Box::new(to_wire(operation)));
            wire
        }
        ExprNode::Composed { kind, outer, inner } => {
            let mut wire = WireNode::bare(*kind);
            wire.outer = Some(Box::new(to_wire(outer)));
            wire.inner = Some(Box::new(to_wire(inner)));
            wire
        }
    }
}

/// Reconstruct a tree from its wire representation, validating kinds,
/// required fields, and depth
pub fn from_wire(wire: &WireNode) -> ExprResult<ExprNode> {
    from_wire_at(wire, 0)
}

fn require<'a, T>(
    field: &'a Option<T>,
    kind: NodeKind,
    name: &'static str,
) -> ExprResult<&'a T> {
    field
        .as_ref()
        .ok_or(ExprError::MissingField { kind, field: name })
}

fn from_wire_at(wire: &WireNode, depth: usize) -> ExprResult<ExprNode> {
    if depth >= MAX_TREE_DEPTH {
        return Err(ExprError::DepthExceeded {
            max_depth: MAX_TREE_DEPTH,
        });
    }
    let kind = NodeKind::from_wire_name(&wire.kind).ok_or_else(|| ExprError::UnknownKind {
        name: wire.kind.clone(),
    })?;

    let node = match kind.shape() {
        OpShape::Constant => {
            let value = require(&wire.value, kind, "value")?;
            ExprNode::constant(kind, value.clone())
        }
        OpShape::Argument => {
            let arg_type = require(&wire.arg_type, kind, "argType")?;
            ExprNode::argument(kind, arg_type.clone())
        }
        OpShape::Property => {
            let target = require(&wire.target, kind, "target")?;
            let property = require(&wire.property, kind, "property")?;
            ExprNode::property(kind, from_wire_at(target, depth + 1)?, property.clone())
        }
        OpShape::Unary => {
            let operand = require(&wire.operand, kind, "operand")?;
            ExprNode::unary(kind, from_wire_at(operand, depth + 1)?)
        }
        OpShape::Binary => {
            let left = require(&wire.left, kind, "left")?;
            let right = require(&wire.right, kind, "right")?;
            ExprNode::binary(
                kind,
                from_wire_at(left, depth + 1)?,
                from_wire_at(right, depth + 1)?,
            )
        }
        OpShape::Collection => {
            let elem_type = require(&wire.elem_type, kind, "elemType")?;
            let source = require(&wire.source, kind, "source")?;
            let operation = require(&wire.operation, kind, "operation")?;
            ExprNode::collection(
                kind,
                elem_type.clone(),
                from_wire_at(source, depth + 1)?,
                from_wire_at(operation, depth + 1)?,
            )
        }
        OpShape::Composition => {
            let outer = require(&wire.outer, kind, "outer")?;
            let inner = require(&wire.inner, kind, "inner")?;
            ExprNode::composed(
                kind,
                from_wire_at(outer, depth + 1)?,
                from_wire_at(inner, depth + 1)?,
            )
        }
    };
    Ok(node)
}

/// Serialize a tree to a JSON string
pub fn to_json(node: &ExprNode) -> ExprResult<String> {
    serde_json::to_string(&to_wire(node)).map_err(|e| ExprError::Malformed {
        reason: e.to_string(),
    })
}

/// Parse and validate a tree from a JSON string
pub fn from_json(json: &str) -> ExprResult<ExprNode> {
    let wire: WireNode = serde_json::from_str(json).map_err(|e| ExprError::Malformed {
        reason: e.to_string(),
    })?;
    debug!("reconstructing tree rooted at kind '{}'", wire.kind);
    from_wire(&wire)
}
