//! Value and data-type model shared by expression nodes and backends.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared types an expression can resolve to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataType {
    Boolean,
    Int32,
    Int64,
    Float64,
    Text,
    /// Reference to a named entity type
    Entity(String),
    /// Homogeneous collection of the given element type
    List(Box<DataType>),
}

impl DataType {
    /// Whether values of this type support ordering comparisons
    pub fn is_comparable(&self) -> bool {
        matches!(
            self,
            DataType::Boolean
                | DataType::Int32
                | DataType::Int64
                | DataType::Float64
                | DataType::Text
        )
    }

    /// Whether values of this type support arithmetic
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int32 | DataType::Int64 | DataType::Float64)
    }
}

/// Record form of an entity instance: property name to value
pub type Record = BTreeMap<String, Value>;

/// Values an expression can produce or embed as a literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    String(String),
    List(Vec<Value>),
    Record(Record),
}

impl Value {
    /// Derive the data type of this value from its runtime representation.
    ///
    /// `Null` has no type. An empty list has no derivable element type;
    /// non-empty lists take theirs from the first element. Records resolve
    /// to an entity type only through a descriptor, so they yield `None`
    /// here as well.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Int32(_) => Some(DataType::Int32),
            Value::Int64(_) => Some(DataType::Int64),
            Value::Float64(_) => Some(DataType::Float64),
            Value::String(_) => Some(DataType::Text),
            Value::List(items) => {
                let elem = items.first()?.data_type()?;
                Some(DataType::List(Box::new(elem)))
            }
            Value::Record(_) => None,
        }
    }

    /// Check if this value is compatible with the given data type
    pub fn is_compatible_with(&self, data_type: &DataType) -> bool {
        match (self, data_type) {
            (Value::Null, _) => true, // NULL is compatible with any type
            (Value::Boolean(_), DataType::Boolean) => true,
            (Value::Int32(_), DataType::Int32) => true,
            (Value::Int64(_), DataType::Int64) => true,
            (Value::Float64(_), DataType::Float64) => true,
            (Value::String(_), DataType::Text) => true,
            (Value::Record(_), DataType::Entity(_)) => true,
            (Value::List(items), DataType::List(elem)) => {
                items.iter().all(|item| item.is_compatible_with(elem))
            }
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}
