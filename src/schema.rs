//! Entity descriptors: the property registry consumed by property nodes.

use crate::value::{DataType, Record, Value};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Metadata for one property of an entity type
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub data_type: DataType,
    pub is_key: bool,
    pub is_nullable: bool,
    /// Name of the referenced entity type, if this property points at one
    pub reference: Option<String>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_key: false,
            is_nullable: false,
            reference: None,
        }
    }

    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    pub fn reference_to(mut self, entity: impl Into<String>) -> Self {
        let entity = entity.into();
        self.data_type = DataType::Entity(entity.clone());
        self.reference = Some(entity);
        self
    }
}

/// Ordered property registry for one entity type
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDescriptor {
    pub type_name: String,
    pub properties: Vec<PropertyDescriptor>,
}

impl EntityDescriptor {
    pub fn new(type_name: impl Into<String>, properties: Vec<PropertyDescriptor>) -> Result<Self> {
        let type_name = type_name.into();
        for (i, prop) in properties.iter().enumerate() {
            if properties[..i].iter().any(|p| p.name == prop.name) {
                bail!(
                    "Duplicate property '{}' in entity descriptor '{}'",
                    prop.name,
                    type_name
                );
            }
        }
        Ok(Self {
            type_name,
            properties,
        })
    }

    /// Look up a property by name
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Name and declared type of a property, as carried inside property nodes.
///
/// This is the part of the descriptor an expression tree needs after
/// construction; the rest (key/nullable/reference flags) stays behind in
/// the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRef {
    pub name: String,
    pub data_type: DataType,
}

impl From<&PropertyDescriptor> for PropertyRef {
    fn from(desc: &PropertyDescriptor) -> Self {
        Self {
            name: desc.name.clone(),
            data_type: desc.data_type.clone(),
        }
    }
}

/// Rust-side view of an entity type: its descriptor plus conversion to the
/// record form the interpreter reads properties from.
pub trait Entity {
    fn type_name() -> &'static str;

    fn descriptor() -> EntityDescriptor;

    /// Convert this instance into a record of property values
    fn to_record(&self) -> Record;

    fn to_value(&self) -> Value {
        Value::Record(self.to_record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_descriptor() -> EntityDescriptor {
        EntityDescriptor::new(
            "Product",
            vec![
                PropertyDescriptor::new("id", DataType::Int64).key(),
                PropertyDescriptor::new("name", DataType::Text),
                PropertyDescriptor::new("price", DataType::Int32),
                PropertyDescriptor::new("vendor", DataType::Text).reference_to("Vendor"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_property_lookup() {
        let desc = product_descriptor();
        let name = desc.property("name").unwrap();
        assert_eq!(name.data_type, DataType::Text);
        assert!(!name.is_key);

        let id = desc.property("id").unwrap();
        assert!(id.is_key);

        assert!(desc.property("missing").is_none());
    }

    #[test]
    fn test_reference_property() {
        let desc = product_descriptor();
        let vendor = desc.property("vendor").unwrap();
        assert_eq!(vendor.reference.as_deref(), Some("Vendor"));
        assert_eq!(vendor.data_type, DataType::Entity("Vendor".to_string()));
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let result = EntityDescriptor::new(
            "Broken",
            vec![
                PropertyDescriptor::new("x", DataType::Int32),
                PropertyDescriptor::new("x", DataType::Text),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_property_ref_from_descriptor() {
        let desc = product_descriptor();
        let prop: PropertyRef = desc.property("price").unwrap().into();
        assert_eq!(prop.name, "price");
        assert_eq!(prop.data_type, DataType::Int32);
    }
}
