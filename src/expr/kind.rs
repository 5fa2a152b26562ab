//! The closed set of expression node kinds and their static tables.
//!
//! A node's kind is the sole discriminator for serialization and dispatch.
//! The kind fixes the node's operation shape and value category; both are
//! static tables here, never per-instance state.

/// Operation shape of a node: how many and which operands it carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpShape {
    Constant,
    Argument,
    Property,
    Unary,
    Binary,
    Collection,
    Composition,
}

/// Coarse static type class deciding which typed operators a node supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueCategory {
    Object,
    Boolean,
    Comparable,
    Numeric,
    String,
    Collection,
}

impl ValueCategory {
    /// Constant kind for literals of this category
    pub fn constant_kind(self) -> NodeKind {
        match self {
            ValueCategory::Object => NodeKind::Constant,
            ValueCategory::Boolean => NodeKind::BooleanConstant,
            ValueCategory::Comparable => NodeKind::ComparableConstant,
            ValueCategory::Numeric => NodeKind::NumericConstant,
            ValueCategory::String => NodeKind::StringConstant,
            ValueCategory::Collection => NodeKind::CollectionConstant,
        }
    }

    /// Argument kind for placeholders of this category
    pub fn argument_kind(self) -> NodeKind {
        match self {
            ValueCategory::Object => NodeKind::Argument,
            ValueCategory::Boolean => NodeKind::BooleanArgument,
            ValueCategory::Comparable => NodeKind::ComparableArgument,
            ValueCategory::Numeric => NodeKind::NumericArgument,
            ValueCategory::String => NodeKind::StringArgument,
            ValueCategory::Collection => NodeKind::CollectionArgument,
        }
    }

    /// Property kind for properties declared with this category
    pub fn property_kind(self) -> NodeKind {
        match self {
            ValueCategory::Object => NodeKind::Property,
            ValueCategory::Boolean => NodeKind::BooleanProperty,
            ValueCategory::Comparable => NodeKind::ComparableProperty,
            ValueCategory::Numeric => NodeKind::NumericProperty,
            ValueCategory::String => NodeKind::StringProperty,
            ValueCategory::Collection => NodeKind::CollectionProperty,
        }
    }

    /// Composition kind producing this category
    pub fn composition_kind(self) -> NodeKind {
        match self {
            ValueCategory::Object => NodeKind::Composition,
            ValueCategory::Boolean => NodeKind::BooleanComposition,
            ValueCategory::Comparable => NodeKind::ComparableComposition,
            ValueCategory::Numeric => NodeKind::NumericComposition,
            ValueCategory::String => NodeKind::StringComposition,
            ValueCategory::Collection => NodeKind::CollectionComposition,
        }
    }
}

/// Discriminator for the closed set of expression operations.
///
/// The category-specialized variants (e.g. `ComparableProperty` vs plain
/// `Property`) exist so construction can hand out only the operators legal
/// for that category; their operand shape and evaluation rule are identical
/// to the base variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Logic
    And,
    Or,
    Not,
    Equals,
    IsNull,
    ValueIn,

    // Ordering
    LessThan,
    GreaterThan,

    // String
    Concat,
    ToLower,
    ToUpper,
    Trim,
    StartsWith,
    EndsWith,
    ContainsString,
    Matches,
    Length,

    // Arithmetic
    Negate,
    Add,
    Sub,
    Mul,
    Div,

    // Property access
    Property,
    ComparableProperty,
    NumericProperty,
    StringProperty,
    BooleanProperty,
    CollectionProperty,

    // Constants
    Constant,
    ComparableConstant,
    NumericConstant,
    StringConstant,
    BooleanConstant,
    CollectionConstant,

    // Arguments
    Argument,
    ComparableArgument,
    NumericArgument,
    StringArgument,
    BooleanArgument,
    CollectionArgument,

    // Collection operators
    MapCollection,
    FlatMapCollection,
    FilterCollection,
    IsEmpty,
    ContainsElement,

    // Composition
    Composition,
    ComparableComposition,
    NumericComposition,
    StringComposition,
    BooleanComposition,
    CollectionComposition,

    // Aggregates
    Count,
    Sum,
    Average,
    Min,
    Max,
}

impl NodeKind {
    /// Operation shape this kind requires of its node
    pub fn shape(self) -> OpShape {
        match self {
            NodeKind::And
            | NodeKind::Or
            | NodeKind::Equals
            | NodeKind::ValueIn
            | NodeKind::LessThan
            | NodeKind::GreaterThan
            | NodeKind::Concat
            | NodeKind::StartsWith
            | NodeKind::EndsWith
            | NodeKind::ContainsString
            | NodeKind::Matches
            | NodeKind::Add
            | NodeKind::Sub
            | NodeKind::Mul
            | NodeKind::Div
            | NodeKind::ContainsElement => OpShape::Binary,

            NodeKind::Not
            | NodeKind::IsNull
            | NodeKind::ToLower
            | NodeKind::ToUpper
            | NodeKind::Trim
            | NodeKind::Length
            | NodeKind::Negate
            | NodeKind::IsEmpty
            | NodeKind::Count
            | NodeKind::Sum
            | NodeKind::Average
            | NodeKind::Min
            | NodeKind::Max => OpShape::Unary,

            NodeKind::Property
            | NodeKind::ComparableProperty
            | NodeKind::NumericProperty
            | NodeKind::StringProperty
            | NodeKind::BooleanProperty
            | NodeKind::CollectionProperty => OpShape::Property,

            NodeKind::Constant
            | NodeKind::ComparableConstant
            | NodeKind::NumericConstant
            | NodeKind::StringConstant
            | NodeKind::BooleanConstant
            | NodeKind::CollectionConstant => OpShape::Constant,

            NodeKind::Argument
            | NodeKind::ComparableArgument
            | NodeKind::NumericArgument
            | NodeKind::StringArgument
            | NodeKind::BooleanArgument
            | NodeKind::CollectionArgument => OpShape::Argument,

            NodeKind::MapCollection | NodeKind::FlatMapCollection | NodeKind::FilterCollection => {
                OpShape::Collection
            }

            NodeKind::Composition
            | NodeKind::ComparableComposition
            | NodeKind::NumericComposition
            | NodeKind::StringComposition
            | NodeKind::BooleanComposition
            | NodeKind::CollectionComposition => OpShape::Composition,
        }
    }

    /// Value category of the node's result
    pub fn category(self) -> ValueCategory {
        match self {
            NodeKind::And
            | NodeKind::Or
            | NodeKind::Not
            | NodeKind::Equals
            | NodeKind::IsNull
            | NodeKind::ValueIn
            | NodeKind::LessThan
            | NodeKind::GreaterThan
            | NodeKind::StartsWith
            | NodeKind::EndsWith
            | NodeKind::ContainsString
            | NodeKind::Matches
            | NodeKind::IsEmpty
            | NodeKind::ContainsElement
            | NodeKind::BooleanProperty
            | NodeKind::BooleanConstant
            | NodeKind::BooleanArgument
            | NodeKind::BooleanComposition => ValueCategory::Boolean,

            NodeKind::Concat
            | NodeKind::ToLower
            | NodeKind::ToUpper
            | NodeKind::Trim
            | NodeKind::StringProperty
            | NodeKind::StringConstant
            | NodeKind::StringArgument
            | NodeKind::StringComposition => ValueCategory::String,

            NodeKind::Length
            | NodeKind::Negate
            | NodeKind::Add
            | NodeKind::Sub
            | NodeKind::Mul
            | NodeKind::Div
            | NodeKind::NumericProperty
            | NodeKind::NumericConstant
            | NodeKind::NumericArgument
            | NodeKind::NumericComposition
            | NodeKind::Count
            | NodeKind::Sum
            | NodeKind::Average => ValueCategory::Numeric,

            NodeKind::ComparableProperty
            | NodeKind::ComparableConstant
            | NodeKind::ComparableArgument
            | NodeKind::ComparableComposition
            | NodeKind::Min
            | NodeKind::Max => ValueCategory::Comparable,

            NodeKind::CollectionProperty
            | NodeKind::CollectionConstant
            | NodeKind::CollectionArgument
            | NodeKind::CollectionComposition
            | NodeKind::MapCollection
            | NodeKind::FlatMapCollection
            | NodeKind::FilterCollection => ValueCategory::Collection,

            NodeKind::Property
            | NodeKind::Constant
            | NodeKind::Argument
            | NodeKind::Composition => ValueCategory::Object,
        }
    }

    /// Stable lower-camel-case name used as the wire discriminator
    pub fn wire_name(self) -> &'static str {
        match self {
            NodeKind::And => "and",
            NodeKind::Or => "or",
            NodeKind::Not => "not",
            NodeKind::Equals => "equals",
            NodeKind::IsNull => "isNull",
            NodeKind::ValueIn => "valueIn",
            NodeKind::LessThan => "lessThan",
            NodeKind::GreaterThan => "greaterThan",
            NodeKind::Concat => "concat",
            NodeKind::ToLower => "toLower",
            NodeKind::ToUpper => "toUpper",
            NodeKind::Trim => "trim",
            NodeKind::StartsWith => "startsWith",
            NodeKind::EndsWith => "endsWith",
            NodeKind::ContainsString => "containsString",
            NodeKind::Matches => "matches",
            NodeKind::Length => "length",
            NodeKind::Negate => "negate",
            NodeKind::Add => "add",
            NodeKind::Sub => "sub",
            NodeKind::Mul => "mul",
            NodeKind::Div => "div",
            NodeKind::Property => "property",
            NodeKind::ComparableProperty => "comparableProperty",
            NodeKind::NumericProperty => "numericProperty",
            NodeKind::StringProperty => "stringProperty",
            NodeKind::BooleanProperty => "booleanProperty",
            NodeKind::CollectionProperty => "collectionProperty",
            NodeKind::Constant => "constant",
            NodeKind::ComparableConstant => "comparableConstant",
            NodeKind::NumericConstant => "numericConstant",
            NodeKind::StringConstant => "stringConstant",
            NodeKind::BooleanConstant => "booleanConstant",
            NodeKind::CollectionConstant => "collectionConstant",
            NodeKind::Argument => "argument",
            NodeKind::ComparableArgument => "comparableArgument",
            NodeKind::NumericArgument => "numericArgument",
            NodeKind::StringArgument => "stringArgument",
            NodeKind::BooleanArgument => "booleanArgument",
            NodeKind::CollectionArgument => "collectionArgument",
            NodeKind::MapCollection => "mapCollection",
            NodeKind::FlatMapCollection => "flatMapCollection",
            NodeKind::FilterCollection => "filterCollection",
            NodeKind::IsEmpty => "isEmpty",
            NodeKind::ContainsElement => "containsElement",
            NodeKind::Composition => "composition",
            NodeKind::ComparableComposition => "comparableComposition",
            NodeKind::NumericComposition => "numericComposition",
            NodeKind::StringComposition => "stringComposition",
            NodeKind::BooleanComposition => "booleanComposition",
            NodeKind::CollectionComposition => "collectionComposition",
            NodeKind::Count => "count",
            NodeKind::Sum => "sum",
            NodeKind::Average => "average",
            NodeKind::Min => "min",
            NodeKind::Max => "max",
        }
    }

    /// Reverse of [`NodeKind::wire_name`]
    pub fn from_wire_name(name: &str) -> Option<NodeKind> {
        let kind = match name {
            "and" => NodeKind::And,
            "or" => NodeKind::Or,
            "not" => NodeKind::Not,
            "equals" => NodeKind::Equals,
            "isNull" => NodeKind::IsNull,
            "valueIn" => NodeKind::ValueIn,
            "lessThan" => NodeKind::LessThan,
            "greaterThan" => NodeKind::GreaterThan,
            "concat" => NodeKind::Concat,
            "toLower" => NodeKind::ToLower,
            "toUpper" => NodeKind::ToUpper,
            "trim" => NodeKind::Trim,
            "startsWith" => NodeKind::StartsWith,
            "endsWith" => NodeKind::EndsWith,
            "containsString" => NodeKind::ContainsString,
            "matches" => NodeKind::Matches,
            "length" => NodeKind::Length,
            "negate" => NodeKind::Negate,
            "add" => NodeKind::Add,
            "sub" => NodeKind::Sub,
            "mul" => NodeKind::Mul,
            "div" => NodeKind::Div,
            "property" => NodeKind::Property,
            "comparableProperty" => NodeKind::ComparableProperty,
            "numericProperty" => NodeKind::NumericProperty,
            "stringProperty" => NodeKind::StringProperty,
            "booleanProperty" => NodeKind::BooleanProperty,
            "collectionProperty" => NodeKind::CollectionProperty,
            "constant" => NodeKind::Constant,
            "comparableConstant" => NodeKind::ComparableConstant,
            "numericConstant" => NodeKind::NumericConstant,
            "stringConstant" => NodeKind::StringConstant,
            "booleanConstant" => NodeKind::BooleanConstant,
            "collectionConstant" => NodeKind::CollectionConstant,
            "argument" => NodeKind::Argument,
            "comparableArgument" => NodeKind::ComparableArgument,
            "numericArgument" => NodeKind::NumericArgument,
            "stringArgument" => NodeKind::StringArgument,
            "booleanArgument" => NodeKind::BooleanArgument,
            "collectionArgument" => NodeKind::CollectionArgument,
            "mapCollection" => NodeKind::MapCollection,
            "flatMapCollection" => NodeKind::FlatMapCollection,
            "filterCollection" => NodeKind::FilterCollection,
            "isEmpty" => NodeKind::IsEmpty,
            "containsElement" => NodeKind::ContainsElement,
            "composition" => NodeKind::Composition,
            "comparableComposition" => NodeKind::ComparableComposition,
            "numericComposition" => NodeKind::NumericComposition,
            "stringComposition" => NodeKind::StringComposition,
            "booleanComposition" => NodeKind::BooleanComposition,
            "collectionComposition" => NodeKind::CollectionComposition,
            "count" => NodeKind::Count,
            "sum" => NodeKind::Sum,
            "average" => NodeKind::Average,
            "min" => NodeKind::Min,
            "max" => NodeKind::Max,
            _ => return None,
        };
        Some(kind)
    }

    /// All kinds, in declaration order. Handy for table-exhaustiveness tests.
    pub fn all() -> &'static [NodeKind] {
        &[
            NodeKind::And,
            NodeKind::Or,
            NodeKind::Not,
            NodeKind::Equals,
            NodeKind::IsNull,
            NodeKind::ValueIn,
            NodeKind::LessThan,
            NodeKind::GreaterThan,
            NodeKind::Concat,
            NodeKind::ToLower,
            NodeKind::ToUpper,
            NodeKind::Trim,
            NodeKind::StartsWith,
            NodeKind::EndsWith,
            NodeKind::ContainsString,
            NodeKind::Matches,
            NodeKind::Length,
            NodeKind::Negate,
            NodeKind::Add,
            NodeKind::Sub,
            NodeKind::Mul,
            NodeKind::Div,
            NodeKind::Property,
            NodeKind::ComparableProperty,
            NodeKind::NumericProperty,
            NodeKind::StringProperty,
            NodeKind::BooleanProperty,
            NodeKind::CollectionProperty,
            NodeKind::Constant,
            NodeKind::ComparableConstant,
            NodeKind::NumericConstant,
            NodeKind::StringConstant,
            NodeKind::BooleanConstant,
            NodeKind::CollectionConstant,
            NodeKind::Argument,
            NodeKind::ComparableArgument,
            NodeKind::NumericArgument,
            NodeKind::StringArgument,
            NodeKind::BooleanArgument,
            NodeKind::CollectionArgument,
            NodeKind::MapCollection,
            NodeKind::FlatMapCollection,
            NodeKind::FilterCollection,
            NodeKind::IsEmpty,
            NodeKind::ContainsElement,
            NodeKind::Composition,
            NodeKind::ComparableComposition,
            NodeKind::NumericComposition,
            NodeKind::StringComposition,
            NodeKind::BooleanComposition,
            NodeKind::CollectionComposition,
            NodeKind::Count,
            NodeKind::Sum,
            NodeKind::Average,
            NodeKind::Min,
            NodeKind::Max,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for &kind in NodeKind::all() {
            assert_eq!(NodeKind::from_wire_name(kind.wire_name()), Some(kind));
        }
        assert_eq!(NodeKind::from_wire_name("bogus"), None);
    }

    #[test]
    fn test_wire_names_are_lower_camel_case() {
        for &kind in NodeKind::all() {
            let name = kind.wire_name();
            let first = name.chars().next().unwrap();
            assert!(first.is_ascii_lowercase(), "{}", name);
            assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_category_specialized_variants_share_shape() {
        // The typed variants are capability markers, not shape changes
        assert_eq!(NodeKind::Property.shape(), OpShape::Property);
        assert_eq!(NodeKind::StringProperty.shape(), OpShape::Property);
        assert_eq!(NodeKind::Constant.shape(), OpShape::Constant);
        assert_eq!(NodeKind::NumericConstant.shape(), OpShape::Constant);
        assert_eq!(NodeKind::Argument.shape(), OpShape::Argument);
        assert_eq!(NodeKind::CollectionArgument.shape(), OpShape::Argument);
        assert_eq!(NodeKind::Composition.shape(), OpShape::Composition);
        assert_eq!(NodeKind::BooleanComposition.shape(), OpShape::Composition);
    }

    #[test]
    fn test_aggregates_are_unary() {
        for kind in [
            NodeKind::Count,
            NodeKind::Sum,
            NodeKind::Average,
            NodeKind::Min,
            NodeKind::Max,
        ] {
            assert_eq!(kind.shape(), OpShape::Unary);
        }
    }

    #[test]
    fn test_category_helpers_agree_with_table() {
        for cat in [
            ValueCategory::Object,
            ValueCategory::Boolean,
            ValueCategory::Comparable,
            ValueCategory::Numeric,
            ValueCategory::String,
            ValueCategory::Collection,
        ] {
            assert_eq!(cat.constant_kind().category(), cat);
            assert_eq!(cat.argument_kind().category(), cat);
            assert_eq!(cat.property_kind().category(), cat);
            assert_eq!(cat.composition_kind().category(), cat);
        }
    }
}
