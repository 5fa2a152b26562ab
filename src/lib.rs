pub mod expr;
pub mod schema;
pub mod value;
