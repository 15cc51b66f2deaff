//! Built-in scalar types seeded into every registry's finalized map.

use super::types::{GraphType, ScalarType};

pub const INT: &str = "Int";
pub const FLOAT: &str = "Float";
pub const STRING: &str = "String";
pub const BOOLEAN: &str = "Boolean";
pub const ID: &str = "ID";

/// Fresh handles for the built-in scalars. Each registry seeds its own set,
/// so handle identity is stable within one registry but not across them.
pub fn built_ins() -> Vec<GraphType> {
    vec![
        GraphType::scalar(ScalarType::new(INT).with_description("Signed 32-bit integer")),
        GraphType::scalar(ScalarType::new(FLOAT).with_description("Signed double-precision value")),
        GraphType::scalar(ScalarType::new(STRING).with_description("UTF-8 character sequence")),
        GraphType::scalar(ScalarType::new(BOOLEAN).with_description("true or false")),
        GraphType::scalar(ScalarType::new(ID).with_description("Unique identifier")),
    ]
}
