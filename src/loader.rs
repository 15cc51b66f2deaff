//! JSON definition loading.
//!
//! Type, interface, union, query and mutation definitions can be supplied as
//! JSON documents. Each document deserializes into a `Json*Definition` struct
//! and converts into the same raw definition the typed builder API produces
//! (resolver-less). Shape problems fail with `SchemaError::Shape`; a union
//! whose `types` property is not an array fails with the not-a-sequence arm
//! of `MalformedUnion` so it reads the same as a compile-time union failure.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::definition::{
    ArgDefinition, FieldDefinition, InterfaceDefinition, TypeDefinition, UnionDefinition,
};
use crate::error::{MalformedUnionReason, Result, SchemaError};

/// JSON representation of an argument definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonArgDefinition {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// JSON representation of a field, query or mutation definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonFieldDefinition {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
    #[serde(default)]
    pub args: Option<BTreeMap<String, JsonArgDefinition>>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// JSON representation of a type definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonTypeDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, JsonFieldDefinition>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub queries: BTreeMap<String, JsonFieldDefinition>,
    #[serde(default)]
    pub mutations: BTreeMap<String, JsonFieldDefinition>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// JSON representation of an interface definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonInterfaceDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, JsonFieldDefinition>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// JSON representation of a union definition. `types` stays untyped here so a
/// non-array value surfaces as a malformed union rather than a parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonUnionDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub types: Option<Value>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl From<JsonArgDefinition> for ArgDefinition {
    fn from(json: JsonArgDefinition) -> Self {
        let mut arg = ArgDefinition::new(json.ty);
        arg.default_value = json.default_value;
        arg.description = json.description;
        arg.metadata = json.metadata;
        arg
    }
}

impl From<JsonFieldDefinition> for FieldDefinition {
    fn from(json: JsonFieldDefinition) -> Self {
        let mut field = FieldDefinition::new(json.ty);
        field.description = json.description;
        field.deprecation_reason = json.deprecation_reason;
        field.args = json
            .args
            .map(|args| args.into_iter().map(|(name, arg)| (name, arg.into())).collect());
        field.metadata = json.metadata;
        field
    }
}

impl From<JsonTypeDefinition> for TypeDefinition {
    fn from(json: JsonTypeDefinition) -> Self {
        let mut def = TypeDefinition::new(json.name);
        def.description = json.description;
        def.fields = convert_fields(json.fields);
        def.interfaces = json.interfaces;
        def.queries = convert_fields(json.queries);
        def.mutations = convert_fields(json.mutations);
        def.metadata = json.metadata;
        def
    }
}

impl From<JsonInterfaceDefinition> for InterfaceDefinition {
    fn from(json: JsonInterfaceDefinition) -> Self {
        let mut def = InterfaceDefinition::new(json.name);
        def.description = json.description;
        def.fields = convert_fields(json.fields);
        def.metadata = json.metadata;
        def
    }
}

impl TryFrom<JsonUnionDefinition> for UnionDefinition {
    type Error = SchemaError;

    fn try_from(json: JsonUnionDefinition) -> Result<Self> {
        let mut def = UnionDefinition::new(json.name.clone());
        def.description = json.description;
        def.metadata = json.metadata;
        def.types = match json.types {
            None => None,
            Some(Value::Array(members)) => Some(
                members
                    .iter()
                    .map(|member| {
                        member
                            .as_str()
                            .map(str::to_string)
                            .ok_or_else(|| shape_error("a member type name", member))
                    })
                    .collect::<Result<Vec<String>>>()?,
            ),
            Some(other) => {
                return Err(SchemaError::MalformedUnion {
                    name: json.name,
                    reason: MalformedUnionReason::NotASequence {
                        got: kind_of(&other).to_string(),
                    },
                })
            }
        };
        Ok(def)
    }
}

fn convert_fields(
    fields: BTreeMap<String, JsonFieldDefinition>,
) -> BTreeMap<String, FieldDefinition> {
    fields
        .into_iter()
        .map(|(name, field)| (name, field.into()))
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn shape_error(expected: &str, got: &Value) -> SchemaError {
    SchemaError::Shape {
        expected: expected.to_string(),
        got: kind_of(got).to_string(),
    }
}

fn deserialize<T: DeserializeOwned>(value: &Value, expected: &str) -> Result<T> {
    if !value.is_object() {
        return Err(shape_error(expected, value));
    }
    serde_json::from_value(value.clone()).map_err(|err| SchemaError::Shape {
        expected: expected.to_string(),
        got: err.to_string(),
    })
}

/// Parses a JSON type definition.
pub fn type_from_value(value: &Value) -> Result<TypeDefinition> {
    let json: JsonTypeDefinition = deserialize(value, "a type definition object")?;
    Ok(json.into())
}

/// Parses a JSON interface definition.
pub fn interface_from_value(value: &Value) -> Result<InterfaceDefinition> {
    let json: JsonInterfaceDefinition = deserialize(value, "an interface definition object")?;
    Ok(json.into())
}

/// Parses a JSON union definition.
pub fn union_from_value(value: &Value) -> Result<UnionDefinition> {
    let json: JsonUnionDefinition = deserialize(value, "a union definition object")?;
    json.try_into()
}

/// Parses a JSON operation (query or mutation) definition, which is
/// field-shaped.
pub fn operation_from_value(value: &Value) -> Result<FieldDefinition> {
    let json: JsonFieldDefinition = deserialize(value, "an operation definition object")?;
    Ok(json.into())
}
