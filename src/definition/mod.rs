//! Author-supplied raw definitions.
//!
//! These are the uncompiled descriptors callers hand to the registry: plain
//! data plus optional opaque resolver callbacks. They are read once during
//! registration and never mutated in place; the listener pipeline folds typed
//! patches over owned copies during compilation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::graph::{GraphType, Resolver};
use crate::registry::Registry;

/// Author-side union type resolver: inspects a runtime value and returns the
/// *name* of the member type it belongs to. The union compiler wraps this so
/// the author never handles concrete type objects.
pub type UnionTypeResolver = Arc<dyn Fn(&Value, &Value) -> String + Send + Sync>;

/// A reference to a type: either a name (optionally suffixed with the `!`
/// non-null marker) resolved against the finalized map at compile time, or a
/// concrete handle passed through unchanged.
#[derive(Clone, Debug)]
pub enum TypeRef {
    Name(String),
    Concrete(GraphType),
}

impl TypeRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeRef::Name(n) => Some(n),
            TypeRef::Concrete(t) => t.name(),
        }
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::Name(name.to_string())
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        TypeRef::Name(name)
    }
}

impl From<GraphType> for TypeRef {
    fn from(ty: GraphType) -> Self {
        TypeRef::Concrete(ty)
    }
}

/// A raw definition: either the descriptor itself or a factory invoked once,
/// at registration time, with the owning registry.
pub enum Definition<T> {
    Literal(T),
    Deferred(Box<dyn FnOnce(&Registry) -> T + Send>),
}

impl<T> Definition<T> {
    pub fn deferred(factory: impl FnOnce(&Registry) -> T + Send + 'static) -> Self {
        Definition::Deferred(Box::new(factory))
    }

    /// Resolves the definition to its descriptor form. Factories run exactly
    /// once; the result is what enters the pending maps.
    pub fn resolve(self, registry: &Registry) -> T {
        match self {
            Definition::Literal(value) => value,
            Definition::Deferred(factory) => factory(registry),
        }
    }
}

impl<T> From<T> for Definition<T> {
    fn from(value: T) -> Self {
        Definition::Literal(value)
    }
}

impl<T> fmt::Debug for Definition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Literal(_) => f.write_str("Definition::Literal(..)"),
            Definition::Deferred(_) => f.write_str("Definition::Deferred(..)"),
        }
    }
}

/// A raw argument descriptor.
#[derive(Clone)]
pub struct ArgDefinition {
    pub ty: TypeRef,
    pub default_value: Option<Value>,
    pub description: Option<String>,
    pub metadata: Map<String, Value>,
}

impl ArgDefinition {
    pub fn new(ty: impl Into<TypeRef>) -> Self {
        Self {
            ty: ty.into(),
            default_value: None,
            description: None,
            metadata: Map::new(),
        }
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Debug for ArgDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgDefinition")
            .field("ty", &self.ty)
            .field("default_value", &self.default_value)
            .finish_non_exhaustive()
    }
}

/// A raw field descriptor. Queries and mutations are field-shaped and reuse
/// this type.
#[derive(Clone)]
pub struct FieldDefinition {
    pub ty: TypeRef,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    /// `None` means the field declares no arguments at all; `Some` with an
    /// empty map is a field that declares an empty argument list.
    pub args: Option<BTreeMap<String, ArgDefinition>>,
    pub resolver: Option<Resolver>,
    pub metadata: Map<String, Value>,
}

impl FieldDefinition {
    pub fn new(ty: impl Into<TypeRef>) -> Self {
        Self {
            ty: ty.into(),
            description: None,
            deprecation_reason: None,
            args: None,
            resolver: None,
            metadata: Map::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }

    pub fn arg(mut self, name: impl Into<String>, arg: ArgDefinition) -> Self {
        self.args
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), arg);
        self
    }

    pub fn resolver(
        mut self,
        resolver: impl Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("ty", &self.ty)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// A raw object type definition. May carry nested query/mutation declarations
/// which the registry harvests into its global pending maps at registration
/// time, before the type itself compiles.
#[derive(Clone, Debug, Default)]
pub struct TypeDefinition {
    pub name: String,
    pub description: Option<String>,
    pub fields: BTreeMap<String, FieldDefinition>,
    /// Names of interfaces this type implements. Mapped through the finalized
    /// map eagerly at compile time, so interfaces must compile first.
    pub interfaces: Vec<String>,
    pub queries: BTreeMap<String, FieldDefinition>,
    pub mutations: BTreeMap<String, FieldDefinition>,
    pub metadata: Map<String, Value>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, field: FieldDefinition) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn query(mut self, name: impl Into<String>, query: FieldDefinition) -> Self {
        self.queries.insert(name.into(), query);
        self
    }

    pub fn mutation(mut self, name: impl Into<String>, mutation: FieldDefinition) -> Self {
        self.mutations.insert(name.into(), mutation);
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A raw interface definition.
#[derive(Clone, Debug, Default)]
pub struct InterfaceDefinition {
    pub name: String,
    pub description: Option<String>,
    pub fields: BTreeMap<String, FieldDefinition>,
    pub metadata: Map<String, Value>,
}

impl InterfaceDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, field: FieldDefinition) -> Self {
        self.fields.insert(name.into(), field);
        self
    }
}

/// A raw union definition. `types` is optional so that the compiler can
/// report a missing list as a malformed union rather than a shape error.
#[derive(Clone, Default)]
pub struct UnionDefinition {
    pub name: String,
    pub description: Option<String>,
    pub types: Option<Vec<String>>,
    pub resolve_type: Option<UnionTypeResolver>,
    pub metadata: Map<String, Value>,
}

impl UnionDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn types(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn resolve_type(
        mut self,
        resolver: impl Fn(&Value, &Value) -> String + Send + Sync + 'static,
    ) -> Self {
        self.resolve_type = Some(Arc::new(resolver));
        self
    }
}

impl fmt::Debug for UnionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionDefinition")
            .field("name", &self.name)
            .field("types", &self.types)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_builder_distinguishes_absent_args() {
        let bare = FieldDefinition::new("String");
        assert!(bare.args.is_none());

        let with_arg = FieldDefinition::new("String").arg("id", ArgDefinition::new("Int!"));
        assert_eq!(with_arg.args.as_ref().map(BTreeMap::len), Some(1));
    }

    #[test]
    fn test_type_ref_conversions() {
        assert!(matches!(TypeRef::from("Int!"), TypeRef::Name(n) if n == "Int!"));
        let concrete = crate::graph::GraphType::scalar(crate::graph::types::ScalarType::new("X"));
        assert!(matches!(TypeRef::from(concrete), TypeRef::Concrete(_)));
    }
}
