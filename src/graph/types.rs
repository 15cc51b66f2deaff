//! Core type handles produced by the compilation pipeline.
//!
//! A [`GraphType`] is a cheap-to-clone handle: named types are `Arc`-shared
//! and compared by identity, wrapper types (`NonNull`, `List`) structurally.
//! Object and interface field maps are materialized lazily on first access so
//! that mutually recursive types can be compiled in any order.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, RwLock};

use once_cell::sync::OnceCell;
use serde_json::{Map, Value};

use crate::error::Result;

/// The finalized mapping of type names to compiled handles.
pub type TypeMap = HashMap<String, GraphType>;

/// A compiled field map, keyed by field name.
pub type FieldMap = BTreeMap<String, CompiledField>;

/// Opaque field resolver callback, passed through compilation untouched.
/// Invoked by the execution engine with the source value and the argument map.
pub type Resolver = Arc<dyn Fn(&Value, &Value) -> Value + Send + Sync>;

/// Engine-facing union type resolver: maps a runtime value to the concrete
/// member handle it belongs to.
pub type TypeResolver = Arc<dyn Fn(&Value, &Value) -> Result<GraphType> + Send + Sync>;

/// Deferred field-map computation stored on object and interface types.
pub type FieldThunk = Box<dyn Fn() -> Result<FieldMap> + Send + Sync>;

/// A built-in or author-registered scalar.
#[derive(Debug)]
pub struct ScalarType {
    name: String,
    description: Option<String>,
}

impl ScalarType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A compiled object type. Fields materialize on first access.
pub struct ObjectType {
    name: String,
    description: Option<String>,
    interfaces: Vec<GraphType>,
    metadata: Map<String, Value>,
    fields: OnceCell<FieldMap>,
    thunk: FieldThunk,
}

impl ObjectType {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        interfaces: Vec<GraphType>,
        metadata: Map<String, Value>,
        thunk: FieldThunk,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            interfaces,
            metadata,
            fields: OnceCell::new(),
            thunk,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn interfaces(&self) -> &[GraphType] {
        &self.interfaces
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Materializes the field map on first call and caches the result.
    ///
    /// # Errors
    /// Surfaces any reference-resolution failure from the deferred field
    /// compilation, e.g. `UnknownType` for a field naming an unknown type.
    pub fn fields(&self) -> Result<&FieldMap> {
        self.fields.get_or_try_init(|| (self.thunk)())
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectType")
            .field("name", &self.name)
            .field("interfaces", &self.interfaces)
            .finish_non_exhaustive()
    }
}

/// A compiled interface type. Like [`ObjectType`] but interfaces do not
/// implement other interfaces in this model.
pub struct InterfaceType {
    name: String,
    description: Option<String>,
    metadata: Map<String, Value>,
    fields: OnceCell<FieldMap>,
    thunk: FieldThunk,
}

impl InterfaceType {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        metadata: Map<String, Value>,
        thunk: FieldThunk,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            metadata,
            fields: OnceCell::new(),
            thunk,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Materializes the field map on first call and caches the result.
    ///
    /// # Errors
    /// Surfaces any reference-resolution failure from the deferred field
    /// compilation.
    pub fn fields(&self) -> Result<&FieldMap> {
        self.fields.get_or_try_init(|| (self.thunk)())
    }
}

impl fmt::Debug for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A compiled union type with its member handles and the wrapped
/// name-to-handle type resolver.
pub struct UnionType {
    name: String,
    description: Option<String>,
    metadata: Map<String, Value>,
    members: Vec<GraphType>,
    resolver: Option<TypeResolver>,
}

impl UnionType {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        metadata: Map<String, Value>,
        members: Vec<GraphType>,
        resolver: Option<TypeResolver>,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            metadata,
            members,
            resolver,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn members(&self) -> &[GraphType] {
        &self.members
    }

    /// Runs the wrapped type resolver, if the author supplied one. The
    /// author's callback returns a type name; the wrapper maps it to the
    /// concrete member handle.
    pub fn resolve_type(&self, value: &Value, info: &Value) -> Option<Result<GraphType>> {
        self.resolver.as_ref().map(|r| r(value, info))
    }
}

impl fmt::Debug for UnionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionType")
            .field("name", &self.name)
            .field("members", &self.members)
            .finish_non_exhaustive()
    }
}

/// A handle to a compiled type. Named variants share their backing object;
/// wrapper variants compose other handles.
#[derive(Clone, Debug)]
pub enum GraphType {
    Scalar(Arc<ScalarType>),
    Object(Arc<ObjectType>),
    Interface(Arc<InterfaceType>),
    Union(Arc<UnionType>),
    NonNull(Arc<GraphType>),
    List(Arc<GraphType>),
}

impl GraphType {
    pub fn scalar(scalar: ScalarType) -> Self {
        GraphType::Scalar(Arc::new(scalar))
    }

    /// Wraps a handle in a non-null modifier.
    pub fn non_null(inner: GraphType) -> Self {
        GraphType::NonNull(Arc::new(inner))
    }

    /// Wraps a handle in a list modifier. List composition is always done by
    /// embedding the concrete wrapper; string references never parse brackets.
    pub fn list(inner: GraphType) -> Self {
        GraphType::List(Arc::new(inner))
    }

    /// The name of a named type; wrappers have no name of their own.
    pub fn name(&self) -> Option<&str> {
        match self {
            GraphType::Scalar(s) => Some(s.name()),
            GraphType::Object(o) => Some(o.name()),
            GraphType::Interface(i) => Some(i.name()),
            GraphType::Union(u) => Some(u.name()),
            GraphType::NonNull(_) | GraphType::List(_) => None,
        }
    }

    /// Strips wrapper modifiers down to the underlying named type.
    pub fn unwrapped(&self) -> &GraphType {
        match self {
            GraphType::NonNull(inner) | GraphType::List(inner) => inner.unwrapped(),
            _ => self,
        }
    }

    pub fn as_object(&self) -> Option<&Arc<ObjectType>> {
        match self {
            GraphType::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&Arc<InterfaceType>> {
        match self {
            GraphType::Interface(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&Arc<UnionType>> {
        match self {
            GraphType::Union(u) => Some(u),
            _ => None,
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, GraphType::NonNull(_))
    }
}

impl PartialEq for GraphType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (GraphType::Scalar(a), GraphType::Scalar(b)) => Arc::ptr_eq(a, b),
            (GraphType::Object(a), GraphType::Object(b)) => Arc::ptr_eq(a, b),
            (GraphType::Interface(a), GraphType::Interface(b)) => Arc::ptr_eq(a, b),
            (GraphType::Union(a), GraphType::Union(b)) => Arc::ptr_eq(a, b),
            (GraphType::NonNull(a), GraphType::NonNull(b)) => a.as_ref() == b.as_ref(),
            (GraphType::List(a), GraphType::List(b)) => a.as_ref() == b.as_ref(),
            _ => false,
        }
    }
}

impl Eq for GraphType {}

impl fmt::Display for GraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphType::NonNull(inner) => write!(f, "{inner}!"),
            GraphType::List(inner) => write!(f, "[{inner}]"),
            other => write!(f, "{}", other.name().unwrap_or("<anonymous>")),
        }
    }
}

/// A finalized field descriptor, ready for the execution engine.
#[derive(Clone)]
pub struct CompiledField {
    pub name: String,
    pub ty: GraphType,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    /// `None` when the raw field declared no arguments at all, distinguished
    /// from `Some` with an empty map.
    pub args: Option<BTreeMap<String, CompiledArg>>,
    pub resolver: Option<Resolver>,
    /// Side-channel metadata added by listeners during compilation.
    pub metadata: Map<String, Value>,
}

impl fmt::Debug for CompiledField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledField")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// A finalized argument descriptor.
#[derive(Clone, Debug)]
pub struct CompiledArg {
    pub name: String,
    pub ty: GraphType,
    pub default_value: Option<Value>,
    pub description: Option<String>,
    pub metadata: Map<String, Value>,
}

/// The finalized schema: root operation containers plus read access to the
/// compiled type map.
#[derive(Debug)]
pub struct Schema {
    query: Option<GraphType>,
    mutation: Option<GraphType>,
    types: Arc<RwLock<TypeMap>>,
}

impl Schema {
    pub(crate) fn new(
        query: Option<GraphType>,
        mutation: Option<GraphType>,
        types: Arc<RwLock<TypeMap>>,
    ) -> Self {
        Self {
            query,
            mutation,
            types,
        }
    }

    pub fn query(&self) -> Option<&GraphType> {
        self.query.as_ref()
    }

    pub fn mutation(&self) -> Option<&GraphType> {
        self.mutation.as_ref()
    }

    /// Retrieves a compiled type handle by name.
    pub fn get_type(&self, name: &str) -> Option<GraphType> {
        let types = self.types.read().unwrap_or_else(|e| e.into_inner());
        types.get(name).cloned()
    }

    pub fn type_names(&self) -> Vec<String> {
        let types = self.types.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = types.keys().cloned().collect();
        names.sort();
        names
    }
}
