//! Concrete graph type handles consumed by the execution engine.
//!
//! This module models the constructor surface of the external graph
//! type-system collaborator: named type objects built from
//! `{name, fields: thunk, interfaces?, resolve_type?, types?}`-shaped
//! descriptors, plus the root [`Schema`] container. Validation and query
//! execution against these handles are the engine's concern, not ours.

pub mod scalars;
pub mod types;

pub use types::{
    CompiledArg, CompiledField, FieldMap, GraphType, InterfaceType, ObjectType, Resolver, ScalarType,
    Schema, TypeMap, TypeResolver, UnionType,
};
