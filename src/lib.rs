//! GraphForge: a declarative-to-executable compiler for graph-shaped API
//! schemas.
//!
//! Callers register type, interface, union, query and mutation definitions as
//! plain data or factory functions; a single [`Registry::compile`] pass
//! resolves textual type references, runs the listener pipeline at every
//! stage so mounted extensions can rewrite any definition before it is
//! finalized, and assembles an immutable [`Schema`] of cross-referenced
//! concrete type handles for the execution engine.
//!
//! ```
//! use graphforge::{FieldDefinition, Registry, TypeDefinition};
//!
//! let mut registry = Registry::new();
//! registry
//!     .register_type(
//!         TypeDefinition::new("Simple")
//!             .field("id", FieldDefinition::new("Int!"))
//!             .query("simple", FieldDefinition::new("Simple")),
//!         false,
//!     )
//!     .unwrap();
//!
//! let schema = registry.compile().unwrap();
//! assert!(schema.query().is_some());
//! ```

pub mod compiler;
pub mod definition;
pub mod error;
pub mod graph;
pub mod loader;
pub mod pipeline;
pub mod registry;

pub use definition::{
    ArgDefinition, Definition, FieldDefinition, InterfaceDefinition, TypeDefinition, TypeRef,
    UnionDefinition, UnionTypeResolver,
};
pub use error::{MalformedUnionReason, Result, SchemaError};
pub use graph::{CompiledArg, CompiledField, GraphType, Schema};
pub use pipeline::{
    ArgPatch, FieldPatch, Hooks, InterfacePatch, StageContext, TypePatch, UnionPatch,
};
pub use registry::{Capability, CapabilitySet, Extension, Registry, RegistryOptions};
