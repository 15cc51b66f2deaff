//! The query/mutation compiler.
//!
//! Operations are field-shaped descriptors compiled eagerly when the schema
//! assembles its root containers; they run on their own channels.

use std::fmt;

use crate::definition::FieldDefinition;
use crate::error::Result;
use crate::graph::{CompiledField, TypeMap};
use crate::pipeline::{self, Hooks, StageContext};

use super::arg::compile_args;
use super::resolve::resolve;

/// Which root container an operation belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Query => f.write_str("query"),
            OperationKind::Mutation => f.write_str("mutation"),
        }
    }
}

/// Compiles a single named operation.
pub fn compile_operation(
    kind: OperationKind,
    name: &str,
    def: FieldDefinition,
    types: &TypeMap,
    hooks: &Hooks,
) -> Result<CompiledField> {
    let ctx = StageContext {
        name: Some(name),
        owner: None,
        types,
    };
    let channel = match kind {
        OperationKind::Query => &hooks.query,
        OperationKind::Mutation => &hooks.mutation,
    };
    let def = pipeline::fold(def, &channel.snapshot(), &ctx);

    let args = match &def.args {
        Some(raw_args) => Some(compile_args(raw_args, types, hooks)?),
        None => None,
    };

    Ok(CompiledField {
        name: name.to_string(),
        ty: resolve(&def.ty, types)?,
        description: def.description,
        deprecation_reason: def.deprecation_reason,
        args,
        resolver: def.resolver,
        metadata: def.metadata,
    })
}
