//! The field compiler, shared by object types and interfaces.

use std::collections::BTreeMap;

use crate::definition::FieldDefinition;
use crate::error::Result;
use crate::graph::{CompiledField, FieldMap, GraphType, TypeMap};
use crate::pipeline::{self, Hooks, StageContext};

use super::arg::compile_args;
use super::resolve::resolve;

/// Compiles a raw field map. `owner` is the compiled handle of the type under
/// construction, available to listeners for self-reference; this compiler
/// never mutates it.
pub fn compile_fields(
    raw: &BTreeMap<String, FieldDefinition>,
    owner: Option<&GraphType>,
    types: &TypeMap,
    hooks: &Hooks,
) -> Result<FieldMap> {
    raw.iter()
        .map(|(name, def)| {
            Ok((
                name.clone(),
                compile_field(name, def.clone(), owner, types, hooks)?,
            ))
        })
        .collect()
}

fn compile_field(
    name: &str,
    def: FieldDefinition,
    owner: Option<&GraphType>,
    types: &TypeMap,
    hooks: &Hooks,
) -> Result<CompiledField> {
    let ctx = StageContext {
        name: Some(name),
        owner,
        types,
    };
    let def = pipeline::fold(def, &hooks.field.snapshot(), &ctx);

    // No args key in, no args key out.
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
