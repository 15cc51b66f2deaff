//! The union compiler.
//!
//! Its defining behavior is the type-resolver indirection: the author's
//! `resolve_type` callback deals only in type names, and the compiled union
//! maps the returned name through a snapshot of the finalized map before the
//! handle reaches the engine. The snapshot is safe because the registry
//! compiles every object type before any union.

use std::sync::{Arc, RwLock};

use crate::definition::UnionDefinition;
use crate::error::{MalformedUnionReason, Result, SchemaError};
use crate::graph::types::UnionType;
use crate::graph::{GraphType, TypeMap, TypeResolver};
use crate::pipeline::{self, Hooks, StageContext};

use super::read_types;

/// Compiles a raw union definition into a concrete union handle.
///
/// # Errors
/// `MalformedUnion` when the definition carries no `types` list;
/// `UnknownType` when a member name has no finalized entry.
pub fn compile_union(
    def: UnionDefinition,
    finalized: &Arc<RwLock<TypeMap>>,
    hooks: &Arc<Hooks>,
) -> Result<GraphType> {
    let name = def.name.clone();
    let types = read_types(finalized);
    let ctx = StageContext {
        name: None,
        owner: None,
        types: &types,
    };
    let def = pipeline::fold(def, &hooks.union.snapshot(), &ctx);

    let member_names = def.types.ok_or_else(|| SchemaError::MalformedUnion {
        name: name.clone(),
        reason: MalformedUnionReason::MissingTypes,
    })?;

    let members = member_names
        .iter()
        .map(|member| {
            types
                .get(member.as_str())
                .cloned()
                .ok_or_else(|| SchemaError::UnknownType {
                    name: member.clone(),
                })
        })
        .collect::<Result<Vec<GraphType>>>()?;

    let resolver = def.resolve_type.map(|author| {
        let snapshot: TypeMap = types.clone();
        let resolver: TypeResolver = Arc::new(move |value, info| {
            let type_name = author(value, info);
            snapshot
                .get(&type_name)
                .cloned()
                .ok_or(SchemaError::UnknownType { name: type_name })
        });
        resolver
    });
    drop(types);

    Ok(GraphType::Union(Arc::new(UnionType::new(
        name,
        def.description,
        def.metadata,
        members,
        resolver,
    ))))
}
