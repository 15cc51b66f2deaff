//! The interface compiler.

use std::sync::{Arc, RwLock};

use crate::definition::InterfaceDefinition;
use crate::error::Result;
use crate::graph::types::InterfaceType;
use crate::graph::{GraphType, TypeMap};
use crate::pipeline::{self, Hooks, StageContext};

use super::field::compile_fields;
use super::read_types;

/// Compiles a raw interface definition. Fields defer exactly as for object
/// types; interfaces do not implement other interfaces in this model, so
/// there is no eager cross-reference step.
pub fn compile_interface(
    def: InterfaceDefinition,
    finalized: &Arc<RwLock<TypeMap>>,
    hooks: &Arc<Hooks>,
) -> Result<GraphType> {
    let name = def.name.clone();
    let def = {
        let types = read_types(finalized);
        let ctx = StageContext {
            name: None,
            owner: None,
            types: &types,
        };
        pipeline::fold(def, &hooks.interface.snapshot(), &ctx)
    };

    let raw_fields = def.fields;
    let thunk_types = Arc::clone(finalized);
    let thunk_hooks = Arc::clone(hooks);
    let owner_name = name.clone();
    let thunk = Box::new(move || {
        let types = read_types(&thunk_types);
        let owner = types.get(&owner_name).cloned();
        compile_fields(&raw_fields, owner.as_ref(), &types, &thunk_hooks)
    });

    Ok(GraphType::Interface(Arc::new(InterfaceType::new(
        name,
        def.description,
        def.metadata,
        thunk,
    ))))
}
