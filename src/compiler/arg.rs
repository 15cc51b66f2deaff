//! The argument compiler.

use std::collections::BTreeMap;

use crate::definition::ArgDefinition;
use crate::error::Result;
use crate::graph::{CompiledArg, TypeMap};
use crate::pipeline::{self, Hooks, StageContext};

use super::resolve::resolve;

/// Compiles a raw argument map. Empty or absent input yields an empty map,
/// never an error. Default value and description pass through unchanged.
pub fn compile_args(
    raw: &BTreeMap<String, ArgDefinition>,
    types: &TypeMap,
    hooks: &Hooks,
) -> Result<BTreeMap<String, CompiledArg>> {
    raw.iter()
        .map(|(name, def)| Ok((name.clone(), compile_arg(name, def.clone(), types, hooks)?)))
        .collect()
}

fn compile_arg(
    name: &str,
    def: ArgDefinition,
    types: &TypeMap,
    hooks: &Hooks,
) -> Result<CompiledArg> {
    let ctx = StageContext {
        name: Some(name),
        owner: None,
        types,
    };
    let def = pipeline::fold(def, &hooks.arg.snapshot(), &ctx);

    Ok(CompiledArg {
        name: name.to_string(),
        ty: resolve(&def.ty, types)?,
        default_value: def.default_value,
        description: def.description,
        metadata: def.metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::ScalarType;
    use crate::graph::GraphType;
    use crate::pipeline::ArgPatch;
    use serde_json::json;

    fn scalars() -> TypeMap {
        let mut types = TypeMap::new();
        types.insert("Int".to_string(), GraphType::scalar(ScalarType::new("Int")));
        types
    }

    #[test]
    fn test_empty_input_yields_empty_map() {
        let types = scalars();
        let hooks = Hooks::new();
        let compiled = compile_args(&BTreeMap::new(), &types, &hooks).unwrap();
        assert!(compiled.is_empty());
    }

    #[test]
    fn test_properties_pass_through_unchanged() {
        let types = scalars();
        let hooks = Hooks::new();
        let mut raw = BTreeMap::new();
        raw.insert(
            "id".to_string(),
            ArgDefinition::new("Int!")
                .default_value(json!(7))
                .description("primary key"),
        );

        let compiled = compile_args(&raw, &types, &hooks).unwrap();
        let id = &compiled["id"];
        assert!(id.ty.is_non_null());
        assert_eq!(id.default_value, Some(json!(7)));
        assert_eq!(id.description.as_deref(), Some("primary key"));
    }

    #[test]
    fn test_arg_listeners_run_before_resolution() {
        let types = scalars();
        let hooks = Hooks::new();
        hooks.arg.append(|_, _| ArgPatch {
            ty: Some("Int!".into()),
            ..ArgPatch::default()
        });

        let mut raw = BTreeMap::new();
        raw.insert("id".to_string(), ArgDefinition::new("Int"));
        let compiled = compile_args(&raw, &types, &hooks).unwrap();
        assert!(compiled["id"].ty.is_non_null());
    }
}
