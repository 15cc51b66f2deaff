//! The object type compiler.

use std::sync::{Arc, RwLock};

use crate::definition::TypeDefinition;
use crate::error::{Result, SchemaError};
use crate::graph::types::ObjectType;
use crate::graph::{GraphType, TypeMap};
use crate::pipeline::{self, Hooks, StageContext};

use super::field::compile_fields;
use super::read_types;

/// Compiles a raw type definition into a concrete object handle.
///
/// Interface names map through the finalized map eagerly, which is why the
/// registry compiles interfaces first. Field compilation is deferred into a
/// thunk so mutually recursive types resolve regardless of compile order; the
/// thunk re-reads the shared finalized map when the engine first requests
/// fields.
pub fn compile_type(
    def: TypeDefinition,
    finalized: &Arc<RwLock<TypeMap>>,
    hooks: &Arc<Hooks>,
) -> Result<GraphType> {
    let name = def.name.clone();
    let (def, interfaces) = {
        let types = read_types(finalized);
        let ctx = StageContext {
            name: None,
            owner: None,
            types: &types,
        };
        let def = pipeline::fold(def, &hooks.ty.snapshot(), &ctx);

        let interfaces = def
            .interfaces
            .iter()
            .map(|iface| {
                types
                    .get(iface.as_str())
                    .cloned()
                    .ok_or_else(|| SchemaError::UnknownType {
                        name: iface.clone(),
                    })
            })
            .collect::<Result<Vec<GraphType>>>()?;
        (def, interfaces)
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

    Ok(GraphType::Object(Arc::new(ObjectType::new(
        name,
        def.description,
        interfaces,
        def.metadata,
        thunk,
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::FieldDefinition;
    use crate::graph::scalars;
    use crate::pipeline::TypePatch;
    use serde_json::json;

    fn finalized() -> Arc<RwLock<TypeMap>> {
        let mut types = TypeMap::new();
        for scalar in scalars::built_ins() {
            if let Some(name) = scalar.name() {
                types.insert(name.to_string(), scalar.clone());
            }
        }
        Arc::new(RwLock::new(types))
    }

    #[test]
    fn test_type_listener_runs_on_compile() {
        let finalized = finalized();
        let hooks = Arc::new(Hooks::new());
        hooks.ty.append(|_, _| {
            let mut patch = TypePatch::default();
            patch.metadata.insert("seen".to_string(), json!(true));
            patch
        });

        let def = TypeDefinition::new("Simple").field("id", FieldDefinition::new("Int"));
        let compiled = compile_type(def, &finalized, &hooks).unwrap();
        let object = compiled.as_object().unwrap();
        assert_eq!(object.metadata().get("seen"), Some(&json!(true)));
    }

    #[test]
    fn test_unknown_interface_fails_eagerly() {
        let finalized = finalized();
        let hooks = Arc::new(Hooks::new());
        let def = TypeDefinition::new("Simple").implements("Missing");
        let err = compile_type(def, &finalized, &hooks).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { name } if name == "Missing"));
    }

    #[test]
    fn test_fields_defer_until_requested() {
        let finalized = finalized();
        let hooks = Arc::new(Hooks::new());

        // "Other" is not finalized yet when "Simple" compiles.
        let def = TypeDefinition::new("Simple").field("other", FieldDefinition::new("Other"));
        let compiled = compile_type(def, &finalized, &hooks).unwrap();
        {
            let mut types = finalized.write().unwrap();
            types.insert("Simple".to_string(), compiled.clone());
        }

        let other = compile_type(TypeDefinition::new("Other"), &finalized, &hooks).unwrap();
        {
            let mut types = finalized.write().unwrap();
            types.insert("Other".to_string(), other.clone());
        }

        let fields = compiled.as_object().unwrap().fields().unwrap();
        assert_eq!(fields["other"].ty, other);
    }
}
