//! The reference resolver: textual type references to concrete handles.

use crate::definition::TypeRef;
use crate::error::{Result, SchemaError};
use crate::graph::{GraphType, TypeMap};

/// Resolves a reference against the finalized map.
///
/// A concrete handle passes through unchanged. A string resolves by bare-name
/// lookup; a trailing `!` resolves the base name and wraps the result in a
/// non-null modifier. Resolution is single-level: list composition is done by
/// embedding a concrete `GraphType::list(..)` handle, never bracket syntax.
///
/// # Errors
/// `UnknownType` when a bare name has no finalized entry.
pub fn resolve(reference: &TypeRef, types: &TypeMap) -> Result<GraphType> {
    match reference {
        TypeRef::Concrete(ty) => Ok(ty.clone()),
        TypeRef::Name(raw) => match raw.strip_suffix('!') {
            Some(base) => Ok(GraphType::non_null(lookup(base, types)?)),
            None => lookup(raw, types),
        },
    }
}

fn lookup(name: &str, types: &TypeMap) -> Result<GraphType> {
    types
        .get(name)
        .cloned()
        .ok_or_else(|| SchemaError::UnknownType {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::ScalarType;

    fn types_with_int() -> TypeMap {
        let mut types = TypeMap::new();
        types.insert("Int".to_string(), GraphType::scalar(ScalarType::new("Int")));
        types
    }

    #[test]
    fn test_bare_name_resolves_to_finalized_entry() {
        let types = types_with_int();
        let resolved = resolve(&TypeRef::from("Int"), &types).unwrap();
        assert_eq!(resolved, types["Int"]);
    }

    #[test]
    fn test_non_null_suffix_wraps_base_resolution() {
        let types = types_with_int();
        let resolved = resolve(&TypeRef::from("Int!"), &types).unwrap();
        assert!(resolved.is_non_null());
        assert_ne!(resolved, types["Int"]);
        assert_eq!(resolved.unwrapped(), &types["Int"]);
    }

    #[test]
    fn test_unknown_name_fails() {
        let types = types_with_int();
        let err = resolve(&TypeRef::from("Missing"), &types).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { name } if name == "Missing"));
    }

    #[test]
    fn test_concrete_handle_passes_through() {
        let types = TypeMap::new();
        let handle = GraphType::list(GraphType::scalar(ScalarType::new("Int")));
        let resolved = resolve(&TypeRef::from(handle.clone()), &types).unwrap();
        assert_eq!(resolved, handle);
    }
}
