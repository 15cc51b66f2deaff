//! Typed patches, one per compilation stage.
//!
//! A patch is the listener's return value: `Some` fields overwrite the
//! current value, `None` fields pass through, metadata entries accumulate.
//! No patch can remove a key or change an entry's name.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::definition::{ArgDefinition, FieldDefinition, TypeRef, UnionTypeResolver};
use crate::graph::Resolver;

use super::StagePatch;

/// Patch for the `arg` channel.
#[derive(Default)]
pub struct ArgPatch {
    pub ty: Option<TypeRef>,
    pub default_value: Option<Value>,
    pub description: Option<String>,
    pub metadata: Map<String, Value>,
}

impl StagePatch<ArgDefinition> for ArgPatch {
    fn apply_to(self, arg: &mut ArgDefinition) {
        if let Some(ty) = self.ty {
            arg.ty = ty;
        }
        if let Some(default_value) = self.default_value {
            arg.default_value = Some(default_value);
        }
        if let Some(description) = self.description {
            arg.description = Some(description);
        }
        arg.metadata.extend(self.metadata);
    }
}

/// Patch for the `field`, `query` and `mutation` channels, which all operate
/// on field-shaped descriptors.
#[derive(Default)]
pub struct FieldPatch {
    pub ty: Option<TypeRef>,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    /// Replaces the whole argument map when present, matching the overwrite
    /// (not merge) semantics of patch fields.
    pub args: Option<BTreeMap<String, ArgDefinition>>,
    pub resolver: Option<Resolver>,
    pub metadata: Map<String, Value>,
}

impl StagePatch<FieldDefinition> for FieldPatch {
    fn apply_to(self, field: &mut FieldDefinition) {
        if let Some(ty) = self.ty {
            field.ty = ty;
        }
        if let Some(description) = self.description {
            field.description = Some(description);
        }
        if let Some(deprecation_reason) = self.deprecation_reason {
            field.deprecation_reason = Some(deprecation_reason);
        }
        if let Some(args) = self.args {
            field.args = Some(args);
        }
        if let Some(resolver) = self.resolver {
            field.resolver = Some(resolver);
        }
        field.metadata.extend(self.metadata);
    }
}

/// Patch for the `type` channel.
#[derive(Default)]
pub struct TypePatch {
    pub description: Option<String>,
    pub fields: Option<BTreeMap<String, FieldDefinition>>,
    pub interfaces: Option<Vec<String>>,
    pub metadata: Map<String, Value>,
}

impl StagePatch<crate::definition::TypeDefinition> for TypePatch {
    fn apply_to(self, ty: &mut crate::definition::TypeDefinition) {
        if let Some(description) = self.description {
            ty.description = Some(description);
        }
        if let Some(fields) = self.fields {
            ty.fields = fields;
        }
        if let Some(interfaces) = self.interfaces {
            ty.interfaces = interfaces;
        }
        ty.metadata.extend(self.metadata);
    }
}

/// Patch for the `interface` channel.
#[derive(Default)]
pub struct InterfacePatch {
    pub description: Option<String>,
    pub fields: Option<BTreeMap<String, FieldDefinition>>,
    pub metadata: Map<String, Value>,
}

impl StagePatch<crate::definition::InterfaceDefinition> for InterfacePatch {
    fn apply_to(self, iface: &mut crate::definition::InterfaceDefinition) {
        if let Some(description) = self.description {
            iface.description = Some(description);
        }
        if let Some(fields) = self.fields {
            iface.fields = fields;
        }
        iface.metadata.extend(self.metadata);
    }
}

/// Patch for the `union` channel.
#[derive(Default)]
pub struct UnionPatch {
    pub description: Option<String>,
    pub types: Option<Vec<String>>,
    pub resolve_type: Option<UnionTypeResolver>,
    pub metadata: Map<String, Value>,
}

impl StagePatch<crate::definition::UnionDefinition> for UnionPatch {
    fn apply_to(self, union: &mut crate::definition::UnionDefinition) {
        if let Some(description) = self.description {
            union.description = Some(description);
        }
        if let Some(types) = self.types {
            union.types = Some(types);
        }
        if let Some(resolve_type) = self.resolve_type {
            union.resolve_type = Some(resolve_type);
        }
        union.metadata.extend(self.metadata);
    }
}
