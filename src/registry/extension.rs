//! Extension mounting: plugins that bind listeners to hook channels and
//! contribute named capabilities.
//!
//! Capabilities live on a [`CapabilitySet`] that is shared by every registry
//! constructed from it; sharing is explicit and happens at wiring time, never
//! through process-wide state. Mount all extensions before sharing registries
//! across threads.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::definition::{
    ArgDefinition, FieldDefinition, InterfaceDefinition, TypeDefinition, UnionDefinition,
};
use crate::error::Result;
use crate::pipeline::patches::{ArgPatch, FieldPatch, InterfacePatch, TypePatch, UnionPatch};
use crate::pipeline::{Listener, StageContext};

use super::Registry;

/// A named method contributed by an extension, invocable on any registry
/// sharing the capability set.
pub type Capability = Arc<dyn Fn(&mut Registry, Value) -> Result<Value> + Send + Sync>;

/// Capability names starting with this marker are treated as extension-private
/// and are never mounted.
pub const PRIVATE_PREFIX: char = '_';

/// The shared set of mounted capabilities.
#[derive(Clone, Default)]
pub struct CapabilitySet {
    inner: Arc<RwLock<HashMap<String, Capability>>>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, name: String, capability: Capability) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.insert(name, capability);
    }

    pub fn get(&self, name: &str) -> Option<Capability> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = inner.keys().cloned().collect();
        names.sort();
        names
    }
}

type InitFn = Box<dyn FnOnce(&mut Registry) -> Result<()> + Send>;

/// Listener bindings an extension contributes, per channel.
#[derive(Default)]
pub(crate) struct ExtensionHooks {
    pub(crate) arg: Vec<Listener<ArgDefinition, ArgPatch>>,
    pub(crate) field: Vec<Listener<FieldDefinition, FieldPatch>>,
    pub(crate) ty: Vec<Listener<TypeDefinition, TypePatch>>,
    pub(crate) interface: Vec<Listener<InterfaceDefinition, InterfacePatch>>,
    pub(crate) union: Vec<Listener<UnionDefinition, UnionPatch>>,
    pub(crate) query: Vec<Listener<FieldDefinition, FieldPatch>>,
    pub(crate) mutation: Vec<Listener<FieldDefinition, FieldPatch>>,
}

/// What an extension factory returns: an optional one-shot initialization
/// hook, listener bindings, and named capabilities.
#[derive(Default)]
pub struct Extension {
    pub(crate) init: Option<InitFn>,
    pub(crate) hooks: ExtensionHooks,
    pub(crate) capabilities: Vec<(String, Capability)>,
}

impl Extension {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialization hook, run once at mount time and then discarded.
    pub fn on_init(mut self, init: impl FnOnce(&mut Registry) -> Result<()> + Send + 'static) -> Self {
        self.init = Some(Box::new(init));
        self
    }

    pub fn on_arg(
        mut self,
        listener: impl Fn(&ArgDefinition, &StageContext<'_>) -> ArgPatch + Send + Sync + 'static,
    ) -> Self {
        self.hooks.arg.push(Arc::new(listener));
        self
    }

    pub fn on_field(
        mut self,
        listener: impl Fn(&FieldDefinition, &StageContext<'_>) -> FieldPatch + Send + Sync + 'static,
    ) -> Self {
        self.hooks.field.push(Arc::new(listener));
        self
    }

    pub fn on_type(
        mut self,
        listener: impl Fn(&TypeDefinition, &StageContext<'_>) -> TypePatch + Send + Sync + 'static,
    ) -> Self {
        self.hooks.ty.push(Arc::new(listener));
        self
    }

    pub fn on_interface(
        mut self,
        listener: impl Fn(&InterfaceDefinition, &StageContext<'_>) -> InterfacePatch
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.hooks.interface.push(Arc::new(listener));
        self
    }

    pub fn on_union(
        mut self,
        listener: impl Fn(&UnionDefinition, &StageContext<'_>) -> UnionPatch + Send + Sync + 'static,
    ) -> Self {
        self.hooks.union.push(Arc::new(listener));
        self
    }

    pub fn on_query(
        mut self,
        listener: impl Fn(&FieldDefinition, &StageContext<'_>) -> FieldPatch + Send + Sync + 'static,
    ) -> Self {
        self.hooks.query.push(Arc::new(listener));
        self
    }

    pub fn on_mutation(
        mut self,
        listener: impl Fn(&FieldDefinition, &StageContext<'_>) -> FieldPatch + Send + Sync + 'static,
    ) -> Self {
        self.hooks.mutation.push(Arc::new(listener));
        self
    }

    /// Contributes a named capability. Names starting with the private-prefix
    /// marker are skipped at mount time.
    pub fn capability(
        mut self,
        name: impl Into<String>,
        capability: impl Fn(&mut Registry, Value) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        self.capabilities.push((name.into(), Arc::new(capability)));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_set_is_shared_between_clones() {
        let set = CapabilitySet::new();
        let clone = set.clone();
        set.insert("ping".to_string(), Arc::new(|_, args| Ok(args)));
        assert!(clone.contains("ping"));
        assert_eq!(clone.names(), vec!["ping".to_string()]);
    }
}
