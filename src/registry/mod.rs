//! The stateful core: pending and finalized definitions, extension mounting,
//! and compilation orchestration.
//!
//! Each named entity moves one way through unregistered → pending → compiled.
//! [`Registry::compile`] is a whole-registry batch operation: it drains the
//! pending maps in a fixed order (interfaces, types, unions, then the root
//! operation maps) and never reads them again; there is no incremental
//! recompilation path.

pub mod extension;

use std::collections::BTreeMap;
use std::mem;
use std::path::Path;
use std::sync::{Arc, RwLock};

use log::{debug, info};
use serde_json::{Map, Value};

use crate::compiler::{
    compile_interface, compile_operation, compile_type, compile_union, read_types, write_types,
    OperationKind,
};
use crate::definition::{
    Definition, FieldDefinition, InterfaceDefinition, TypeDefinition, UnionDefinition,
};
use crate::error::{Result, SchemaError};
use crate::graph::types::{FieldThunk, ObjectType};
use crate::graph::{scalars, FieldMap, GraphType, Schema, TypeMap};
use crate::loader;
use crate::pipeline::Hooks;

pub use extension::{Capability, CapabilitySet, Extension, PRIVATE_PREFIX};

/// Registry construction options.
#[derive(Clone, Debug)]
pub struct RegistryOptions {
    /// Seed the finalized map with the built-in scalars. On by default.
    pub seed_scalars: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self { seed_scalars: true }
    }
}

/// The schema registry: owns all pending raw definitions, the finalized type
/// map, the hook channels, and the mounted capability set. One instance per
/// schema-generation pass, owned by a single caller.
pub struct Registry {
    options: RegistryOptions,
    hooks: Arc<Hooks>,
    capabilities: CapabilitySet,
    finalized: Arc<RwLock<TypeMap>>,
    pending_types: BTreeMap<String, TypeDefinition>,
    pending_interfaces: BTreeMap<String, InterfaceDefinition>,
    pending_unions: BTreeMap<String, UnionDefinition>,
    pending_queries: BTreeMap<String, FieldDefinition>,
    pending_mutations: BTreeMap<String, FieldDefinition>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_options(RegistryOptions::default())
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        Self::build(options, CapabilitySet::new())
    }

    /// Constructs a registry sharing an existing capability set, so
    /// capabilities mounted through one registry are visible to others wired
    /// from the same set.
    pub fn with_capabilities(capabilities: CapabilitySet) -> Self {
        Self::build(RegistryOptions::default(), capabilities)
    }

    fn build(options: RegistryOptions, capabilities: CapabilitySet) -> Self {
        let mut finalized = TypeMap::new();
        if options.seed_scalars {
            for scalar in scalars::built_ins() {
                if let Some(name) = scalar.name() {
                    finalized.insert(name.to_string(), scalar.clone());
                }
            }
        }

        Self {
            options,
            hooks: Arc::new(Hooks::new()),
            capabilities,
            finalized: Arc::new(RwLock::new(finalized)),
            pending_types: BTreeMap::new(),
            pending_interfaces: BTreeMap::new(),
            pending_unions: BTreeMap::new(),
            pending_queries: BTreeMap::new(),
            pending_mutations: BTreeMap::new(),
        }
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    /// The hook channels. Listeners may also be bound directly here, outside
    /// of any extension.
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// A finalized type handle, if one exists under this name.
    pub fn get_type(&self, name: &str) -> Option<GraphType> {
        read_types(&self.finalized).get(name).cloned()
    }

    // ========== Registration ==========

    /// Registers a custom scalar into the finalized map.
    pub fn register_scalar(&mut self, scalar: GraphType, overwrite: bool) -> Result<()> {
        let name = named(&scalar, "a named scalar type")?;
        let mut types = write_types(&self.finalized);
        if types.contains_key(&name) && !overwrite {
            return Err(SchemaError::DuplicateScalar { name });
        }
        debug!("registered scalar '{name}'");
        types.insert(name, scalar);
        Ok(())
    }

    /// Pass-through fast path: a fully concrete, already-compiled type enters
    /// the finalized map directly, skipping the pending stage. Last write
    /// wins.
    pub fn register_compiled(&mut self, ty: GraphType) -> Result<()> {
        let name = named(&ty, "a named compiled type")?;
        debug!("registered compiled type '{name}'");
        write_types(&self.finalized).insert(name, ty);
        Ok(())
    }

    /// Registers a type definition. Factory-form definitions are invoked once
    /// here; nested `queries`/`mutations` declarations are harvested into the
    /// global pending maps before the type itself is stored.
    pub fn register_type(
        &mut self,
        def: impl Into<Definition<TypeDefinition>>,
        overwrite: bool,
    ) -> Result<()> {
        let mut def = def.into().resolve(self);
        if def.name.is_empty() {
            return Err(SchemaError::MissingName {
                kind: "type".to_string(),
            });
        }
        if self.pending_types.contains_key(&def.name) && !overwrite {
            return Err(SchemaError::DuplicateType { name: def.name });
        }

        let queries = mem::take(&mut def.queries);
        let mutations = mem::take(&mut def.mutations);
        self.add_queries(queries, overwrite)?;
        self.add_mutations(mutations, overwrite)?;

        debug!("registered type '{}'", def.name);
        self.pending_types.insert(def.name.clone(), def);
        Ok(())
    }

    /// Registers an interface definition.
    pub fn register_interface(
        &mut self,
        def: impl Into<Definition<InterfaceDefinition>>,
        overwrite: bool,
    ) -> Result<()> {
        let def = def.into().resolve(self);
        if def.name.is_empty() {
            return Err(SchemaError::MissingName {
                kind: "interface".to_string(),
            });
        }
        if self.pending_interfaces.contains_key(&def.name) && !overwrite {
            return Err(SchemaError::DuplicateInterface { name: def.name });
        }
        debug!("registered interface '{}'", def.name);
        self.pending_interfaces.insert(def.name.clone(), def);
        Ok(())
    }

    /// Registers a union definition. The `types` list is validated at compile
    /// time, not here.
    pub fn register_union(
        &mut self,
        def: impl Into<Definition<UnionDefinition>>,
        overwrite: bool,
    ) -> Result<()> {
        let def = def.into().resolve(self);
        if def.name.is_empty() {
            return Err(SchemaError::MissingName {
                kind: "union".to_string(),
            });
        }
        if self.pending_unions.contains_key(&def.name) && !overwrite {
            return Err(SchemaError::DuplicateUnion { name: def.name });
        }
        debug!("registered union '{}'", def.name);
        self.pending_unions.insert(def.name.clone(), def);
        Ok(())
    }

    /// Adds a named query to the pending query map.
    pub fn add_query(
        &mut self,
        name: impl Into<String>,
        def: impl Into<Definition<FieldDefinition>>,
        overwrite: bool,
    ) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::MissingName {
                kind: "query".to_string(),
            });
        }
        let def = def.into().resolve(self);
        if self.pending_queries.contains_key(&name) && !overwrite {
            return Err(SchemaError::DuplicateQuery { name });
        }
        debug!("added query '{name}'");
        self.pending_queries.insert(name, def);
        Ok(())
    }

    /// Batch form of [`Registry::add_query`].
    pub fn add_queries(
        &mut self,
        queries: impl IntoIterator<Item = (String, FieldDefinition)>,
        overwrite: bool,
    ) -> Result<()> {
        for (name, def) in queries {
            self.add_query(name, def, overwrite)?;
        }
        Ok(())
    }

    /// Adds a named mutation to the pending mutation map.
    pub fn add_mutation(
        &mut self,
        name: impl Into<String>,
        def: impl Into<Definition<FieldDefinition>>,
        overwrite: bool,
    ) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::MissingName {
                kind: "mutation".to_string(),
            });
        }
        let def = def.into().resolve(self);
        if self.pending_mutations.contains_key(&name) && !overwrite {
            return Err(SchemaError::DuplicateMutation { name });
        }
        debug!("added mutation '{name}'");
        self.pending_mutations.insert(name, def);
        Ok(())
    }

    /// Batch form of [`Registry::add_mutation`].
    pub fn add_mutations(
        &mut self,
        mutations: impl IntoIterator<Item = (String, FieldDefinition)>,
        overwrite: bool,
    ) -> Result<()> {
        for (name, def) in mutations {
            self.add_mutation(name, def, overwrite)?;
        }
        Ok(())
    }

    // ========== JSON ingestion ==========

    /// Registers a type from a JSON definition string.
    pub fn register_type_str(&mut self, json: &str, overwrite: bool) -> Result<()> {
        let value: Value = serde_json::from_str(json)?;
        let def = loader::type_from_value(&value)?;
        self.register_type(def, overwrite)
    }

    /// Registers a type from a JSON definition file.
    pub fn register_type_file(&mut self, path: impl AsRef<Path>, overwrite: bool) -> Result<()> {
        let json = std::fs::read_to_string(path)?;
        self.register_type_str(&json, overwrite)
    }

    /// Registers an interface from a JSON definition string.
    pub fn register_interface_str(&mut self, json: &str, overwrite: bool) -> Result<()> {
        let value: Value = serde_json::from_str(json)?;
        let def = loader::interface_from_value(&value)?;
        self.register_interface(def, overwrite)
    }

    /// Registers a union from a JSON definition string.
    pub fn register_union_str(&mut self, json: &str, overwrite: bool) -> Result<()> {
        let value: Value = serde_json::from_str(json)?;
        let def = loader::union_from_value(&value)?;
        self.register_union(def, overwrite)
    }

    /// Adds a named query from a JSON definition string.
    pub fn add_query_str(
        &mut self,
        name: impl Into<String>,
        json: &str,
        overwrite: bool,
    ) -> Result<()> {
        let value: Value = serde_json::from_str(json)?;
        let def = loader::operation_from_value(&value)?;
        self.add_query(name, def, overwrite)
    }

    /// Adds a named mutation from a JSON definition string.
    pub fn add_mutation_str(
        &mut self,
        name: impl Into<String>,
        json: &str,
        overwrite: bool,
    ) -> Result<()> {
        let value: Value = serde_json::from_str(json)?;
        let def = loader::operation_from_value(&value)?;
        self.add_mutation(name, def, overwrite)
    }

    // ========== Extensions ==========

    /// Mounts an extension. The factory receives the registry; the returned
    /// extension's `on_init` hook runs once and is discarded, listener
    /// bindings append to their channels, and capabilities enter the shared
    /// capability set. Private-prefixed capability names are ignored.
    pub fn mount(&mut self, factory: impl FnOnce(&Registry) -> Extension) -> Result<()> {
        let ext = factory(self);
        let Extension {
            init,
            hooks,
            capabilities,
        } = ext;

        if let Some(init) = init {
            init(self)?;
        }

        for listener in hooks.arg {
            self.hooks.arg.push(listener);
        }
        for listener in hooks.field {
            self.hooks.field.push(listener);
        }
        for listener in hooks.ty {
            self.hooks.ty.push(listener);
        }
        for listener in hooks.interface {
            self.hooks.interface.push(listener);
        }
        for listener in hooks.union {
            self.hooks.union.push(listener);
        }
        for listener in hooks.query {
            self.hooks.query.push(listener);
        }
        for listener in hooks.mutation {
            self.hooks.mutation.push(listener);
        }

        for (name, capability) in capabilities {
            if name.starts_with(PRIVATE_PREFIX) {
                debug!("skipping private capability '{name}'");
                continue;
            }
            debug!("mounted capability '{name}'");
            self.capabilities.insert(name, capability);
        }

        info!(
            "mounted extension; {} listener(s) now bound",
            self.hooks.listener_count()
        );
        Ok(())
    }

    /// Invokes a mounted capability by name.
    pub fn invoke(&mut self, name: &str, args: Value) -> Result<Value> {
        let capability =
            self.capabilities
                .get(name)
                .ok_or_else(|| SchemaError::UnknownCapability {
                    name: name.to_string(),
                })?;
        capability(self, args)
    }

    // ========== Compilation ==========

    /// Compiles the whole registry into a finalized schema. Pending maps are
    /// drained and never consulted again; any single failure aborts the pass
    /// with nothing partially assembled for the caller.
    pub fn compile(&mut self) -> Result<Schema> {
        info!(
            "compiling schema: {} interface(s), {} type(s), {} union(s), {} query(ies), {} mutation(s)",
            self.pending_interfaces.len(),
            self.pending_types.len(),
            self.pending_unions.len(),
            self.pending_queries.len(),
            self.pending_mutations.len(),
        );

        for (name, def) in mem::take(&mut self.pending_interfaces) {
            let compiled = compile_interface(def, &self.finalized, &self.hooks)?;
            write_types(&self.finalized).insert(name, compiled);
        }
        for (name, def) in mem::take(&mut self.pending_types) {
            let compiled = compile_type(def, &self.finalized, &self.hooks)?;
            write_types(&self.finalized).insert(name, compiled);
        }
        for (name, def) in mem::take(&mut self.pending_unions) {
            let compiled = compile_union(def, &self.finalized, &self.hooks)?;
            write_types(&self.finalized).insert(name, compiled);
        }

        let query = self.compile_root("Query", OperationKind::Query)?;
        let mutation = self.compile_root("Mutation", OperationKind::Mutation)?;

        info!("schema compiled");
        Ok(Schema::new(query, mutation, Arc::clone(&self.finalized)))
    }

    /// Builds one root container from its drained pending map. Operation
    /// fields compile eagerly; an empty map yields no container at all.
    fn compile_root(&mut self, name: &str, kind: OperationKind) -> Result<Option<GraphType>> {
        let pending = match kind {
            OperationKind::Query => mem::take(&mut self.pending_queries),
            OperationKind::Mutation => mem::take(&mut self.pending_mutations),
        };
        if pending.is_empty() {
            return Ok(None);
        }

        let mut fields = FieldMap::new();
        {
            let types = read_types(&self.finalized);
            for (op_name, def) in pending {
                let compiled = compile_operation(kind, &op_name, def, &types, &self.hooks)?;
                fields.insert(op_name, compiled);
            }
        }
        debug!("compiled {} root with {} field(s)", kind, fields.len());

        let thunk: FieldThunk = Box::new(move || Ok(fields.clone()));
        Ok(Some(GraphType::Object(Arc::new(ObjectType::new(
            name,
            None,
            Vec::new(),
            Map::new(),
            thunk,
        )))))
    }
}

fn named(ty: &GraphType, expected: &str) -> Result<String> {
    ty.name()
        .map(str::to_string)
        .ok_or_else(|| SchemaError::Shape {
            expected: expected.to_string(),
            got: "an anonymous wrapper type".to_string(),
        })
}
