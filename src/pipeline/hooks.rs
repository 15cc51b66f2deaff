//! The fixed set of named hook channels, one per compilation stage.

use crate::definition::{
    ArgDefinition, FieldDefinition, InterfaceDefinition, TypeDefinition, UnionDefinition,
};

use super::patches::{ArgPatch, FieldPatch, InterfacePatch, TypePatch, UnionPatch};
use super::Channel;

/// All listener channels. Channels exist for the registry's whole lifetime
/// and are append-only; extensions bind listeners to them when mounted.
#[derive(Default)]
pub struct Hooks {
    pub arg: Channel<ArgDefinition, ArgPatch>,
    pub field: Channel<FieldDefinition, FieldPatch>,
    pub ty: Channel<TypeDefinition, TypePatch>,
    pub interface: Channel<InterfaceDefinition, InterfacePatch>,
    pub union: Channel<UnionDefinition, UnionPatch>,
    pub query: Channel<FieldDefinition, FieldPatch>,
    pub mutation: Channel<FieldDefinition, FieldPatch>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of mounted listeners across all channels.
    pub fn listener_count(&self) -> usize {
        self.arg.len()
            + self.field.len()
            + self.ty.len()
            + self.interface.len()
            + self.union.len()
            + self.query.len()
            + self.mutation.len()
    }
}
