//! The compilation stages.
//!
//! Each compiler takes a raw definition plus the finalized type map and the
//! hook channels, runs the listener pipeline for its stage, resolves type
//! references, and produces an engine-ready descriptor or handle. The
//! registry drives them in a fixed order: interfaces, then types, then
//! unions, then the root operation maps.

pub mod arg;
pub mod field;
pub mod interface;
pub mod object;
pub mod operation;
pub mod resolve;
pub mod union;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::graph::TypeMap;

pub use arg::compile_args;
pub use field::compile_fields;
pub use interface::compile_interface;
pub use object::compile_type;
pub use operation::{compile_operation, OperationKind};
pub use resolve::resolve;
pub use union::compile_union;

/// Read access to the shared finalized map. The crate is synchronous, so a
/// poisoned lock only means a caller panicked mid-compile; the map itself is
/// still usable.
pub(crate) fn read_types(lock: &RwLock<TypeMap>) -> RwLockReadGuard<'_, TypeMap> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

pub(crate) fn write_types(lock: &RwLock<TypeMap>) -> RwLockWriteGuard<'_, TypeMap> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}
