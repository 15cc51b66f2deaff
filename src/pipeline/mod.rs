//! The listener pipeline: a generic fold-of-interceptors applied identically
//! at every compilation stage.
//!
//! Each stage owns a [`Channel`] of listeners. Compiling a definition folds
//! the channel over the definition in registration order: every listener sees
//! the current value plus the stage context and returns a typed patch, which
//! is merged field-by-field onto the value. Patches add or overwrite, never
//! remove, and the entry name is not part of any patch, so it is immutable
//! across the fold. Execution is synchronous, sequential, and deterministic.

pub mod hooks;
pub mod patches;

use std::sync::{Arc, RwLock};

use crate::graph::{GraphType, TypeMap};

pub use hooks::Hooks;
pub use patches::{ArgPatch, FieldPatch, InterfacePatch, TypePatch, UnionPatch};

/// Context handed to every listener alongside the value under construction.
pub struct StageContext<'a> {
    /// Entry name within its map (field/arg/query/mutation name). `None` for
    /// top-level type-like stages, whose definitions carry their own name.
    pub name: Option<&'a str>,
    /// The compiled handle of the type owning the current field, when the
    /// field compiler runs from a materialized thunk. Never mutated here.
    pub owner: Option<&'a GraphType>,
    /// Read access to already-finalized types.
    pub types: &'a TypeMap,
}

/// A typed patch produced by a listener for stage value `T`.
pub trait StagePatch<T> {
    fn apply_to(self, value: &mut T);
}

/// A single interceptor on a channel.
pub type Listener<T, P> = Arc<dyn Fn(&T, &StageContext<'_>) -> P + Send + Sync>;

/// An append-only, ordered sequence of listeners for one compilation stage.
pub struct Channel<T, P> {
    listeners: RwLock<Vec<Listener<T, P>>>,
}

impl<T, P> Default for Channel<T, P> {
    fn default() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }
}

impl<T, P> Channel<T, P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener. Channels never remove entries; registration order
    /// is invocation order.
    pub fn append(&self, listener: impl Fn(&T, &StageContext<'_>) -> P + Send + Sync + 'static) {
        self.push(Arc::new(listener));
    }

    pub(crate) fn push(&self, listener: Listener<T, P>) {
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        listeners.push(listener);
    }

    /// Snapshot of the current listener sequence, in order.
    pub fn snapshot(&self) -> Vec<Listener<T, P>> {
        let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());
        listeners.clone()
    }

    pub fn len(&self) -> usize {
        let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());
        listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Left fold of a listener sequence over a stage value. Each listener sees
/// the output of its predecessors.
pub fn fold<T, P: StagePatch<T>>(
    mut value: T,
    listeners: &[Listener<T, P>],
    ctx: &StageContext<'_>,
) -> T {
    for listener in listeners {
        let patch = listener(&value, ctx);
        patch.apply_to(&mut value);
    }
    value
}
