//! Unified error handling for the schema compilation pipeline.
//!
//! Every failure is synchronous and aborts the whole compile pass; there is no
//! partial schema assembly. Messages are prefixed with the `graphforge:`
//! identifier and name the offending definition.

use std::fmt;
use thiserror::Error;

/// Why a union definition was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedUnionReason {
    /// The definition carries no `types` list at all.
    MissingTypes,
    /// The `types` property was supplied but is not a sequence.
    NotASequence { got: String },
}

impl fmt::Display for MalformedUnionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedUnionReason::MissingTypes => write!(f, "missing a types list"),
            MalformedUnionReason::NotASequence { got } => {
                write!(f, "expected types to be a sequence, got {got}")
            }
        }
    }
}

/// Unified error type for registration and compilation.
#[derive(Error, Debug)]
pub enum SchemaError {
    // ========== Definition Shape Errors ==========
    /// A registered definition is not the expected shape.
    #[error("graphforge: expected {expected}, got {got}")]
    Shape { expected: String, got: String },

    /// A query or mutation was registered without a name.
    #[error("graphforge: missing {kind} name")]
    MissingName { kind: String },

    // ========== Duplicate Registration Errors ==========
    /// A scalar with this name is already finalized.
    #[error("graphforge: scalar '{name}' is already registered")]
    DuplicateScalar { name: String },

    /// A type with this name is already pending.
    #[error("graphforge: type '{name}' is already registered")]
    DuplicateType { name: String },

    /// An interface with this name is already pending.
    #[error("graphforge: interface '{name}' is already registered")]
    DuplicateInterface { name: String },

    /// A union with this name is already pending.
    #[error("graphforge: union '{name}' is already registered")]
    DuplicateUnion { name: String },

    /// A query with this name is already added.
    #[error("graphforge: query '{name}' is already added")]
    DuplicateQuery { name: String },

    /// A mutation with this name is already added.
    #[error("graphforge: mutation '{name}' is already added")]
    DuplicateMutation { name: String },

    // ========== Reference Resolution Errors ==========
    /// A reference names a type absent from the finalized map.
    #[error("graphforge: unknown type '{name}'")]
    UnknownType { name: String },

    // ========== Union Validation Errors ==========
    /// A union's type list is missing or not a sequence.
    #[error("graphforge: union '{name}' is malformed: {reason}")]
    MalformedUnion {
        name: String,
        reason: MalformedUnionReason,
    },

    // ========== Extension Errors ==========
    /// A capability was invoked that no mounted extension provides.
    #[error("graphforge: unknown capability '{name}'")]
    UnknownCapability { name: String },

    // ========== Loader Passthrough Errors ==========
    #[error("graphforge: IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("graphforge: invalid JSON definition: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
