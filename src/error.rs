// src/error.rs
//! Public error type for the entire crate

use thiserror::Error;

use crate::context::Handle;
use crate::enums::Engine;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("allocation failure: cannot grow slot table to {requested} slots")]
    AllocationFailure { requested: usize },

    #[error("invalid handle {0}")]
    InvalidHandle(Handle),

    #[error("slot index {0} is free or out of range")]
    FreeIndex(usize),

    #[error("operation `{operation}` is not supported by the `{backend}` generator")]
    UnsupportedOperation {
        backend: &'static str,
        operation: &'static str,
    },

    #[error("`{backend}` is not a secure generator and cannot mint handle salts")]
    InsecureGenerator { backend: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("random backend `{backend}` is unavailable: {reason}")]
    BackendUnavailable { backend: String, reason: String },

    #[error("global context manager is not initialized")]
    NotInitialized,

    #[error("global context manager is already initialized")]
    AlreadyInitialized,

    #[error("description is {len} bytes long, limit is {max}")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("engine mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: Engine, found: Engine },

    #[error("payload does not have the concrete type registered for `{tag}`")]
    PayloadMismatch { tag: String },

    #[error("unknown type identifier `{0}`")]
    UnknownType(String),

    #[error("seed must contain at least one byte")]
    EmptySeed,

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
