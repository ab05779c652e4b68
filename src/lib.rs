// src/lib.rs
//! context-vault — handle-based object lifetimes for a crypto library
//!
//! Features:
//! - Salted slot table: stale and forged handles fail validation
//! - Pluggable random generators (LCG, xorshift64*, OS sources, files,
//!   unix sockets, SHA-2 hash DRBG) behind one lifecycle contract
//! - Type registry mapping tags to engines, constructors and destructors
//! - Process-wide manager with explicit create/destroy

pub mod aliases;
pub mod config;
pub mod consts;
pub mod context;
pub mod enums;
pub mod global;
pub mod oid;
pub mod random;

pub mod error;

// Re-export everything users need at the crate root
pub use config::{load as load_config, Config, ManagerConfig, RandomConfig};
pub use context::{ContextManager, Handle, Slot, SlotTable};
pub use enums::{Engine, SlotStatus};
pub use error::{CoreError, Result};
pub use global::{global_create, global_create_with, global_destroy};
pub use oid::{Constructor, Payload, TypeInfo, TypeRegistry};
pub use random::{available_backends, GeneratorKind, RandomBackend, RandomGenerator};
