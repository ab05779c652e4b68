// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for the small classification enums shared by the
//! registry, the slot table and the generators.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Engine classification of a registered type tag
///
/// Callers fetching a context state which engine they expect; the stored
/// tag's engine must agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum Engine {
    Identifier,
    BlockCipher,
    StreamCipher,
    HashFunction,
    MacFunction,
    SignFunction,
    VerifyFunction,
    RandomGenerator,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Engine::Identifier => "identifier",
            Engine::BlockCipher => "block cipher",
            Engine::StreamCipher => "stream cipher",
            Engine::HashFunction => "hash function",
            Engine::MacFunction => "mac function",
            Engine::SignFunction => "sign function",
            Engine::VerifyFunction => "verify function",
            Engine::RandomGenerator => "random generator",
        };
        f.write_str(name)
    }
}

/// Status of an occupied slot
///
/// The table sets `Created` on insertion; moving to `Modified` (and back,
/// after a collaborator re-syncs the stored copy) is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlotStatus {
    #[default]
    Created,
    Modified,
}
