// src/context/handle.rs
//! Handles — the only way callers refer to a stored context

use std::fmt;

/// Opaque reference to one occupancy of one slot
///
/// `index` locates the slot in O(1); `salt` is drawn from the table's salt
/// generator when the slot is filled. A handle validates only while the
/// slot still holds that same occupancy, so stale and forged handles fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct Handle {
    index: usize,
    salt: u64,
}

impl Handle {
    pub fn new(index: usize, salt: u64) -> Self {
        Self { index, salt }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn salt(&self) -> u64 {
        self.salt
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.index, hex::encode(self.salt.to_be_bytes()))
    }
}
