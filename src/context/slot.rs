// src/context/slot.rs
use std::any::Any;

use crate::enums::SlotStatus;
use crate::oid::Payload;

/// One occupied entry of the slot table
pub struct Slot {
    pub(crate) payload: Payload,
    pub(crate) tag: &'static str,
    pub(crate) description: String,
    pub(crate) status: SlotStatus,
    pub(crate) salt: u64,
}

impl Slot {
    pub fn payload(&self) -> &(dyn Any + Send) {
        self.payload.as_ref()
    }

    pub fn payload_mut(&mut self) -> &mut (dyn Any + Send) {
        self.payload.as_mut()
    }

    /// Registry tag the payload was stored under
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> SlotStatus {
        self.status
    }
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("tag", &self.tag)
            .field("description", &self.description)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// A table entry: either a live slot or a free index
///
/// Free entries remember the salt of their last occupancy so the next one
/// can be guaranteed a different salt.
pub(crate) enum Entry {
    Free { last_salt: u64 },
    Occupied(Slot),
}
