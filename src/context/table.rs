// src/context/table.rs
//! Generation-salted slot table
//!
//! Slots live in one growable `Vec`; a freed slot is recycled by index and
//! never removed, so lookups stay O(1) and capacity only grows. Every slot
//! access goes through [`SlotTable::validate`], which rejects a handle
//! unless its index is in range, the slot is occupied, and the salt matches
//! the current occupancy.

use std::any::Any;
use std::mem;
use std::sync::Arc;

use tracing::{debug, warn};

use super::handle::Handle;
use super::slot::{Entry, Slot};
use crate::config::ManagerConfig;
use crate::enums::{Engine, SlotStatus};
use crate::error::{CoreError, Result};
use crate::oid::{Payload, TypeRegistry};
use crate::random::RandomGenerator;

pub struct SlotTable {
    entries: Vec<Entry>,
    /// Reclaimed indices, popped LIFO
    free: Vec<usize>,
    /// Mints handle salts; `None` only after teardown
    key_generator: Option<RandomGenerator>,
    registry: Arc<TypeRegistry>,
    max_description_len: usize,
    live: usize,
}

impl SlotTable {
    /// Allocate the initial slots and open the salt generator
    pub fn create(config: &ManagerConfig, registry: Arc<TypeRegistry>) -> Result<Self> {
        if !config.salt_generator.is_secure() {
            return Err(CoreError::InsecureGenerator {
                backend: config.salt_generator.oid().to_string(),
            });
        }
        let capacity = config.initial_capacity.max(1);

        let mut entries = Vec::new();
        let mut free = Vec::new();
        entries
            .try_reserve_exact(capacity)
            .and_then(|_| free.try_reserve_exact(capacity))
            .map_err(|_| CoreError::AllocationFailure {
                requested: capacity,
            })?;
        entries.extend((0..capacity).map(|_| Entry::Free { last_salt: 0 }));
        // Reversed so index 0 is handed out first
        free.extend((0..capacity).rev());

        let key_generator = RandomGenerator::create_with(&config.salt_generator, &registry)?;
        debug!(
            capacity,
            salt_generator = key_generator.name(),
            "slot table created"
        );

        Ok(Self {
            entries,
            free,
            key_generator: Some(key_generator),
            registry,
            max_description_len: config.max_description_len,
            live: 0,
        })
    }

    /// Run every destructor, then release the salt generator
    ///
    /// Teardown always runs to completion; the first destructor or release
    /// failure is returned afterwards.
    pub fn destroy(mut self) -> Result<()> {
        self.teardown()
    }

    fn teardown(&mut self) -> Result<()> {
        let mut first_err = None;

        for (index, entry) in self.entries.drain(..).enumerate() {
            if let Entry::Occupied(slot) = entry {
                if let Err(err) = self.registry.destroy(slot.tag, slot.payload) {
                    warn!(index, tag = slot.tag, %err, "destructor failed during teardown");
                    first_err.get_or_insert(err);
                }
            }
        }
        self.free.clear();
        self.live = 0;

        if let Some(generator) = self.key_generator.take() {
            if let Err(err) = generator.release() {
                warn!(%err, "salt generator release failed");
                first_err.get_or_insert(err);
            }
        }
        debug!("slot table destroyed");

        first_err.map_or(Ok(()), Err)
    }

    /// Double the capacity; on failure nothing changes
    pub fn grow(&mut self) -> Result<()> {
        let old = self.entries.len();
        let new = old
            .checked_mul(2)
            .ok_or(CoreError::AllocationFailure { requested: usize::MAX })?;
        let extra = new - old;

        self.entries
            .try_reserve_exact(extra)
            .and_then(|_| self.free.try_reserve_exact(extra))
            .map_err(|_| CoreError::AllocationFailure { requested: new })?;

        self.entries
            .extend((0..extra).map(|_| Entry::Free { last_salt: 0 }));
        self.free.extend((old..new).rev());
        debug!(from = old, to = new, "slot table grown");
        Ok(())
    }

    /// Store `payload` under `tag` and hand back its handle
    pub fn add(&mut self, payload: Payload, tag: &str, description: &str) -> Result<Handle> {
        let info = self.registry.get(tag)?;
        if !info.accepts(payload.as_ref()) {
            return Err(CoreError::PayloadMismatch {
                tag: tag.to_string(),
            });
        }
        let tag = info.name;

        if description.len() > self.max_description_len {
            return Err(CoreError::DescriptionTooLong {
                len: description.len(),
                max: self.max_description_len,
            });
        }

        if self.free.is_empty() {
            self.grow()?;
        }
        let index = self.free.pop().expect("grow leaves at least one free slot");
        let previous = match &self.entries[index] {
            Entry::Free { last_salt } => *last_salt,
            Entry::Occupied(_) => panic!("free list points at occupied slot {index}"),
        };

        let salt = match self.mint_salt(previous) {
            Ok(salt) => salt,
            Err(err) => {
                self.free.push(index);
                return Err(err);
            }
        };

        self.entries[index] = Entry::Occupied(Slot {
            payload,
            tag,
            description: description.to_owned(),
            status: SlotStatus::Created,
            salt,
        });
        self.live += 1;

        let handle = Handle::new(index, salt);
        debug!(%handle, tag, "context added");
        Ok(handle)
    }

    /// Fresh non-zero salt that differs from the index's previous one
    fn mint_salt(&mut self, previous: u64) -> Result<u64> {
        let generator = self
            .key_generator
            .as_mut()
            .expect("salt generator lives until teardown");
        loop {
            let salt = generator.next_u64()?;
            if salt != 0 && salt != previous {
                return Ok(salt);
            }
        }
    }

    /// Free the slot behind `handle` and run its destructor
    ///
    /// The slot is freed even if the destructor reports an error.
    pub fn remove(&mut self, handle: Handle) -> Result<()> {
        let index = self.validate(handle)?;
        let entry = mem::replace(
            &mut self.entries[index],
            Entry::Free {
                last_salt: handle.salt(),
            },
        );
        let Entry::Occupied(slot) = entry else {
            unreachable!("validated slot {index} is occupied");
        };
        self.free.push(index);
        self.live -= 1;

        debug!(%handle, tag = slot.tag, "context removed");
        self.registry.destroy(slot.tag, slot.payload)
    }

    /// Index of the slot behind `handle`, if the handle is current
    pub fn validate(&self, handle: Handle) -> Result<usize> {
        // 1. bounds, 2. occupied, 3. same occupancy
        match self.entries.get(handle.index()) {
            Some(Entry::Occupied(slot)) if slot.salt == handle.salt() => Ok(handle.index()),
            _ => Err(CoreError::InvalidHandle(handle)),
        }
    }

    pub fn index_of(&self, handle: Handle) -> Result<usize> {
        self.validate(handle)
    }

    /// Current handle of an occupied index
    pub fn handle_of(&self, index: usize) -> Result<Handle> {
        match self.entries.get(index) {
            Some(Entry::Occupied(slot)) => Ok(Handle::new(index, slot.salt)),
            _ => Err(CoreError::FreeIndex(index)),
        }
    }

    pub fn get(&self, handle: Handle) -> Result<&Slot> {
        let index = self.validate(handle)?;
        match &self.entries[index] {
            Entry::Occupied(slot) => Ok(slot),
            Entry::Free { .. } => unreachable!("validated slot {index} is occupied"),
        }
    }

    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut Slot> {
        let index = self.validate(handle)?;
        match &mut self.entries[index] {
            Entry::Occupied(slot) => Ok(slot),
            Entry::Free { .. } => unreachable!("validated slot {index} is occupied"),
        }
    }

    /// Payload downcast to its concrete type
    pub fn payload<T: Any>(&self, handle: Handle) -> Result<&T> {
        let slot = self.get(handle)?;
        slot.payload
            .downcast_ref::<T>()
            .ok_or_else(|| CoreError::PayloadMismatch {
                tag: slot.tag.to_string(),
            })
    }

    pub fn payload_mut<T: Any>(&mut self, handle: Handle) -> Result<&mut T> {
        let slot = self.get_mut(handle)?;
        let tag = slot.tag;
        slot.payload
            .downcast_mut::<T>()
            .ok_or_else(|| CoreError::PayloadMismatch {
                tag: tag.to_string(),
            })
    }

    pub fn type_tag(&self, handle: Handle) -> Result<&'static str> {
        Ok(self.get(handle)?.tag)
    }

    /// Engine class of the stored payload, per the registry
    pub fn engine(&self, handle: Handle) -> Result<Engine> {
        let tag = self.type_tag(handle)?;
        Ok(self.registry.get(tag)?.engine)
    }

    pub fn description(&self, handle: Handle) -> Result<&str> {
        Ok(self.get(handle)?.description())
    }

    pub fn status(&self, handle: Handle) -> Result<SlotStatus> {
        Ok(self.get(handle)?.status)
    }

    pub fn set_status(&mut self, handle: Handle, status: SlotStatus) -> Result<()> {
        self.get_mut(handle)?.status = status;
        Ok(())
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Handles of all occupied slots, in index order
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match entry {
                Entry::Occupied(slot) => Some(Handle::new(index, slot.salt)),
                Entry::Free { .. } => None,
            })
    }
}

impl Drop for SlotTable {
    fn drop(&mut self) {
        if self.key_generator.is_some() {
            // Errors were already logged by teardown
            let _ = self.teardown();
        }
    }
}

impl std::fmt::Debug for SlotTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotTable")
            .field("capacity", &self.capacity())
            .field("live", &self.live)
            .field("key_generator", &self.key_generator)
            .finish_non_exhaustive()
    }
}
