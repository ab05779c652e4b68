// src/context/manager.rs
//! Context manager — engine-checked typed access over one slot table
//!
//! This is the explicitly constructed context a host library holds. The
//! process-wide instance in [`crate::global`] wraps exactly one of these.

use std::any::Any;
use std::sync::Arc;

use super::handle::Handle;
use super::table::SlotTable;
use crate::config::ManagerConfig;
use crate::enums::{Engine, SlotStatus};
use crate::error::{CoreError, Result};
use crate::oid::TypeRegistry;

#[derive(Debug)]
pub struct ContextManager {
    table: SlotTable,
}

impl ContextManager {
    pub fn new(config: &ManagerConfig, registry: Arc<TypeRegistry>) -> Result<Self> {
        Ok(Self {
            table: SlotTable::create(config, registry)?,
        })
    }

    /// Take ownership of `context` and register it under `tag`
    pub fn add_context<T: Any + Send>(
        &mut self,
        context: T,
        tag: &str,
        description: &str,
    ) -> Result<Handle> {
        self.table.add(Box::new(context), tag, description)
    }

    /// Borrow a context, insisting on its engine class and concrete type
    pub fn get_context<T: Any>(&self, handle: Handle, expected: Engine) -> Result<&T> {
        self.check_engine(handle, expected)?;
        self.table.payload::<T>(handle)
    }

    pub fn get_context_mut<T: Any>(&mut self, handle: Handle, expected: Engine) -> Result<&mut T> {
        self.check_engine(handle, expected)?;
        self.table.payload_mut::<T>(handle)
    }

    pub fn remove_context(&mut self, handle: Handle) -> Result<()> {
        self.table.remove(handle)
    }

    pub fn set_status(&mut self, handle: Handle, status: SlotStatus) -> Result<()> {
        self.table.set_status(handle, status)
    }

    pub fn status(&self, handle: Handle) -> Result<SlotStatus> {
        self.table.status(handle)
    }

    pub fn table(&self) -> &SlotTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut SlotTable {
        &mut self.table
    }

    pub fn destroy(self) -> Result<()> {
        self.table.destroy()
    }

    fn check_engine(&self, handle: Handle, expected: Engine) -> Result<()> {
        let found = self.table.engine(handle)?;
        if found != expected {
            return Err(CoreError::TypeMismatch { expected, found });
        }
        Ok(())
    }
}
