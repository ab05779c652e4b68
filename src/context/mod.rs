// src/context/mod.rs
pub mod handle;
pub mod manager;
pub mod slot;
pub mod table;

pub use handle::Handle;
pub use manager::ContextManager;
pub use slot::Slot;
pub use table::SlotTable;
