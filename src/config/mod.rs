// src/config/mod.rs
//! Configuration system for context-vault
//!
//! Central, lazy-loaded global config with TOML + env overrides.

pub use app::{load, Config, ManagerConfig, RandomConfig};

mod app;
mod defaults;
