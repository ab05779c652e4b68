// src/config/defaults.rs
use crate::config::app::{Config, ManagerConfig, RandomConfig};
use crate::consts::{DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_DESCRIPTION_LEN};
use crate::random::GeneratorKind;

pub fn default_manager() -> ManagerConfig {
    ManagerConfig {
        initial_capacity: DEFAULT_INITIAL_CAPACITY,
        max_description_len: DEFAULT_MAX_DESCRIPTION_LEN,
        salt_generator: GeneratorKind::OsNative,
    }
}

pub fn default_random() -> RandomConfig {
    RandomConfig {
        default_generator: GeneratorKind::HashSha256,
    }
}

pub fn default_config() -> Config {
    Config {
        manager: default_manager(),
        random: default_random(),
    }
}
