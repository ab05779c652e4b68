// tests/support.rs
//! Test fixtures — a registry with extra payload types and small tables

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use context_vault::random::hashrnd::BoxedHasher;
use context_vault::{
    Constructor, CoreError, Engine, GeneratorKind, ManagerConfig, Payload, Result, SlotTable,
    TypeInfo, TypeRegistry,
};
use sha2::Sha512_256;

pub const KEY_TAG: &str = "test-key";
pub const FAILING_TAG: &str = "test-failing";
/// Hash function known only to the test registry
#[allow(dead_code)]
pub const EXTRA_HASH_TAG: &str = "sha512-256";

/// Stand-in for a cipher key container; counts how often it was destroyed
#[allow(dead_code)]
#[derive(Debug)]
pub struct DummyKey {
    pub bytes: [u8; 32],
    pub destroyed: Arc<AtomicUsize>,
}

impl DummyKey {
    #[allow(dead_code)]
    pub fn new(fill: u8, destroyed: &Arc<AtomicUsize>) -> Self {
        Self {
            bytes: [fill; 32],
            destroyed: Arc::clone(destroyed),
        }
    }
}

/// Payload whose destructor always reports an error
#[allow(dead_code)]
#[derive(Debug)]
pub struct Stubborn;

fn destroy_key(payload: Payload) -> Result<()> {
    let key = payload
        .downcast::<DummyKey>()
        .map_err(|_| CoreError::PayloadMismatch {
            tag: KEY_TAG.to_string(),
        })?;
    key.destroyed.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

fn sha512_256() -> BoxedHasher {
    Box::new(Sha512_256::default())
}

fn destroy_failing(_payload: Payload) -> Result<()> {
    Err(CoreError::Io(std::io::Error::other("destructor refused")))
}

/// Builtin registry plus the test types
#[allow(dead_code)]
pub fn test_registry() -> Arc<TypeRegistry> {
    let mut registry = TypeRegistry::with_builtins();
    registry.register(
        TypeInfo::new(KEY_TAG, Engine::BlockCipher)
            .with_payload::<DummyKey>()
            .with_destructor(destroy_key),
    );
    registry.register(
        TypeInfo::new(FAILING_TAG, Engine::MacFunction)
            .with_payload::<Stubborn>()
            .with_destructor(destroy_failing),
    );
    registry.register(
        TypeInfo::new(EXTRA_HASH_TAG, Engine::HashFunction)
            .with_constructor(Constructor::Hash(sha512_256)),
    );
    Arc::new(registry)
}

#[allow(dead_code)]
pub fn manager_config(initial_capacity: usize) -> ManagerConfig {
    ManagerConfig {
        initial_capacity,
        max_description_len: 32,
        salt_generator: GeneratorKind::OsNative,
    }
}

#[allow(dead_code)]
pub fn table_with_capacity(initial_capacity: usize) -> SlotTable {
    SlotTable::create(&manager_config(initial_capacity), test_registry()).expect("create table")
}

#[allow(dead_code)]
pub fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}
