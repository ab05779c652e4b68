// src/global.rs
//! Process-wide context manager
//!
//! `global_create` must run once at library start-up and `global_destroy`
//! once at shutdown. Between the two, every call takes one coarse lock over
//! the whole manager; there is no per-slot locking because growing the table
//! moves every slot at once.
//!
//! Closures passed to [`with_context`] run under that lock and must not call
//! back into this module.

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::info;

use crate::config::{self, Config, RandomConfig};
use crate::context::{ContextManager, Handle};
use crate::enums::{Engine, SlotStatus};
use crate::error::{CoreError, Result};
use crate::oid::TypeRegistry;
use crate::random::{GeneratorKind, RandomGenerator};

struct GlobalState {
    manager: ContextManager,
    random: RandomConfig,
}

static GLOBAL: Mutex<Option<GlobalState>> = Mutex::new(None);

// Every mutation leaves the table consistent before anything can panic,
// so a poisoned lock still guards valid data.
fn lock() -> MutexGuard<'static, Option<GlobalState>> {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner)
}

fn with_state<R>(f: impl FnOnce(&mut GlobalState) -> Result<R>) -> Result<R> {
    let mut guard = lock();
    let state = guard.as_mut().ok_or(CoreError::NotInitialized)?;
    f(state)
}

/// Create the global manager from the loaded config and builtin registry
pub fn global_create() -> Result<()> {
    global_create_with(config::load()?, TypeRegistry::builtin())
}

/// Create the global manager; fails with `AlreadyInitialized` on a second call
pub fn global_create_with(config: &Config, registry: Arc<TypeRegistry>) -> Result<()> {
    let mut guard = lock();
    if guard.is_some() {
        return Err(CoreError::AlreadyInitialized);
    }
    let manager = ContextManager::new(&config.manager, registry)?;
    *guard = Some(GlobalState {
        manager,
        random: config.random.clone(),
    });
    info!("global context manager created");
    Ok(())
}

/// Tear the global manager down, running every stored destructor
pub fn global_destroy() -> Result<()> {
    let state = lock().take().ok_or(CoreError::NotInitialized)?;
    info!(
        live = state.manager.table().len(),
        "destroying global context manager"
    );
    state.manager.destroy()
}

pub fn is_initialized() -> bool {
    lock().is_some()
}

pub fn add_context<T: Any + Send>(context: T, tag: &str, description: &str) -> Result<Handle> {
    with_state(|state| state.manager.add_context(context, tag, description))
}

/// Run `f` on the context behind `handle` under the global lock
pub fn with_context<T: Any, R>(
    handle: Handle,
    expected: Engine,
    f: impl FnOnce(&mut T) -> R,
) -> Result<R> {
    with_state(|state| {
        let context = state.manager.get_context_mut::<T>(handle, expected)?;
        Ok(f(context))
    })
}

pub fn remove_context(handle: Handle) -> Result<()> {
    with_state(|state| state.manager.remove_context(handle))
}

pub fn context_status(handle: Handle) -> Result<SlotStatus> {
    with_state(|state| state.manager.status(handle))
}

pub fn set_context_status(handle: Handle, status: SlotStatus) -> Result<()> {
    with_state(|state| state.manager.set_status(handle, status))
}

/// Number of live contexts
pub fn context_count() -> Result<usize> {
    with_state(|state| Ok(state.manager.table().len()))
}

/// Open a generator and store it; returns its handle
///
/// Hash tags resolve through the manager's registry. The backend is opened
/// with the lock released, so a slow device or socket does not stall other
/// callers.
pub fn random_new(kind: &GeneratorKind, description: &str) -> Result<Handle> {
    let registry = with_state(|state| Ok(Arc::clone(state.manager.table().registry())))?;
    let generator = RandomGenerator::create_with(kind, &registry)?;
    let tag = generator.name();
    add_context(generator, tag, description)
}

/// Same as [`random_new`] with the configured default backend
pub fn random_new_default(description: &str) -> Result<Handle> {
    let kind = with_state(|state| Ok(state.random.default_generator.clone()))?;
    random_new(&kind, description)
}

/// Reseed a stored generator and mark its slot modified
pub fn random_seed(handle: Handle, seed: &[u8]) -> Result<()> {
    with_state(|state| {
        state
            .manager
            .get_context_mut::<RandomGenerator>(handle, Engine::RandomGenerator)?
            .seed(seed)?;
        state.manager.set_status(handle, SlotStatus::Modified)
    })
}

/// Draw `len` bytes from a stored generator
pub fn random_generate(handle: Handle, len: usize) -> Result<Vec<u8>> {
    with_context(handle, Engine::RandomGenerator, |generator: &mut RandomGenerator| {
        generator.generate(len)
    })?
}
