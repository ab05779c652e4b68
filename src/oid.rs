// src/oid.rs
//! Type registry — maps a type tag to its engine, constructor and destructor
//!
//! The slot table never inspects payloads. Everything it needs to know
//! about a stored object (what kind of engine it is, which concrete Rust
//! type it must be, how to tear it down) is looked up here by tag.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use sha2::{Sha224, Sha256, Sha384, Sha512};

use crate::consts::{
    OID_DEV_RANDOM, OID_DEV_URANDOM, OID_FILE, OID_HASHRND, OID_HASHRND_SHA256,
    OID_HASHRND_SHA512, OID_LCG, OID_OS_NATIVE, OID_SHA224, OID_SHA256, OID_SHA384, OID_SHA512,
    OID_UNIX_SOCKET, OID_XORSHIFT,
};
use crate::enums::Engine;
use crate::error::{CoreError, Result};
use crate::random::hashrnd::BoxedHasher;
use crate::random::{available_backends, GeneratorKind, RandomGenerator};

/// Type-erased object stored in a slot
pub type Payload = Box<dyn Any + Send>;

/// Tears down a payload removed from a slot
pub type Destructor = fn(Payload) -> Result<()>;

pub type GeneratorConstructor = fn() -> Result<RandomGenerator>;

/// How an object of a registered type is built
#[derive(Clone, Copy)]
pub enum Constructor {
    /// Built by the caller (needs parameters, or is not an algorithm state)
    External,
    Generator(GeneratorConstructor),
    Hash(fn() -> BoxedHasher),
}

/// Everything the registry knows about one type tag
#[derive(Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    /// Dotted object identifier, when the algorithm has one
    pub id: Option<&'static str>,
    pub engine: Engine,
    /// Concrete payload type required by `add`, if pinned
    pub payload: Option<TypeId>,
    pub constructor: Constructor,
    pub destructor: Destructor,
}

impl TypeInfo {
    pub fn new(name: &'static str, engine: Engine) -> Self {
        Self {
            name,
            id: None,
            engine,
            payload: None,
            constructor: Constructor::External,
            destructor: drop_payload,
        }
    }

    pub fn with_id(mut self, id: &'static str) -> Self {
        self.id = Some(id);
        self
    }

    /// Pin the concrete payload type
    pub fn with_payload<T: Any>(mut self) -> Self {
        self.payload = Some(TypeId::of::<T>());
        self
    }

    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = constructor;
        self
    }

    pub fn with_destructor(mut self, destructor: Destructor) -> Self {
        self.destructor = destructor;
        self
    }

    /// Whether `payload` has the pinned concrete type (always true if unpinned)
    pub fn accepts(&self, payload: &(dyn Any + Send)) -> bool {
        self.payload
            .map_or(true, |expected| payload.type_id() == expected)
    }
}

impl std::fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

/// Default destructor: Rust's own drop glue
pub fn drop_payload(payload: Payload) -> Result<()> {
    drop(payload);
    Ok(())
}

/// Destructor for generator payloads: closes descriptors and wipes state
pub fn release_generator(payload: Payload) -> Result<()> {
    match payload.downcast::<RandomGenerator>() {
        Ok(generator) => generator.release(),
        // add() checked the concrete type, so this is table corruption
        Err(_) => panic!("generator slot holds a payload that is not a RandomGenerator"),
    }
}

static BUILTIN: Lazy<Arc<TypeRegistry>> = Lazy::new(|| Arc::new(TypeRegistry::with_builtins()));

#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: HashMap<&'static str, TypeInfo>,
    ids: HashMap<&'static str, &'static str>,
}

impl TypeRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared registry with every builtin type, built on first use
    pub fn builtin() -> Arc<TypeRegistry> {
        Arc::clone(&BUILTIN)
    }

    /// Fresh registry pre-filled with the builtin types, open for extension
    ///
    /// Generator backends are registered only if they can work on this
    /// platform (see [`available_backends`]).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        for kind in available_backends() {
            if let Some((name, constructor)) = builtin_generator(&kind) {
                registry.register(
                    generator_info(name).with_constructor(Constructor::Generator(constructor)),
                );
            }
        }

        // Need a path or a hash tag, so the caller builds them and only adds the result
        registry.register(generator_info(OID_FILE));
        registry.register(generator_info(OID_HASHRND));
        if cfg!(unix) {
            registry.register(generator_info(OID_UNIX_SOCKET));
        }

        registry.register(hash_info(OID_SHA224, "2.16.840.1.101.3.4.2.4", sha224));
        registry.register(hash_info(OID_SHA256, "2.16.840.1.101.3.4.2.1", sha256));
        registry.register(hash_info(OID_SHA384, "2.16.840.1.101.3.4.2.2", sha384));
        registry.register(hash_info(OID_SHA512, "2.16.840.1.101.3.4.2.3", sha512));

        registry
    }

    /// Add or replace an entry; returns the replaced one
    pub fn register(&mut self, info: TypeInfo) -> Option<TypeInfo> {
        if let Some(id) = info.id {
            self.ids.insert(id, info.name);
        }
        self.entries.insert(info.name, info)
    }

    /// Look a tag up by name or by dotted identifier
    pub fn get(&self, tag: &str) -> Result<&TypeInfo> {
        self.entries
            .get(tag)
            .or_else(|| self.ids.get(tag).and_then(|name| self.entries.get(name)))
            .ok_or_else(|| CoreError::UnknownType(tag.to_string()))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_ok()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered tags of one engine class, sorted
    pub fn tags(&self, engine: Engine) -> Vec<&'static str> {
        let mut tags: Vec<_> = self
            .entries
            .values()
            .filter(|info| info.engine == engine)
            .map(|info| info.name)
            .collect();
        tags.sort_unstable();
        tags
    }

    /// Run the constructor registered for a generator tag
    pub fn construct_generator(&self, tag: &str) -> Result<RandomGenerator> {
        let info = self.expect_engine(tag, Engine::RandomGenerator)?;
        match info.constructor {
            Constructor::Generator(construct) => construct(),
            _ => Err(CoreError::UnsupportedOperation {
                backend: info.name,
                operation: "construct without parameters",
            }),
        }
    }

    /// Fresh hasher for a hash function tag
    pub fn construct_hash(&self, tag: &str) -> Result<BoxedHasher> {
        let info = self.expect_engine(tag, Engine::HashFunction)?;
        match info.constructor {
            Constructor::Hash(construct) => Ok(construct()),
            _ => Err(CoreError::UnsupportedOperation {
                backend: info.name,
                operation: "construct hash",
            }),
        }
    }

    /// Run the destructor registered for `tag` on `payload`
    pub fn destroy(&self, tag: &str, payload: Payload) -> Result<()> {
        let info = self.get(tag)?;
        (info.destructor)(payload)
    }

    fn expect_engine(&self, tag: &str, expected: Engine) -> Result<&TypeInfo> {
        let info = self.get(tag)?;
        if info.engine != expected {
            return Err(CoreError::TypeMismatch {
                expected,
                found: info.engine,
            });
        }
        Ok(info)
    }
}

fn generator_info(name: &'static str) -> TypeInfo {
    TypeInfo::new(name, Engine::RandomGenerator)
        .with_payload::<RandomGenerator>()
        .with_destructor(release_generator)
}

fn hash_info(name: &'static str, id: &'static str, construct: fn() -> BoxedHasher) -> TypeInfo {
    TypeInfo::new(name, Engine::HashFunction)
        .with_id(id)
        .with_constructor(Constructor::Hash(construct))
}

fn builtin_generator(kind: &GeneratorKind) -> Option<(&'static str, GeneratorConstructor)> {
    let constructor: GeneratorConstructor = match kind {
        GeneratorKind::Lcg => || RandomGenerator::create(&GeneratorKind::Lcg),
        GeneratorKind::Xorshift => || RandomGenerator::create(&GeneratorKind::Xorshift),
        GeneratorKind::OsNative => || RandomGenerator::create(&GeneratorKind::OsNative),
        GeneratorKind::DevRandom => || RandomGenerator::create(&GeneratorKind::DevRandom),
        GeneratorKind::DevUrandom => || RandomGenerator::create(&GeneratorKind::DevUrandom),
        GeneratorKind::HashSha256 => || RandomGenerator::create(&GeneratorKind::HashSha256),
        GeneratorKind::HashSha512 => || RandomGenerator::create(&GeneratorKind::HashSha512),
        GeneratorKind::File { .. }
        | GeneratorKind::UnixSocket { .. }
        | GeneratorKind::Hash { .. } => return None,
    };
    // Parameterless kinds only, so the tag is static
    let name = match kind {
        GeneratorKind::Lcg => OID_LCG,
        GeneratorKind::Xorshift => OID_XORSHIFT,
        GeneratorKind::OsNative => OID_OS_NATIVE,
        GeneratorKind::DevRandom => OID_DEV_RANDOM,
        GeneratorKind::DevUrandom => OID_DEV_URANDOM,
        GeneratorKind::HashSha256 => OID_HASHRND_SHA256,
        _ => OID_HASHRND_SHA512,
    };
    Some((name, constructor))
}

fn sha224() -> BoxedHasher {
    Box::new(Sha224::default())
}

fn sha256() -> BoxedHasher {
    Box::new(Sha256::default())
}

fn sha384() -> BoxedHasher {
    Box::new(Sha384::default())
}

fn sha512() -> BoxedHasher {
    Box::new(Sha512::default())
}
